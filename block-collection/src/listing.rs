use once_cell::sync::Lazy;
use regex_lite::Regex;

#[allow(clippy::expect_used)]
static HREF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<a\b[^>]*?\bhref\s*=\s*"([^"]*)""#).expect("valid href regex"));

const LISTING_MARKER: &str = "class=\"listing\"";
const CDN_PREFIX: &str = "/gh";

/// Entries of one directory page, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    pub folders: Vec<String>,
    pub files: Vec<String>,
}

impl DirectoryListing {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}

/// Parse a CDN directory page for `folder`.
///
/// Only links inside the listing table that point below `folder` count; a
/// trailing `/` marks a sub-folder.
pub fn parse_listing(html: &str, folder: &str) -> DirectoryListing {
    let mut listing = DirectoryListing::default();
    let Some(start) = html.find(LISTING_MARKER) else {
        return listing;
    };

    let folder = folder.trim_matches('/');
    for captures in HREF_PATTERN.captures_iter(&html[start..]) {
        let Some(href) = captures.get(1).map(|m| m.as_str()) else {
            continue;
        };
        if !href.starts_with(CDN_PREFIX) || !is_below(href, folder) {
            continue;
        }
        let Some(name) = href.split('/').rfind(|segment| !segment.is_empty()) else {
            continue;
        };
        if href.ends_with('/') {
            listing.folders.push(name.to_string());
        } else {
            listing.files.push(name.to_string());
        }
    }
    listing
}

/// Parent links (`..`) point at or above the listed folder.
fn is_below(href: &str, folder: &str) -> bool {
    if folder.is_empty() {
        return true;
    }
    let marker = format!("/{folder}/");
    href.find(&marker)
        .is_some_and(|idx| href.len() > idx + marker.len())
}
