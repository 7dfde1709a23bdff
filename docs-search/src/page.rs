use serde::Deserialize;
use serde::Serialize;

/// One row of the documentation index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub path: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: String,
}

/// A documentation page in the loaded corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocPage {
    /// Absolute URL of the page
    pub url: String,
    pub title: String,
    pub content: String,
    /// Site-relative path as listed in the index
    pub path: String,
    pub description: String,
}

impl DocPage {
    pub fn from_entry(entry: IndexEntry, site_base_url: &str) -> Self {
        Self {
            url: format!("{}{}", site_base_url.trim_end_matches('/'), entry.path),
            title: entry.title,
            content: entry.content,
            path: entry.path,
            description: entry.description,
        }
    }

    /// Lowercased `title + " " + content`, the text term matching runs on.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.title, self.content).to_lowercase()
    }

    /// Projection injected into answer prompts.
    pub fn reference(&self) -> DocReference<'_> {
        DocReference {
            url: &self.url,
            title: &self.title,
            content: &self.content,
        }
    }
}

/// `{url, title, content}` view of a page, serialized into prompts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DocReference<'a> {
    pub url: &'a str,
    pub title: &'a str,
    pub content: &'a str,
}

/// A page that contains every query term.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredHit<'a> {
    pub page: &'a DocPage,
    /// Character index of the earliest term occurrence in the search text
    pub first_match_offset: usize,
}
