use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::fmt::Write as _;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

/// Project files handed to block generation, relative to the workspace root.
const PROJECT_FILES: &[&str] = &["styles/styles.css", "scripts/aem.js", "scripts/scripts.js"];

const CONTEXT_HEADER: &str =
    "Here are the project level styles, AEM JS functions and global JS functions:";

#[allow(clippy::expect_used)]
static BLOCK_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid block comment regex"));

#[allow(clippy::expect_used)]
static LINE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*//.*$").expect("valid line comment regex"));

#[allow(clippy::expect_used)]
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Styles and scripts of the user's project, with comments and redundant
/// whitespace removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectContext {
    files: Vec<(PathBuf, String)>,
}

impl ProjectContext {
    /// Reads whichever project files exist under `root`. Unreadable files
    /// are skipped.
    pub async fn load(root: &Path) -> Self {
        let mut files = Vec::new();
        for relative in PROJECT_FILES {
            let path = root.join(relative);
            match tokio::fs::read_to_string(&path).await {
                Ok(contents) => files.push((PathBuf::from(relative), compact_source(&contents))),
                Err(err) => debug!("skipping project file {}: {err}", path.display()),
            }
        }
        Self { files }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[(PathBuf, String)] {
        &self.files
    }

    /// Context message for the model; `None` when no file was found.
    pub fn to_prompt_context(&self) -> Option<String> {
        if self.files.is_empty() {
            return None;
        }
        let mut out = CONTEXT_HEADER.to_string();
        for (path, contents) in &self.files {
            let _ = write!(out, "\n\n{}:\n{contents}", path.display());
        }
        Some(out)
    }
}

/// Drops `/* */` and whole-line `//` comments and collapses whitespace.
pub(crate) fn compact_source(source: &str) -> String {
    let without_blocks = BLOCK_COMMENT.replace_all(source, "");
    let without_lines = LINE_COMMENT.replace_all(&without_blocks, "");
    WHITESPACE.replace_all(&without_lines, " ").trim().to_string()
}
