use once_cell::sync::Lazy;
use regex_lite::Regex;

#[allow(clippy::expect_used)]
static ISSUE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"issue #(\d+)").expect("valid issue number regex"));

/// What the user asked the `issues` command for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueQuery {
    Latest,
    Number(u64),
    /// `issue #0`, or a number too large to be an issue.
    InvalidNumber,
    List,
    Unknown,
}

impl IssueQuery {
    /// Checks are made in order: latest issue, `issue #N`, list.
    pub fn parse(prompt: &str) -> Self {
        let prompt = prompt.to_lowercase();
        if prompt.contains("latest issue") {
            return IssueQuery::Latest;
        }
        if let Some(digits) = ISSUE_NUMBER.captures(&prompt).and_then(|caps| caps.get(1)) {
            return match digits.as_str().parse::<u64>() {
                Ok(number) if number > 0 => IssueQuery::Number(number),
                _ => IssueQuery::InvalidNumber,
            };
        }
        if prompt.contains("list") {
            return IssueQuery::List;
        }
        IssueQuery::Unknown
    }
}
