use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub state: String,
    /// Present when the entry is a pull request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// An issue together with its comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDetails {
    pub issue: Issue,
    pub comments: Vec<Comment>,
}

impl IssueDetails {
    /// Title in bold, body and comments as block quotes, closed by a rule.
    pub fn to_markdown(&self) -> String {
        let mut out = format!("Issue: **{}**\n\n", self.issue.title);
        out.push_str(&quote(self.issue.body_text()));

        if !self.comments.is_empty() {
            out.push_str("\n\n_Comments_\n");
            for comment in &self.comments {
                out.push('\n');
                out.push_str(&quote(comment.body.as_deref().unwrap_or_default()));
                out.push('\n');
            }
        }

        out.push_str("\n\n----\n\n");
        out
    }

    /// Issue summary handed to the model ahead of the user's question.
    pub fn to_prompt_context(&self) -> String {
        let mut context = format!(
            "The issue to work on has the title: \"{}\" and the description: {}. \
             Use that information to give better answer for the following user query.",
            self.issue.title,
            self.issue.body_text()
        );
        let comments: Vec<&str> = self
            .comments
            .iter()
            .filter_map(|comment| comment.body.as_deref())
            .collect();
        if !comments.is_empty() {
            context.push_str(" Do also regard the comments: ");
            context.push_str(&comments.join("\n\n"));
        }
        context
    }
}

fn quote(text: &str) -> String {
    format!("> {}", text.replace('\n', "\n> "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn details() -> IssueDetails {
        IssueDetails {
            issue: Issue {
                number: 12,
                title: "Hero block overflows".to_string(),
                body: Some("Steps:\n1. open page".to_string()),
                html_url: "https://github.com/adobe/site/issues/12".to_string(),
                state: "open".to_string(),
                pull_request: None,
            },
            comments: vec![Comment {
                id: 1,
                html_url: String::new(),
                body: Some("Also on mobile".to_string()),
            }],
        }
    }

    #[test]
    fn test_markdown() {
        assert_eq!(
            details().to_markdown(),
            "Issue: **Hero block overflows**\n\n> Steps:\n> 1. open page\n\n_Comments_\n\n> Also on mobile\n\n\n----\n\n"
        );
    }

    #[test]
    fn test_markdown_without_comments() {
        let mut details = details();
        details.comments.clear();
        details.issue.body = None;
        assert_eq!(
            details.to_markdown(),
            "Issue: **Hero block overflows**\n\n> \n\n----\n\n"
        );
    }

    #[test]
    fn test_prompt_context() {
        let context = details().to_prompt_context();
        assert!(context.starts_with("The issue to work on has the title: \"Hero block overflows\""));
        assert!(context.ends_with("Do also regard the comments: Also on mobile"));
    }

    #[test]
    fn test_null_body_deserializes() {
        let issue: Issue =
            serde_json::from_str(r#"{"number":1,"title":"t","body":null,"html_url":"u","state":"open"}"#)
                .unwrap();
        assert_eq!(issue.body_text(), "");
        assert!(!issue.is_pull_request());
    }
}
