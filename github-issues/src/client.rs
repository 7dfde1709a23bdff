use crate::error::GitHubError;
use crate::error::Result;
use crate::models::Comment;
use crate::models::Issue;
use crate::models::IssueDetails;
use crate::repo::RepoRef;
use reqwest::RequestBuilder;
use reqwest::Response;
use reqwest::header::ACCEPT;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use tracing::info;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const CLIENT_USER_AGENT: &str = concat!("aem-copilot/", env!("CARGO_PKG_VERSION"));
const PLACEHOLDER_MARKER: &str = "your-";

/// Issues API of one repository.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    api_base_url: String,
    repo: RepoRef,
    token: Option<String>,
}

#[derive(Deserialize)]
struct AuthenticatedUser {
    login: String,
}

impl GitHubClient {
    pub fn new(repo: RepoRef, token: Option<String>) -> Self {
        let api_base_url = repo.api_base_url();
        Self::with_base_url(repo, api_base_url, token)
    }

    pub fn with_base_url(repo: RepoRef, api_base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            repo,
            token,
        }
    }

    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    /// Newest open issue with its comments, `None` when nothing is open.
    pub async fn latest_issue(&self) -> Result<Option<IssueDetails>> {
        let issues: Vec<Issue> = self
            .get_json(
                &self.repo_url("issues"),
                &[
                    ("state", "open"),
                    ("per_page", "1"),
                    ("sort", "created"),
                    ("direction", "desc"),
                ],
            )
            .await?;
        let Some(issue) = issues.into_iter().next() else {
            info!("no open issues in {}", self.repo.slug());
            return Ok(None);
        };
        let comments = self.comments(issue.number).await?;
        Ok(Some(IssueDetails { issue, comments }))
    }

    pub async fn issue_details(&self, number: u64) -> Result<IssueDetails> {
        let issue: Issue = self
            .get_json(&self.repo_url(&format!("issues/{number}")), &[])
            .await?;
        let comments = self.comments(number).await?;
        Ok(IssueDetails { issue, comments })
    }

    /// Up to `top_n` open issues, newest first.
    pub async fn list_issues(&self, top_n: usize) -> Result<Vec<Issue>> {
        let per_page = top_n.to_string();
        let mut issues: Vec<Issue> = self
            .get_json(
                &self.repo_url("issues"),
                &[("state", "open"), ("per_page", per_page.as_str())],
            )
            .await?;
        issues.truncate(top_n);
        Ok(issues)
    }

    pub async fn create_issue(&self, title: &str, body: &str) -> Result<Issue> {
        let request = self
            .client
            .post(self.repo_url("issues"))
            .json(&json!({"title": title, "body": body}));
        let issue: Issue = self.send_json(request).await?;
        info!("created issue #{} in {}", issue.number, self.repo.slug());
        Ok(issue)
    }

    pub async fn close_issue(&self, number: u64) -> Result<Issue> {
        let request = self
            .client
            .patch(self.repo_url(&format!("issues/{number}")))
            .json(&json!({"state": "closed"}));
        let issue: Issue = self.send_json(request).await?;
        info!("closed issue #{number} in {}", self.repo.slug());
        Ok(issue)
    }

    /// Open issues assigned to `username`, or to the authenticated user when
    /// the name is missing or still a template placeholder.
    pub async fn assigned_issues(&self, username: Option<&str>) -> Result<Vec<Issue>> {
        let assignee = match username
            .map(str::trim)
            .filter(|name| !name.is_empty() && !name.to_lowercase().contains(PLACEHOLDER_MARKER))
        {
            Some(name) => name.to_string(),
            None => self.authenticated_user().await?,
        };
        self.get_json(
            &self.repo_url("issues"),
            &[("state", "open"), ("assignee", assignee.as_str())],
        )
        .await
    }

    pub async fn authenticated_user(&self) -> Result<String> {
        let user: AuthenticatedUser = self
            .get_json(&format!("{}/user", self.api_base_url), &[])
            .await?;
        debug!("authenticated as {}", user.login);
        Ok(user.login)
    }

    async fn comments(&self, number: u64) -> Result<Vec<Comment>> {
        self.get_json(&self.repo_url(&format!("issues/{number}/comments")), &[])
            .await
    }

    fn repo_url(&self, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/{suffix}",
            self.api_base_url, self.repo.owner, self.repo.name
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        self.send_json(self.client.get(url).query(query)).await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let mut request = request
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, CLIENT_USER_AGENT);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = check_status(request.send().await?).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|error| error.message)
        .unwrap_or(body);
    Err(GitHubError::Status {
        status: status.as_u16(),
        message,
    })
}
