//! GitHub API Example
//!
//! One configured `Sling` serves as the template for every endpoint; each call
//! derives its own builder with `try_clone`.

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]

use std::time::Duration;

use sling::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Data Types
// ============================================================================

/// A GitHub user.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub avatar_url: String,
}

/// A GitHub issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub number: u32,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
}

/// Query parameters for listing issues.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssueListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// Request to create a GitHub issue.
#[derive(Debug, Clone, Serialize)]
pub struct CreateIssue {
    pub title: String,
    pub body: Option<String>,
}

// ============================================================================
// Service
// ============================================================================

pub const GITHUB_API_URL: &str = "https://api.github.com/";

/// Thin GitHub API wrapper around a template `Sling`.
#[derive(Debug, Clone)]
pub struct GitHub {
    base: Sling,
}

impl GitHub {
    /// Service rooted at `base_url`, which should end with `/`.
    #[must_use]
    pub fn new(client: HyperClient, base_url: &str) -> Self {
        let base = Sling::new(client)
            .base(base_url)
            .set_header("User-Agent", "sling-github-demo/0.1.0")
            .add_header("Accept", "application/vnd.github.v3+json")
            .response_decoder(JsonDecoder);
        Self { base }
    }

    /// Authenticate every subsequent request with a token.
    #[must_use]
    pub fn with_token(mut self, token: &str) -> Self {
        self.base = self.base.set_header("Authorization", &format!("Bearer {token}"));
        self
    }

    pub async fn user(&self, login: &str) -> Result<User> {
        let mut user = User::default();
        self.base
            .try_clone()?
            .get(&format!("users/{login}"))
            .receive(&mut user)
            .await?;
        Ok(user)
    }

    /// Raw JSON text of a user, for inspection.
    pub async fn user_json(&self, login: &str) -> Result<String> {
        let mut text = String::new();
        self.base
            .try_clone()?
            .get(&format!("users/{login}"))
            .response_decoder(RawDecoder)
            .receive(&mut text)
            .await?;
        Ok(text)
    }

    pub async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        params: IssueListParams,
    ) -> Result<Vec<Issue>> {
        let mut issues: Vec<Issue> = Vec::new();
        self.base
            .try_clone()?
            .get(&format!("repos/{owner}/{repo}/issues"))
            .add_query(params)
            .receive(&mut issues)
            .await?;
        Ok(issues)
    }

    /// Create an issue. GitHub answers `201 Created`, so the raw response
    /// is decoded here instead of through `receive`.
    pub async fn create_issue(&self, owner: &str, repo: &str, issue: CreateIssue) -> Result<Issue> {
        let response = self
            .base
            .try_clone()?
            .post(&format!("repos/{owner}/{repo}/issues"))
            .body_json(issue)
            .response()
            .await?;

        if response.status() == StatusCode::CREATED.as_u16() {
            response.json()
        } else {
            let status = response.status();
            Err(Error::http_with_body(status, "issue not created", response.into_body()))
        }
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // RUST_LOG=sling=debug shows each exchange
    let client =
        HyperClient::with_config(ClientConfig::default().with_timeout(Duration::from_secs(10)));
    let github = GitHub::new(client, GITHUB_API_URL);

    let raw = github.user_json("octocat").await?;
    println!("Raw result: {raw}");

    let user = github.user("octocat").await?;
    println!("Result: {user:?}");

    let issues = github
        .list_issues(
            "rust-lang",
            "rust",
            IssueListParams {
                state: Some("open".to_string()),
                per_page: Some(5),
                page: None,
            },
        )
        .await?;
    info!(count = issues.len(), "issues fetched");
    for issue in &issues {
        println!("#{} {}", issue.number, issue.title);
    }

    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================
