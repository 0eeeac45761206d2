use crate::core::PullRequestContext;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

const JSON_MEDIA_TYPE: &str = "application/vnd.github.v3+json";
const DIFF_MEDIA_TYPE: &str = "application/vnd.github.v3.diff";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrUrlError {
    #[error("not a pull request URL (expected https://github.com/<owner>/<repo>/pull/<number>): {0}")]
    Malformed(String),
    #[error("invalid pull request number in {0}")]
    InvalidNumber(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PullRequestRef {
    pub fn parse(url: &str) -> Result<Self, PrUrlError> {
        let trimmed = url.trim().trim_end_matches('/');
        let path = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .unwrap_or(trimmed);

        let parts: Vec<&str> = path.split('/').collect();
        // host / owner / repo / "pull" / number [/ files ...]
        if parts.len() < 5 || !matches!(parts[3], "pull" | "pulls") {
            return Err(PrUrlError::Malformed(url.to_string()));
        }
        if parts[1].is_empty() || parts[2].is_empty() {
            return Err(PrUrlError::Malformed(url.to_string()));
        }

        let number = parts[4]
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .parse()
            .map_err(|_| PrUrlError::InvalidNumber(url.to_string()))?;

        Ok(Self {
            owner: parts[1].to_string(),
            repo: parts[2].to_string(),
            number,
        })
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

#[derive(Deserialize)]
struct PullRequestPayload {
    title: String,
    body: Option<String>,
}

#[derive(Serialize)]
struct CommentPayload<'a> {
    body: &'a str,
}

pub struct GitHubClient {
    client: Client,
    token: String,
    api_url: String,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>, api_url: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(concat!("prlens/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            token: token.into(),
            api_url: api_url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn pull_url(&self, pr: &PullRequestRef) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            self.api_url, pr.owner, pr.repo, pr.number
        )
    }

    async fn get(&self, url: &str, accept: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", accept)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("GitHub API error ({}): {}", status, body);
        }

        Ok(response)
    }

    pub async fn get_pull_request(&self, pr: &PullRequestRef) -> Result<PullRequestContext> {
        let payload: PullRequestPayload = self
            .get(&self.pull_url(pr), JSON_MEDIA_TYPE)
            .await?
            .json()
            .await
            .context("Failed to parse pull request metadata")?;

        Ok(PullRequestContext::new(payload.title, payload.body))
    }

    pub async fn get_diff(&self, pr: &PullRequestRef) -> Result<String> {
        self.get(&self.pull_url(pr), DIFF_MEDIA_TYPE)
            .await?
            .text()
            .await
            .context("Failed to read pull request diff")
    }

    pub async fn post_comment(&self, pr: &PullRequestRef, body: &str) -> Result<()> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_url, pr.owner, pr.repo, pr.number
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", JSON_MEDIA_TYPE)
            .json(&CommentPayload { body })
            .send()
            .await
            .context("Failed to post review comment")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("GitHub API error ({}): {}", status, text);
        }

        info!("Posted review comment to {}", pr);
        Ok(())
    }
}
