use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient};
use std::time::Duration;
use tracing::{debug, instrument};

use super::types::{next_page_from_link, GitHubRepo};
use crate::domain::errors::ListError;
use crate::domain::models::{CloneAuth, RepositoryDescriptor, RepositoryPage, SyncSettings};
use crate::domain::ports::repository_lister::{RepositoryLister, PAGE_SIZE};

const USER_AGENT: &str = concat!("mirrorsync/", env!("CARGO_PKG_VERSION"));

/// Lists an account's repositories through the GitHub REST API
///
/// With a token, the authenticated user's own repositories are listed
/// (including private ones); anonymously, the account's public ones.
pub struct GitHubLister {
    /// Reusable HTTP client with connection pooling
    http_client: ReqwestClient,

    /// Base URL without trailing slash
    api_url: String,

    /// Account whose repositories are listed
    account: String,

    /// Bearer token, absent for anonymous listing
    token: Option<String>,
}

impl GitHubLister {
    /// Build a lister from validated settings
    pub fn new(settings: &SyncSettings) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        let token = match settings.clone_auth {
            CloneAuth::Token => Some(settings.token.clone()),
            CloneAuth::Anonymous => None,
        };

        Ok(Self {
            http_client,
            api_url: settings.api_url.clone(),
            account: settings.account.clone(),
            token,
        })
    }

    fn page_url(&self, page: u32) -> String {
        if self.token.is_some() {
            format!(
                "{}/user/repos?visibility=all&affiliation=owner&per_page={PAGE_SIZE}&page={page}",
                self.api_url
            )
        } else {
            format!(
                "{}/users/{}/repos?per_page={PAGE_SIZE}&page={page}",
                self.api_url, self.account
            )
        }
    }
}

#[async_trait]
impl RepositoryLister for GitHubLister {
    #[instrument(skip(self), fields(account = %self.account))]
    async fn list_page(&self, page: u32) -> Result<RepositoryPage, ListError> {
        let mut request = self
            .http_client
            .get(self.page_url(page))
            .header(header::ACCEPT, "application/vnd.github+json");
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| ListError::Request {
            page,
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(ListError::Status {
                page,
                status: status.as_u16(),
                body,
            });
        }

        let next_page = response
            .headers()
            .get(header::LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(next_page_from_link);

        let repos: Vec<GitHubRepo> = response.json().await.map_err(|e| ListError::Decode {
            page,
            message: e.to_string(),
        })?;

        debug!(count = repos.len(), ?next_page, "fetched repository page");

        Ok(RepositoryPage {
            repositories: repos.into_iter().map(RepositoryDescriptor::from).collect(),
            next_page,
        })
    }
}
