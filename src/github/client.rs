//! GitHub API client implementation

use crate::core::{GhrelError, GhrelResult};
use crate::di::traits::{ConfigProvider, ReleaseProvider};
use crate::github::types::{NewRelease, Release};
use async_trait::async_trait;
use reqwest::{header, Client as HttpClient, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Page size used when listing releases (the API maximum)
const PER_PAGE: usize = 100;

/// GitHub REST API version pinned on every request
const API_VERSION: &str = "2022-11-28";

/// GitHub API client
#[derive(Clone)]
pub struct GitHubClient {
    http_client: HttpClient,
    api_url: String,
}

impl GitHubClient {
    /// Create a new GitHub client
    pub fn new(config: &dyn ConfigProvider) -> GhrelResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("ghrel/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static(API_VERSION),
        );

        if let Some(token) = config.token() {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| GhrelError::Config(format!("Invalid GitHub token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let http_client = HttpClient::builder()
            .default_headers(headers)
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| GhrelError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_url: config.api_url().trim_end_matches('/').to_string(),
        })
    }

    /// Get one page of releases
    pub async fn get_releases_page(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
    ) -> GhrelResult<Vec<Release>> {
        let url = format!(
            "{}?per_page={}&page={}",
            self.repo_url(owner, repo, "releases"),
            PER_PAGE,
            page
        );
        self.api_get(&url).await
    }

    /// Get every release, following pagination until a short page
    pub async fn get_releases(&self, owner: &str, repo: &str) -> GhrelResult<Vec<Release>> {
        let mut releases = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.get_releases_page(owner, repo, page).await?;
            let done = batch.len() < PER_PAGE;
            releases.extend(batch);
            if done {
                break;
            }
            page += 1;
        }

        debug!(owner, repo, count = releases.len(), "listed releases");
        Ok(releases)
    }

    /// Create a release
    pub async fn create_release(
        &self,
        owner: &str,
        repo: &str,
        release: &NewRelease,
    ) -> GhrelResult<Release> {
        let url = self.repo_url(owner, repo, "releases");
        self.api_post(&url, release).await
    }

    /// Delete a release
    pub async fn delete_release(&self, owner: &str, repo: &str, release_id: u64) -> GhrelResult<()> {
        let url = self.repo_url(owner, repo, &format!("releases/{}", release_id));
        self.api_delete(&url).await
    }

    /// `{api_url}/repos/{owner}/{repo}/{path}`
    pub(crate) fn repo_url(&self, owner: &str, repo: &str, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url,
            urlencoding::encode(owner),
            urlencoding::encode(repo),
            path
        )
    }

    /// `{api_url}/repos/{owner}/{repo}`
    pub(crate) fn repo_root_url(&self, owner: &str, repo: &str) -> String {
        format!(
            "{}/repos/{}/{}",
            self.api_url,
            urlencoding::encode(owner),
            urlencoding::encode(repo)
        )
    }

    /// Send a GET and return the raw response, whatever its status
    pub(crate) async fn api_get_raw(&self, url: &str) -> GhrelResult<Response> {
        debug!(%url, "GET");
        Ok(self.http_client.get(url).send().await?)
    }

    /// Make an API GET request and parse JSON response
    pub(crate) async fn api_get<T: DeserializeOwned>(&self, url: &str) -> GhrelResult<T> {
        let response = check_status(self.api_get_raw(url).await?).await?;
        Ok(response.json().await?)
    }

    /// Make an API POST request with a JSON body and parse JSON response
    pub(crate) async fn api_post<B, T>(&self, url: &str, body: &B) -> GhrelResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!(%url, "POST");
        let response = self.http_client.post(url).json(body).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Make an API DELETE request
    pub(crate) async fn api_delete(&self, url: &str) -> GhrelResult<()> {
        debug!(%url, "DELETE");
        let response = self.http_client.delete(url).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Turn a non-success response into `RemoteFailure`, keeping the body
pub(crate) async fn check_status(response: Response) -> GhrelResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(GhrelError::remote(status, body))
}

// Implement ReleaseProvider trait
#[async_trait]
impl ReleaseProvider for GitHubClient {
    async fn list_releases(&self, owner: &str, repo: &str) -> GhrelResult<Vec<Release>> {
        self.get_releases(owner, repo).await
    }

    async fn create_release(
        &self,
        owner: &str,
        repo: &str,
        release: &NewRelease,
    ) -> GhrelResult<Release> {
        Self::create_release(self, owner, repo, release).await
    }

    async fn delete_release(&self, owner: &str, repo: &str, release_id: u64) -> GhrelResult<()> {
        Self::delete_release(self, owner, repo, release_id).await
    }
}
