//! Mock implementations of service traits for testing

use super::traits::{ConfigProvider, ReleaseProvider, TagProvider};
use crate::core::{GhrelError, GhrelResult};
use crate::github::types::{NewRelease, Release, ReleaseAsset, Tag};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock configuration provider for testing
///
/// # Example
///
/// ```
/// use ghrel::di::mocks::MockConfigProvider;
/// use ghrel::di::ConfigProvider;
///
/// let config = MockConfigProvider::with_urls("http://127.0.0.1:9000", "http://127.0.0.1:9001");
/// assert_eq!(config.token(), Some("test-token"));
/// ```
#[derive(Clone)]
pub struct MockConfigProvider {
    pub api_url: String,
    pub upload_url: String,
    pub token: Option<String>,
    pub http_timeout: Duration,
}

impl Default for MockConfigProvider {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            upload_url: "https://uploads.github.com".to_string(),
            token: Some("test-token".to_string()),
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl MockConfigProvider {
    /// Point both hosts somewhere else (typically a wiremock server)
    pub fn with_urls(api_url: &str, upload_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            upload_url: upload_url.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }
}

impl ConfigProvider for MockConfigProvider {
    fn api_url(&self) -> &str {
        &self.api_url
    }

    fn upload_url(&self) -> &str {
        &self.upload_url
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn http_timeout(&self) -> Duration {
        self.http_timeout
    }
}

/// In-memory release store keyed by `owner/repo`
///
/// # Example
///
/// ```
/// use ghrel::di::mocks::MockReleaseProvider;
///
/// let releases = MockReleaseProvider::new();
/// releases.add_release("octo", "app", MockReleaseProvider::release(1, "v1.0.0"));
/// assert_eq!(releases.created().len(), 0);
/// ```
#[derive(Clone, Default)]
pub struct MockReleaseProvider {
    releases: Arc<Mutex<HashMap<String, Vec<Release>>>>,
    created: Arc<Mutex<Vec<NewRelease>>>,
    deleted: Arc<Mutex<Vec<u64>>>,
    fail_create: Arc<Mutex<Option<(u16, String)>>>,
}

impl MockReleaseProvider {
    /// Create a new empty mock release provider
    pub fn new() -> Self {
        Self::default()
    }

    /// A published release with no assets and no timestamp
    pub fn release(id: u64, tag: &str) -> Release {
        Release {
            id,
            tag_name: tag.to_string(),
            name: Some(tag.to_string()),
            body: None,
            draft: false,
            prerelease: false,
            created_at: None,
            published_at: None,
            html_url: format!("https://github.com/mock/mock/releases/tag/{}", tag),
            assets: Vec::new(),
        }
    }

    /// Add an existing release to the store
    pub fn add_release(&self, owner: &str, repo: &str, release: Release) {
        self.releases
            .lock()
            .unwrap()
            .entry(key(owner, repo))
            .or_default()
            .push(release);
    }

    /// Attach an asset to a stored release
    pub fn add_asset(&self, release_id: u64, asset: ReleaseAsset) {
        let mut releases = self.releases.lock().unwrap();
        if let Some(release) = releases
            .values_mut()
            .flatten()
            .find(|r| r.id == release_id)
        {
            release.assets.push(asset);
        }
    }

    /// Make the next `create_release` calls fail with the given status
    pub fn fail_create_with(&self, status: u16, body: &str) {
        *self.fail_create.lock().unwrap() = Some((status, body.to_string()));
    }

    /// Requests passed to `create_release`, in call order
    pub fn created(&self) -> Vec<NewRelease> {
        self.created.lock().unwrap().clone()
    }

    /// Ids passed to `delete_release`, in call order
    pub fn deleted(&self) -> Vec<u64> {
        self.deleted.lock().unwrap().clone()
    }
}

fn key(owner: &str, repo: &str) -> String {
    format!("{}/{}", owner, repo)
}

#[async_trait]
impl ReleaseProvider for MockReleaseProvider {
    async fn list_releases(&self, owner: &str, repo: &str) -> GhrelResult<Vec<Release>> {
        Ok(self
            .releases
            .lock()
            .unwrap()
            .get(&key(owner, repo))
            .cloned()
            .unwrap_or_default())
    }

    async fn create_release(
        &self,
        owner: &str,
        repo: &str,
        release: &NewRelease,
    ) -> GhrelResult<Release> {
        if let Some((status, body)) = self.fail_create.lock().unwrap().clone() {
            return Err(GhrelError::RemoteFailure {
                status,
                reason: "Mock failure".to_string(),
                body,
            });
        }

        self.created.lock().unwrap().push(release.clone());

        let mut releases = self.releases.lock().unwrap();
        let next_id = releases.values().flatten().map(|r| r.id).max().unwrap_or(0) + 1;
        let created = Release {
            id: next_id,
            tag_name: release.tag_name.clone(),
            name: release.name.clone(),
            body: release.body.clone(),
            draft: release.draft,
            prerelease: release.prerelease,
            created_at: Some(chrono::Utc::now()),
            published_at: None,
            html_url: format!(
                "https://github.com/{}/{}/releases/tag/{}",
                owner, repo, release.tag_name
            ),
            assets: Vec::new(),
        };
        releases
            .entry(key(owner, repo))
            .or_default()
            .push(created.clone());

        Ok(created)
    }

    async fn delete_release(&self, owner: &str, repo: &str, release_id: u64) -> GhrelResult<()> {
        self.deleted.lock().unwrap().push(release_id);

        let mut releases = self.releases.lock().unwrap();
        let list = releases.entry(key(owner, repo)).or_default();
        let before = list.len();
        list.retain(|r| r.id != release_id);

        if list.len() == before {
            return Err(GhrelError::RemoteFailure {
                status: 404,
                reason: "Not Found".to_string(),
                body: format!("release {} not found", release_id),
            });
        }
        Ok(())
    }
}

/// In-memory tag store recording create/delete calls
///
/// # Example
///
/// ```
/// use ghrel::di::mocks::MockTagProvider;
///
/// let tags = MockTagProvider::new();
/// tags.add_tag("octo", "app", "v1.0.0");
/// assert!(tags.created().is_empty());
/// ```
#[derive(Clone, Default)]
pub struct MockTagProvider {
    tags: Arc<Mutex<HashMap<String, Tag>>>,
    created: Arc<Mutex<Vec<String>>>,
    deleted: Arc<Mutex<Vec<String>>>,
}

impl MockTagProvider {
    /// Create a new empty mock tag provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an existing tag
    pub fn add_tag(&self, owner: &str, repo: &str, tag: &str) {
        self.tags.lock().unwrap().insert(
            tag_key(owner, repo, tag),
            Tag {
                name: tag.to_string(),
                sha: "0000000000000000000000000000000000000000".to_string(),
            },
        );
    }

    pub fn has_tag(&self, owner: &str, repo: &str, tag: &str) -> bool {
        self.tags
            .lock()
            .unwrap()
            .contains_key(&tag_key(owner, repo, tag))
    }

    /// Tags passed to `create`, in call order
    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    /// Tags passed to `delete`, in call order
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

fn tag_key(owner: &str, repo: &str, tag: &str) -> String {
    format!("{}/{}#{}", owner, repo, tag)
}

#[async_trait]
impl TagProvider for MockTagProvider {
    async fn exists(&self, owner: &str, repo: &str, tag: &str) -> GhrelResult<bool> {
        Ok(self.has_tag(owner, repo, tag))
    }

    async fn create(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
        target: Option<&str>,
    ) -> GhrelResult<Tag> {
        self.created.lock().unwrap().push(tag.to_string());
        let created = Tag {
            name: tag.to_string(),
            sha: target
                .unwrap_or("1111111111111111111111111111111111111111")
                .to_string(),
        };
        self.tags
            .lock()
            .unwrap()
            .insert(tag_key(owner, repo, tag), created.clone());
        Ok(created)
    }

    async fn delete(&self, owner: &str, repo: &str, tag: &str) -> GhrelResult<()> {
        self.deleted.lock().unwrap().push(tag.to_string());
        self.tags.lock().unwrap().remove(&tag_key(owner, repo, tag));
        Ok(())
    }
}
