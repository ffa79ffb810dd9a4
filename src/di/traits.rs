//! Trait definitions for dependency injection

use crate::core::GhrelResult;
use crate::github::types::{NewRelease, Release, Tag};
use async_trait::async_trait;
use std::time::Duration;

/// Trait for configuration access
///
/// Provides read-only access to resolved configuration.
/// Implementations should be thread-safe (Send + Sync).
pub trait ConfigProvider: Send + Sync {
    /// Base URL of the REST API (e.g. `https://api.github.com`)
    fn api_url(&self) -> &str;

    /// Base URL of the asset upload host (e.g. `https://uploads.github.com`)
    fn upload_url(&self) -> &str;

    /// Bearer token for authenticated calls, if one was resolved
    fn token(&self) -> Option<&str>;

    /// Overall timeout applied to each HTTP request
    fn http_timeout(&self) -> Duration;
}

/// Trait for release CRUD against the GitHub API
#[async_trait]
pub trait ReleaseProvider: Send + Sync {
    /// List every release of a repository, drafts included, in API order
    async fn list_releases(&self, owner: &str, repo: &str) -> GhrelResult<Vec<Release>>;

    /// Create a release
    async fn create_release(
        &self,
        owner: &str,
        repo: &str,
        release: &NewRelease,
    ) -> GhrelResult<Release>;

    /// Delete a release by id (the tag is left alone)
    async fn delete_release(&self, owner: &str, repo: &str, release_id: u64) -> GhrelResult<()>;
}

/// Trait for lightweight tag management
#[async_trait]
pub trait TagProvider: Send + Sync {
    /// Check whether `refs/tags/<tag>` exists
    async fn exists(&self, owner: &str, repo: &str, tag: &str) -> GhrelResult<bool>;

    /// Create a tag at `target` (a full commit SHA or a branch name), or at
    /// the head of the default branch when no target is given
    async fn create(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
        target: Option<&str>,
    ) -> GhrelResult<Tag>;

    /// Delete a tag
    async fn delete(&self, owner: &str, repo: &str, tag: &str) -> GhrelResult<()>;
}
