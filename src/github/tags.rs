//! Lightweight tag management through the Git references API

use crate::core::{GhrelError, GhrelResult};
use crate::di::traits::TagProvider;
use crate::github::client::{check_status, GitHubClient};
use crate::github::types::{GitHubRepo, GitRef, Tag};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, info};

/// Checks, creates and deletes `refs/tags/*`
#[derive(Clone)]
pub struct GitHubTagHelper {
    client: GitHubClient,
}

#[derive(Serialize)]
struct CreateRef<'a> {
    #[serde(rename = "ref")]
    ref_name: String,
    sha: &'a str,
}

impl GitHubTagHelper {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }

    /// Fetch a tag reference, `None` on 404
    pub async fn get_tag(&self, owner: &str, repo: &str, tag: &str) -> GhrelResult<Option<Tag>> {
        let url = self
            .client
            .repo_url(owner, repo, &format!("git/ref/tags/{}", ref_path(tag)));
        let response = self.client.api_get_raw(&url).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let git_ref: GitRef = check_status(response).await?.json().await?;
        Ok(Some(Tag {
            name: tag_name_from_ref(&git_ref.ref_name).to_string(),
            sha: git_ref.object.sha,
        }))
    }

    /// Check whether a tag exists
    pub async fn exists(&self, owner: &str, repo: &str, tag: &str) -> GhrelResult<bool> {
        Ok(self.get_tag(owner, repo, tag).await?.is_some())
    }

    /// Create a tag at `target` (a commit SHA or a branch name), or at the
    /// default branch head when no target is given
    pub async fn create(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
        target: Option<&str>,
    ) -> GhrelResult<Tag> {
        let sha = match target {
            Some(sha) if is_commit_sha(sha) => sha.to_string(),
            Some(branch) => self.branch_head(owner, repo, branch).await?,
            None => self.default_branch_head(owner, repo).await?,
        };

        let url = self.client.repo_url(owner, repo, "git/refs");
        let body = CreateRef {
            ref_name: format!("refs/tags/{}", tag),
            sha: &sha,
        };
        let git_ref: GitRef = self.client.api_post(&url, &body).await?;

        info!(owner, repo, tag, sha = %git_ref.object.sha, "created tag");
        Ok(Tag {
            name: tag.to_string(),
            sha: git_ref.object.sha,
        })
    }

    /// Delete a tag
    pub async fn delete(&self, owner: &str, repo: &str, tag: &str) -> GhrelResult<()> {
        let url = self
            .client
            .repo_url(owner, repo, &format!("git/refs/tags/{}", ref_path(tag)));
        self.client.api_delete(&url).await?;
        info!(owner, repo, tag, "deleted tag");
        Ok(())
    }

    /// SHA of the commit at the head of the repository's default branch
    async fn default_branch_head(&self, owner: &str, repo: &str) -> GhrelResult<String> {
        let repo_info: GitHubRepo = self
            .client
            .api_get(&self.client.repo_root_url(owner, repo))
            .await?;
        debug!(owner, repo, branch = %repo_info.default_branch, "resolving default branch head");
        self.branch_head(owner, repo, &repo_info.default_branch).await
    }

    /// SHA of the commit at the head of `branch`
    async fn branch_head(&self, owner: &str, repo: &str, branch: &str) -> GhrelResult<String> {
        let url = self
            .client
            .repo_url(owner, repo, &format!("git/ref/heads/{}", ref_path(branch)));
        let head: GitRef = self.client.api_get(&url).await?;

        if head.object.sha.is_empty() {
            return Err(GhrelError::Unexpected(format!(
                "Branch '{}' of {}/{} has no head commit",
                branch, owner, repo
            )));
        }
        Ok(head.object.sha)
    }
}

/// Percent-encode each segment of a ref name, keeping `/` as the separator
fn ref_path(name: &str) -> String {
    name.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// A full 40-character hex commit id
fn is_commit_sha(target: &str) -> bool {
    target.len() == 40 && target.bytes().all(|b| b.is_ascii_hexdigit())
}

fn tag_name_from_ref(ref_name: &str) -> &str {
    ref_name.strip_prefix("refs/tags/").unwrap_or(ref_name)
}

// Implement TagProvider trait
#[async_trait]
impl TagProvider for GitHubTagHelper {
    async fn exists(&self, owner: &str, repo: &str, tag: &str) -> GhrelResult<bool> {
        Self::exists(self, owner, repo, tag).await
    }

    async fn create(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
        target: Option<&str>,
    ) -> GhrelResult<Tag> {
        Self::create(self, owner, repo, tag, target).await
    }

    async fn delete(&self, owner: &str, repo: &str, tag: &str) -> GhrelResult<()> {
        Self::delete(self, owner, repo, tag).await
    }
}
