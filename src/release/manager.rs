//! Release manager: the facade over the release and tag providers

use super::select::{find_asset_by_pattern, latest_published};
use super::transfer::{self, UploadTarget};
use crate::core::{GhrelError, GhrelResult};
use crate::di::traits::{ConfigProvider, ReleaseProvider, TagProvider};
use crate::github::types::{NewRelease, Release, ReleaseAsset};
use reqwest::Client as HttpClient;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Creates, fetches, deletes and downloads releases for any repository
/// the configured token can reach.
///
/// Every operation takes a [`CancellationToken`]; cancelling it aborts the
/// request in flight and returns [`GhrelError::Cancelled`].
pub struct ReleaseManager {
    releases: Arc<dyn ReleaseProvider>,
    tags: Arc<dyn TagProvider>,
    config: Arc<dyn ConfigProvider>,
    http_client: HttpClient,
}

impl ReleaseManager {
    /// Create a new release manager
    pub fn new(
        releases: Arc<dyn ReleaseProvider>,
        tags: Arc<dyn TagProvider>,
        config: Arc<dyn ConfigProvider>,
    ) -> GhrelResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| GhrelError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            releases,
            tags,
            config,
            http_client,
        })
    }

    /// Create a release with a single asset.
    ///
    /// Creates the tag first when it does not exist yet (at
    /// `release.target_commitish`, or the default branch head), then the
    /// release, then uploads `asset_path`. The returned release lists the
    /// uploaded asset.
    pub async fn create(
        &self,
        owner: &str,
        repo: &str,
        release: &NewRelease,
        asset_path: &Path,
        cancel: &CancellationToken,
    ) -> GhrelResult<Release> {
        let tag = release.tag_name.as_str();

        let is_file = tokio::fs::metadata(asset_path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            error!(owner, repo, tag, path = %asset_path.display(), "asset file not found");
            return Err(GhrelError::FileNotFound(asset_path.to_path_buf()));
        }

        let tag_exists = cancellable(cancel, self.tags.exists(owner, repo, tag))
            .await
            .inspect_err(|e| error!(owner, repo, tag, error = %e, "tag lookup failed"))?;

        if tag_exists {
            debug!(owner, repo, tag, "tag already exists");
        } else {
            cancellable(
                cancel,
                self.tags
                    .create(owner, repo, tag, release.target_commitish.as_deref()),
            )
            .await
            .inspect_err(|e| error!(owner, repo, tag, error = %e, "tag creation failed"))?;
        }

        let mut created = cancellable(cancel, self.releases.create_release(owner, repo, release))
            .await
            .inspect_err(|e| error!(owner, repo, tag, error = %e, "release creation failed"))?;
        info!(owner, repo, tag, release_id = created.id, "created release");

        let asset = self
            .upload_asset(owner, repo, created.id, asset_path, cancel)
            .await?;
        created.assets.push(asset);

        Ok(created)
    }

    /// Upload a file as an asset of an existing release.
    ///
    /// Fails with [`GhrelError::FileNotFound`] when `file_path` does not exist,
    /// [`GhrelError::Config`] when no token is configured and
    /// [`GhrelError::RemoteFailure`] on a non-success response.
    pub async fn upload_asset(
        &self,
        owner: &str,
        repo: &str,
        release_id: u64,
        file_path: &Path,
        cancel: &CancellationToken,
    ) -> GhrelResult<ReleaseAsset> {
        let target = UploadTarget {
            upload_url: self.config.upload_url(),
            token: self.config.token(),
            owner,
            repo,
            release_id,
        };

        let asset = cancellable(cancel, transfer::upload_file(&self.http_client, &target, file_path))
            .await
            .inspect_err(|e| match e {
                GhrelError::FileNotFound(path) => {
                    error!(owner, repo, release_id, path = %path.display(), "asset file not found")
                }
                _ => error!(owner, repo, release_id, path = %file_path.display(), error = %e, "asset upload failed"),
            })?;

        info!(owner, repo, release_id, asset = %asset.name, size = asset.size, "uploaded asset");
        Ok(asset)
    }

    /// Delete the release for `tag`, and the tag itself when `delete_tag` is set.
    ///
    /// Returns `false` without touching anything when no release has that tag.
    pub async fn delete(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
        delete_tag: bool,
        cancel: &CancellationToken,
    ) -> GhrelResult<bool> {
        let Some(release) = self.get(owner, repo, tag, cancel).await? else {
            info!(owner, repo, tag, "no release for tag; nothing to delete");
            return Ok(false);
        };

        cancellable(cancel, self.releases.delete_release(owner, repo, release.id))
            .await
            .inspect_err(|e| error!(owner, repo, tag, release_id = release.id, error = %e, "release deletion failed"))?;
        info!(owner, repo, tag, release_id = release.id, "deleted release");

        if delete_tag {
            let still_there = cancellable(cancel, self.tags.exists(owner, repo, tag))
                .await
                .inspect_err(|e| error!(owner, repo, tag, error = %e, "tag lookup failed"))?;
            if still_there {
                cancellable(cancel, self.tags.delete(owner, repo, tag))
                    .await
                    .inspect_err(|e| error!(owner, repo, tag, error = %e, "tag deletion failed"))?;
            }
        }

        Ok(true)
    }

    /// The release whose tag is `tag`, if any
    pub async fn get(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
        cancel: &CancellationToken,
    ) -> GhrelResult<Option<Release>> {
        let releases = self.get_all(owner, repo, cancel).await?;
        let found = releases.into_iter().find(|r| r.tag_name == tag);

        if found.is_none() {
            debug!(owner, repo, tag, "no release with tag");
        }
        Ok(found)
    }

    /// Every release of the repository, drafts included, in API order
    pub async fn get_all(
        &self,
        owner: &str,
        repo: &str,
        cancel: &CancellationToken,
    ) -> GhrelResult<Vec<Release>> {
        cancellable(cancel, self.releases.list_releases(owner, repo))
            .await
            .inspect_err(|e| error!(owner, repo, error = %e, "listing releases failed"))
    }

    /// The most recently created non-draft release
    pub async fn get_latest(
        &self,
        owner: &str,
        repo: &str,
        cancel: &CancellationToken,
    ) -> GhrelResult<Option<Release>> {
        let releases = self.get_all(owner, repo, cancel).await?;
        Ok(latest_published(&releases).cloned())
    }

    /// Download every asset of the latest non-draft release into `directory`.
    ///
    /// Assets that fail to download are logged and skipped; the paths that
    /// were saved are returned. Cancellation still aborts the whole call.
    pub async fn download_all_latest_release_assets(
        &self,
        owner: &str,
        repo: &str,
        directory: &Path,
        cancel: &CancellationToken,
    ) -> GhrelResult<Vec<PathBuf>> {
        let Some(release) = self.get_latest(owner, repo, cancel).await? else {
            info!(owner, repo, "no published release to download");
            return Ok(Vec::new());
        };

        create_download_dir(directory).await?;

        let mut saved = Vec::with_capacity(release.assets.len());
        for asset in &release.assets {
            match self.download_asset(asset, directory, cancel).await {
                Ok(path) => saved.push(path),
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    warn!(owner, repo, tag = %release.tag_name, asset = %asset.name, error = %e, "skipping asset")
                }
            }
        }

        info!(
            owner,
            repo,
            tag = %release.tag_name,
            saved = saved.len(),
            total = release.assets.len(),
            "downloaded release assets"
        );
        Ok(saved)
    }

    /// Download the first asset of the latest non-draft release whose name
    /// contains every one of `substrings` (case-insensitive).
    ///
    /// Returns `None` when there is no such release, it has no assets, or
    /// nothing matches.
    pub async fn download_release_asset_by_name_pattern(
        &self,
        owner: &str,
        repo: &str,
        directory: &Path,
        substrings: &[&str],
        cancel: &CancellationToken,
    ) -> GhrelResult<Option<PathBuf>> {
        let Some(release) = self.get_latest(owner, repo, cancel).await? else {
            info!(owner, repo, "no published release to download");
            return Ok(None);
        };

        let Some(asset) = find_asset_by_pattern(&release.assets, substrings) else {
            info!(owner, repo, tag = %release.tag_name, pattern = ?substrings, "no asset matches");
            return Ok(None);
        };

        create_download_dir(directory).await?;
        self.download_asset(asset, directory, cancel).await.map(Some)
    }

    /// Download one asset into `directory/<asset name>`
    pub async fn download_asset(
        &self,
        asset: &ReleaseAsset,
        directory: &Path,
        cancel: &CancellationToken,
    ) -> GhrelResult<PathBuf> {
        let path = transfer::download_asset(
            &self.http_client,
            self.config.token(),
            asset,
            directory,
            cancel,
        )
        .await
        .inspect_err(|e| error!(asset = %asset.name, error = %e, "asset download failed"))?;

        info!(asset = %asset.name, path = %path.display(), "downloaded asset");
        Ok(path)
    }
}

async fn create_download_dir(directory: &Path) -> GhrelResult<()> {
    tokio::fs::create_dir_all(directory)
        .await
        .inspect_err(|e| error!(path = %directory.display(), error = %e, "cannot create download directory"))?;
    Ok(())
}

/// Run `operation` unless `cancel` fires first
async fn cancellable<T, F>(cancel: &CancellationToken, operation: F) -> GhrelResult<T>
where
    F: Future<Output = GhrelResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(GhrelError::Cancelled),
        result = operation => result,
    }
}
