//! Asset uploads to the upload host and asset downloads to disk

use crate::core::{GhrelError, GhrelResult};
use crate::github::client::check_status;
use crate::github::types::ReleaseAsset;
use crate::github::user_agent::random_user_agent;
use reqwest::{header, Body, Client as HttpClient};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Where and as whom an upload goes
pub(crate) struct UploadTarget<'a> {
    pub upload_url: &'a str,
    pub token: Option<&'a str>,
    pub owner: &'a str,
    pub repo: &'a str,
    pub release_id: u64,
}

impl UploadTarget<'_> {
    fn url(&self, file_name: &str) -> String {
        format!(
            "{}/repos/{}/{}/releases/{}/assets?name={}",
            self.upload_url.trim_end_matches('/'),
            urlencoding::encode(self.owner),
            urlencoding::encode(self.repo),
            self.release_id,
            urlencoding::encode(file_name)
        )
    }
}

/// Stream a local file to the upload host as a new release asset.
///
/// The file is checked before the token, so a missing file is always
/// reported as `FileNotFound`.
pub(crate) async fn upload_file(
    http_client: &HttpClient,
    target: &UploadTarget<'_>,
    file_path: &Path,
) -> GhrelResult<ReleaseAsset> {
    let metadata = match tokio::fs::metadata(file_path).await {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => return Err(GhrelError::FileNotFound(file_path.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(GhrelError::FileNotFound(file_path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    let file_name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            GhrelError::Path(format!("Invalid asset filename: {}", file_path.display()))
        })?;

    let token = target.token.ok_or_else(|| {
        GhrelError::Config(
            "GitHub token not configured. Set GH_TOKEN or GITHUB_TOKEN, or add github.token to the config file"
                .to_string(),
        )
    })?;

    let url = target.url(file_name);
    let file = File::open(file_path).await?;
    debug!(%url, size = metadata.len(), "uploading asset");

    let response = http_client
        .post(&url)
        .bearer_auth(token)
        .header(header::USER_AGENT, random_user_agent())
        .header(header::ACCEPT, "application/vnd.github+json")
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, metadata.len())
        .body(Body::wrap_stream(ReaderStream::new(file)))
        .send()
        .await?;

    let response = check_status(response).await?;
    Ok(response.json().await?)
}

/// Download an asset into `directory`, named after the asset.
///
/// A partially written file is removed when the download fails or is cancelled.
pub(crate) async fn download_asset(
    http_client: &HttpClient,
    token: Option<&str>,
    asset: &ReleaseAsset,
    directory: &Path,
    cancel: &CancellationToken,
) -> GhrelResult<PathBuf> {
    // Only the final component, so a hostile asset name cannot escape `directory`
    let file_name = Path::new(&asset.name)
        .file_name()
        .ok_or_else(|| GhrelError::Path(format!("Invalid asset name: {}", asset.name)))?;
    let dest = directory.join(file_name);

    let mut request = http_client
        .get(asset.browser_download_url.as_str())
        .header(header::USER_AGENT, random_user_agent())
        .header(header::ACCEPT, "application/octet-stream");
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    debug!(url = %asset.browser_download_url, dest = %dest.display(), "downloading asset");
    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(GhrelError::Cancelled),
        response = request.send() => response?,
    };
    let mut response = check_status(response).await?;

    let mut file = File::create(&dest).await?;
    let copied: GhrelResult<u64> = async {
        let mut written = 0u64;
        loop {
            let chunk = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(GhrelError::Cancelled),
                chunk = response.chunk() => chunk?,
            };
            match chunk {
                Some(bytes) => {
                    file.write_all(&bytes).await?;
                    written += bytes.len() as u64;
                }
                None => break,
            }
        }
        file.flush().await?;
        Ok(written)
    }
    .await;
    drop(file);

    match copied {
        Ok(written) => {
            debug!(dest = %dest.display(), bytes = written, "download complete");
            Ok(dest)
        }
        Err(e) => {
            let _ = tokio::fs::remove_file(&dest).await;
            Err(e)
        }
    }
}
