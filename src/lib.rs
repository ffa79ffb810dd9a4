//! ghrel: GitHub release management
//!
//! Creates, lists, deletes and downloads GitHub releases and their assets,
//! with a companion helper for lightweight tags. Release and tag CRUD goes
//! through the REST API client in [`github`]; asset uploads go straight to
//! the upload host from [`release::ReleaseManager`].
//!
//! ```no_run
//! use ghrel::di::ServiceContainer;
//! use ghrel::github::NewRelease;
//! use std::path::Path;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> ghrel::core::GhrelResult<()> {
//! let manager = ServiceContainer::new()?.release_manager()?;
//! let cancel = CancellationToken::new();
//!
//! let request = NewRelease::new("v1.0.0").name("1.0.0").body("First stable release");
//! let release = manager
//!     .create("octo", "app", &request, Path::new("dist/app.tar.gz"), &cancel)
//!     .await?;
//! println!("{}", release.html_url);
//! # Ok(())
//! # }
//! ```

pub use ghrel_core::{CredentialStore, GhrelError, GhrelResult};

/// Core module re-exported from ghrel-core.
pub mod core {
    pub use ghrel_core::core::{credentials, error, path};
    pub use ghrel_core::{CredentialStore, GhrelError, GhrelResult};
}

/// Configuration management.
pub mod config;

/// Dependency injection infrastructure.
pub mod di;

/// GitHub API client and tag helper.
pub mod github;

/// Release manager facade, transfers and release selection.
pub mod release;

pub use config::Config;
pub use di::ServiceContainer;
pub use github::{NewRelease, Release, ReleaseAsset, Tag};
pub use release::ReleaseManager;
