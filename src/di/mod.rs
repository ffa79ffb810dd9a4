//! Dependency injection infrastructure for ghrel
//!
//! This module provides trait-based dependency injection so the release
//! manager can run against the real GitHub API or against in-memory mocks.
//!
//! # Example (Production)
//! ```no_run
//! use ghrel::di::ServiceContainer;
//!
//! # fn example() -> ghrel::core::GhrelResult<()> {
//! let container = ServiceContainer::new()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example (Testing)
//! ```
//! use ghrel::di::{ServiceContainer, mocks::*};
//! use std::sync::Arc;
//!
//! let config = Arc::new(MockConfigProvider::default());
//! let releases = Arc::new(MockReleaseProvider::new());
//! let tags = Arc::new(MockTagProvider::new());
//!
//! let container = ServiceContainer::with_providers(config, releases, tags);
//! ```

pub mod container;
pub mod mocks;
pub mod traits;

// Re-export key types
pub use container::ServiceContainer;
pub use traits::{ConfigProvider, ReleaseProvider, TagProvider};
