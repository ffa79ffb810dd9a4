//! Service container for dependency injection

use super::traits::{ConfigProvider, ReleaseProvider, TagProvider};
use crate::config::Config;
use crate::core::GhrelResult;
use crate::github::{GitHubClient, GitHubTagHelper};
use crate::release::ReleaseManager;
use std::sync::Arc;

/// Service container for dependency injection
///
/// This container holds the release and tag collaborators and hands out
/// [`ReleaseManager`]s built on top of them. It uses `Arc<dyn Trait>` so
/// tests can swap in the implementations from [`super::mocks`].
///
/// # Example (Production)
///
/// ```no_run
/// use ghrel::di::ServiceContainer;
///
/// # fn example() -> ghrel::core::GhrelResult<()> {
/// let container = ServiceContainer::new()?;
/// let manager = container.release_manager()?;
/// # Ok(())
/// # }
/// ```
///
/// # Example (Testing)
///
/// ```
/// use ghrel::di::{ServiceContainer, mocks::*};
/// use std::sync::Arc;
///
/// let container = ServiceContainer::with_providers(
///     Arc::new(MockConfigProvider::default()),
///     Arc::new(MockReleaseProvider::new()),
///     Arc::new(MockTagProvider::new()),
/// );
/// assert!(container.release_manager().is_ok());
/// ```
#[derive(Clone)]
pub struct ServiceContainer {
    pub config: Arc<dyn ConfigProvider>,
    pub releases: Arc<dyn ReleaseProvider>,
    pub tags: Arc<dyn TagProvider>,
}

impl ServiceContainer {
    /// Create a service container with production implementations
    ///
    /// Loads the config from disk (creating it on first run), resolves the
    /// token and builds the GitHub client and tag helper.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or written, or if
    /// the resolved token is not a valid header value.
    pub fn new() -> GhrelResult<Self> {
        Self::from_config(Config::load()?)
    }

    /// Create a service container from an already loaded config
    pub fn from_config(config: Config) -> GhrelResult<Self> {
        let client = GitHubClient::new(&config)?;
        let tags = GitHubTagHelper::new(client.clone());

        Ok(Self {
            config: Arc::new(config),
            releases: Arc::new(client),
            tags: Arc::new(tags),
        })
    }

    /// Create a service container with custom provider implementations
    pub fn with_providers(
        config: Arc<dyn ConfigProvider>,
        releases: Arc<dyn ReleaseProvider>,
        tags: Arc<dyn TagProvider>,
    ) -> Self {
        Self {
            config,
            releases,
            tags,
        }
    }

    /// Build a release manager over this container's providers
    pub fn release_manager(&self) -> GhrelResult<ReleaseManager> {
        ReleaseManager::new(
            Arc::clone(&self.releases),
            Arc::clone(&self.tags),
            Arc::clone(&self.config),
        )
    }

    /// Get the configuration provider
    pub fn config(&self) -> &dyn ConfigProvider {
        self.config.as_ref()
    }

    /// Get the release provider
    pub fn releases(&self) -> &dyn ReleaseProvider {
        self.releases.as_ref()
    }

    /// Get the tag provider
    pub fn tags(&self) -> &dyn TagProvider {
        self.tags.as_ref()
    }
}
