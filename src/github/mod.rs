//! GitHub integration for release management
//!
//! This module provides functionality for interacting with GitHub to:
//! - List, create and delete releases
//! - Check, create and delete lightweight tags
//! - Generate user agents for the asset upload host

pub mod client;
pub mod tags;
pub mod types;
pub mod user_agent;

pub use client::GitHubClient;
pub use tags::GitHubTagHelper;
pub use types::{NewRelease, Release, ReleaseAsset, Tag};
