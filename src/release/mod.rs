//! Release management on top of the GitHub providers
//!
//! [`ReleaseManager`] composes the release and tag providers into
//! create/get/delete/download operations. Uploads and downloads stream
//! through [`transfer`]; picking the latest release or a matching asset
//! lives in [`select`].

pub mod manager;
pub mod select;
mod transfer;

pub use manager::ReleaseManager;
pub use select::{find_asset_by_pattern, latest_published};
