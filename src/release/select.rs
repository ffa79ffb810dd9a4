//! Picking releases and assets out of API listings

use crate::github::types::{Release, ReleaseAsset};

/// The non-draft release with the latest creation timestamp.
///
/// Releases without a timestamp sort before any dated one. Ties resolve to
/// the earliest listed release.
pub fn latest_published(releases: &[Release]) -> Option<&Release> {
    releases
        .iter()
        .rev()
        .filter(|r| !r.draft)
        .max_by_key(|r| r.created_at)
}

/// First asset whose name contains every substring, ignoring case.
///
/// An empty substring list matches the first asset.
pub fn find_asset_by_pattern<'a>(
    assets: &'a [ReleaseAsset],
    substrings: &[&str],
) -> Option<&'a ReleaseAsset> {
    let needles: Vec<String> = substrings.iter().map(|s| s.to_lowercase()).collect();

    assets.iter().find(|asset| {
        let name = asset.name.to_lowercase();
        needles.iter().all(|needle| name.contains(needle.as_str()))
    })
}
