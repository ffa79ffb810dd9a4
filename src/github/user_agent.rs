//! Per-request user agent strings for the upload host

use rand::Rng;

const PLATFORMS: &[&str] = &[
    "Windows NT 10.0; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "X11; Linux x86_64",
    "X11; Ubuntu; Linux x86_64",
];

/// Generate a browser-like user agent with a random platform and version
pub fn random_user_agent() -> String {
    let mut rng = rand::rng();
    let platform = PLATFORMS[rng.random_range(0..PLATFORMS.len())];
    let major = rng.random_range(110..=135);
    let build = rng.random_range(1000..=6999);
    let patch = rng.random_range(0..=200);

    format!(
        "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{}.0.{}.{} Safari/537.36",
        platform, major, build, patch
    )
}
