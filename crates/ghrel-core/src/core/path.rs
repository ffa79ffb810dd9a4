use crate::core::error::{GhrelError, GhrelResult};
use std::path::{Path, PathBuf};

/// Get the ghrel home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\ghrel
/// - Linux: ~/.config/ghrel
/// - macOS: ~/Library/Application Support/ghrel
pub fn ghrel_home() -> GhrelResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| GhrelError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("ghrel"))
}

/// Get the config file path (`<ghrel home>/config.yaml`)
pub fn config_file() -> GhrelResult<PathBuf> {
    Ok(ghrel_home()?.join("config.yaml"))
}

/// Ensure a directory exists, creating it and its parents if necessary
pub fn ensure_dir(path: &Path) -> GhrelResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
