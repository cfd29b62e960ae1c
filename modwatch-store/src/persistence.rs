//! File persistence helpers.
//!
//! Handles loading and saving JSON to disk with owner-only permissions.

use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreError;

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default data directory.
///
/// - macOS: `~/Library/Application Support/modwatch`
/// - Linux: `~/.local/share/modwatch`
/// - Windows: `%APPDATA%\modwatch`
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("modwatch"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the default state file path.
pub fn default_state_path() -> PathBuf {
    default_data_dir().join("state.json")
}

// ============================================================================
// Security: File Permissions
// ============================================================================

/// Sets file permissions to 0o600 on Unix.
#[cfg(unix)]
async fn set_restrictive_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o600);
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

/// Sets directory permissions to 0o700 on Unix.
#[cfg(unix)]
async fn set_restrictive_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o700);
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn set_restrictive_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

#[cfg(not(unix))]
async fn set_restrictive_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ============================================================================
// File Operations
// ============================================================================

/// Creates the parent directory if needed, owner-only.
async fn create_parent_dir(path: &Path) -> Result<(), StoreError> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };

    if !tokio::fs::try_exists(parent).await? {
        debug!(path = %parent.display(), "Creating directory");
        tokio::fs::create_dir_all(parent).await?;
        set_restrictive_dir_permissions(parent).await?;
    }
    Ok(())
}

/// Saves data to a JSON file.
///
/// Writes to a sibling temp file and renames it over the target, so readers
/// never see a half-written file.
pub async fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    debug!(path = %path.display(), "Saving JSON file");

    create_parent_dir(path).await?;

    let json = serde_json::to_string_pretty(data)?;

    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, &json).await?;
    set_restrictive_permissions(&temp_path).await?;
    tokio::fs::rename(&temp_path, path).await?;

    debug!(path = %path.display(), "JSON file saved");
    Ok(())
}

/// Loads data from a JSON file.
///
/// Returns `Ok(None)` if the file does not exist. A file that exists but does
/// not parse is [`StoreError::Corrupt`].
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    debug!(path = %path.display(), "Loading JSON file");

    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "File not found");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
}

// ============================================================================
// Tests
// ============================================================================
