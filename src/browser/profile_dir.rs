//! Per-session Chrome profile directories
//!
//! Every launch gets a fresh UUID-named user data dir so concurrent or
//! crashed runs never fight over a `SingletonLock`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Prefix of every profile directory this crate creates
pub const PROFILE_PREFIX: &str = "page_distill_chrome";

/// RAII wrapper for Chrome profile directory
///
/// Automatically cleans up the profile directory on drop unless `keep()` is called.
#[derive(Debug)]
pub struct BrowserProfile {
    path: PathBuf,
    cleanup_on_drop: bool,
}

impl BrowserProfile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Leave the directory on disk (for inspecting a crashed profile)
    pub fn keep(&mut self) {
        self.cleanup_on_drop = false;
    }
}

impl Drop for BrowserProfile {
    fn drop(&mut self) {
        if self.cleanup_on_drop && self.path.exists() {
            debug!("BrowserProfile cleanup: removing {}", self.path.display());
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                warn!("Failed to cleanup profile directory {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Create a unique Chrome profile directory under the system temp dir
pub fn create_unique_profile() -> Result<BrowserProfile> {
    let path = std::env::temp_dir().join(format!("{PROFILE_PREFIX}_{}", Uuid::new_v4()));

    // create_dir (not create_dir_all) so a UUID collision fails loudly
    std::fs::create_dir(&path)
        .with_context(|| format!("Failed to create profile directory: {}", path.display()))?;

    info!("Created Chrome profile directory: {}", path.display());
    Ok(BrowserProfile {
        path,
        cleanup_on_drop: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_removed_on_drop() -> Result<()> {
        let profile = create_unique_profile()?;
        let path = profile.path().to_path_buf();
        assert!(path.exists());
        assert!(path.to_string_lossy().contains(PROFILE_PREFIX));
        drop(profile);
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_kept_profile_survives_drop() -> Result<()> {
        let mut profile = create_unique_profile()?;
        profile.keep();
        let path = profile.path().to_path_buf();
        drop(profile);
        assert!(path.exists());
        std::fs::remove_dir_all(&path)?;
        Ok(())
    }
}
