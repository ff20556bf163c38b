//! Host plugin lifecycle hooks.
//!
//! The host loader calls these around the controller's lifetime. Apart from
//! the startup read and the one-time settings migration they only log.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::controller::TtlController;
use ttl_core::{Result, TtlError};

/// A controller plus the hooks the host invokes.
#[derive(Debug)]
pub struct Plugin {
    controller: TtlController,
}

impl Plugin {
    /// Wrap a controller.
    pub const fn new(controller: TtlController) -> Self {
        Self { controller }
    }

    /// The wrapped controller
    pub const fn controller(&self) -> &TtlController {
        &self.controller
    }

    /// Called when the plugin is loaded. Logs and returns the current TTL
    /// (or the unknown sentinel).
    pub async fn on_load(&self) -> i32 {
        info!("TTL Changer plugin loaded");
        let current = self.controller.get_current_ttl().await;
        info!(current, "current system TTL");
        current
    }

    /// Called first during unload.
    pub fn on_unload(&self) {
        info!("TTL Changer plugin unloading");
    }

    /// Called after [`Plugin::on_unload`] when the plugin is uninstalled.
    pub fn on_uninstall(&self) {
        info!("TTL Changer plugin uninstalled");
    }

    /// Called before [`Plugin::on_load`]: move legacy settings into
    /// `settings_dir`.
    pub async fn on_migrate(&self, legacy: &[PathBuf], settings_dir: &Path) -> Result<Vec<PathBuf>> {
        info!("TTL Changer plugin migrating");
        migrate_settings(legacy, settings_dir).await
    }
}

/// Move legacy settings files into `dest_dir`.
///
/// Each source may be a file (moved as-is) or a directory (its regular files
/// are moved, non-recursively). Missing sources are skipped, and a file whose
/// name already exists in `dest_dir` is left where it is. Returns the new
/// paths of the moved files.
pub async fn migrate_settings(sources: &[PathBuf], dest_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for source in sources {
        let meta = match tokio::fs::metadata(source).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %source.display(), "no legacy settings");
                continue;
            }
            Err(e) => return Err(TtlError::io(source, e)),
        };

        if meta.is_dir() {
            let mut entries = tokio::fs::read_dir(source)
                .await
                .map_err(|e| TtlError::io(source, e))?;
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| TtlError::io(source, e))?
            {
                if entry.file_type().await.is_ok_and(|t| t.is_file()) {
                    files.push(entry.path());
                }
            }
        } else {
            files.push(source.clone());
        }
    }

    if files.is_empty() {
        return Ok(Vec::new());
    }

    tokio::fs::create_dir_all(dest_dir)
        .await
        .map_err(|e| TtlError::io(dest_dir, e))?;

    let mut moved = Vec::new();
    for file in files {
        let Some(name) = file.file_name() else {
            continue;
        };
        let dest = dest_dir.join(name);
        let exists = tokio::fs::try_exists(&dest)
            .await
            .map_err(|e| TtlError::io(&dest, e))?;
        if exists {
            warn!(from = %file.display(), to = %dest.display(), "settings already migrated, leaving legacy file");
            continue;
        }
        move_file(&file, &dest).await?;
        info!(from = %file.display(), to = %dest.display(), "migrated settings");
        moved.push(dest);
    }

    Ok(moved)
}

/// Rename, falling back to copy + remove across filesystems.
async fn move_file(from: &Path, to: &Path) -> Result<()> {
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }
    tokio::fs::copy(from, to)
        .await
        .map_err(|e| TtlError::io(from, e))?;
    tokio::fs::remove_file(from)
        .await
        .map_err(|e| TtlError::io(from, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn migrates_file_and_directory_contents() {
        let tmp = TempDir::new().unwrap();
        let legacy_file = tmp.path().join("ttl-changer.json");
        std::fs::write(&legacy_file, "{}").unwrap();
        let legacy_dir = tmp.path().join("old-settings");
        std::fs::create_dir(&legacy_dir).unwrap();
        std::fs::write(legacy_dir.join("extra.json"), "[]").unwrap();
        let dest = tmp.path().join("config").join("ttl-changer");

        let moved = tokio_test::block_on(migrate_settings(
            &[legacy_file.clone(), legacy_dir, tmp.path().join("missing")],
            &dest,
        ))
        .unwrap();

        assert_eq!(moved.len(), 2);
        assert!(!legacy_file.exists());
        assert_eq!(std::fs::read_to_string(dest.join("ttl-changer.json")).unwrap(), "{}");
        assert_eq!(std::fs::read_to_string(dest.join("extra.json")).unwrap(), "[]");
    }

    #[test]
    fn keeps_existing_destination() {
        let tmp = TempDir::new().unwrap();
        let legacy = tmp.path().join("ttl-changer.json");
        std::fs::write(&legacy, "old").unwrap();
        let dest = tmp.path().join("new");
        std::fs::create_dir(&dest).unwrap();
        std::fs::write(dest.join("ttl-changer.json"), "new").unwrap();

        let moved = tokio_test::block_on(migrate_settings(&[legacy.clone()], &dest)).unwrap();

        assert!(moved.is_empty());
        assert!(legacy.exists());
        assert_eq!(std::fs::read_to_string(dest.join("ttl-changer.json")).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_destination_aborts_migration() {
        let tmp = TempDir::new().unwrap();
        let legacy = tmp.path().join("ttl-changer.json");
        std::fs::write(&legacy, "old").unwrap();
        let dest = tmp.path().join("new");
        std::fs::create_dir(&dest).unwrap();
        // A symlink loop can't be stat'ed (ELOOP).
        let looped = dest.join("ttl-changer.json");
        std::os::unix::fs::symlink(&looped, &looped).unwrap();

        let err = tokio_test::block_on(migrate_settings(&[legacy.clone()], &dest)).unwrap_err();

        assert!(matches!(err, TtlError::Io { .. }), "{err:?}");
        assert_eq!(std::fs::read_to_string(&legacy).unwrap(), "old");
        assert!(std::fs::symlink_metadata(&looped).unwrap().is_symlink());
    }

    #[test]
    fn nothing_to_migrate_creates_nothing() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("never-created");
        let moved =
            tokio_test::block_on(migrate_settings(&[tmp.path().join("absent")], &dest)).unwrap();
        assert!(moved.is_empty());
        assert!(!dest.exists());
    }
}
