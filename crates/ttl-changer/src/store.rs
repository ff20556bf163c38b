//! Persisted TTL in `/etc/sysctl.conf`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::privilege::PrivilegedWriter;
use ttl_core::{Result, SysctlConf, TtlError};

/// Boot-time sysctl configuration file
pub const SYSCTL_CONF_PATH: &str = "/etc/sysctl.conf";

/// Whole-file access to the persisted sysctl configuration.
pub struct SysctlStore {
    path: PathBuf,
    writer: Arc<dyn PrivilegedWriter>,
}

impl SysctlStore {
    /// Use the standard `/etc/sysctl.conf`.
    pub fn new(writer: Arc<dyn PrivilegedWriter>) -> Self {
        Self::with_path(SYSCTL_CONF_PATH, writer)
    }

    /// Use a custom configuration file.
    pub fn with_path(path: impl Into<PathBuf>, writer: Arc<dyn PrivilegedWriter>) -> Self {
        Self {
            path: path.into(),
            writer,
        }
    }

    /// Configuration file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document. A missing file is an empty document.
    pub async fn load(&self) -> Result<SysctlConf> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(SysctlConf::parse(&content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "sysctl config missing, starting empty");
                Ok(SysctlConf::default())
            }
            Err(e) => Err(TtlError::io(&self.path, e)),
        }
    }

    /// Write the whole document back in a single privileged write.
    pub async fn save(&self, conf: &SysctlConf) -> Result<()> {
        debug!(path = %self.path.display(), lines = conf.lines().len(), "saving sysctl config");
        self.writer.write_file(&self.path, &conf.render()).await
    }

    /// Load the file into the running kernel (`sysctl -p <path>`).
    pub async fn reload(&self) -> Result<()> {
        let path = self.path.display().to_string();
        self.writer
            .run("sysctl", &["-p", &path])
            .await
            .map_err(|e| TtlError::Reload {
                path: self.path.clone(),
                reason: e.to_string(),
            })
    }
}

impl std::fmt::Debug for SysctlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SysctlStore")
            .field("path", &self.path)
            .field("writer", &self.writer.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::privilege::DirectWriter;
    use tempfile::TempDir;
    use ttl_core::Ttl;

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = SysctlStore::with_path(dir.path().join("sysctl.conf"), Arc::new(DirectWriter));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sysctl.conf");
        std::fs::write(&path, "vm.swappiness = 10\n").unwrap();
        let store = SysctlStore::with_path(&path, Arc::new(DirectWriter));

        let mut conf = store.load().await.unwrap();
        conf.set_ttl(Ttl::CARRIER);
        store.save(&conf).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "vm.swappiness = 10\n# Set by ttl-changer\nnet.ipv4.ip_default_ttl = 65\n"
        );
        assert_eq!(store.load().await.unwrap().ttl_entry(), Some("65"));
    }

    #[tokio::test]
    async fn directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = SysctlStore::with_path(dir.path(), Arc::new(DirectWriter));
        assert!(store.load().await.is_err());
    }
}
