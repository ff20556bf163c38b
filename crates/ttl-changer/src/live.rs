//! Live kernel TTL via `/proc`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::privilege::PrivilegedWriter;
use ttl_core::{Result, Ttl, TtlError};

/// Kernel control file for the default IPv4 TTL
pub const PROC_TTL_PATH: &str = "/proc/sys/net/ipv4/ip_default_ttl";

/// Read/write access to the TTL the running kernel enforces.
///
/// Implementations must not cache: every [`LiveTtl::read`] re-queries the
/// source of truth.
#[async_trait]
pub trait LiveTtl: Send + Sync {
    /// Current live value. The kernel accepts 1..=255, wider than [`Ttl`].
    async fn read(&self) -> Result<u8>;

    /// Replace the live value.
    async fn write(&self, ttl: Ttl) -> Result<()>;
}

/// [`LiveTtl`] backed by the procfs sysctl file.
///
/// Reads are unprivileged; writes go through a [`PrivilegedWriter`].
pub struct ProcTtl {
    path: PathBuf,
    writer: Arc<dyn PrivilegedWriter>,
}

impl ProcTtl {
    /// Use the standard `/proc` path.
    pub fn new(writer: Arc<dyn PrivilegedWriter>) -> Self {
        Self::with_path(PROC_TTL_PATH, writer)
    }

    /// Use a custom control file (containers, tests).
    pub fn with_path(path: impl Into<PathBuf>, writer: Arc<dyn PrivilegedWriter>) -> Self {
        Self {
            path: path.into(),
            writer,
        }
    }

    /// Control file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for ProcTtl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcTtl")
            .field("path", &self.path)
            .field("writer", &self.writer.name())
            .finish()
    }
}

#[async_trait]
impl LiveTtl for ProcTtl {
    async fn read(&self) -> Result<u8> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| TtlError::io(&self.path, e))?;
        parse_ttl(&self.path, &raw)
    }

    async fn write(&self, ttl: Ttl) -> Result<()> {
        debug!(path = %self.path.display(), %ttl, writer = self.writer.name(), "writing live TTL");
        self.writer.write_file(&self.path, &format!("{ttl}\n")).await
    }
}

fn parse_ttl(path: &Path, raw: &str) -> Result<u8> {
    let trimmed = raw.trim();
    trimmed.parse().map_err(|_| TtlError::Parse {
        path: path.to_path_buf(),
        contents: trimmed.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::privilege::DirectWriter;
    use tempfile::TempDir;

    fn proc_file(dir: &TempDir, contents: &str) -> ProcTtl {
        let path = dir.path().join("ip_default_ttl");
        std::fs::write(&path, contents).unwrap();
        ProcTtl::with_path(path, Arc::new(DirectWriter))
    }

    #[tokio::test]
    async fn read_trims_newline() {
        let dir = TempDir::new().unwrap();
        let live = proc_file(&dir, "64\n");
        assert_eq!(live.read().await.unwrap(), 64);
    }

    #[tokio::test]
    async fn write_then_read() {
        let dir = TempDir::new().unwrap();
        let live = proc_file(&dir, "64\n");
        live.write(Ttl::CARRIER).await.unwrap();
        assert_eq!(live.read().await.unwrap(), 65);
        assert_eq!(std::fs::read_to_string(live.path()).unwrap(), "65\n");
    }

    #[tokio::test]
    async fn garbage_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let live = proc_file(&dir, "sixty-four\n");
        let err = live.read().await.unwrap_err();
        assert!(matches!(err, TtlError::Parse { ref contents, .. } if contents == "sixty-four"));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let live = ProcTtl::with_path(dir.path().join("absent"), Arc::new(DirectWriter));
        assert!(matches!(live.read().await.unwrap_err(), TtlError::Io { .. }));
    }

    #[test]
    fn out_of_u8_range_is_parse_error() {
        assert!(parse_ttl(Path::new("x"), "300").is_err());
        assert!(parse_ttl(Path::new("x"), "-1").is_err());
        assert_eq!(parse_ttl(Path::new("x"), " 128 ").unwrap(), 128);
    }
}
