//! Privileged write capability.
//!
//! Both control surfaces (the `/proc` file and `/etc/sysctl.conf`) are
//! root-owned. How the rights are obtained is a deployment detail, so the
//! controller only ever talks to a [`PrivilegedWriter`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use ttl_core::{Result, TtlError};

/// Writes files and runs helpers with elevated privilege.
#[async_trait]
pub trait PrivilegedWriter: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Replace the entire contents of `path` with `contents`.
    async fn write_file(&self, path: &Path, contents: &str) -> Result<()>;

    /// Run `program` with `args` and wait for it to exit successfully.
    async fn run(&self, program: &str, args: &[&str]) -> Result<()>;
}

/// Writes with the rights of the current process (e.g. when already root).
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectWriter;

#[async_trait]
impl PrivilegedWriter for DirectWriter {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        debug!(path = %path.display(), bytes = contents.len(), "direct write");
        tokio::fs::write(path, contents)
            .await
            .map_err(|e| TtlError::io(path, e))
    }

    async fn run(&self, program: &str, args: &[&str]) -> Result<()> {
        debug!(program, ?args, "running helper");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| TtlError::io(program, e))?;
        check_output(program, &output, None)
    }
}

/// Escalates through non-interactive `sudo` (`sudo -n`).
///
/// Files are written by piping the contents into `sudo -n tee <path>`, so no
/// shell is involved and the contents are never interpolated into a command
/// line.
#[derive(Debug, Clone)]
pub struct SudoWriter {
    sudo: PathBuf,
}

impl Default for SudoWriter {
    fn default() -> Self {
        Self::new("sudo")
    }
}

impl SudoWriter {
    /// Use the given `sudo` binary.
    pub fn new(sudo: impl Into<PathBuf>) -> Self {
        Self { sudo: sudo.into() }
    }

    fn program(&self) -> String {
        self.sudo.display().to_string()
    }
}

#[async_trait]
impl PrivilegedWriter for SudoWriter {
    fn name(&self) -> &'static str {
        "sudo"
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        debug!(path = %path.display(), bytes = contents.len(), "sudo tee");
        let program = self.program();
        let mut child = Command::new(&self.sudo)
            .arg("-n")
            .arg("tee")
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TtlError::io(&program, e))?;

        // sudo may exit before reading stdin; its status takes precedence.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(contents.as_bytes()).await,
            None => Ok(()),
        };

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| TtlError::io(&program, e))?;
        check_output(&format!("{program} tee"), &output, Some(path))?;
        written.map_err(|e| TtlError::io(path, e))
    }

    async fn run(&self, program: &str, args: &[&str]) -> Result<()> {
        debug!(program, ?args, "running helper via sudo");
        let sudo = self.program();
        let output = Command::new(&self.sudo)
            .arg("-n")
            .arg(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| TtlError::io(&sudo, e))?;
        check_output(&format!("{sudo} {program}"), &output, None)
    }
}

/// Map a finished helper process to a result.
///
/// `sudo` refusing to escalate and the target reporting `EACCES` both count
/// as [`TtlError::PermissionDenied`].
fn check_output(program: &str, output: &Output, target: Option<&Path>) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if is_permission_failure(&stderr) {
        return Err(TtlError::PermissionDenied {
            path: target.map_or_else(|| PathBuf::from(program), Path::to_path_buf),
        });
    }

    Err(TtlError::Helper {
        program: program.to_string(),
        status: output.status.to_string(),
        stderr,
    })
}

fn is_permission_failure(stderr: &str) -> bool {
    let lower = stderr.to_lowercase();
    ["a password is required", "not in the sudoers", "permission denied"]
        .iter()
        .any(|needle| lower.contains(needle))
}

/// How privileged writes are performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivilegeMode {
    /// Write with the current process's own rights
    Direct,
    /// Escalate with `sudo -n`
    #[default]
    Sudo,
}

impl PrivilegeMode {
    /// Build the matching writer.
    pub fn writer(self) -> Arc<dyn PrivilegedWriter> {
        match self {
            Self::Direct => Arc::new(DirectWriter),
            Self::Sudo => Arc::new(SudoWriter::default()),
        }
    }
}

impl FromStr for PrivilegeMode {
    type Err = TtlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "direct" | "root" => Ok(Self::Direct),
            "sudo" => Ok(Self::Sudo),
            _ => Err(TtlError::Config(format!(
                "unknown privilege mode '{s}' (expected 'direct' or 'sudo')"
            ))),
        }
    }
}

impl std::fmt::Display for PrivilegeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Sudo => write!(f, "sudo"),
        }
    }
}
