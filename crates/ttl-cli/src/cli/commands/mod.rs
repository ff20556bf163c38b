//! Command implementations.

pub mod config;
pub mod hook;
pub mod persist;
pub mod status;
pub mod ttl;

use std::path::PathBuf;
use std::sync::Arc;
use ttl_changer::{PrivilegeMode, ProcTtl, SysctlStore, TtlController};

use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Live TTL control file
    pub proc_path: PathBuf,

    /// Persisted sysctl configuration file
    pub sysctl_conf: PathBuf,

    /// How privileged writes are performed
    pub privilege: PrivilegeMode,

    /// Configured default for `persist`
    pub reload_on_persist: bool,

    /// Plugin settings directory, if configured
    pub settings_dir: Option<PathBuf>,

    /// Config file in use
    pub config_path: PathBuf,

    /// Output format
    pub output_format: OutputFormat,

    /// Whether to show educational explanations
    pub explain: bool,

    /// Disable colors
    pub no_color: bool,
}

impl Context {
    /// Build a controller wired to the configured paths and privilege mode.
    pub fn controller(&self) -> TtlController {
        let writer = self.privilege.writer();
        TtlController::new(
            Arc::new(ProcTtl::with_path(&self.proc_path, Arc::clone(&writer))),
            SysctlStore::with_path(&self.sysctl_conf, writer),
        )
        .with_reload_on_persist(self.reload_on_persist)
    }
}
