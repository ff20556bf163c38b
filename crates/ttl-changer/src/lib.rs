//! # ttl-changer
//!
//! Control surface for the kernel's default IPv4 TTL
//! (`net.ipv4.ip_default_ttl`): read the live value, apply a validated one,
//! verify the kernel actually took it, and keep `/etc/sysctl.conf` in step so
//! the choice survives a reboot.
//!
//! ## Architecture
//!
//! ```text
//! TtlController
//!   ├── LiveTtl (port)          ── ProcTtl: /proc/sys/net/ipv4/ip_default_ttl
//!   └── SysctlStore             ── /etc/sysctl.conf via ttl_core::SysctlConf
//!          └── PrivilegedWriter (port) ── DirectWriter | SudoWriter
//! ```
//!
//! Every write is followed by a read-back; a kernel that silently clamps or
//! ignores the value is reported as [`TtlError::Mismatch`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use ttl_changer::{PrivilegeMode, TtlController};
//!
//! #[tokio::main]
//! async fn main() {
//!     let controller = TtlController::system(PrivilegeMode::Sudo);
//!     if controller.set_ttl_to_65().await {
//!         controller.make_ttl_persistent(65).await;
//!     }
//! }
//! ```

pub mod controller;
pub mod lifecycle;
pub mod live;
pub mod privilege;
pub mod store;

pub use controller::TtlController;
pub use lifecycle::{migrate_settings, Plugin};
pub use live::{LiveTtl, ProcTtl, PROC_TTL_PATH};
pub use privilege::{DirectWriter, PrivilegeMode, PrivilegedWriter, SudoWriter};
pub use store::{SysctlStore, SYSCTL_CONF_PATH};

pub use ttl_core::{
    ErrorKind, PersistentTtl, Result, SysctlConf, Ttl, TtlError, TtlStatus, TTL_KEY,
    TTL_UNKNOWN,
};
