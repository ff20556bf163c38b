//! Core types and errors for the TTL controller.
//!
//! This crate provides the foundational pieces shared by the controller and
//! the `ttlctl` front-end:
//!
//! - **Types**: the validated [`Ttl`] value and the query results
//!   ([`PersistentTtl`], [`TtlStatus`])
//! - **Errors**: [`TtlError`], classified into validation, privilege and I/O
//!   kinds via [`ErrorKind`]
//! - **Sysctl documents**: [`SysctlConf`], a line-preserving editor for
//!   `/etc/sysctl.conf`
//!
//! # Example
//!
//! ```rust
//! use ttl_core::{SysctlConf, Ttl, TTL_KEY};
//!
//! let mut conf = SysctlConf::parse("vm.swappiness = 10\nnet.ipv4.ip_default_ttl = 60\n");
//! conf.set_ttl(Ttl::CARRIER);
//! assert_eq!(conf.ttl_entry(), Some("65"));
//! assert!(conf.render().starts_with("vm.swappiness = 10\n"));
//! assert_eq!(conf.count_key(TTL_KEY), 1);
//! ```

#![doc(html_root_url = "https://docs.rs/ttl-core/0.2.0")]

mod error;
pub mod sysctl;
pub mod types;

pub use error::{ErrorKind, Result, TtlError};
pub use sysctl::{SysctlConf, MARKER_COMMENT, TTL_KEY};
pub use types::*;
