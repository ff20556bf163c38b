//! # ttl-cli
//!
//! Command-line front-end for the TTL controller.
//!
//! ## Features
//!
//! - **Live TTL**: read, set, toggle 65/64, check
//! - **Persistence**: write `/etc/sysctl.conf`, optionally reload it
//! - **Host hooks**: load/unload/uninstall/migrate, for plugin loaders
//! - **Educational mode**: `--explain` shows which files a command touches
//! - **Multiple output formats**: pretty, JSON, YAML
//!
//! Failures exit with a status that encodes the error kind, see [`exit_code`].

pub mod cli;
pub mod config;
pub mod education;
pub mod output;

pub use cli::{exit_code, run};
