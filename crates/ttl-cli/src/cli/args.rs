//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use ttl_changer::PrivilegeMode;

use crate::output::OutputFormat;

/// Control the default IPv4 TTL
///
/// Toggle the carrier value (65) versus the Linux default (64), or any value
/// between 32 and 128, and make the choice survive reboots.
/// Use --explain on any command to see which files it touches.
#[derive(Parser, Debug)]
#[command(name = "ttlctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (default: platform config dir)
    #[arg(long, env = "TTLCTL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Kernel control file for the live TTL
    #[arg(long, env = "TTLCTL_PROC_PATH", global = true)]
    pub proc_path: Option<PathBuf>,

    /// Persisted sysctl configuration file
    #[arg(long, env = "TTLCTL_SYSCTL_CONF", global = true)]
    pub sysctl_conf: Option<PathBuf>,

    /// How to obtain root for writes (direct, sudo)
    #[arg(long, env = "TTLCTL_PRIVILEGE", global = true)]
    pub privilege: Option<PrivilegeMode>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Explain what this command does (educational mode)
    #[arg(long, global = true)]
    pub explain: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the live TTL
    Get,

    /// Set the live TTL (32-128)
    Set(SetArgs),

    /// Set the live TTL to 65
    Carrier,

    /// Reset the live TTL to the default of 64
    Reset,

    /// Check whether the live TTL is 65
    Check,

    /// Write the TTL to the sysctl configuration so it survives reboots
    Persist(PersistArgs),

    /// Show the TTL recorded in the sysctl configuration
    Persistent,

    /// Show live and persisted TTL together
    Status,

    /// Plugin lifecycle hooks for host loaders
    Hook(HookArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// Set / persist commands
// ============================================================================

#[derive(Args, Debug)]
pub struct SetArgs {
    /// TTL value
    #[arg(allow_negative_numbers = true)]
    pub value: i64,
}

#[derive(Args, Debug)]
pub struct PersistArgs {
    /// TTL value
    #[arg(allow_negative_numbers = true)]
    pub value: i64,

    /// Load the file into the kernel afterwards (sysctl -p)
    #[arg(long, conflicts_with = "no_reload")]
    pub reload: bool,

    /// Don't reload, even if reload_on_persist is configured
    #[arg(long)]
    pub no_reload: bool,
}

impl PersistArgs {
    /// Flags override the configured default.
    pub const fn reload(&self, configured: bool) -> bool {
        if self.reload {
            true
        } else if self.no_reload {
            false
        } else {
            configured
        }
    }
}

// ============================================================================
// Hook command
// ============================================================================

#[derive(Args, Debug)]
pub struct HookArgs {
    #[command(subcommand)]
    pub command: HookCommands,
}

#[derive(Subcommand, Debug)]
pub enum HookCommands {
    /// Plugin loaded: log the current TTL
    Load,

    /// Plugin unloading
    Unload,

    /// Plugin uninstalled
    Uninstall,

    /// Move legacy settings into the settings directory
    Migrate {
        /// Legacy settings file or directory (repeatable)
        #[arg(long = "from")]
        from: Vec<PathBuf>,

        /// Destination settings directory
        #[arg(long)]
        to: Option<PathBuf>,
    },
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Key to set (e.g., privilege, reload_on_persist)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn negative_values_parse() {
        let cli = Cli::try_parse_from(["ttlctl", "set", "-5"]).unwrap();
        assert!(matches!(cli.command, Commands::Set(SetArgs { value: -5 })));
    }

    #[test]
    fn reload_flags() {
        let cli = Cli::try_parse_from(["ttlctl", "persist", "65", "--no-reload"]).unwrap();
        let Commands::Persist(args) = cli.command else {
            panic!("expected persist");
        };
        assert!(!args.reload(true));

        let cli = Cli::try_parse_from(["ttlctl", "persist", "65"]).unwrap();
        let Commands::Persist(args) = cli.command else {
            panic!("expected persist");
        };
        assert!(args.reload(true));
        assert!(!args.reload(false));

        assert!(Cli::try_parse_from(["ttlctl", "persist", "65", "--reload", "--no-reload"]).is_err());
    }

    #[test]
    fn privilege_parses_from_str() {
        let cli = Cli::try_parse_from(["ttlctl", "--privilege", "direct", "get"]).unwrap();
        assert_eq!(cli.privilege, Some(PrivilegeMode::Direct));
        assert!(Cli::try_parse_from(["ttlctl", "--privilege", "doas", "get"]).is_err());
    }
}
