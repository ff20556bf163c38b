//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use ttl_changer::{ErrorKind, Ttl, TtlError};

use crate::config::Config;
use crate::output::OutputFormat;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load(&config_path)?;

    // Flags and env vars win over the config file
    let output_format = cli
        .output
        .or(config.output_format)
        .unwrap_or(OutputFormat::Pretty);

    let ctx = commands::Context {
        proc_path: cli.proc_path.unwrap_or_else(|| config.proc_path()),
        sysctl_conf: cli.sysctl_conf.unwrap_or_else(|| config.sysctl_conf_path()),
        privilege: cli.privilege.unwrap_or(config.privilege),
        reload_on_persist: config.reload_on_persist,
        settings_dir: config.settings_dir.clone(),
        config_path,
        output_format,
        explain: cli.explain,
        no_color: cli.no_color,
    };

    debug!(
        config = %ctx.config_path.display(),
        proc_path = %ctx.proc_path.display(),
        sysctl_conf = %ctx.sysctl_conf.display(),
        privilege = %ctx.privilege,
        "resolved settings"
    );

    // Dispatch to appropriate command
    match cli.command {
        Commands::Get => commands::ttl::get(ctx).await,
        Commands::Set(args) => commands::ttl::set(ctx, args.value).await,
        Commands::Carrier => commands::ttl::set(ctx, i64::from(Ttl::CARRIER.get())).await,
        Commands::Reset => commands::ttl::set(ctx, i64::from(Ttl::DEFAULT.get())).await,
        Commands::Check => commands::ttl::check(ctx).await,
        Commands::Persist(args) => commands::persist::persist(ctx, args).await,
        Commands::Persistent => commands::persist::show(ctx).await,
        Commands::Status => commands::status::execute(ctx).await,
        Commands::Hook(args) => commands::hook::execute(ctx, args).await,
        Commands::Config(args) => commands::config::execute(ctx, args).await,
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Process exit status for a failed command.
///
/// | status | meaning |
/// |--------|---------|
/// | 2 | value rejected (validation) |
/// | 3 | root privileges required |
/// | 1 | anything else |
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<TtlError>().map(TtlError::kind) {
        Some(ErrorKind::Validation) => 2,
        Some(ErrorKind::Privilege) => 3,
        Some(ErrorKind::Io) | None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn exit_codes_by_kind() {
        let validation = anyhow::Error::new(TtlError::OutOfRange {
            value: 10,
            min: 32,
            max: 128,
        });
        assert_eq!(exit_code(&validation), 2);

        let privilege = anyhow::Error::new(TtlError::PermissionDenied {
            path: PathBuf::from("/etc/sysctl.conf"),
        })
        .context("failed to persist TTL");
        assert_eq!(exit_code(&privilege), 3);

        let mismatch = anyhow::Error::new(TtlError::Mismatch {
            expected: 65,
            observed: 64,
        });
        assert_eq!(exit_code(&mismatch), 1);

        assert_eq!(exit_code(&anyhow::anyhow!("other")), 1);
    }
}
