//! `ttlctl config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::OutputFormat;

pub async fn execute(ctx: Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(&ctx),
        ConfigCommands::Set { key, value } => set_config(&ctx, &key, &value),
        ConfigCommands::Path => {
            println!("{}", ctx.config_path.display());
            Ok(())
        }
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = Config::load(&ctx.config_path)?;

    if ctx.output_format.print_structured(&config)? {
        return Ok(());
    }

    println!("{}", "Current Configuration:".bold());
    println!();
    println!("  {} {}", "proc_path:".bold(), config.proc_path().display());
    println!("  {} {}", "sysctl_conf_path:".bold(), config.sysctl_conf_path().display());
    println!("  {} {}", "privilege:".bold(), config.privilege);
    println!("  {} {}", "reload_on_persist:".bold(), config.reload_on_persist);
    println!(
        "  {} {}",
        "output_format:".bold(),
        config.output_format.unwrap_or(OutputFormat::Pretty)
    );
    let settings = config
        .settings_dir
        .map_or_else(|| "(default)".dimmed().to_string(), |p| p.display().to_string());
    println!("  {} {}", "settings_dir:".bold(), settings);

    Ok(())
}

fn set_config(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut config = Config::load(&ctx.config_path)?;
    config.set(key, value)?;
    config.save(&ctx.config_path)?;

    println!("{} {} set to {}.", "Success:".green().bold(), key, value.cyan());
    Ok(())
}
