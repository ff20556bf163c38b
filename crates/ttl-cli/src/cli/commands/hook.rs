//! `ttlctl hook` - plugin lifecycle hooks for host loaders.

use anyhow::Result;
use directories::BaseDirs;
use serde_json::json;
use std::path::PathBuf;
use ttl_changer::Plugin;

use super::Context;
use crate::cli::args::{HookArgs, HookCommands};
use crate::config::Config;

pub async fn execute(ctx: Context, args: HookArgs) -> Result<()> {
    let plugin = Plugin::new(ctx.controller());

    match args.command {
        HookCommands::Load => {
            let current = plugin.on_load().await;
            if !ctx
                .output_format
                .print_structured(&json!({ "current_ttl": current }))?
            {
                println!("Current system TTL: {current}");
            }
        }
        HookCommands::Unload => plugin.on_unload(),
        HookCommands::Uninstall => plugin.on_uninstall(),
        HookCommands::Migrate { from, to } => {
            let from = if from.is_empty() { legacy_settings() } else { from };
            let to = match to.or(ctx.settings_dir) {
                Some(dir) => dir,
                None => Config::default_settings_dir()?,
            };

            let moved = plugin.on_migrate(&from, &to).await?;
            if !ctx.output_format.print_structured(&moved)? {
                for path in &moved {
                    println!("Migrated {}", path.display());
                }
            }
        }
    }

    Ok(())
}

/// Where older plugin-loader installs kept our settings.
fn legacy_settings() -> Vec<PathBuf> {
    BaseDirs::new()
        .map(|dirs| {
            vec![dirs
                .home_dir()
                .join("homebrew")
                .join("settings")
                .join("ttl-changer.json")]
        })
        .unwrap_or_default()
}
