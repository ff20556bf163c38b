//! `ttlctl status` - live and persisted TTL together.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::education::Explain;

pub async fn execute(ctx: Context) -> Result<()> {
    if ctx.explain {
        Explain::status(&ctx.proc_path, &ctx.sysctl_conf).print();
    }

    let status = ctx.controller().status().await;
    if ctx.output_format.print_structured(&status)? {
        return Ok(());
    }

    println!("{}", "TTL Status".bold().underline());
    println!();

    let live = status
        .current_ttl
        .map_or_else(|| "unknown".red().to_string(), |v| v.to_string().cyan().bold().to_string());
    println!("  {} {}", "Live:".bold(), live);

    let mode = if status.is_ttl_65 {
        "carrier (65)".green().to_string()
    } else {
        "default".normal().to_string()
    };
    println!("  {} {}", "Mode:".bold(), mode);

    let persisted = status
        .persistent
        .ttl_value
        .map_or_else(|| "not set".yellow().to_string(), |v| v.to_string());
    println!("  {} {}", "Persistent:".bold(), persisted);

    println!();
    if !status.in_sync() && status.current_ttl.is_some() {
        println!(
            "{}",
            "Live and persisted values differ; the persisted one applies after reboot.".dimmed()
        );
    }

    Ok(())
}
