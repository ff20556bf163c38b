//! `ttlctl get|set|carrier|reset|check` - the live TTL.

use anyhow::{Context as _, Result};
use colored::Colorize;
use serde_json::json;
use ttl_changer::TTL_UNKNOWN;

use super::Context;
use crate::education::Explain;

pub async fn get(ctx: Context) -> Result<()> {
    if ctx.explain {
        Explain::get(&ctx.proc_path).print();
    }

    let controller = ctx.controller();

    // Machine-readable output follows the front-end contract: -1 when unknown
    let current = controller.get_current_ttl().await;
    if ctx
        .output_format
        .print_structured(&json!({ "current_ttl": current }))?
    {
        return Ok(());
    }

    if current == TTL_UNKNOWN {
        println!(
            "Current TTL: {} {}",
            "unknown".red().bold(),
            format!("(could not read {})", ctx.proc_path.display()).dimmed()
        );
    } else {
        println!("Current TTL: {}", current.to_string().cyan().bold());
    }

    Ok(())
}

pub async fn set(ctx: Context, value: i64) -> Result<()> {
    if ctx.explain {
        Explain::set(value, &ctx.proc_path).print();
    }

    let ttl = ctx
        .controller()
        .apply_ttl(value)
        .await
        .with_context(|| format!("failed to set TTL to {value}"))?;

    if ctx
        .output_format
        .print_structured(&json!({ "success": true, "ttl": ttl.get() }))?
    {
        return Ok(());
    }

    println!("{} TTL set to {}.", "Success:".green().bold(), ttl.to_string().cyan());
    if !ttl.is_carrier() && ttl != ttl_changer::Ttl::DEFAULT {
        println!("{}", "Note: carriers usually expect 65 (or 64 for the device itself).".dimmed());
    }
    println!(
        "{}",
        format!("This lasts until reboot. Use 'ttlctl persist {ttl}' to keep it.").dimmed()
    );

    Ok(())
}

pub async fn check(ctx: Context) -> Result<()> {
    if ctx.explain {
        Explain::check(&ctx.proc_path).print();
    }

    let is_65 = ctx.controller().is_ttl_65().await;
    if ctx
        .output_format
        .print_structured(&json!({ "is_ttl_65": is_65 }))?
    {
        return Ok(());
    }

    if is_65 {
        println!("{} TTL is 65.", "Yes:".green().bold());
    } else {
        println!("{} TTL is not 65.", "No:".yellow().bold());
    }

    Ok(())
}
