//! `ttlctl persist|persistent` - the TTL recorded in sysctl configuration.

use anyhow::{Context as _, Result};
use colored::Colorize;
use serde_json::json;

use super::Context;
use crate::cli::args::PersistArgs;
use crate::education::Explain;

pub async fn persist(ctx: Context, args: PersistArgs) -> Result<()> {
    let reload = args.reload(ctx.reload_on_persist);

    if ctx.explain {
        Explain::persist(args.value, &ctx.sysctl_conf, reload).print();
    }

    let ttl = ctx
        .controller()
        .persist_ttl(args.value, reload)
        .await
        .with_context(|| format!("failed to make TTL {} persistent", args.value))?;

    if ctx.output_format.print_structured(&json!({
        "success": true,
        "ttl": ttl.get(),
        "path": ctx.sysctl_conf.display().to_string(),
        "reloaded": reload,
    }))? {
        return Ok(());
    }

    println!(
        "{} TTL {} saved to {}.",
        "Success:".green().bold(),
        ttl.to_string().cyan(),
        ctx.sysctl_conf.display()
    );
    if reload {
        println!("Reloaded sysctl configuration.");
    } else {
        println!(
            "{}",
            "It applies after reboot. Use 'ttlctl set' to change the live value now.".dimmed()
        );
    }

    Ok(())
}

pub async fn show(ctx: Context) -> Result<()> {
    if ctx.explain {
        Explain::persistent(&ctx.sysctl_conf).print();
    }

    let persisted = ctx.controller().get_persistent_ttl().await;
    if ctx.output_format.print_structured(&persisted)? {
        return Ok(());
    }

    match persisted.ttl_value {
        Some(value) if persisted.is_persistent => println!(
            "Persistent TTL: {} {}",
            value.to_string().cyan().bold(),
            format!("({})", ctx.sysctl_conf.display()).dimmed()
        ),
        _ => println!("Persistent TTL: {}", "not set".yellow()),
    }

    Ok(())
}
