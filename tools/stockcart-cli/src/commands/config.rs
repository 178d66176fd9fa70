//! Configuration commands.

use anyhow::Result;
use serde_json::json;

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Paths => show_paths(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(none, using defaults)"),
    }

    ctx.output.info("[catalog]");
    ctx.output.kv("path", &ctx.config.catalog.path);

    ctx.output.info("[store]");
    ctx.output.kv("path", &ctx.config.store.path);

    ctx.output.info("[pricing]");
    ctx.output.kv("currency", &ctx.config.pricing.currency);

    ctx.output.info("[logging]");
    ctx.output.kv("level", &ctx.config.logging.level.to_string());
    ctx.output.kv("format", &ctx.config.logging.format.to_string());

    ctx.config.currency()?;
    Ok(())
}

fn show_paths(ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog_path();
    let store = ctx.store_path();

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "catalog": catalog,
            "store": store,
        }));
        return Ok(());
    }

    ctx.output.kv("catalog", &catalog.display().to_string());
    ctx.output.kv("store", &store.display().to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::project;

    #[test]
    fn test_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = project(dir.path(), None);

        assert_eq!(ctx.catalog_path(), dir.path().join("catalog.toml"));
        assert_eq!(ctx.store_path(), dir.path().join("state/cart.json"));
        show_paths(&ctx).unwrap();
        show_config(&ctx).unwrap();
    }
}
