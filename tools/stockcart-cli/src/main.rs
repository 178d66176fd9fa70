//! StockCart CLI - run cart operations against local catalog and cart files.
//!
//! Commands:
//! - `stockcart add` - Add a product to the cart
//! - `stockcart update` - Step a line's quantity up or down
//! - `stockcart remove` - Remove a line by id
//! - `stockcart flush` - Empty the cart
//! - `stockcart list` - Show the cart with pricing
//! - `stockcart count` - Count cart lines
//! - `stockcart products` - Show the catalog
//! - `stockcart config` - Inspect configuration

mod commands;
mod config;
mod context;
mod files;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stockcart_observability::{request_span, RequestId};

use commands::{AddArgs, ConfigArgs, RemoveArgs, UpdateArgs};

/// StockCart - inventory-aware shopping cart
#[derive(Parser)]
#[command(name = "stockcart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Buyer the operation acts for
    #[arg(short, long, global = true, env = "STOCKCART_BUYER")]
    buyer: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a product to the cart
    Add(AddArgs),

    /// Increment or decrement the quantity of a cart line
    Update(UpdateArgs),

    /// Remove a line from the cart
    Remove(RemoveArgs),

    /// Remove every line from the cart
    Flush,

    /// List the cart with prices and order summary
    List,

    /// Count the lines in the cart
    Count,

    /// List catalog products
    Products,

    /// Manage configuration
    Config(ConfigArgs),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Add(_) => "add",
            Commands::Update(_) => "update",
            Commands::Remove(_) => "remove",
            Commands::Flush => "flush",
            Commands::List => "list",
            Commands::Count => "count",
            Commands::Products => "products",
            Commands::Config(_) => "config",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = match context::Context::load(cli.config.as_deref(), cli.buyer, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.failure(&e);
            std::process::exit(1);
        }
    };

    let logging = if cli.verbose {
        ctx.config.logging.verbose()
    } else {
        ctx.config.logging
    };
    stockcart_observability::init(&logging);

    let request_id = RequestId::generate();
    let op = cli.command.name();
    let span = request_span(&request_id, op, ctx.buyer_label());
    let result = span.in_scope(|| {
        tracing::debug!(config = ?ctx.config_path, "starting");
        match cli.command {
            Commands::Add(args) => commands::cart::add(args, &ctx),
            Commands::Update(args) => commands::cart::update(args, &ctx),
            Commands::Remove(args) => commands::cart::remove(args, &ctx),
            Commands::Flush => commands::cart::flush(&ctx),
            Commands::List => commands::cart::list(&ctx),
            Commands::Count => commands::cart::count(&ctx),
            Commands::Products => commands::products::run(&ctx),
            Commands::Config(args) => commands::config::run(args, &ctx),
        }
    });

    if let Err(e) = result {
        ctx.output.failure(&e);
        std::process::exit(1);
    }

    Ok(())
}
