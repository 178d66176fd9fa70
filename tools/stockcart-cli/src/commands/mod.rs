//! CLI command implementations.

pub mod cart;
pub mod config;
pub mod products;

use clap::{Args, Subcommand};

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product to add.
    pub product: String,

    /// Number of units.
    #[arg(allow_hyphen_values = true)]
    pub quantity: String,
}

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Product whose line to change.
    pub product: String,

    /// `inc` or `dec`.
    pub action: String,
}

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Line id as shown by `stockcart list`.
    pub line_id: String,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Print the resolved catalog and cart state paths
    Paths,
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;
    use std::path::Path;

    use stockcart_commerce::CommerceError;

    use crate::context::Context;
    use crate::output::Output;

    pub const CATALOG: &str = r#"
[[products]]
id = "P1"
name = "Desk Lamp"
brand = "Lumen"
category = "lighting"
price_minor = 10000
stock = 5

[[products]]
id = "P2"
name = "Notebook"
brand = "Paperly"
category = "stationery"
price_minor = 450
stock = 1
"#;

    /// Lay out a project directory and open a context on it.
    pub fn project(dir: &Path, buyer: Option<&str>) -> Context {
        fs::write(dir.join("catalog.toml"), CATALOG).unwrap();
        fs::write(
            dir.join("stockcart.toml"),
            "[store]\npath = \"state/cart.json\"\n",
        )
        .unwrap();
        let config = dir.join("stockcart.toml");
        Context::load(
            config.to_str(),
            buyer.map(str::to_string),
            Output::new(false, true),
        )
        .unwrap()
    }

    pub fn domain_error(err: &anyhow::Error) -> &CommerceError {
        err.chain()
            .find_map(|cause| cause.downcast_ref::<CommerceError>())
            .unwrap()
    }
}
