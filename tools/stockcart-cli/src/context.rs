//! CLI execution context.

use std::ops::Deref;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use stockcart_commerce::prelude::*;

use crate::config::{StockcartConfig, CONFIG_FILE_NAMES};
use crate::files::{self, StateLock};
use crate::output::Output;

/// Cart service over the file-backed catalog and store.
pub type LocalCartService = CartService<InMemoryCatalog, InMemoryCartStore>;

/// Cart service for one invocation, holding the cart state lock until dropped.
pub struct CartSession {
    service: LocalCartService,
    _lock: StateLock,
}

impl Deref for CartSession {
    type Target = LocalCartService;

    fn deref(&self) -> &Self::Target {
        &self.service
    }
}

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: StockcartConfig,
    /// Config file in use, if one was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Directory relative paths in the config are resolved against.
    pub root: PathBuf,
    buyer: Option<String>,
}

impl Context {
    /// Load context from an explicit config file or by discovery.
    pub fn load(config_path: Option<&str>, buyer: Option<String>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let found = match config_path {
            Some(path) => Some(PathBuf::from(path)),
            None => Self::find_config(&cwd),
        };

        let (config, root) = match &found {
            Some(path) => {
                let config = StockcartConfig::load(path)?;
                let root = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| cwd.clone());
                (config, root)
            }
            None => (StockcartConfig::default(), cwd),
        };

        if let Some(path) = &found {
            output.debug(&format!("Using config {}", path.display()));
        }

        Ok(Self {
            config,
            config_path: found,
            output,
            root,
            buyer,
        })
    }

    /// Find a config file in the directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        start.ancestors().find_map(|dir| {
            CONFIG_FILE_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|path| path.is_file())
        })
    }

    /// Resolve a configured path against the config directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = PathBuf::from(path);
        if path.is_absolute() {
            path
        } else {
            self.root.join(path)
        }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.resolve_path(&self.config.catalog.path)
    }

    pub fn store_path(&self) -> PathBuf {
        self.resolve_path(&self.config.store.path)
    }

    /// The buyer this invocation acts for.
    pub fn buyer(&self) -> Result<BuyerId, CommerceError> {
        match self.buyer.as_deref() {
            Some(raw) => BuyerId::parse(raw),
            None => Err(CommerceError::InvalidInput(
                "buyer id is required (pass --buyer or set STOCKCART_BUYER)".to_string(),
            )),
        }
    }

    /// Buyer id for log fields, without validation.
    pub fn buyer_label(&self) -> &str {
        self.buyer.as_deref().unwrap_or("-")
    }

    pub fn load_catalog(&self) -> Result<InMemoryCatalog> {
        files::load_catalog(&self.catalog_path(), self.config.currency()?)
    }

    /// Lock the cart state and open the cart service over the configured files.
    pub fn open_cart(&self) -> Result<CartSession> {
        let store_path = self.store_path();
        let lock = StateLock::acquire(&store_path)?;
        self.output
            .debug(&format!("Locked {}", lock.path().display()));

        let catalog = self.load_catalog()?;
        let store = files::load_store(&store_path)?;
        let pricing = PricingEngine::new(self.config.currency()?);
        Ok(CartSession {
            service: CartService::new(catalog, store, pricing),
            _lock: lock,
        })
    }

    /// Persist the session's cart state. The session keeps the lock.
    pub fn save(&self, cart: &CartSession) -> Result<()> {
        files::save_store(&self.store_path(), cart.store())
    }
}
