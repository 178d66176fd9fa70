//! Catalog and cart state files.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs4::fs_std::FileExt;
use serde::{Deserialize, Serialize};
use stockcart_commerce::prelude::*;
use tempfile::NamedTempFile;

/// Catalog file contents (`[[products]]` in TOML, `{"products": [..]}` in JSON).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub products: Vec<CatalogEntry>,
}

/// One product as written in the catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    /// Unit price in minor units (cents for USD).
    pub price_minor: i64,
    /// Currency code; defaults to `[pricing] currency`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CatalogEntry {
    fn into_product(self, default_currency: Currency) -> Result<Product, CommerceError> {
        let currency = match &self.currency {
            Some(code) => Currency::from_code(code).ok_or_else(|| {
                CommerceError::InvalidInput(format!(
                    "product {} has unsupported currency {:?}",
                    self.id, code
                ))
            })?,
            None => default_currency,
        };
        let product = Product::new(
            ProductId::parse(&self.id)?,
            self.name,
            self.brand,
            self.category,
            Money::new(self.price_minor, currency),
            self.stock,
        )?;
        Ok(match self.image {
            Some(url) => product.with_image(url),
            None => product,
        })
    }
}

/// Read a catalog file into an in-memory catalog.
pub fn load_catalog(path: &Path, default_currency: Currency) -> Result<InMemoryCatalog> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;

    let file: CatalogFile = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON catalog: {}", path.display()))?
    } else {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML catalog: {}", path.display()))?
    };

    let products = file
        .products
        .into_iter()
        .map(|entry| entry.into_product(default_currency))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Invalid product in {}", path.display()))?;

    tracing::debug!(path = %path.display(), products = products.len(), "catalog loaded");
    InMemoryCatalog::from_products(products)
        .with_context(|| format!("Invalid catalog {}", path.display()))
}

/// Exclusive lock on a cart state file.
///
/// Taken before the state is read and released when dropped, so one
/// invocation's load, operation and save never interleave with another's.
/// The lock lives on a sibling `<state>.lock` file because saving replaces
/// the state file itself.
#[derive(Debug)]
pub struct StateLock {
    _file: File,
    path: PathBuf,
}

impl StateLock {
    /// Block until the lock for `state_path` is held.
    pub fn acquire(state_path: &Path) -> Result<Self> {
        ensure_parent(state_path)?;
        let path = lock_path(state_path);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("Failed to open lock file: {}", path.display()))?;
        FileExt::lock_exclusive(&file)
            .with_context(|| format!("Failed to lock cart state: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "cart state locked");
        Ok(Self { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn lock_path(state_path: &Path) -> PathBuf {
    let mut name = OsString::from(state_path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

fn state_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

fn ensure_parent(path: &Path) -> Result<()> {
    let dir = state_dir(path);
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))
}

/// Read the cart state file. A missing file is an empty store.
///
/// Callers that write the state back hold a [`StateLock`] across both calls.
pub fn load_store(path: &Path) -> Result<InMemoryCartStore> {
    if !path.exists() {
        return Ok(InMemoryCartStore::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read cart state: {}", path.display()))?;
    let snapshot: CartSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse cart state: {}", path.display()))?;

    InMemoryCartStore::from_snapshot(snapshot)
        .with_context(|| format!("Corrupt cart state: {}", path.display()))
}

/// Write the cart state file, creating its directory if needed.
///
/// The snapshot goes to a uniquely named temp file in the same directory
/// which then replaces the state file.
pub fn save_store(path: &Path, store: &InMemoryCartStore) -> Result<()> {
    ensure_parent(path)?;

    let snapshot = store.snapshot()?;
    let content = serde_json::to_string_pretty(&snapshot)?;

    let mut tmp = NamedTempFile::new_in(state_dir(path))
        .with_context(|| format!("Failed to create temp file for {}", path.display()))?;
    tmp.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write cart state: {}", tmp.path().display()))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write cart state: {}", path.display()))?;

    tracing::debug!(path = %path.display(), lines = snapshot.lines.len(), "cart state saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
[[products]]
id = "P1"
name = "Desk Lamp"
brand = "Lumen"
category = "lighting"
price_minor = 10000
stock = 5

[[products]]
id = "P2"
name = "Mouse Pad"
price_minor = 1299
currency = "EUR"
stock = 0
image = "https://img.example/pad.png"
"#;

    #[test]
    fn test_load_toml_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        fs::write(&path, CATALOG).unwrap();

        let catalog = load_catalog(&path, Currency::USD).unwrap();
        let products = catalog.products().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price, Money::new(10_000, Currency::USD));
        assert_eq!(products[1].price.currency, Currency::EUR);
        assert_eq!(products[1].stock_quantity, 0);
        assert_eq!(products[1].image.as_deref(), Some("https://img.example/pad.png"));
    }

    #[test]
    fn test_catalog_rejects_negative_stock() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"{"products": [{"id": "P1", "name": "x", "price_minor": 1, "stock": -1}]}"#,
        )
        .unwrap();

        let err = load_catalog(&path, Currency::USD).unwrap_err();
        let domain = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<CommerceError>());
        assert!(domain.is_some());
    }

    #[test]
    fn test_missing_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = load_store(&dir.path().join("nope.json")).unwrap();
        assert_eq!(store.snapshot().unwrap(), CartSnapshot::default());
    }

    #[test]
    fn test_store_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("cart.json");

        let store = InMemoryCartStore::new();
        let line = CartLine::new(BuyerId::new("B1"), ProductId::new("P1"), 3).unwrap();
        store.insert_line(line.clone()).unwrap();
        save_store(&path, &store).unwrap();

        let loaded = load_store(&path).unwrap();
        let found = loaded
            .find_line(&BuyerId::new("B1"), &ProductId::new("P1"))
            .unwrap()
            .unwrap();
        assert_eq!(found, line);

        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![OsString::from("cart.json")]);
    }

    #[test]
    fn test_state_lock_sits_beside_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cart.json");

        let lock = StateLock::acquire(&path).unwrap();
        assert_eq!(lock.path(), dir.path().join("nested").join("cart.json.lock"));
        assert!(lock.path().exists());
        assert!(!path.exists());
    }

    #[test]
    fn test_state_lock_excludes_other_holders() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::time::Duration;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        let released = AtomicBool::new(false);

        let first = StateLock::acquire(&path).unwrap();
        std::thread::scope(|scope| {
            let waiter = scope.spawn(|| {
                let _second = StateLock::acquire(&path).unwrap();
                released.load(Ordering::SeqCst)
            });
            std::thread::sleep(Duration::from_millis(100));
            released.store(true, Ordering::SeqCst);
            drop(first);
            assert!(waiter.join().unwrap());
        });
    }
}
