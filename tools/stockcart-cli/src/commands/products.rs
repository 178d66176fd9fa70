//! Catalog listing.

use anyhow::Result;

use crate::context::Context;
use crate::output::stock_badge;

/// Print every product in the catalog.
pub fn run(ctx: &Context) -> Result<()> {
    let products = ctx.load_catalog()?.products()?;

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    ctx.output
        .header(&format!("Products ({})", ctx.catalog_path().display()));

    if products.is_empty() {
        ctx.output.info("The catalog is empty.");
        return Ok(());
    }

    let widths = [12, 24, 14, 12, 10];
    ctx.output
        .table_header(&["ID", "NAME", "BRAND", "PRICE", "STOCK"], &widths);
    for product in &products {
        let price = product.price.display();
        let stock = stock_badge(product.stock_quantity);
        ctx.output.table_row(
            &[
                product.id.as_str(),
                &product.name,
                &product.brand,
                &price,
                &stock,
            ],
            &widths,
        );
    }
    Ok(())
}
