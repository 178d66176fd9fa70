//! Cart commands.

use anyhow::Result;
use serde_json::json;
use stockcart_commerce::prelude::*;

use super::{AddArgs, RemoveArgs, UpdateArgs};
use crate::context::Context;

/// Add a product to the buyer's cart.
pub fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let quantity = args.quantity.trim().parse::<i64>().map_err(|_| {
        CommerceError::InvalidInput(format!(
            "quantity must be a whole number, got {:?}",
            args.quantity
        ))
    })?;
    let request = AddItemPayload {
        product_id: args.product,
        ordered_quantity: quantity,
    }
    .validate(ctx.buyer()?)?;

    let cart = ctx.open_cart()?;
    let line = cart.add_item(request)?;
    ctx.save(&cart)?;

    if ctx.output.is_json() {
        ctx.output.json(&line);
    } else {
        ctx.output.success(&format!(
            "Added {} x {} (line {})",
            line.ordered_quantity, line.product_id, line.id
        ));
    }
    Ok(())
}

/// Step the quantity of an existing line.
pub fn update(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let request = UpdateQuantityPayload {
        product_id: args.product,
        action: args.action.parse()?,
    }
    .validate(ctx.buyer()?)?;
    let product_id = request.product_id().clone();

    let cart = ctx.open_cart()?;
    let quantity = cart.update_quantity(request)?;
    ctx.save(&cart)?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "productId": product_id,
            "orderedQuantity": quantity,
        }));
    } else {
        ctx.output
            .success(&format!("Quantity of {} is now {}", product_id, quantity));
    }
    Ok(())
}

/// Remove one line. Removing a line that is not there succeeds.
pub fn remove(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let request = RemoveItem::parse(ctx.buyer()?, &args.line_id)?;
    let line_id = request.line_id().clone();

    let cart = ctx.open_cart()?;
    let removed = cart.remove_item(request)?;
    if removed {
        ctx.save(&cart)?;
    }

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "lineId": line_id, "removed": removed }));
    } else if removed {
        ctx.output.success(&format!("Removed line {}", line_id));
    } else {
        ctx.output
            .info(&format!("Line {} is not in the cart; nothing to do", line_id));
    }
    Ok(())
}

/// Remove every line of the buyer.
pub fn flush(ctx: &Context) -> Result<()> {
    let buyer = ctx.buyer()?;

    let cart = ctx.open_cart()?;
    let removed = cart.flush(&buyer)?;
    if removed > 0 {
        ctx.save(&cart)?;
    }

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "removed": removed }));
    } else {
        ctx.output
            .success(&format!("Removed {} line(s) from the cart", removed));
    }
    Ok(())
}

/// Print the number of lines.
pub fn count(ctx: &Context) -> Result<()> {
    let buyer = ctx.buyer()?;
    let count = ctx.open_cart()?.count(&buyer)?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "count": count }));
    } else {
        ctx.output.value(&count.to_string());
    }
    Ok(())
}

/// Print the priced cart and its order summary.
pub fn list(ctx: &Context) -> Result<()> {
    let buyer = ctx.buyer()?;
    let listing = ctx.open_cart()?.list_with_pricing(&buyer)?;

    if ctx.output.is_json() {
        ctx.output.json(&listing);
        return Ok(());
    }

    ctx.output.header(&format!("Cart of {}", buyer));

    if listing.is_empty() {
        ctx.output.info("The cart is empty.");
        ctx.output.info("Run `stockcart add <product> <qty>` to add something.");
        return Ok(());
    }

    let widths = [18, 12, 24, 5, 12, 12];
    ctx.output.table_header(
        &["LINE", "PRODUCT", "NAME", "QTY", "PRICE", "TOTAL"],
        &widths,
    );
    for line in &listing.lines {
        let quantity = line.ordered_quantity.to_string();
        let price = line.price.display();
        let total = line.line_total.display();
        ctx.output.table_row(
            &[
                line.line_id.as_str(),
                line.product_id.as_str(),
                &line.name,
                &quantity,
                &price,
                &total,
            ],
            &widths,
        );
    }

    for line in &listing.unavailable {
        ctx.output.warn(&format!(
            "Line {} refers to product {} which is no longer available",
            line.id, line.product_id
        ));
    }

    ctx.output.info("");
    ctx.output.kv("units", &listing.total_units().to_string());
    ctx.output.kv("subtotal", &listing.summary.subtotal.display());
    ctx.output.kv("discount", &listing.summary.discount.display());
    ctx.output.kv("grand total", &listing.summary.grand_total.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{domain_error, project};
    use crate::files;

    fn add_args(product: &str, quantity: &str) -> AddArgs {
        AddArgs {
            product: product.to_string(),
            quantity: quantity.to_string(),
        }
    }

    fn update_args(product: &str, action: &str) -> UpdateArgs {
        UpdateArgs {
            product: product.to_string(),
            action: action.to_string(),
        }
    }

    fn saved_lines(ctx: &Context) -> Vec<CartLine> {
        files::load_store(&ctx.store_path())
            .unwrap()
            .lines_for(&ctx.buyer().unwrap())
            .unwrap()
    }

    #[test]
    fn test_add_then_list_persists_between_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = project(dir.path(), Some("B1"));

        add(add_args("P1", "5"), &ctx).unwrap();
        assert!(ctx.store_path().ends_with("state/cart.json"));

        let lines = saved_lines(&ctx);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].ordered_quantity, 5);

        let listing = ctx
            .open_cart()
            .unwrap()
            .list_with_pricing(&BuyerId::new("B1"))
            .unwrap();
        assert_eq!(listing.summary.subtotal.amount_minor, 50_000);
        assert_eq!(listing.summary.discount.amount_minor, 2_500);
        assert_eq!(listing.summary.grand_total.amount_minor, 47_500);
        list(&ctx).unwrap();
    }

    #[test]
    fn test_add_errors_map_to_kinds() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = project(dir.path(), Some("B1"));

        let err = add(add_args("P1", "two"), &ctx).unwrap_err();
        assert_eq!(domain_error(&err).kind(), ErrorKind::InvalidInput);

        let err = add(add_args("P1", "0"), &ctx).unwrap_err();
        assert_eq!(domain_error(&err).kind(), ErrorKind::InvalidInput);

        let err = add(add_args("P9", "1"), &ctx).unwrap_err();
        assert_eq!(domain_error(&err).kind(), ErrorKind::NotFound);

        let err = add(add_args("P1", "6"), &ctx).unwrap_err();
        assert_eq!(domain_error(&err).kind(), ErrorKind::OutOfStock);

        add(add_args("P1", "1"), &ctx).unwrap();
        let err = add(add_args("P1", "1"), &ctx).unwrap_err();
        assert_eq!(domain_error(&err).kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_missing_buyer_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = project(dir.path(), None);

        let err = count(&ctx).unwrap_err();
        assert_eq!(domain_error(&err).kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_update_steps_and_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = project(dir.path(), Some("B1"));

        let err = update(update_args("P2", "inc"), &ctx).unwrap_err();
        assert_eq!(domain_error(&err).kind(), ErrorKind::PreconditionFailed);

        add(add_args("P2", "1"), &ctx).unwrap();

        // stock of P2 is 1
        let err = update(update_args("P2", "inc"), &ctx).unwrap_err();
        assert_eq!(domain_error(&err).kind(), ErrorKind::OutOfStock);

        let err = update(update_args("P2", "dec"), &ctx).unwrap_err();
        assert_eq!(domain_error(&err).kind(), ErrorKind::InvalidQuantity);

        let err = update(update_args("P2", "double"), &ctx).unwrap_err();
        assert_eq!(domain_error(&err).kind(), ErrorKind::InvalidInput);

        add(add_args("P1", "2"), &ctx).unwrap();
        update(update_args("P1", "inc"), &ctx).unwrap();
        update(update_args("P1", "increment"), &ctx).unwrap();
        update(update_args("P1", "dec"), &ctx).unwrap();

        let p1 = saved_lines(&ctx)
            .into_iter()
            .find(|l| l.product_id.as_str() == "P1")
            .unwrap();
        assert_eq!(p1.ordered_quantity, 3);
    }

    #[test]
    fn test_remove_and_flush_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = project(dir.path(), Some("B1"));
        add(add_args("P1", "1"), &ctx).unwrap();
        add(add_args("P2", "1"), &ctx).unwrap();

        let line_id = saved_lines(&ctx)[0].id.to_string();
        let remove_args = || RemoveArgs {
            line_id: line_id.clone(),
        };

        // another buyer cannot remove it
        let other = project(dir.path(), Some("B2"));
        remove(remove_args(), &other).unwrap();
        assert_eq!(saved_lines(&ctx).len(), 2);

        remove(remove_args(), &ctx).unwrap();
        remove(remove_args(), &ctx).unwrap();
        assert_eq!(saved_lines(&ctx).len(), 1);

        flush(&ctx).unwrap();
        flush(&ctx).unwrap();
        assert!(saved_lines(&ctx).is_empty());
        count(&ctx).unwrap();
    }

    fn add_concurrently(ctx: &Context, products: &[&str]) -> Vec<Result<()>> {
        std::thread::scope(|scope| {
            let handles: Vec<_> = products
                .iter()
                .map(|product| scope.spawn(move || add(add_args(product, "1"), ctx)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("invocation panicked"))
                .collect()
        })
    }

    #[test]
    fn test_concurrent_adds_of_same_product_leave_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = project(dir.path(), Some("B1"));

        let results = add_concurrently(&ctx, &["P1"; 6]);

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert_eq!(domain_error(err).kind(), ErrorKind::Conflict);
        }
        assert_eq!(saved_lines(&ctx).len(), 1);
    }

    #[test]
    fn test_concurrent_adds_of_different_products_are_all_kept() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = project(dir.path(), Some("B1"));

        let results = add_concurrently(&ctx, &["P1", "P2", "P1", "P2"]);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);

        let mut products: Vec<String> = saved_lines(&ctx)
            .into_iter()
            .map(|l| l.product_id.into_inner())
            .collect();
        products.sort();
        assert_eq!(products, vec!["P1", "P2"]);
    }

    #[test]
    fn test_open_session_blocks_other_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = project(dir.path(), Some("B1"));

        let session = ctx.open_cart().unwrap();
        std::thread::scope(|scope| {
            let other = scope.spawn(|| add(add_args("P1", "1"), &ctx));

            // the other invocation cannot see or touch the state yet
            session
                .add_item(AddItem::new(BuyerId::new("B1"), ProductId::new("P1"), 2).unwrap())
                .unwrap();
            ctx.save(&session).unwrap();
            drop(session);

            let err = other.join().unwrap().unwrap_err();
            assert_eq!(domain_error(&err).kind(), ErrorKind::Conflict);
        });

        let lines = saved_lines(&ctx);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].ordered_quantity, 2);
    }

    #[test]
    fn test_vanished_product_is_reported_not_priced() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = project(dir.path(), Some("B1"));
        add(add_args("P1", "1"), &ctx).unwrap();
        add(add_args("P2", "1"), &ctx).unwrap();

        // drop P2 from the catalog file
        let trimmed = crate::commands::test_support::CATALOG
            .split("[[products]]")
            .take(2)
            .collect::<Vec<_>>()
            .join("[[products]]");
        std::fs::write(dir.path().join("catalog.toml"), trimmed).unwrap();

        let listing = ctx
            .open_cart()
            .unwrap()
            .list_with_pricing(&BuyerId::new("B1"))
            .unwrap();
        assert_eq!(listing.lines.len(), 1);
        assert_eq!(listing.unavailable.len(), 1);
        assert_eq!(listing.summary.subtotal.amount_minor, 10_000);
        assert_eq!(ctx.open_cart().unwrap().count(&BuyerId::new("B1")).unwrap(), 2);
        list(&ctx).unwrap();
    }
}
