//! Cart commands.

use anyhow::Result;
use marketplace_cart::{CartHandle, Product, ProductId};
use serde_json::json;

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::format_price;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let (provider, cart) = ctx.mount_cart().await?;

    let result = match args.command {
        CartCommand::Show => {
            show_cart(&cart, ctx);
            Ok(())
        }
        CartCommand::Add {
            id,
            title,
            image_url,
            price,
        } => add(&cart, Product::new(id, title, image_url, price), ctx).await,
        CartCommand::Increment { id } => increment(&cart, id, ctx).await,
        CartCommand::Decrement { id } => decrement(&cart, id, ctx).await,
    };

    provider.unmount().await;
    result
}

fn show_cart(cart: &CartHandle, ctx: &Context) {
    let items = cart.products();
    let summary = cart.summary();

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "items": items, "summary": summary }));
        return;
    }

    ctx.output.header("Cart");

    if items.is_empty() {
        ctx.output.info("Cart is empty");
        return;
    }

    let widths = [12, 28, 5, 10, 10];
    ctx.output
        .table_row(&["ID", "TITLE", "QTY", "PRICE", "TOTAL"], &widths);
    for item in &items {
        ctx.output.table_row(
            &[
                item.id.as_str(),
                &item.title,
                &item.quantity.to_string(),
                &format_price(item.price),
                &format_price(item.total()),
            ],
            &widths,
        );
    }

    println!();
    ctx.output.kv("items", &summary.item_count.to_string());
    ctx.output.kv("subtotal", &format_price(summary.subtotal));
}

async fn add(cart: &CartHandle, product: Product, ctx: &Context) -> Result<()> {
    let id = product.id.clone();
    cart.add_to_cart(product).await?;
    report(cart, &id, ctx);
    Ok(())
}

async fn increment(cart: &CartHandle, id: String, ctx: &Context) -> Result<()> {
    let id = ProductId::from(id);
    cart.increment(id.clone()).await?;
    report(cart, &id, ctx);
    Ok(())
}

async fn decrement(cart: &CartHandle, id: String, ctx: &Context) -> Result<()> {
    let id = ProductId::from(id);
    cart.decrement(id.clone()).await?;
    report(cart, &id, ctx);
    Ok(())
}

/// Print where an item stands after a mutation.
fn report(cart: &CartHandle, id: &ProductId, ctx: &Context) {
    let state = cart.cart();
    let quantity = state.get(id).map(|item| item.quantity).unwrap_or(0);

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "id": id,
            "quantity": quantity,
            "summary": state.summary(),
        }));
        return;
    }

    if quantity == 0 {
        ctx.output.warn(&format!("{} is not in the cart", id));
    } else {
        ctx.output
            .success(&format!("{} now has quantity {}", id, quantity));
    }
    ctx.output
        .kv("subtotal", &format_price(state.summary().subtotal));
}
