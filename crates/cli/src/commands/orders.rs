//! Order browsing commands.
//!
//! # Usage
//!
//! ```bash
//! bloom orders list
//! bloom orders show ORD0001
//! ```

use bloom_admin::{DisplayFormat, OrderDirectory};
use bloom_core::{CurrencyCode, OrderId};
use bloom_storefront::ApiClient;

use super::output::{flush_notices, order_detail, order_table};
use super::{CommandError, Context};

fn directory(ctx: &Context) -> Result<OrderDirectory<ApiClient>, CommandError> {
    let format = DisplayFormat::new(CurrencyCode::LKR, ctx.config.date_format.clone())?;
    Ok(OrderDirectory::new(
        ctx.api.clone(),
        ctx.session.clone(),
        ctx.notifier(),
        format,
    ))
}

/// List every visible order.
pub async fn list(ctx: &Context) -> Result<(), CommandError> {
    let mut directory = directory(ctx)?;
    let loaded = directory.list_orders().await.map(|_| ());
    flush_notices(&ctx.notices);
    loaded?;

    order_table(&directory.rows(), directory.format().currency());
    Ok(())
}

/// Show one order in detail.
pub async fn show(ctx: &Context, order_id: &str) -> Result<(), CommandError> {
    let mut directory = directory(ctx)?;
    let loaded = directory.list_orders().await.map(|_| ());
    flush_notices(&ctx.notices);
    loaded?;

    if !directory.select_by_id(&OrderId::new(order_id)) {
        return Err(CommandError::OrderNotFound(order_id.to_string()));
    }
    if let Some(view) = directory.active_detail() {
        order_detail(&view);
    }
    directory.clear_selection();
    Ok(())
}
