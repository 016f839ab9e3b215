//! Terminal rendering of view models.

#![allow(clippy::print_stdout)]

use bloom_admin::{OrderDetailView, OrderRow};
use bloom_core::{CurrencyCode, Price, Product};
use bloom_storefront::search::SearchSnapshot;
use bloom_storefront::{Notice, NoticeLevel, NoticeLog};

/// Print and drain every recorded notice.
pub fn flush_notices(log: &NoticeLog) {
    for Notice { level, message } in log.take() {
        match level {
            NoticeLevel::Success => println!("✔ {message}"),
            NoticeLevel::Error => println!("✘ {message}"),
        }
    }
}

pub fn search_results(snapshot: &SearchSnapshot) {
    if snapshot.results.is_empty() {
        println!("No products found for \"{}\".", snapshot.query);
        return;
    }
    println!("Results for \"{}\":", snapshot.query);
    for product in &snapshot.results {
        println!("  {}", product_line(product));
    }
}

fn product_line(product: &Product) -> String {
    let price = product.price_or_zero(CurrencyCode::LKR);
    let line = format!("{:<12} {}  {}", product.product_id, product.name, price);
    if product.is_discounted() {
        let labelled = Price::non_negative(product.labelled_price, CurrencyCode::LKR);
        return format!("{line} (was {labelled})");
    }
    line
}

pub fn order_table(rows: &[OrderRow], currency: CurrencyCode) {
    if rows.is_empty() {
        println!("No orders.");
        return;
    }
    let total = format!("TOTAL ({})", currency.code());
    println!(
        "{:<10} {:<20} {:<28} {:>12} {:<10} {:<12}",
        "ORDER", "NAME", "EMAIL", total, "DATE", "STATUS"
    );
    for row in rows {
        println!(
            "{:<10} {:<20} {:<28} {:>12} {:<10} {:<12}",
            row.order_id, row.name, row.email, row.total, row.date, row.status.label
        );
    }
}

pub fn order_detail(view: &OrderDetailView) {
    println!("Order Details - {}", view.order_id);
    println!("  Status:   {}", view.status.label);
    println!("  Date:     {}", view.date);
    println!("  Customer: {}", view.name);
    println!("  Email:    {}", view.email);
    println!("  Phone:    {}", view.phone);
    println!("  Address:  {}", view.address);
    match &view.labelled_total {
        Some(labelled) => println!("  Total:    {} (was {labelled})", view.total),
        None => println!("  Total:    {}", view.total),
    }

    let Some(lines) = &view.products else {
        return;
    };
    println!();
    println!("  Products:");
    for line in lines {
        println!(
            "    {:<24} {} x {} = {}",
            if line.name.is_empty() { "(unknown product)" } else { &line.name },
            line.unit_price,
            line.quantity,
            line.subtotal
        );
    }
    println!("  Items total: {}", view.lines_total);
}
