//! Text rendering of the status and summary views.

use std::fmt::Write;

use actors::{BotSnapshot, Snapshot};
use chrono::Local;
use dispatch_core::{BotStatus, DispatchStats, Order, OrderClass, OrderStatus};

const WIDE_RULE: usize = 50;

fn order_line(out: &mut String, order: &Order) {
    let _ = write!(out, "  Order #{} - Status: {}", order.id, order.status);
    match (order.status, order.completed_at) {
        (OrderStatus::Processing, _) => out.push_str(" Processing..."),
        (OrderStatus::Complete, Some(at)) => {
            let _ = write!(
                out,
                " (Completed at: {})",
                at.with_timezone(&Local).format("%H:%M:%S")
            );
        }
        _ => {}
    }
    out.push('\n');
}

fn bot_line(out: &mut String, bot: &BotSnapshot) {
    let _ = write!(out, "  Bot #{} - Status: {}", bot.id, bot.status);
    if bot.status == BotStatus::Processing
        && let Some(order) = &bot.current_order
    {
        let _ = write!(out, " (Processing Order #{})", order.id);
    }
    out.push('\n');
}

fn order_section(out: &mut String, title: &str, empty: &str, orders: &[&Order]) {
    let _ = writeln!(out, "\n{}:", title);
    if orders.is_empty() {
        let _ = writeln!(out, "  {}", empty);
    }
    for order in orders {
        order_line(out, order);
    }
}

fn bot_section(out: &mut String, title: &str, empty: &str, bots: &[BotSnapshot]) {
    let _ = writeln!(out, "\n{}:", title);
    if bots.is_empty() {
        let _ = writeln!(out, "  {}", empty);
    }
    for bot in bots {
        bot_line(out, bot);
    }
}

fn by_class(snapshot: &Snapshot, class: OrderClass) -> Vec<&Order> {
    snapshot.orders.iter().filter(|o| o.class == class).collect()
}

/// Current queues and bots.
pub fn render_status(snapshot: &Snapshot) -> String {
    let rule = "-".repeat(WIDE_RULE);
    let mut out = String::new();
    let _ = writeln!(out, "\n{}\nCURRENT STATUS\n{}", rule, rule);

    order_section(
        &mut out,
        "VIP Orders",
        "(No VIP orders)",
        &by_class(snapshot, OrderClass::Vip),
    );
    order_section(
        &mut out,
        "Normal Orders",
        "(No Normal orders)",
        &by_class(snapshot, OrderClass::Normal),
    );
    bot_section(&mut out, "Bots", "(No bots)", &snapshot.bots);

    let pending = snapshot.orders.iter().filter(|o| o.is_pending()).count();
    let _ = writeln!(out, "\nPending Orders: {}\n{}", pending, rule);
    out
}

/// Totals followed by every order and bot.
pub fn render_summary(snapshot: &Snapshot, stats: &DispatchStats) -> String {
    let rule = "=".repeat(WIDE_RULE);
    let mut out = String::new();
    let _ = writeln!(out, "\n{}\nSYSTEM SUMMARY\n{}", rule, rule);

    let _ = writeln!(out, "\nTotal Orders: {}", stats.total_orders());
    let _ = writeln!(out, "Total Bots: {}", stats.total_bots());

    let _ = writeln!(out, "\nOrder Status Summary:");
    let _ = writeln!(out, "  {}: {}", OrderStatus::Pending, stats.pending);
    let _ = writeln!(out, "  {}: {}", OrderStatus::Processing, stats.processing);
    let _ = writeln!(out, "  {}: {}", OrderStatus::Complete, stats.complete);

    let _ = writeln!(out, "\nOrder Type Summary:");
    let _ = writeln!(out, "  {}: {}", OrderClass::Normal, stats.normal);
    let _ = writeln!(out, "  {}: {}", OrderClass::Vip, stats.vip);

    let _ = writeln!(out, "\nBot Status Summary:");
    let _ = writeln!(out, "  {}: {}", BotStatus::Idle, stats.idle_bots);
    let _ = writeln!(out, "  {}: {}", BotStatus::Processing, stats.busy_bots);

    order_section(
        &mut out,
        "All VIP Orders",
        "(None)",
        &by_class(snapshot, OrderClass::Vip),
    );
    order_section(
        &mut out,
        "All Normal Orders",
        "(None)",
        &by_class(snapshot, OrderClass::Normal),
    );
    bot_section(&mut out, "All Bots", "(None)", &snapshot.bots);

    let _ = writeln!(out, "{}", rule);
    out
}
