//! Console fill summary.
//!
//! Pure reporting sink: nothing downstream consumes this output.

use snipe_core::OrderReport;
use std::fmt::Write;

/// Render the tabular order summary shown after a completed sale.
#[must_use]
pub fn format_order_report(report: &OrderReport) -> String {
    let rule = "-".repeat(37);
    let mut out = String::new();

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Symbol       : {}", report.symbol);
    let _ = writeln!(out, "Order ID     : {}", report.order_id);
    let _ = writeln!(out, "Status       : {}", report.status);
    let _ = writeln!(out, "Type         : {}", report.order_type);
    let _ = writeln!(out, "Side         : {}", report.side);
    let _ = writeln!(out, "Quantity     : {}", report.orig_qty);
    let _ = writeln!(out, "Price        : {}", report.price);
    let _ = writeln!(out, "Filled Qty   : {}", report.executed_qty);
    let _ = writeln!(out, "Total Quote  : {}", report.cumulative_quote_qty);
    let _ = writeln!(out, "Time in Force: {}", report.time_in_force);
    let _ = writeln!(out);
    let _ = writeln!(out, "Fills:");
    for fill in &report.fills {
        let _ = writeln!(
            out,
            "  - Price: {}, Qty: {}, Commission: {} {}",
            fill.price, fill.qty, fill.commission, fill.commission_asset
        );
    }
    let _ = write!(out, "{rule}");
    out
}

/// Print the summary to stdout.
pub fn print_order_report(report: &OrderReport) {
    println!("{}", format_order_report(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use snipe_core::{Fill, OrderSide, OrderStatus, OrderType, Price, Qty, TimeInForce};

    fn filled_report() -> OrderReport {
        OrderReport {
            symbol: "ALTUSDT".to_string(),
            order_id: 28,
            client_order_id: "cid".to_string(),
            status: OrderStatus::Filled,
            order_type: OrderType::Limit,
            side: OrderSide::Sell,
            price: Price::new(dec!(99.00)),
            orig_qty: Qty::new(dec!(100)),
            executed_qty: Qty::new(dec!(100)),
            cumulative_quote_qty: dec!(9900.00),
            time_in_force: TimeInForce::Gtc,
            fills: vec![Fill {
                price: Price::new(dec!(99.00)),
                qty: Qty::new(dec!(100)),
                commission: dec!(9.90),
                commission_asset: "USDT".to_string(),
            }],
        }
    }

    #[test]
    fn test_report_carries_every_field() {
        let text = format_order_report(&filled_report());
        assert!(text.contains("Symbol       : ALTUSDT"));
        assert!(text.contains("Order ID     : 28"));
        assert!(text.contains("Status       : FILLED"));
        assert!(text.contains("Type         : LIMIT"));
        assert!(text.contains("Side         : SELL"));
        assert!(text.contains("Quantity     : 100"));
        assert!(text.contains("Price        : 99.00"));
        assert!(text.contains("Filled Qty   : 100"));
        assert!(text.contains("Total Quote  : 9900.00"));
        assert!(text.contains("Time in Force: GTC"));
        assert!(text.contains("Commission: 9.90 USDT"));
    }

    #[test]
    fn test_report_without_fills() {
        let mut report = filled_report();
        report.fills.clear();
        let text = format_order_report(&report);
        assert!(text.contains("Fills:"));
        assert!(!text.contains("Commission:"));
    }
}
