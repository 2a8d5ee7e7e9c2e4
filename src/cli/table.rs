//! Plain-text renderings of a month sheet and its summaries.

use std::fmt::Write;

use crate::config::Config;
use crate::core::{CommodityLine, MonthLedger};
use crate::ledger::{
    calendar::{self, Clock},
    Commodity, LedgerKind, SupplementSummary, Totals,
};

use super::output::{format_quantity, stock_cell};

const CELL: usize = 10;

fn short_day(date: chrono::NaiveDate) -> &'static str {
    let name = calendar::day_name(date);
    name.get(..3).unwrap_or(name)
}

/// Day rows with every shown commodity's closing balance.
///
/// `>` marks the clock's current date and `~` marks Sundays.
pub fn render_month(ledger: &MonthLedger, kind: LedgerKind, config: &Config, clock: &dyn Clock) -> String {
    let commodities = kind.commodities();
    let mut out = String::new();

    let _ = write!(out, "  {:>3} {:<10} {:<3} {:>5} {:>5} {:<14}", "Day", "Date", "", "1-5", "6-8", "Category");
    for commodity in commodities {
        let _ = write!(out, " {:>CELL$}", commodity.key());
    }
    out.push('\n');

    for record in ledger.records() {
        let marker = if calendar::is_today(record.date, clock) {
            '>'
        } else if calendar::is_sunday(record.date) {
            '~'
        } else {
            ' '
        };
        let category = if record.flags.supplement && record.category.is_set() {
            format!("{}+", record.category)
        } else {
            record.category.to_string()
        };
        let _ = write!(
            out,
            "{marker} {:>3} {:<10} {:<3} {:>5} {:>5} {:<14}",
            record.day,
            calendar::format_display(record.date),
            short_day(record.date),
            record.counts.younger,
            record.counts.older,
            category,
        );
        for &commodity in commodities {
            let _ = write!(
                out,
                " {}",
                stock_cell(record.closing_stock.get(commodity), config.precision_for(commodity), CELL)
            );
        }
        out.push('\n');
    }
    out
}

pub fn render_commodity_lines(lines: &[CommodityLine], config: &Config) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:>CELL$} {:>CELL$} {:>CELL$} {:>CELL$} {:>CELL$}",
        "Commodity", "Received", "Served 1-5", "Served 6-8", "Served", "Month end"
    );
    for line in lines {
        let precision = config.precision_for(line.commodity);
        let _ = writeln!(
            out,
            "{:<12} {:>CELL$} {:>CELL$} {:>CELL$} {:>CELL$} {}",
            line.commodity.to_string(),
            format_quantity(line.received, precision),
            format_quantity(line.distributed_younger, precision),
            format_quantity(line.distributed_older, precision),
            format_quantity(line.distributed, precision),
            stock_cell(line.month_end, precision, CELL),
        );
    }
    out
}

pub fn render_attendance(totals: &Totals) -> String {
    let mut out = format!(
        "Attendance: {} (1-5) + {} (6-8) = {} over {} distribution days\n",
        totals.counts.younger,
        totals.counts.older,
        totals.counts.total(),
        totals.distribution_days
    );
    if !totals.shortfall_days.is_empty() {
        let days: Vec<String> = totals.shortfall_days.iter().map(u32::to_string).collect();
        let _ = writeln!(out, "Short on days: {}", days.join(", "));
    }
    out
}

pub fn render_supplements(summary: &SupplementSummary, config: &Config) -> String {
    let precision = config.precision_for(Commodity::Sugar);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:>8} {:>8} {:>CELL$} {:>CELL$} {:>CELL$}",
        "Payer", "Eggs", "Bananas", "Egg cost", "Fruit cost", "Total"
    );
    let rows = summary
        .by_payer
        .iter()
        .map(|(payer, line)| (payer.to_string(), line))
        .chain(std::iter::once(("TOTAL".to_string(), &summary.total)));
    for (label, line) in rows {
        let _ = writeln!(
            out,
            "{:<12} {:>8} {:>8} {:>CELL$} {:>CELL$} {:>CELL$}",
            label,
            line.eggs,
            line.bananas,
            format_quantity(line.egg_cost, precision),
            format_quantity(line.banana_cost, precision),
            format_quantity(line.total_cost(), precision),
        );
    }
    out
}
