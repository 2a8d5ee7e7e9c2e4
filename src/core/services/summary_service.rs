//! Presentation-facing summaries built on top of the month aggregate.

use serde::Serialize;

use crate::core::MonthLedger;
use crate::ledger::{
    summarize_supplements, BandTier, Commodity, LedgerKind, SupplementRecord, SupplementSummary,
    Totals,
};

/// One commodity row of a month summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CommodityLine {
    pub commodity: Commodity,
    pub received: f64,
    pub distributed_younger: f64,
    pub distributed_older: f64,
    pub distributed: f64,
    /// Closing balance of the last day of the month.
    pub month_end: f64,
}

pub struct SummaryService;

impl SummaryService {
    pub fn month_totals(ledger: &MonthLedger) -> Totals {
        ledger.totals()
    }

    /// Rows for the commodities a sheet of `kind` shows, in display order.
    pub fn commodity_lines(ledger: &MonthLedger, kind: LedgerKind) -> Vec<CommodityLine> {
        let totals = ledger.totals();
        let month_end = ledger
            .records()
            .last()
            .map(|record| record.closing_stock)
            .unwrap_or_default();
        kind.commodities()
            .iter()
            .map(|&commodity| CommodityLine {
                commodity,
                received: totals.received.get(commodity),
                distributed_younger: totals
                    .distributed_by_tier
                    .get(BandTier::Younger)
                    .get(commodity),
                distributed_older: totals.distributed_by_tier.get(BandTier::Older).get(commodity),
                distributed: totals.distributed.get(commodity),
                month_end: month_end.get(commodity),
            })
            .collect()
    }

    pub fn supplements(records: &[SupplementRecord]) -> SupplementSummary {
        summarize_supplements(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{BandCounts, Category};

    #[test]
    fn commodity_lines_follow_sheet_kind() {
        let mut ledger = MonthLedger::open(2024, 6, &[]).unwrap();
        ledger.set_counts(3, BandCounts::new(100, 0)).unwrap();
        ledger.set_category(3, Category::ONLY_MILK).unwrap();
        ledger.set_added(1, Commodity::MilkPowder, 10.0).unwrap();

        let lines = SummaryService::commodity_lines(&ledger, LedgerKind::Dairy);
        assert_eq!(lines.len(), 3);
        let milk = lines[0];
        assert_eq!(milk.commodity, Commodity::MilkPowder);
        assert_eq!(milk.received, 10.0);
        assert!((milk.distributed - 1.8).abs() < 1e-9);
        assert!((milk.month_end - 8.2).abs() < 1e-9);
        assert_eq!(milk.distributed_older, 0.0);
    }

    #[test]
    fn month_totals_match_ledger_totals() {
        let ledger = MonthLedger::open(2024, 2, &[]).unwrap();
        assert_eq!(SummaryService::month_totals(&ledger), ledger.totals());
    }
}
