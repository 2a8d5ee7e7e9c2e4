use serde::Serialize;

use super::commodity::{BandCounts, Quantities, TierQuantities};
use super::formula::{DistributionFormula, RateTable};
use super::record::DayRecord;

/// Grand totals for a month.
///
/// Opening and closing stock are per-day snapshots and are deliberately absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Totals {
    pub counts: BandCounts64,
    pub distributed_by_tier: TierQuantities,
    pub distributed: Quantities,
    pub received: Quantities,
    /// Days with a category set.
    pub distribution_days: u32,
    /// Day numbers whose closing stock went negative for a stocked commodity.
    pub shortfall_days: Vec<u32>,
}

/// Head counts summed over a month; wider than a single day's counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BandCounts64 {
    pub younger: u64,
    pub older: u64,
}

impl BandCounts64 {
    fn add(&mut self, counts: &BandCounts) {
        self.younger += counts.younger as u64;
        self.older += counts.older as u64;
    }

    pub fn total(&self) -> u64 {
        self.younger + self.older
    }
}

impl Totals {
    pub fn is_zero(&self) -> bool {
        self.counts.total() == 0
            && self.distributed.is_zero()
            && self.received.is_zero()
            && self.distribution_days == 0
    }
}

pub fn aggregate(sequence: &[DayRecord]) -> Totals {
    aggregate_with(&RateTable::default(), sequence)
}

/// Folds the month left to right. Distribution is re-derived from each day's
/// inputs so the totals never depend on whether a pass has run.
pub fn aggregate_with<F>(formula: &F, sequence: &[DayRecord]) -> Totals
where
    F: DistributionFormula + ?Sized,
{
    sequence.iter().fold(Totals::default(), |mut acc, record| {
        acc.counts.add(&record.counts);
        let split = formula.distribute_day(record);
        acc.distributed_by_tier.younger += split.younger;
        acc.distributed_by_tier.older += split.older;
        acc.distributed += split.combined();
        acc.received += record.added_stock;
        if record.category.is_set() {
            acc.distribution_days += 1;
        }
        if record.has_shortfall() {
            acc.shortfall_days.push(record.day);
        }
        acc
    })
}
