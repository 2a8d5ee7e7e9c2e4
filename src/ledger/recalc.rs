//! Forward recalculation of the opening → closing stock chain.
//!
//! Days hold no reference to their neighbours; adjacency is the slice index.
//! Any edit to day `d` invalidates `d` and everything after it, so a pass
//! always runs from the edited index to the end of the month.

use super::commodity::Quantities;
use super::formula::{DistributionFormula, RateTable};
use super::record::DayRecord;
use crate::errors::{LedgerError, Result};

/// Recomputes days `[from_index, end)` with the default rate table and
/// returns the new sequence. The input is left untouched.
pub fn recalculate_from(sequence: &[DayRecord], from_index: usize) -> Result<Vec<DayRecord>> {
    recalculate_from_with(&RateTable::default(), sequence, from_index)
}

pub fn recalculate_from_with<F>(
    formula: &F,
    sequence: &[DayRecord],
    from_index: usize,
) -> Result<Vec<DayRecord>>
where
    F: DistributionFormula + ?Sized,
{
    let mut next = sequence.to_vec();
    recalculate_in_place(formula, &mut next, from_index)?;
    Ok(next)
}

/// Recomputes a caller-owned buffer. Only `records[from_index..]` is
/// written; the bounds check happens before any mutation.
pub fn recalculate_in_place<F>(
    formula: &F,
    records: &mut [DayRecord],
    from_index: usize,
) -> Result<()>
where
    F: DistributionFormula + ?Sized,
{
    let len = records.len();
    if from_index >= len {
        return Err(LedgerError::IndexOutOfRange {
            index: from_index,
            len,
        });
    }

    let span = tracing::debug_span!("recalculate", from = from_index, to = len - 1);
    let _guard = span.enter();

    let mut carried: Option<Quantities> = if from_index == 0 {
        None
    } else {
        Some(records[from_index - 1].closing_stock)
    };

    for record in &mut records[from_index..] {
        if let Some(previous_closing) = carried {
            record.opening_stock = previous_closing;
        }
        let split = formula.distribute_day(record);
        record.distributed_by_tier = split;
        record.distributed_stock = split.combined();
        record.total_stock = record.opening_stock + record.added_stock;
        record.closing_stock = record.total_stock - record.distributed_stock;
        carried = Some(record.closing_stock);
    }

    let shortfalls = records[from_index..]
        .iter()
        .filter(|r| r.has_shortfall())
        .count();
    if shortfalls > 0 {
        tracing::debug!(shortfalls, "negative closing stock after recalculation");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::category::{Category, Flags};
    use crate::ledger::commodity::{BandTier, Commodity};
    use crate::ledger::scaffold::build_month;
    use chrono::Weekday;

    fn sample_month() -> Vec<DayRecord> {
        let mut month = build_month(2024, 6, &[]).unwrap();
        month[0].opening_stock.set(Commodity::Rice, 50.0);
        month[0].opening_stock.set(Commodity::Oil, 3.0);
        for record in month.iter_mut().take(10) {
            record.category = Category::RICE;
            record.counts.younger = 20 + record.day;
            record.counts.older = 10;
        }
        month[0].added_stock.set(Commodity::Rice, 20.0);
        month[6].added_stock.set(Commodity::Rice, 15.5);
        month
    }

    fn assert_chain(records: &[DayRecord]) {
        for pair in records.windows(2) {
            assert_eq!(pair[1].opening_stock, pair[0].closing_stock, "day {}", pair[1].day);
        }
    }

    #[test]
    fn chain_holds_after_full_pass() {
        let computed = recalculate_from(&sample_month(), 0).unwrap();
        assert_chain(&computed);
        let first = &computed[0];
        assert_eq!(
            first.closing_stock.get(Commodity::Rice),
            50.0 + 20.0 - first.distributed_stock.get(Commodity::Rice)
        );
    }

    #[test]
    fn closing_equals_opening_plus_added_minus_distributed() {
        let computed = recalculate_from(&sample_month(), 0).unwrap();
        for record in &computed {
            for commodity in Commodity::ALL {
                let expected = record.opening_stock.get(commodity) + record.added_stock.get(commodity)
                    - record.distributed_stock.get(commodity);
                assert_eq!(record.closing_stock.get(commodity), expected);
            }
        }
    }

    #[test]
    fn input_sequence_is_not_mutated() {
        let original = sample_month();
        let snapshot = original.clone();
        let _ = recalculate_from(&original, 0).unwrap();
        assert_eq!(original, snapshot);
    }

    #[test]
    fn days_before_index_are_untouched() {
        let computed = recalculate_from(&sample_month(), 0).unwrap();
        let mut edited = computed.clone();
        edited[4].counts.younger = 500;
        let redone = recalculate_from(&edited, 4).unwrap();
        assert_eq!(&redone[..4], &computed[..4]);
        assert_ne!(redone[4].closing_stock, computed[4].closing_stock);
        assert_chain(&redone);
    }

    #[test]
    fn recalculation_is_idempotent() {
        let once = recalculate_from(&sample_month(), 3).unwrap();
        let twice = recalculate_from(&once, 3).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn last_index_recomputes_only_last_day() {
        let computed = recalculate_from(&sample_month(), 0).unwrap();
        let mut edited = computed.clone();
        let last = edited.len() - 1;
        edited[last].added_stock.set(Commodity::Wheat, 4.0);
        let redone = recalculate_from(&edited, last).unwrap();
        assert_eq!(&redone[..last], &computed[..last]);
        assert_eq!(redone[last].closing_stock.get(Commodity::Wheat), 4.0);
    }

    #[test]
    fn negative_closing_is_reported_not_clamped() {
        let mut month = build_month(2024, 6, &[]).unwrap();
        month[0].category = Category::WHEAT;
        month[0].counts.older = 100;
        let computed = recalculate_from(&month, 0).unwrap();
        assert!(computed[0].closing_stock.get(Commodity::Wheat) < 0.0);
        assert_eq!(
            computed[1].opening_stock.get(Commodity::Wheat),
            computed[0].closing_stock.get(Commodity::Wheat)
        );
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let month = sample_month();
        let err = recalculate_from(&month, month.len()).unwrap_err();
        assert!(matches!(err, LedgerError::IndexOutOfRange { index: 30, len: 30 }));
        assert!(recalculate_from(&[], 0).is_err());
    }

    #[test]
    fn custom_formula_plugs_into_engine() {
        struct Flat;
        impl DistributionFormula for Flat {
            fn distribute(
                &self,
                count: u32,
                _category: Category,
                _flags: Flags,
                _tier: BandTier,
                _weekday: Weekday,
            ) -> Quantities {
                Quantities::from_pairs([(Commodity::Sugar, count as f64)])
            }
        }
        let mut month = build_month(2024, 6, &[]).unwrap();
        month[0].counts = crate::ledger::BandCounts::new(2, 3);
        let computed = recalculate_from_with(&Flat, &month, 0).unwrap();
        assert_eq!(computed[0].distributed_stock.get(Commodity::Sugar), 5.0);
        assert_eq!(computed[29].opening_stock.get(Commodity::Sugar), -5.0);
    }

    #[test]
    fn overflow_does_not_spread_infinity() {
        let mut month = build_month(2024, 6, &[]).unwrap();
        month[0].opening_stock.set(Commodity::Rice, 1e308);
        month[0].added_stock.set(Commodity::Rice, 1e308);
        let recalculated = recalculate_from(&month, 0).unwrap();
        for record in &recalculated {
            assert!(record.total_stock.get(Commodity::Rice).is_finite());
            assert!(record.closing_stock.get(Commodity::Rice).is_finite());
        }
        assert_chain(&recalculated);
    }
}
