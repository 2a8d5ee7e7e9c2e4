use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Duration, NaiveDate};

use super::calendar::{days_in_month, first_of_month};
use super::category::{Category, Flags};
use super::commodity::{BandCounts, BandTier, Quantities};
use super::record::{DayRecord, SparseRecord};
use crate::errors::Result;

/// Rows sharing one date, keyed by the stock-sheet grade they carry.
type DayRows<'a> = BTreeMap<Option<BandTier>, &'a SparseRecord>;

/// Builds a gap-free, day-ordered sequence covering every day of the month.
///
/// Sparse records are matched by calendar date, never by position. Missing
/// days become all-default records; missing fields within a matched record
/// default to zero, [`Category::Unset`], or `false`. Stock-sheet rows for
/// different grades of the same date are summed into that day's stock.
/// Derived stock fields are left at zero for the recalculation engine to fill.
pub fn build_month(year: i32, month: u32, sparse: &[SparseRecord]) -> Result<Vec<DayRecord>> {
    let first = first_of_month(year, month)?;
    let length = days_in_month(year, month)?;

    let mut by_date: HashMap<NaiveDate, DayRows<'_>> = HashMap::with_capacity(sparse.len());
    for record in sparse {
        let Some(date) = record.date else {
            tracing::debug!("sparse record without a usable date skipped");
            continue;
        };
        if date.year() != year || date.month() != month {
            tracing::debug!(%date, "sparse record outside {year}-{month:02} ignored");
            continue;
        }
        let rows = by_date.entry(date).or_default();
        if rows.insert(record.grade, record).is_some() {
            tracing::warn!(%date, "duplicate sparse record; the later one wins");
        }
    }

    let records = (0..length)
        .map(|offset| {
            let date = first + Duration::days(offset as i64);
            let day = offset + 1;
            match by_date.get(&date) {
                Some(rows) => merge(day, date, rows),
                None => DayRecord::new(day, date),
            }
        })
        .collect();
    Ok(records)
}

fn merge(day: u32, date: NaiveDate, rows: &DayRows<'_>) -> DayRecord {
    let mut record = DayRecord::new(day, date);
    let Some(base) = rows.get(&None).or_else(|| rows.values().next_back()) else {
        return record;
    };
    record.counts = BandCounts::new(
        base.younger_count.unwrap_or(0),
        base.older_count.unwrap_or(0),
    );
    record.category = base.category.unwrap_or(Category::Unset);
    record.flags = Flags {
        supplement: base.supplement.unwrap_or(false),
    };
    record.added_stock = rows
        .values()
        .fold(Quantities::zero(), |sum, row| sum + row.resolved_added())
        .clamp_non_negative();
    if record.is_first_day() {
        record.opening_stock = rows
            .values()
            .fold(Quantities::zero(), |sum, row| sum + row.resolved_opening());
    }
    record
}
