use crate::errors::{LedgerError, Result};
use crate::ledger::{
    aggregate_with, build_month, numeric, recalculate_in_place, BandCounts, BandTier, Category,
    Commodity, DayRecord, Flags, RateTable, SparseRecord, Totals,
};

/// Facade that owns one month's day sequence and keeps it recalculated.
///
/// Every edit mutates exactly one day's inputs and then runs a pass from that
/// day to the end of the month, so the stock chain holds after each call.
#[derive(Debug, Clone)]
pub struct MonthLedger {
    year: i32,
    month: u32,
    rates: RateTable,
    records: Vec<DayRecord>,
}

impl MonthLedger {
    pub fn open(year: i32, month: u32, sparse: &[SparseRecord]) -> Result<Self> {
        Self::open_with(RateTable::default(), year, month, sparse)
    }

    pub fn open_with(rates: RateTable, year: i32, month: u32, sparse: &[SparseRecord]) -> Result<Self> {
        let mut ledger = Self {
            year,
            month,
            rates,
            records: Vec::new(),
        };
        ledger.select_month(year, month, sparse)?;
        Ok(ledger)
    }

    /// Discards the current sequence and rebuilds it for another month.
    pub fn select_month(&mut self, year: i32, month: u32, sparse: &[SparseRecord]) -> Result<()> {
        let mut records = build_month(year, month, sparse)?;
        recalculate_in_place(&self.rates, &mut records, 0)?;
        tracing::info!(year, month, days = records.len(), "month ledger opened");
        self.year = year;
        self.month = month;
        self.records = records;
        Ok(())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn records(&self) -> &[DayRecord] {
        &self.records
    }

    pub fn record(&self, day: u32) -> Option<&DayRecord> {
        day.checked_sub(1)
            .and_then(|idx| self.records.get(idx as usize))
    }

    pub fn totals(&self) -> Totals {
        aggregate_with(&self.rates, &self.records)
    }

    pub fn set_counts(&mut self, day: u32, counts: BandCounts) -> Result<()> {
        self.edit(day, |record| record.counts = counts)
    }

    pub fn set_count(&mut self, day: u32, tier: BandTier, count: u32) -> Result<()> {
        self.edit(day, |record| record.counts.set(tier, count))
    }

    pub fn set_category(&mut self, day: u32, category: Category) -> Result<()> {
        self.edit(day, |record| record.category = category)
    }

    pub fn set_flags(&mut self, day: u32, flags: Flags) -> Result<()> {
        self.edit(day, |record| record.flags = flags)
    }

    /// Negative receipts are stored as zero.
    pub fn set_added(&mut self, day: u32, commodity: Commodity, quantity: f64) -> Result<()> {
        let quantity = numeric::sanitize(quantity).max(0.0);
        self.edit(day, |record| record.added_stock.set(commodity, quantity))
    }

    /// Day 1's opening balance is the only user-entered opening value.
    pub fn set_opening(&mut self, commodity: Commodity, quantity: f64) -> Result<()> {
        let quantity = numeric::sanitize(quantity);
        self.edit(1, |record| record.opening_stock.set(commodity, quantity))
    }

    /// Persistence view of the month with derived fields stripped.
    pub fn to_sparse(&self) -> Vec<SparseRecord> {
        self.records.iter().map(DayRecord::to_sparse).collect()
    }

    fn edit<F>(&mut self, day: u32, apply: F) -> Result<()>
    where
        F: FnOnce(&mut DayRecord),
    {
        let len = self.records.len();
        let index = day
            .checked_sub(1)
            .map(|idx| idx as usize)
            .filter(|idx| *idx < len)
            .ok_or(LedgerError::DayOutOfRange { day, len })?;
        apply(&mut self.records[index]);
        recalculate_in_place(&self.rates, &mut self.records, index)
    }
}
