//! Per-head distribution formulas.
//!
//! All outputs keep full `f64` precision; rounding belongs to presentation.

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::calendar::{day_of_week, is_secondary_day};
use super::category::{Category, DairyPlan, Flags, Staple};
use super::commodity::{BandTier, Commodity, Quantities, TierQuantities};
use super::record::DayRecord;

/// Per-head rates for one band tier of the meal sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StapleRates {
    /// Applied to whichever staple the category selects.
    pub staple: f64,
    pub oil: f64,
    pub pulses: f64,
    pub overhead: f64,
}

/// Flat per-head rates of the dairy sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DairyRates {
    pub milk_powder: f64,
    pub ragi: f64,
    pub sugar: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateTable {
    pub younger: StapleRates,
    pub older: StapleRates,
    pub dairy: DairyRates,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            younger: StapleRates {
                staple: 0.1,
                oil: 0.005,
                pulses: 0.02,
                overhead: 2.15,
            },
            older: StapleRates {
                staple: 0.15,
                oil: 0.0075,
                pulses: 0.03,
                overhead: 3.12,
            },
            dairy: DairyRates {
                milk_powder: 0.018,
                ragi: 0.005,
                sugar: 0.44,
            },
        }
    }
}

impl RateTable {
    pub fn staple_rates(&self, tier: BandTier) -> &StapleRates {
        match tier {
            BandTier::Younger => &self.younger,
            BandTier::Older => &self.older,
        }
    }

    fn staple_quantities(&self, count: f64, staple: Staple, flags: Flags, tier: BandTier) -> Quantities {
        let rates = self.staple_rates(tier);
        let mut out = Quantities::zero();
        let staple_commodity = match staple {
            Staple::Rice => Commodity::Rice,
            Staple::Wheat => Commodity::Wheat,
        };
        out.set(staple_commodity, count * rates.staple);
        out.set(Commodity::Oil, count * rates.oil);
        if flags.supplement {
            out.set(Commodity::Pulses, count * rates.pulses);
        }
        out.set(Commodity::Overhead, count * rates.overhead);
        out
    }

    fn dairy_quantities(&self, count: f64, plan: DairyPlan, weekday: Weekday) -> Quantities {
        let rates = &self.dairy;
        let mut out = Quantities::zero();
        out.set(Commodity::MilkPowder, count * rates.milk_powder);
        if plan == DairyPlan::MilkAndRagi && is_secondary_day(weekday) {
            out.set(Commodity::Ragi, count * rates.ragi);
        }
        out.set(Commodity::Sugar, count * rates.sugar);
        out
    }
}

/// Seam between the recalculation engine and the rate tables.
pub trait DistributionFormula {
    /// Quantities handed out to `count` beneficiaries of one tier on one day.
    fn distribute(
        &self,
        count: u32,
        category: Category,
        flags: Flags,
        tier: BandTier,
        weekday: Weekday,
    ) -> Quantities;

    /// Per-tier distribution for a whole day record.
    fn distribute_day(&self, record: &DayRecord) -> TierQuantities {
        let weekday = day_of_week(record.date);
        let mut split = TierQuantities::default();
        for tier in BandTier::ALL {
            *split.get_mut(tier) = self.distribute(
                record.counts.get(tier),
                record.category,
                record.flags,
                tier,
                weekday,
            );
        }
        split
    }
}

impl DistributionFormula for RateTable {
    fn distribute(
        &self,
        count: u32,
        category: Category,
        flags: Flags,
        tier: BandTier,
        weekday: Weekday,
    ) -> Quantities {
        let count = count as f64;
        match category {
            Category::Unset => Quantities::zero(),
            Category::Staple(staple) => self.staple_quantities(count, staple, flags, tier),
            Category::Dairy(plan) => self.dairy_quantities(count, plan, weekday),
        }
    }
}

/// Distributes with the default rate table.
pub fn distribute(
    count: u32,
    category: Category,
    flags: Flags,
    tier: BandTier,
    weekday: Weekday,
) -> Quantities {
    RateTable::default().distribute(count, category, flags, tier, weekday)
}

/// Which sheet a month belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerKind {
    #[default]
    Meal,
    Dairy,
}

impl LedgerKind {
    /// Commodities shown for this kind of sheet.
    pub fn commodities(&self) -> &'static [Commodity] {
        match self {
            LedgerKind::Meal => &[
                Commodity::Rice,
                Commodity::Wheat,
                Commodity::Oil,
                Commodity::Pulses,
                Commodity::Overhead,
            ],
            LedgerKind::Dairy => &[Commodity::MilkPowder, Commodity::Ragi, Commodity::Sugar],
        }
    }

    /// Categories a user may pick on this kind of sheet.
    pub fn categories(&self) -> &'static [Category] {
        match self {
            LedgerKind::Meal => &[Category::Unset, Category::RICE, Category::WHEAT],
            LedgerKind::Dairy => &[Category::Unset, Category::MILK_AND_RAGI, Category::ONLY_MILK],
        }
    }

    pub fn from_label(value: &str) -> Option<LedgerKind> {
        match value.trim().to_ascii_lowercase().as_str() {
            "meal" | "meals" => Some(LedgerKind::Meal),
            "dairy" | "milk" => Some(LedgerKind::Dairy),
            _ => None,
        }
    }
}

impl fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerKind::Meal => f.write_str("meal"),
            LedgerKind::Dairy => f.write_str("dairy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn unset_category_distributes_nothing() {
        for tier in BandTier::ALL {
            let q = distribute(250, Category::Unset, Flags::with_supplement(), tier, Weekday::Mon);
            assert!(q.is_zero());
        }
    }

    #[test]
    fn younger_rice_without_pulses() {
        let q = distribute(100, Category::RICE, Flags::default(), BandTier::Younger, Weekday::Tue);
        assert!(approx(q.get(Commodity::Rice), 10.0));
        assert_eq!(q.get(Commodity::Wheat), 0.0);
        assert!(approx(q.get(Commodity::Oil), 0.5));
        assert_eq!(q.get(Commodity::Pulses), 0.0);
        assert!(approx(q.get(Commodity::Overhead), 215.0));
    }

    #[test]
    fn older_wheat_with_pulses() {
        let q = distribute(40, Category::WHEAT, Flags::with_supplement(), BandTier::Older, Weekday::Thu);
        assert_eq!(q.get(Commodity::Rice), 0.0);
        assert!(approx(q.get(Commodity::Wheat), 6.0));
        assert!(approx(q.get(Commodity::Oil), 0.3));
        assert!(approx(q.get(Commodity::Pulses), 1.2));
        assert!(approx(q.get(Commodity::Overhead), 124.8));
    }

    #[test]
    fn sunday_rows_are_still_computed() {
        let q = distribute(10, Category::RICE, Flags::default(), BandTier::Younger, Weekday::Sun);
        assert!(approx(q.get(Commodity::Rice), 1.0));
    }

    #[test]
    fn ragi_only_on_secondary_days_with_plan() {
        let monday = distribute(100, Category::MILK_AND_RAGI, Flags::default(), BandTier::Younger, Weekday::Mon);
        assert!(approx(monday.get(Commodity::Ragi), 0.5));
        assert!(approx(monday.get(Commodity::MilkPowder), 1.8));
        assert!(approx(monday.get(Commodity::Sugar), 44.0));

        let tuesday = distribute(100, Category::MILK_AND_RAGI, Flags::default(), BandTier::Younger, Weekday::Tue);
        assert_eq!(tuesday.get(Commodity::Ragi), 0.0);
        assert!(approx(tuesday.get(Commodity::MilkPowder), 1.8));

        let only_milk = distribute(100, Category::ONLY_MILK, Flags::default(), BandTier::Younger, Weekday::Fri);
        assert_eq!(only_milk.get(Commodity::Ragi), 0.0);
    }

    #[test]
    fn dairy_rates_ignore_tier() {
        let young = distribute(30, Category::ONLY_MILK, Flags::default(), BandTier::Younger, Weekday::Wed);
        let old = distribute(30, Category::ONLY_MILK, Flags::default(), BandTier::Older, Weekday::Wed);
        assert_eq!(young, old);
    }

    #[test]
    fn kind_labels() {
        assert_eq!(LedgerKind::from_label("Milk"), Some(LedgerKind::Dairy));
        assert_eq!(LedgerKind::from_label("meal"), Some(LedgerKind::Meal));
        assert_eq!(LedgerKind::from_label("eggs"), None);
        assert_eq!(LedgerKind::Dairy.to_string(), "dairy");
    }
}
