//! Daily commodity ledger: formulas, calendar helpers, month scaffolding,
//! forward stock recalculation, and month aggregation.

pub mod aggregate;
pub mod calendar;
pub mod category;
pub mod commodity;
pub mod formula;
pub mod numeric;
pub mod recalc;
pub mod record;
pub mod scaffold;
pub mod supplement;

pub use aggregate::{aggregate, aggregate_with, BandCounts64, Totals};
pub use calendar::{Clock, SystemClock};
pub use category::{Category, DairyPlan, Flags, Staple};
pub use commodity::{BandCounts, BandTier, Commodity, PrecisionClass, Quantities, TierQuantities};
pub use formula::{distribute, DistributionFormula, LedgerKind, RateTable};
pub use recalc::{recalculate_from, recalculate_from_with, recalculate_in_place};
pub use record::{DayRecord, SparseRecord};
pub use scaffold::build_month;
pub use supplement::{summarize_supplements, Payer, SupplementRecord, SupplementSummary};
