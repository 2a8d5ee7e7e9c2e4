pub mod month_ledger;
pub mod services;

pub use month_ledger::MonthLedger;
pub use services::{CommodityLine, SummaryService};
