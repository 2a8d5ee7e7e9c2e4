//! Date classification helpers shared by the formulas and the scaffold.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};

use crate::errors::{LedgerError, Result};

/// Clock abstracts access to the current date so callers stay deterministic in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock; `today` reports the local calendar date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

pub fn day_of_week(date: NaiveDate) -> Weekday {
    date.weekday()
}

pub fn is_sunday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}

/// Presentation only; recalculation never consults the clock.
pub fn is_today(date: NaiveDate, clock: &dyn Clock) -> bool {
    date == clock.today()
}

/// Ragi is served on Monday, Wednesday and Friday only.
pub fn is_secondary_day(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Mon | Weekday::Wed | Weekday::Fri)
}

pub fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(LedgerError::InvalidMonth { year, month })
}

pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    let first = first_of_month(year, month)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let last = match NaiveDate::from_ymd_opt(next_year, next_month, 1) {
        Some(next) => next - Duration::days(1),
        None => NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(first),
    };
    Ok(last.day())
}

pub fn day_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Formats a date as `dd/mm/yyyy`.
pub fn format_display(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
