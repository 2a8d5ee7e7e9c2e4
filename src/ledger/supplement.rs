//! Egg and banana sheet: per-day counts paid for by different payers.
//!
//! No stock is carried between days, so this sheet only aggregates.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{de::Deserializer, Deserialize, Serialize, Serializer};

use super::numeric;

pub const DEFAULT_UNIT_PRICE: f64 = 6.0;

/// Who pays for a day's eggs and bananas.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Payer {
    Apf,
    Gov,
    Other(String),
}

impl Payer {
    pub fn from_label(label: &str) -> Payer {
        match label.trim().to_ascii_uppercase().as_str() {
            "APF" => Payer::Apf,
            "GOV" | "GOVT" | "GOVERNMENT" => Payer::Gov,
            _ => Payer::Other(label.trim().to_string()),
        }
    }
}

impl fmt::Display for Payer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payer::Apf => f.write_str("APF"),
            Payer::Gov => f.write_str("GOV"),
            Payer::Other(label) if label.is_empty() => f.write_str("unassigned"),
            Payer::Other(label) => f.write_str(label),
        }
    }
}

impl Serialize for Payer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Payer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(Payer::from_label(value.as_deref().unwrap_or("")))
    }
}

impl Default for Payer {
    fn default() -> Self {
        Payer::Other(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplementRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub payer: Payer,
    #[serde(default, alias = "egg_m", deserialize_with = "count_or_zero")]
    pub eggs_male: u32,
    #[serde(default, alias = "egg_f", deserialize_with = "count_or_zero")]
    pub eggs_female: u32,
    #[serde(default, alias = "chikki_m", deserialize_with = "count_or_zero")]
    pub bananas_male: u32,
    #[serde(default, alias = "chikki_f", deserialize_with = "count_or_zero")]
    pub bananas_female: u32,
    #[serde(default = "default_price", deserialize_with = "price_or_default")]
    pub egg_price: f64,
    #[serde(default = "default_price", deserialize_with = "price_or_default")]
    pub banana_price: f64,
}

impl SupplementRecord {
    pub fn eggs(&self) -> u64 {
        self.eggs_male as u64 + self.eggs_female as u64
    }

    pub fn bananas(&self) -> u64 {
        self.bananas_male as u64 + self.bananas_female as u64
    }

    pub fn egg_cost(&self) -> f64 {
        self.eggs() as f64 * self.egg_price
    }

    pub fn banana_cost(&self) -> f64 {
        self.bananas() as f64 * self.banana_price
    }
}

fn default_price() -> f64 {
    DEFAULT_UNIT_PRICE
}

fn count_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(numeric::lenient_count(deserializer)?.unwrap_or(0))
}

/// Zero, missing, or unparsable prices fall back to the default unit price.
fn price_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let price = numeric::lenient_quantity(deserializer)?.unwrap_or(0.0);
    Ok(if price == 0.0 { DEFAULT_UNIT_PRICE } else { price })
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SupplementLine {
    pub eggs: u64,
    pub bananas: u64,
    pub egg_cost: f64,
    pub banana_cost: f64,
}

impl SupplementLine {
    pub fn total_cost(&self) -> f64 {
        self.egg_cost + self.banana_cost
    }

    fn absorb(&mut self, record: &SupplementRecord) {
        self.eggs += record.eggs();
        self.bananas += record.bananas();
        self.egg_cost += record.egg_cost();
        self.banana_cost += record.banana_cost();
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SupplementSummary {
    pub by_payer: BTreeMap<Payer, SupplementLine>,
    pub total: SupplementLine,
}

pub fn summarize_supplements(records: &[SupplementRecord]) -> SupplementSummary {
    records
        .iter()
        .fold(SupplementSummary::default(), |mut summary, record| {
            summary
                .by_payer
                .entry(record.payer.clone())
                .or_default()
                .absorb(record);
            summary.total.absorb(record);
            summary
        })
}
