use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{de::Deserializer, Deserialize, Serialize};
use serde_json::Value;

use super::category::{Category, Flags};
use super::commodity::{BandCounts, BandTier, Commodity, Quantities, TierQuantities};
use super::numeric;

/// One calendar day of a month ledger.
///
/// `counts`, `category`, `flags`, `added_stock` and day 1's `opening_stock`
/// are inputs. Every other stock field is derived and rewritten on each
/// recalculation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    /// 1-based day of month; defines the ledger order.
    pub day: u32,
    pub date: NaiveDate,
    #[serde(default)]
    pub counts: BandCounts,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub flags: Flags,
    #[serde(default)]
    pub added_stock: Quantities,
    #[serde(default)]
    pub opening_stock: Quantities,
    #[serde(default)]
    pub total_stock: Quantities,
    #[serde(default)]
    pub distributed_stock: Quantities,
    #[serde(default)]
    pub distributed_by_tier: TierQuantities,
    #[serde(default)]
    pub closing_stock: Quantities,
}

impl DayRecord {
    pub fn new(day: u32, date: NaiveDate) -> Self {
        Self {
            day,
            date,
            counts: BandCounts::default(),
            category: Category::Unset,
            flags: Flags::default(),
            added_stock: Quantities::zero(),
            opening_stock: Quantities::zero(),
            total_stock: Quantities::zero(),
            distributed_stock: Quantities::zero(),
            distributed_by_tier: TierQuantities::default(),
            closing_stock: Quantities::zero(),
        }
    }

    pub fn is_first_day(&self) -> bool {
        self.day == 1
    }

    pub fn has_shortfall(&self) -> bool {
        self.closing_stock.has_stock_shortfall()
    }

    /// Persistence view with derived fields stripped. Opening stock is kept
    /// for day 1 only, being the sole user-entered opening balance.
    pub fn to_sparse(&self) -> SparseRecord {
        SparseRecord {
            date: Some(self.date),
            younger_count: Some(self.counts.younger),
            older_count: Some(self.counts.older),
            category: Some(self.category),
            supplement: Some(self.flags.supplement),
            grade: None,
            added_stock: Some(self.added_stock),
            opening_stock: self.is_first_day().then_some(self.opening_stock),
            extra: BTreeMap::new(),
        }
    }
}

/// Partial day record as supplied by the persistence layer.
///
/// Every field is optional and leniently parsed; field names of the older
/// sheet schemas are accepted as aliases and unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseRecord {
    #[serde(default, deserialize_with = "lenient_date", skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(
        default,
        alias = "cnt_1to5",
        alias = "children",
        deserialize_with = "numeric::lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub younger_count: Option<u32>,
    #[serde(
        default,
        alias = "cnt_6to8",
        alias = "cnt_6to10",
        deserialize_with = "numeric::lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub older_count: Option<u32>,
    #[serde(
        default,
        alias = "meal_type",
        alias = "dist_type",
        deserialize_with = "lenient_category",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Category>,
    #[serde(
        default,
        alias = "has_pulses",
        alias = "includes_pulses",
        deserialize_with = "numeric::lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub supplement: Option<bool>,
    /// Set on stock-sheet rows, which carry one grade's stock each.
    #[serde(default, deserialize_with = "lenient_grade", skip_serializing_if = "Option::is_none")]
    pub grade: Option<BandTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_stock: Option<Quantities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_stock: Option<Quantities>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl SparseRecord {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    /// Received quantities, including the dairy sheet's `*_rcpt` and the
    /// stock sheet's `*_add` columns.
    pub fn resolved_added(&self) -> Quantities {
        let mut added = self.added_stock.unwrap_or_default();
        self.merge_legacy_columns(&mut added, "_rcpt");
        self.merge_legacy_columns(&mut added, "_add");
        added
    }

    /// Opening quantities, including the dairy sheet's `*_open` columns.
    pub fn resolved_opening(&self) -> Quantities {
        let mut opening = self.opening_stock.unwrap_or_default();
        self.merge_legacy_columns(&mut opening, "_open");
        opening
    }

    fn merge_legacy_columns(&self, target: &mut Quantities, suffix: &str) {
        for (key, value) in &self.extra {
            let Some(stem) = key.strip_suffix(suffix) else {
                continue;
            };
            if let Some(commodity) = Commodity::from_key(stem) {
                if target.get(commodity) == 0.0 {
                    target.set(commodity, numeric::quantity_from_value(value));
                }
            }
        }
    }
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => {
            let head = raw.trim().get(..10).unwrap_or(raw.trim());
            NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
        }
        _ => None,
    })
}

fn lenient_grade<'de, D>(deserializer: D) -> Result<Option<BandTier>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(label)) => BandTier::from_label(&label),
        _ => None,
    })
}

fn lenient_category<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        Value::String(s) => Category::normalize(Some(&s)),
        _ => Category::Unset,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_meal_row_parses() {
        let raw = r#"{
            "id": "17",
            "date": "2024-06-03T00:00:00",
            "cnt_1to5": 42,
            "cnt_6to10": "18",
            "meal_type": "wheat",
            "has_pulses": true,
            "user_id": "abc"
        }"#;
        let record: SparseRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 6, 3));
        assert_eq!(record.younger_count, Some(42));
        assert_eq!(record.older_count, Some(18));
        assert_eq!(record.category, Some(Category::WHEAT));
        assert_eq!(record.supplement, Some(true));
    }

    #[test]
    fn legacy_dairy_columns_feed_stock() {
        let raw = r#"{
            "date": "2024-06-01",
            "children": 30,
            "milk_open": 12.5,
            "ragi_open": 4,
            "milk_rcpt": 2,
            "dist_type": "milk & ragi"
        }"#;
        let record: SparseRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.younger_count, Some(30));
        assert_eq!(record.category, Some(Category::MILK_AND_RAGI));
        assert_eq!(record.resolved_opening().get(Commodity::MilkPowder), 12.5);
        assert_eq!(record.resolved_opening().get(Commodity::Ragi), 4.0);
        assert_eq!(record.resolved_added().get(Commodity::MilkPowder), 2.0);
    }

    #[test]
    fn stock_sheet_columns_feed_stock() {
        let raw = r#"{
            "date": "2024-06-01",
            "grade": "1to5",
            "rice_add": 5,
            "pulse_add": 2,
            "rice_open": 40,
            "pulse_open": 3
        }"#;
        let record: SparseRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.grade, Some(BandTier::Younger));
        assert_eq!(record.resolved_added().get(Commodity::Rice), 5.0);
        assert_eq!(record.resolved_added().get(Commodity::Pulses), 2.0);
        assert_eq!(record.resolved_opening().get(Commodity::Rice), 40.0);
        assert_eq!(record.resolved_opening().get(Commodity::Pulses), 3.0);
    }

    #[test]
    fn garbage_fields_normalize_instead_of_failing() {
        let raw = r#"{"date": "not a date", "cnt_1to5": "many", "meal_type": 7}"#;
        let record: SparseRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.date, None);
        assert_eq!(record.younger_count, Some(0));
        assert_eq!(record.category, Some(Category::Unset));
    }

    #[test]
    fn to_sparse_strips_derived_fields() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let mut record = DayRecord::new(2, date);
        record.opening_stock.set(Commodity::Rice, 5.0);
        record.closing_stock.set(Commodity::Rice, 3.0);
        let sparse = record.to_sparse();
        assert_eq!(sparse.opening_stock, None);
        let json = serde_json::to_value(&sparse).unwrap();
        assert!(json.get("closing_stock").is_none());
    }
}
