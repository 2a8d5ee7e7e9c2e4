use std::fmt;

use serde::{de::Deserializer, Deserialize, Serialize, Serializer};

/// Staple grain served on a meal day. Exactly one receives a non-zero rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Staple {
    Rice,
    Wheat,
}

/// Dairy distribution plan for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DairyPlan {
    MilkAndRagi,
    OnlyMilk,
}

/// Mutually exclusive distribution choice for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    /// Nothing is distributed, whatever the counts and flags say.
    #[default]
    Unset,
    Staple(Staple),
    Dairy(DairyPlan),
}

impl Category {
    pub const RICE: Category = Category::Staple(Staple::Rice);
    pub const WHEAT: Category = Category::Staple(Staple::Wheat);
    pub const MILK_AND_RAGI: Category = Category::Dairy(DairyPlan::MilkAndRagi);
    pub const ONLY_MILK: Category = Category::Dairy(DairyPlan::OnlyMilk);

    /// Maps a raw stored label onto the closed set of categories.
    ///
    /// This is the single place legacy spellings are understood: the English
    /// and Kannada staple names, the `"milk & ragi"` style dairy labels, and
    /// empty or null values. Anything unrecognised reads as [`Category::Unset`].
    pub fn normalize(raw: Option<&str>) -> Category {
        let Some(raw) = raw else {
            return Category::Unset;
        };
        let label: String = raw
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == '&' || c == '-' || c == ' ' { '_' } else { c })
            .collect();
        match label.as_str() {
            "" | "null" | "none" | "unset" => Category::Unset,
            "rice" | "akki" => Category::RICE,
            "wheat" | "godhi" | "godi" => Category::WHEAT,
            "milk_and_ragi" | "milk___ragi" | "milk_ragi" | "milkandragi" => {
                Category::MILK_AND_RAGI
            }
            "only_milk" | "milk_only" | "milk" => Category::ONLY_MILK,
            other => {
                tracing::debug!(label = other, "unrecognised category label treated as unset");
                Category::Unset
            }
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            Category::Unset => None,
            Category::Staple(Staple::Rice) => Some("rice"),
            Category::Staple(Staple::Wheat) => Some("wheat"),
            Category::Dairy(DairyPlan::MilkAndRagi) => Some("milk_and_ragi"),
            Category::Dairy(DairyPlan::OnlyMilk) => Some("only_milk"),
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, Category::Unset)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("-"))
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.label() {
            Some(label) => serializer.serialize_some(label),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(serde_json::Value::String(s)) => Category::normalize(Some(&s)),
            _ => Category::Unset,
        })
    }
}

/// Boolean modifiers affecting formula selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Flags {
    /// Pulses are served alongside the staple.
    #[serde(default)]
    pub supplement: bool,
}

impl Flags {
    pub fn with_supplement() -> Self {
        Self { supplement: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_labels_normalize() {
        assert_eq!(Category::normalize(Some("Rice")), Category::RICE);
        assert_eq!(Category::normalize(Some("godhi")), Category::WHEAT);
        assert_eq!(Category::normalize(Some("milk & ragi")), Category::MILK_AND_RAGI);
        assert_eq!(Category::normalize(Some("only milk")), Category::ONLY_MILK);
        assert_eq!(Category::normalize(Some("")), Category::Unset);
        assert_eq!(Category::normalize(None), Category::Unset);
        assert_eq!(Category::normalize(Some("biryani")), Category::Unset);
    }

    #[test]
    fn serde_uses_labels_and_null() {
        assert_eq!(serde_json::to_string(&Category::WHEAT).unwrap(), "\"wheat\"");
        assert_eq!(serde_json::to_string(&Category::Unset).unwrap(), "null");
        let parsed: Category = serde_json::from_str("\"milk & ragi\"").unwrap();
        assert_eq!(parsed, Category::MILK_AND_RAGI);
        let parsed: Category = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, Category::Unset);
    }
}
