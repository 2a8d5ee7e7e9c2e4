use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

use serde::{de::Deserializer, ser::SerializeMap, Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::numeric;

/// Trackable resource types distributed by the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Commodity {
    Rice,
    Wheat,
    Oil,
    Pulses,
    /// Per-head operating cost ("sadilvaru").
    Overhead,
    MilkPowder,
    Ragi,
    Sugar,
}

impl Commodity {
    pub const COUNT: usize = 8;

    pub const ALL: [Commodity; Commodity::COUNT] = [
        Commodity::Rice,
        Commodity::Wheat,
        Commodity::Oil,
        Commodity::Pulses,
        Commodity::Overhead,
        Commodity::MilkPowder,
        Commodity::Ragi,
        Commodity::Sugar,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn key(self) -> &'static str {
        match self {
            Commodity::Rice => "rice",
            Commodity::Wheat => "wheat",
            Commodity::Oil => "oil",
            Commodity::Pulses => "pulses",
            Commodity::Overhead => "overhead",
            Commodity::MilkPowder => "milk_powder",
            Commodity::Ragi => "ragi",
            Commodity::Sugar => "sugar",
        }
    }

    /// Resolves a persisted key, including the reference schema's column names.
    pub fn from_key(key: &str) -> Option<Commodity> {
        match key.trim().to_ascii_lowercase().as_str() {
            "rice" => Some(Commodity::Rice),
            "wheat" => Some(Commodity::Wheat),
            "oil" => Some(Commodity::Oil),
            "pulses" | "pulse" => Some(Commodity::Pulses),
            "overhead" | "sadilvaru" => Some(Commodity::Overhead),
            "milk_powder" | "milk" => Some(Commodity::MilkPowder),
            "ragi" => Some(Commodity::Ragi),
            "sugar" => Some(Commodity::Sugar),
            _ => None,
        }
    }

    /// Physical stock, as opposed to per-head cost allowances whose running
    /// balance carries no shortfall signal.
    pub fn is_stocked(self) -> bool {
        !matches!(self, Commodity::Overhead | Commodity::Sugar)
    }

    /// Decimal places used when rendering this commodity.
    pub fn precision_class(self) -> PrecisionClass {
        match self {
            Commodity::Sugar => PrecisionClass::Cost,
            _ => PrecisionClass::Mass,
        }
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionClass {
    Mass,
    Cost,
}

/// A total mapping from every [`Commodity`] to a quantity.
///
/// Values are stored densely so every commodity is always present; missing
/// entries read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quantities {
    values: [f64; Commodity::COUNT],
}

impl Quantities {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Commodity, f64)>,
    {
        let mut quantities = Self::zero();
        for (commodity, value) in pairs {
            quantities.set(commodity, value);
        }
        quantities
    }

    pub fn get(&self, commodity: Commodity) -> f64 {
        self.values[commodity.index()]
    }

    /// Stores a value; non-finite input is coerced to zero.
    pub fn set(&mut self, commodity: Commodity, value: f64) {
        self.values[commodity.index()] = numeric::sanitize(value);
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    pub fn has_negative(&self) -> bool {
        self.values.iter().any(|v| *v < 0.0)
    }

    /// True when any physically stocked commodity is below zero.
    pub fn has_stock_shortfall(&self) -> bool {
        self.iter().any(|(c, v)| c.is_stocked() && v < 0.0)
    }

    /// Received stock cannot be negative; negative entries read as zero.
    pub fn clamp_non_negative(mut self) -> Self {
        for value in &mut self.values {
            *value = value.max(0.0);
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Commodity, f64)> + '_ {
        Commodity::ALL.iter().map(move |c| (*c, self.get(*c)))
    }
}

impl Add for Quantities {
    type Output = Quantities;

    fn add(mut self, rhs: Quantities) -> Quantities {
        self += rhs;
        self
    }
}

impl AddAssign for Quantities {
    fn add_assign(&mut self, rhs: Quantities) {
        for (lhs, rhs) in self.values.iter_mut().zip(rhs.values) {
            *lhs = numeric::sanitize(*lhs + rhs);
        }
    }
}

impl Sub for Quantities {
    type Output = Quantities;

    fn sub(mut self, rhs: Quantities) -> Quantities {
        for (lhs, rhs) in self.values.iter_mut().zip(rhs.values) {
            *lhs = numeric::sanitize(*lhs - rhs);
        }
        self
    }
}

impl Serialize for Quantities {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(Commodity::COUNT))?;
        for (commodity, value) in self.iter() {
            map.serialize_entry(commodity.key(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Quantities {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
        let mut quantities = Quantities::zero();
        for (key, value) in raw.unwrap_or_default() {
            if let Some(commodity) = Commodity::from_key(&key) {
                quantities.set(commodity, numeric::quantity_from_value(&value));
            }
        }
        Ok(quantities)
    }
}

/// Age-group classification selecting a per-head rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandTier {
    /// Grades 1 to 5.
    Younger,
    /// Grades 6 to 8 (10 in later sheets).
    Older,
}

impl BandTier {
    pub const ALL: [BandTier; 2] = [BandTier::Younger, BandTier::Older];

    pub fn from_label(label: &str) -> Option<BandTier> {
        match label.trim().to_ascii_lowercase().as_str() {
            "younger" | "young" | "1to5" | "cnt_1to5" => Some(BandTier::Younger),
            "older" | "old" | "6to8" | "6to10" | "cnt_6to8" | "cnt_6to10" => {
                Some(BandTier::Older)
            }
            _ => None,
        }
    }
}

impl fmt::Display for BandTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandTier::Younger => f.write_str("1-5"),
            BandTier::Older => f.write_str("6-8"),
        }
    }
}

/// Beneficiary head counts per band tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BandCounts {
    #[serde(default)]
    pub younger: u32,
    #[serde(default)]
    pub older: u32,
}

impl BandCounts {
    pub fn new(younger: u32, older: u32) -> Self {
        Self { younger, older }
    }

    pub fn get(&self, tier: BandTier) -> u32 {
        match tier {
            BandTier::Younger => self.younger,
            BandTier::Older => self.older,
        }
    }

    pub fn set(&mut self, tier: BandTier, count: u32) {
        match tier {
            BandTier::Younger => self.younger = count,
            BandTier::Older => self.older = count,
        }
    }

    pub fn total(&self) -> u64 {
        self.younger as u64 + self.older as u64
    }
}

/// Per-tier split of one kind of quantity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TierQuantities {
    pub younger: Quantities,
    pub older: Quantities,
}

impl TierQuantities {
    pub fn get(&self, tier: BandTier) -> &Quantities {
        match tier {
            BandTier::Younger => &self.younger,
            BandTier::Older => &self.older,
        }
    }

    pub fn get_mut(&mut self, tier: BandTier) -> &mut Quantities {
        match tier {
            BandTier::Younger => &mut self.younger,
            BandTier::Older => &mut self.older,
        }
    }

    pub fn combined(&self) -> Quantities {
        self.younger + self.older
    }
}
