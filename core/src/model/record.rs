use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const SUGAR_WARNING: &str = "別再喝了！！減肥減肥減肥！！！😤";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sweetness {
    #[serde(rename = "固定")]
    Standard,
    #[serde(rename = "半糖")]
    Half,
    #[serde(rename = "三分糖")]
    ThreeTenths,
    #[serde(rename = "二分糖")]
    TwoTenths,
    #[serde(rename = "一分糖")]
    OneTenth,
    #[serde(rename = "無糖")]
    SugarFree,
}

impl Sweetness {
    pub const ALL: [Sweetness; 6] = [
        Sweetness::Standard,
        Sweetness::Half,
        Sweetness::ThreeTenths,
        Sweetness::TwoTenths,
        Sweetness::OneTenth,
        Sweetness::SugarFree,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Sweetness::Standard => "固定",
            Sweetness::Half => "半糖",
            Sweetness::ThreeTenths => "三分糖",
            Sweetness::TwoTenths => "二分糖",
            Sweetness::OneTenth => "一分糖",
            Sweetness::SugarFree => "無糖",
        }
    }
}

impl Default for Sweetness {
    fn default() -> Self {
        Sweetness::ThreeTenths
    }
}

impl fmt::Display for Sweetness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Sweetness {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(level) = Sweetness::ALL.iter().find(|l| l.label() == s) {
            return Ok(*level);
        }
        match s.to_lowercase().as_str() {
            "standard" | "regular" => Ok(Sweetness::Standard),
            "half" | "50" => Ok(Sweetness::Half),
            "30" | "less" => Ok(Sweetness::ThreeTenths),
            "20" => Ok(Sweetness::TwoTenths),
            "10" | "light" => Ok(Sweetness::OneTenth),
            "0" | "none" | "free" => Ok(Sweetness::SugarFree),
            _ => Err(anyhow!("Unknown sweetness level: {}", s)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IceLevel {
    #[serde(rename = "固定")]
    Standard,
    #[serde(rename = "微冰")]
    Light,
    #[serde(rename = "去冰")]
    NoIce,
    #[serde(rename = "溫熱")]
    Hot,
}

impl IceLevel {
    pub const ALL: [IceLevel; 4] = [IceLevel::Standard, IceLevel::Light, IceLevel::NoIce, IceLevel::Hot];

    pub fn label(self) -> &'static str {
        match self {
            IceLevel::Standard => "固定",
            IceLevel::Light => "微冰",
            IceLevel::NoIce => "去冰",
            IceLevel::Hot => "溫熱",
        }
    }
}

impl Default for IceLevel {
    fn default() -> Self {
        IceLevel::Light
    }
}

impl fmt::Display for IceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IceLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(level) = IceLevel::ALL.iter().find(|l| l.label() == s) {
            return Ok(*level);
        }
        match s.to_lowercase().as_str() {
            "standard" | "regular" => Ok(IceLevel::Standard),
            "light" | "less" => Ok(IceLevel::Light),
            "none" | "no" => Ok(IceLevel::NoIce),
            "hot" | "warm" => Ok(IceLevel::Hot),
            _ => Err(anyhow!("Unknown ice level: {}", s)),
        }
    }
}

/// Which free-text field a frequency count is built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrinkField {
    Shop,
    Item,
}

impl FromStr for DrinkField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "shop" | "store" => Ok(DrinkField::Shop),
            "item" | "drink" => Ok(DrinkField::Item),
            _ => Err(anyhow!("Unknown field: {} (expected shop or item)", s)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DrinkRecord {
    pub id: Uuid,
    #[serde(with = "crate::date::key")]
    pub date: NaiveDate,
    pub shop: String,
    pub item: String,
    pub sweetness: Sweetness,
    pub ice: IceLevel,
    #[serde(default)]
    pub price: f64,
}

impl DrinkRecord {
    pub fn field(&self, field: DrinkField) -> &str {
        match field {
            DrinkField::Shop => &self.shop,
            DrinkField::Item => &self.item,
        }
    }
}

/// A purchase as entered, before it is given an id and a date.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrinkDraft {
    pub shop: String,
    pub item: String,
    pub sweetness: Sweetness,
    pub ice: IceLevel,
    pub price: f64,
}

impl DrinkDraft {
    pub fn new(shop: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            shop: shop.into(),
            item: item.into(),
            ..Self::default()
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = sanitize_price(price);
        self
    }

    pub fn is_complete(&self) -> bool {
        !self.shop.is_empty() && !self.item.is_empty()
    }

    /// The nag shown when the first drink of a day is not sugar-free.
    pub fn sugar_warning(&self, existing_today: usize) -> Option<&'static str> {
        if existing_today == 0 && self.sweetness != Sweetness::SugarFree {
            Some(SUGAR_WARNING)
        } else {
            None
        }
    }

    pub fn into_record(self, date: NaiveDate) -> DrinkRecord {
        DrinkRecord {
            id: Uuid::new_v4(),
            date,
            shop: self.shop,
            item: self.item,
            sweetness: self.sweetness,
            ice: self.ice,
            price: sanitize_price(self.price),
        }
    }
}

/// Entry-time price coercion: anything that is not a non-negative number is 0.
pub fn coerce_price(input: Option<&str>) -> f64 {
    input
        .and_then(|s| s.trim().parse::<f64>().ok())
        .map(sanitize_price)
        .unwrap_or(0.0)
}

fn sanitize_price(price: f64) -> f64 {
    if price.is_finite() && price >= 0.0 {
        price
    } else {
        0.0
    }
}
