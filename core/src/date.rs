use chrono::{Datelike, Duration, NaiveDate};
use anyhow::{anyhow, Result};
use thiserror::Error;

const WEEKDAY_NAMES: [&str; 7] = ["日", "一", "二", "三", "四", "五", "六"];

#[derive(Debug, Error, PartialEq)]
pub enum DateKeyError {
    #[error("date key `{0}` must have three parts (YYYY-MM-DD)")]
    Arity(String),
    #[error("date key `{0}` has a non-numeric part")]
    NotNumeric(String),
    #[error("date key `{0}` is not a calendar day")]
    OutOfRange(String),
}

/// Canonical `YYYY-MM-DD` key of a calendar day.
pub fn encode(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Builds the calendar day straight from the three numeric parts of a key.
/// There is no timezone involved: "2026-03-05" is always March 5, 2026.
pub fn decode(key: &str) -> std::result::Result<NaiveDate, DateKeyError> {
    // Years before 1 BCE are encoded with a leading sign, e.g. "-005-03-01".
    let (sign, unsigned) = match key.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, key),
    };
    let parts: Vec<&str> = unsigned.split('-').collect();
    if parts.len() != 3 {
        return Err(DateKeyError::Arity(key.to_string()));
    }

    let not_numeric = || DateKeyError::NotNumeric(key.to_string());
    let year: i32 = parts[0].trim().parse::<i32>().map_err(|_| not_numeric())? * sign;
    let month: u32 = parts[1].trim().parse().map_err(|_| not_numeric())?;
    let day: u32 = parts[2].trim().parse().map_err(|_| not_numeric())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| DateKeyError::OutOfRange(key.to_string()))
}

/// serde adapter storing a `NaiveDate` as its canonical key.
pub mod key {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::encode(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::decode(&raw).map_err(de::Error::custom)
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some((next_year, next_month)) = shift_month(year, month, 1) else {
        return 0;
    };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 0,
    }
}

/// Number of blank cells before day 1 in a Sunday-first calendar grid.
pub fn first_weekday_offset(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// Moves a (year, month) pair by `delta` months, wrapping across years.
/// `None` when the resulting year does not fit in an `i32`.
pub fn shift_month(year: i32, month: u32, delta: i32) -> Option<(i32, u32)> {
    let index = i64::from(year) * 12 + (i64::from(month) - 1) + i64::from(delta);
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    Some((year, index.rem_euclid(12) as u32 + 1))
}

pub fn month_label(year: i32, month: u32) -> String {
    format!("{} / {:02}", year, month)
}

/// e.g. "1月5日 星期一"
pub fn day_heading(date: NaiveDate) -> String {
    let weekday = WEEKDAY_NAMES[date.weekday().num_days_from_sunday() as usize];
    format!("{}月{}日 星期{}", date.month(), date.day(), weekday)
}

/// Resolves the date words accepted on the command line relative to `today`.
pub fn parse_human_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Empty date string"));
    }

    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "yesterday" | "yest" => return shift_days(today, -1),
        _ => {}
    }

    // Relative format (+Nd, -Nd)
    if (input.starts_with('+') || input.starts_with('-')) && input.ends_with('d') {
        let count: i64 = input[..input.len() - 1]
            .parse()
            .map_err(|_| anyhow!("Invalid relative date: {}", input))?;
        return shift_days(today, count);
    }

    decode(input).map_err(|e| anyhow!("Could not parse date: {}", e))
}

fn shift_days(today: NaiveDate, count: i64) -> Result<NaiveDate> {
    Duration::try_days(count)
        .and_then(|offset| today.checked_add_signed(offset))
        .ok_or_else(|| anyhow!("Date {:+} days from {} is out of range", count, encode(today)))
}
