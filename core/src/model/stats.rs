use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::record::DrinkRecord;

/// Shown in place of a favorite when nothing has been logged.
pub const NO_DATA: &str = "尚無紀錄";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MonthlyStats {
    pub monthly_count: usize,
    pub monthly_cost: f64,
    pub annual_count: usize,
    pub annual_cost: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Frequency {
    pub name: String,
    pub count: usize,
}

impl Frequency {
    pub fn no_data() -> Self {
        Self {
            name: NO_DATA.to_string(),
            count: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Month { year: i32, month: u32 },
    Year(i32),
}

impl Scope {
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Scope::Month { year, month } => date.year() == year && date.month() == month,
            Scope::Year(year) => date.year() == year,
        }
    }
}

/// Records of one month or year, newest first, with the rounded total.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeSummary {
    pub scope: Scope,
    pub records: Vec<DrinkRecord>,
    pub count: usize,
    pub total_cost: f64,
}

impl ScopeSummary {
    pub fn headline(&self) -> String {
        let period = match self.scope {
            Scope::Month { year, month } => crate::date::month_label(year, month),
            Scope::Year(year) => year.to_string(),
        };
        format!("{}｜共 {} 杯｜總花費 ${}", period, self.count, self.total_cost)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayMarker {
    Empty,
    Dots(u8),
    Busy,
}

impl DayMarker {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => DayMarker::Empty,
            1 | 2 => DayMarker::Dots(count as u8),
            _ => DayMarker::Busy,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub count: usize,
}

impl CalendarDay {
    pub fn marker(&self) -> DayMarker {
        DayMarker::from_count(self.count)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub label: String,
    /// Blank cells before day 1, Sunday first.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}
