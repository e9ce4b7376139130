use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::date;
use crate::model::record::{DrinkField, DrinkRecord};
use crate::model::stats::{CalendarDay, CalendarMonth, Frequency, MonthlyStats, Scope, ScopeSummary};

// Pure aggregations over the full record collection. Nothing here is cached;
// callers recompute from the current records on demand.

/// Counts and spending for `year`, and for `month` (1-12) within it.
pub fn stats_for(records: &[DrinkRecord], year: i32, month: u32) -> MonthlyStats {
    let mut stats = MonthlyStats::default();

    for record in records.iter().filter(|r| r.date.year() == year) {
        stats.annual_count += 1;
        stats.annual_cost += record.price;

        if record.date.month() == month {
            stats.monthly_count += 1;
            stats.monthly_cost += record.price;
        }
    }

    stats
}

/// Occurrence count per non-empty value of `field`, in order of first appearance.
fn frequency_map(records: &[DrinkRecord], field: DrinkField) -> Vec<Frequency> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<Frequency> = Vec::new();

    for record in records {
        let value = record.field(field);
        if value.is_empty() {
            continue;
        }
        match index.get(value) {
            Some(&pos) => entries[pos].count += 1,
            None => {
                index.insert(value, entries.len());
                entries.push(Frequency {
                    name: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    entries
}

/// Most frequent value of `field`. A tie goes to the value that appeared first.
pub fn top_frequency(records: &[DrinkRecord], field: DrinkField) -> Frequency {
    let mut top: Option<Frequency> = None;

    for entry in frequency_map(records, field) {
        let beats = top.as_ref().map_or(true, |t| entry.count > t.count);
        if beats {
            top = Some(entry);
        }
    }

    top.unwrap_or_else(Frequency::no_data)
}

/// Every value of `field`, most frequent first. Ties keep first-appearance order.
pub fn all_frequencies(records: &[DrinkRecord], field: DrinkField) -> Vec<Frequency> {
    let mut entries = frequency_map(records, field);
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

pub fn records_on(records: &[DrinkRecord], date: NaiveDate) -> Vec<&DrinkRecord> {
    records.iter().filter(|r| r.date == date).collect()
}

/// The records of a month or year, newest first, with the total rounded to whole units.
pub fn summarize_scope(records: &[DrinkRecord], scope: Scope) -> ScopeSummary {
    let mut scoped: Vec<DrinkRecord> = records.iter().filter(|r| scope.contains(r.date)).cloned().collect();
    scoped.sort_by(|a, b| b.date.cmp(&a.date));

    let total: f64 = scoped.iter().map(|r| r.price).sum();

    ScopeSummary {
        scope,
        count: scoped.len(),
        total_cost: total.round(),
        records: scoped,
    }
}

pub fn month_calendar(records: &[DrinkRecord], year: i32, month: u32) -> CalendarMonth {
    let mut counts: HashMap<NaiveDate, usize> = HashMap::new();
    for record in records {
        if record.date.year() == year && record.date.month() == month {
            *counts.entry(record.date).or_default() += 1;
        }
    }

    let days = (1..=date::days_in_month(year, month))
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .map(|d| CalendarDay {
            date: d,
            count: counts.get(&d).copied().unwrap_or(0),
        })
        .collect();

    CalendarMonth {
        year,
        month,
        label: date::month_label(year, month),
        leading_blanks: date::first_weekday_offset(year, month),
        days,
    }
}
