use chrono::NaiveDate;
use drinklog_core::date::day_heading;
use drinklog_core::{encode, CalendarMonth, DayMarker, DrinkField, DrinkRecord, Frequency, MonthlyStats, ScopeSummary, NO_DATA};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const WEEKDAY_HEADERS: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

#[derive(Tabled)]
struct DrinkRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Shop")]
    shop: String,
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Sugar / Ice")]
    levels: String,
    #[tabled(rename = "Price")]
    price: String,
}

impl DrinkRow {
    fn from_record(record: &DrinkRecord) -> Self {
        let id = record.id.to_string();
        Self {
            date: encode(record.date),
            id: id[..8].to_string(),
            shop: record.shop.clone(),
            item: record.item.clone(),
            levels: format!("{} / {}", record.sweetness, record.ice),
            price: format!("${}", record.price),
        }
    }
}

#[derive(Tabled)]
struct RankRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Times")]
    count: usize,
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}

/// Pads or cuts `text` to exactly `width` terminal columns.
pub fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width.saturating_sub(out.width())));
    out
}

/// Marker shown under a calendar day: one dot per drink, a star from three on.
pub fn marker_text(marker: DayMarker) -> &'static str {
    match marker {
        DayMarker::Empty => "",
        DayMarker::Dots(1) => "·",
        DayMarker::Dots(_) => "··",
        DayMarker::Busy => "*",
    }
}

pub fn show_day(date: NaiveDate, records: &[&DrinkRecord]) {
    println!("\n\x1b[1;36m{}\x1b[0m  {}｜共 {} 杯", day_heading(date), encode(date), records.len());
    if records.is_empty() {
        println!("{}", NO_DATA);
        return;
    }
    let rows: Vec<DrinkRow> = records.iter().map(|r| DrinkRow::from_record(r)).collect();
    print_table(rows);
}

pub fn show_month(calendar: &CalendarMonth, stats: &MonthlyStats, today: NaiveDate) {
    println!("\n\x1b[1;36m{}\x1b[0m", calendar.label);
    println!("{}", WEEKDAY_HEADERS.map(|d| format!("{:<5}", d)).join(""));

    let mut line = " ".repeat(calendar.leading_blanks as usize * 5);
    let mut column = calendar.leading_blanks;
    for day in &calendar.days {
        let number = day.date.format("%e").to_string();
        let cell = if day.date == today {
            format!("\x1b[4m{}\x1b[0m{:<3}", number, marker_text(day.marker()))
        } else {
            format!("{}{}", number, fit(marker_text(day.marker()), 3))
        };
        line.push_str(&cell);
        column += 1;
        if column % 7 == 0 {
            println!("{}", line.trim_end());
            line.clear();
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }

    println!();
    println!("{}{} 杯   {}${}", fit("當月劑量", 10), stats.monthly_count, fit("當月診療費", 12), stats.monthly_cost);
    println!("{}{} 杯   {}${}", fit("年度劑量", 10), stats.annual_count, fit("年度診療費", 12), stats.annual_cost);
}

pub fn show_favorites(shop: &Frequency, item: &Frequency) {
    println!("{}{}", fit("Clinic Favorite", 18), shop.name);
    println!("{}{}", fit("Addiction Item", 18), item.name);
}

pub fn show_summary(summary: &ScopeSummary) {
    println!("\n\x1b[1;36m{}\x1b[0m", summary.headline());
    if summary.records.is_empty() {
        println!("{}", NO_DATA);
        return;
    }
    let rows: Vec<DrinkRow> = summary.records.iter().map(DrinkRow::from_record).collect();
    print_table(rows);
}

pub fn show_ranking(field: DrinkField, ranking: &[Frequency]) {
    let title = match field {
        DrinkField::Shop => "店家統計",
        DrinkField::Item => "飲品統計",
    };
    println!("\n\x1b[1;36m{}\x1b[0m", title);
    if ranking.is_empty() {
        println!("{}", NO_DATA);
        return;
    }
    let rows: Vec<RankRow> = ranking
        .iter()
        .enumerate()
        .map(|(i, f)| RankRow {
            rank: i + 1,
            name: f.name.clone(),
            count: f.count,
        })
        .collect();
    print_table(rows);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_counts_wide_characters() {
        assert_eq!(fit("當月", 6), "當月  ");
        assert_eq!(fit("迷客夏大正紅茶", 5), "迷客 ");
        assert_eq!(fit("abc", 2), "ab");
    }

    #[test]
    fn test_marker_text() {
        assert_eq!(marker_text(DayMarker::Empty), "");
        assert_eq!(marker_text(DayMarker::Dots(2)), "··");
        assert_eq!(marker_text(DayMarker::Busy), "*");
    }
}
