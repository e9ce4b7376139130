use chrono::{Datelike, Duration, NaiveDate};
use drinklog_core::date::shift_month;
use drinklog_core::{parse_draft, DrinkRecord, DrinkService, KeyValueStore};

pub enum InputMode {
    Normal,
    Adding,
}

pub struct App<S: KeyValueStore> {
    pub service: DrinkService<S>,
    pub today: NaiveDate,
    pub selected: NaiveDate,
    pub record_cursor: usize,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub message: Option<String>,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(service: DrinkService<S>, today: NaiveDate) -> Self {
        App {
            service,
            today,
            selected: today,
            record_cursor: 0,
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            message: None,
        }
    }

    pub fn day_records(&self) -> Vec<&DrinkRecord> {
        self.service.records_on(self.selected)
    }

    pub fn move_days(&mut self, days: i64) {
        if let Some(day) = Duration::try_days(days).and_then(|d| self.selected.checked_add_signed(d)) {
            self.selected = day;
            self.record_cursor = 0;
        }
    }

    /// Jumps to the first day of the previous/next month.
    pub fn move_months(&mut self, delta: i32) {
        let first = shift_month(self.selected.year(), self.selected.month(), delta)
            .and_then(|(year, month)| NaiveDate::from_ymd_opt(year, month, 1));
        if let Some(first) = first {
            self.selected = first;
            self.record_cursor = 0;
        }
    }

    pub fn jump_to_today(&mut self) {
        self.selected = self.today;
        self.record_cursor = 0;
    }

    pub fn next_record(&mut self) {
        let len = self.day_records().len();
        if len > 0 {
            self.record_cursor = (self.record_cursor + 1) % len;
        }
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.day_records().get(self.record_cursor).map(|r| r.id) else {
            return;
        };
        self.message = match self.service.remove(&id) {
            Ok(_) => Some("Drink removed.".to_string()),
            Err(e) => Some(format!("Removed, but not saved: {:#}", e)),
        };
        let len = self.day_records().len();
        if self.record_cursor >= len {
            self.record_cursor = len.saturating_sub(1);
        }
    }

    pub fn enter_add_mode(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input.clear();
        self.cursor_position = 0;
        self.message = None;
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.input.chars().take(self.cursor_position).map(|c| c.len_utf8()).sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self.input.chars().take(self.cursor_position - 1).map(|c| c.len_utf8()).sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn submit_command(&mut self) {
        if !self.input.trim().is_empty() {
            self.submit_add();
        }
        self.input.clear();
        self.cursor_position = 0;
        self.exit_input_mode();
    }

    fn submit_add(&mut self) {
        let args: Vec<String> = self.input.split_whitespace().map(|s| s.to_string()).collect();
        let parsed = match parse_draft(&args, self.today) {
            Ok(parsed) => parsed,
            Err(e) => {
                self.message = Some(e.to_string());
                return;
            }
        };

        let date = parsed.date.unwrap_or(self.selected);
        let warning = self.service.sugar_warning(&parsed.draft, date);
        self.message = match self.service.add(parsed.draft, Some(date)) {
            Ok(Some(_)) => Some(warning.unwrap_or("Drink added.").to_string()),
            Ok(None) => Some("Shop and item are required.".to_string()),
            Err(e) => Some(format!("Added, but not saved: {:#}", e)),
        };
        self.selected = date;
        self.record_cursor = self.day_records().len().saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drinklog_core::{MemoryKeyValueStore, StoreKeys};

    fn app() -> App<MemoryKeyValueStore> {
        let service = DrinkService::load(MemoryKeyValueStore::new(), StoreKeys::default());
        App::new(service, NaiveDate::from_ymd_opt(2026, 1, 31).unwrap())
    }

    fn type_line(app: &mut App<MemoryKeyValueStore>, line: &str) {
        app.enter_add_mode();
        for c in line.chars() {
            app.input_char(c);
        }
        app.submit_command();
    }

    #[test]
    fn test_add_from_prompt_lands_on_selected_day() {
        let mut app = app();
        app.move_days(-1);
        type_line(&mut app, "50嵐 四季春 sw:無糖 p:35");

        let records = app.day_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2026, 1, 30).unwrap());
        assert_eq!(app.message.as_deref(), Some("Drink added."));
    }

    #[test]
    fn test_first_sweet_drink_shows_warning() {
        let mut app = app();
        type_line(&mut app, "迷客夏 珍珠鮮奶");
        assert!(app.message.as_deref().unwrap_or_default().contains("減肥"));
    }

    #[test]
    fn test_delete_selected_record() {
        let mut app = app();
        type_line(&mut app, "A one");
        type_line(&mut app, "B two");
        app.record_cursor = 0;
        app.delete_selected();

        let items: Vec<String> = app.day_records().iter().map(|r| r.item.clone()).collect();
        assert_eq!(items, vec!["two".to_string()]);
        assert_eq!(app.record_cursor, 0);
    }

    #[test]
    fn test_month_navigation_wraps_year() {
        let mut app = app();
        app.move_months(1);
        assert_eq!(app.selected, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        app.move_months(-2);
        assert_eq!(app.selected, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        app.jump_to_today();
        assert_eq!(app.selected, app.today);
    }

    #[test]
    fn test_navigation_stops_at_calendar_edges() {
        let mut app = app();
        app.selected = NaiveDate::MAX;
        app.move_days(1);
        app.move_months(1);
        assert_eq!(app.selected, NaiveDate::MAX);
    }

    #[test]
    fn test_cursor_editing_handles_wide_chars() {
        let mut app = app();
        app.enter_add_mode();
        for c in "茶x".chars() {
            app.input_char(c);
        }
        app.move_cursor_left();
        app.delete_char();
        assert_eq!(app.input, "x");
    }
}
