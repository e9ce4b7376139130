use chrono::Datelike;
use drinklog_core::date::day_heading;
use drinklog_core::{DayMarker, DrinkField, KeyValueStore};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::report::{fit, marker_text, WEEKDAY_HEADERS};
use crate::tui::app::{App, InputMode};

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    dot: Color,
    busy: Color,
    tiles: [Color; 4],
}

const THEME: Theme = Theme {
    primary: Color::Rgb(120, 113, 108),
    muted: Color::DarkGray,
    text: Color::White,
    dot: Color::Rgb(168, 184, 168),
    busy: Color::Rgb(251, 113, 133),
    tiles: [
        Color::Rgb(220, 228, 233),
        Color::Rgb(231, 228, 237),
        Color::Rgb(229, 233, 228),
        Color::Rgb(239, 232, 232),
    ],
};

const CELL_WIDTH: usize = 5;

pub fn draw<S: KeyValueStore>(frame: &mut Frame, app: &App<S>) {
    let size = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(4), // Stat tiles
            Constraint::Min(12),   // Calendar + day
            Constraint::Length(3), // Prompt / help
        ])
        .split(size);

    draw_header(frame, app, main_layout[0]);
    draw_tiles(frame, app, main_layout[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((CELL_WIDTH * 7 + 4) as u16),
            Constraint::Length(1), // Gutter
            Constraint::Min(20),
        ])
        .split(main_layout[2]);
    draw_calendar(frame, app, body[0]);
    draw_day_panel(frame, app, body[2]);

    draw_footer(frame, app, main_layout[3]);
}

fn draw_header<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(20)])
        .split(area);

    let title = Paragraph::new(Span::styled(
        "手搖成癮病歷表 🥤",
        Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(title, header_layout[0]);

    let label = drinklog_core::date::month_label(app.selected.year(), app.selected.month());
    let nav = Paragraph::new(Line::from(vec![
        Span::styled(" [ ", Style::default().fg(THEME.muted)),
        Span::styled(label, Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)),
        Span::styled(" ] ", Style::default().fg(THEME.muted)),
    ]))
    .alignment(Alignment::Right)
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(nav, header_layout[1]);
}

fn draw_tiles<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let stats = app.service.stats(app.selected.year(), app.selected.month());
    let tiles = [
        ("當月劑量", format!("{} 杯", stats.monthly_count)),
        ("當月診療費", format!("${}", stats.monthly_cost)),
        ("年度劑量", format!("{} 杯", stats.annual_count)),
        ("年度診療費", format!("${}", stats.annual_cost)),
    ];

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    for (i, (label, value)) in tiles.into_iter().enumerate() {
        let tile = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(THEME.tiles[i]).add_modifier(Modifier::BOLD),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted))
                .title(format!(" {} ", label)),
        );
        frame.render_widget(tile, chunks[i]);
    }
}

fn draw_calendar<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let calendar = app.service.calendar(app.selected.year(), app.selected.month());

    let mut lines = vec![Line::from(
        WEEKDAY_HEADERS
            .iter()
            .map(|d| Span::styled(fit(d, CELL_WIDTH), Style::default().fg(THEME.muted)))
            .collect::<Vec<_>>(),
    )];

    let mut spans: Vec<Span> = vec![Span::raw(" ".repeat(calendar.leading_blanks as usize * CELL_WIDTH))];
    let mut column = calendar.leading_blanks;
    for day in &calendar.days {
        let mut style = Style::default().fg(THEME.muted);
        if day.date == app.today {
            style = style.fg(THEME.busy).add_modifier(Modifier::UNDERLINED);
        }
        if day.date == app.selected {
            style = style.fg(THEME.text).add_modifier(Modifier::REVERSED | Modifier::BOLD);
        }
        let marker_style = match day.marker() {
            DayMarker::Busy => Style::default().fg(THEME.busy),
            _ => Style::default().fg(THEME.dot),
        };

        spans.push(Span::styled(format!("{:>2}", day.date.day()), style));
        spans.push(Span::styled(fit(marker_text(day.marker()), CELL_WIDTH - 2), marker_style));

        column += 1;
        if column % 7 == 0 {
            lines.push(Line::from(std::mem::take(&mut spans)));
            lines.push(Line::from(""));
        }
    }
    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted))
            .title(format!(" {} ", calendar.label)),
    );
    frame.render_widget(widget, area);
}

fn draw_day_panel<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(4)])
        .split(area);

    let records = app.day_records();
    let mut lines = Vec::new();
    if records.is_empty() {
        lines.push(Line::from(Span::styled(drinklog_core::NO_DATA, Style::default().fg(THEME.muted))));
    }
    for (i, record) in records.iter().enumerate() {
        let selected = i == app.record_cursor;
        let name_style = if selected {
            Style::default().fg(THEME.text).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(THEME.text)
        };
        lines.push(Line::from(vec![
            Span::styled(if selected { "> " } else { "  " }, Style::default().fg(THEME.primary)),
            Span::styled(format!("{} {}", record.shop, record.item), name_style),
            Span::styled(format!("  ${}", record.price), Style::default().fg(THEME.text)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("    {} / {}", record.sweetness, record.ice),
            Style::default().fg(THEME.muted),
        )));
    }

    let day = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted))
            .title(format!(" {}｜共 {} 杯 ", day_heading(app.selected), records.len())),
    );
    frame.render_widget(day, chunks[0]);

    let shop = app.service.favorite(DrinkField::Shop);
    let item = app.service.favorite(DrinkField::Item);
    let favorites = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Clinic Favorite  ", Style::default().fg(THEME.muted)),
            Span::styled(shop.name, Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Addiction Item   ", Style::default().fg(THEME.muted)),
            Span::styled(item.name, Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)),
        ]),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted)),
    );
    frame.render_widget(favorites, chunks[1]);
}

fn draw_footer<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted));

    match app.input_mode {
        InputMode::Adding => {
            let prompt = "add> ";
            let input = Paragraph::new(Line::from(vec![
                Span::styled(prompt, Style::default().fg(THEME.primary)),
                Span::raw(app.input.as_str()),
            ]))
            .block(block.title(" <shop> <item> sw:<sugar> ice:<ice> p:<price> "));
            frame.render_widget(input, area);

            let typed: String = app.input.chars().take(app.cursor_position).collect();
            let x = area.x + 1 + (prompt.width() + typed.width()) as u16;
            frame.set_cursor_position((x, area.y + 1));
        }
        InputMode::Normal => {
            let text = match &app.message {
                Some(message) => Line::from(Span::styled(message.as_str(), Style::default().fg(THEME.busy))),
                None => Line::from(vec![
                    Span::styled("DAY: ", Style::default().fg(THEME.muted)),
                    Span::styled("←/→ ↑/↓  ", Style::default().fg(THEME.text)),
                    Span::styled("MONTH: ", Style::default().fg(THEME.muted)),
                    Span::styled("[ ]  ", Style::default().fg(THEME.text)),
                    Span::styled("ADD: ", Style::default().fg(THEME.muted)),
                    Span::styled("a  ", Style::default().fg(THEME.text)),
                    Span::styled("NEXT/DEL: ", Style::default().fg(THEME.muted)),
                    Span::styled("tab d  ", Style::default().fg(THEME.text)),
                    Span::styled("QUIT: ", Style::default().fg(THEME.muted)),
                    Span::styled("q", Style::default().fg(THEME.text)),
                ]),
            };
            let footer = Paragraph::new(text).alignment(Alignment::Center).block(block);
            frame.render_widget(footer, area);
        }
    }
}
