use chrono::{Datelike, NaiveDate};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
    domain::Messages,
    form::calendar::{CalendarState, DayCell, TimeOfDay},
};

const WEEK_HEADER: &str = "Mo Tu We Th Fr Sa Su";

pub fn render_calendar_panel(
    frame: &mut Frame<'_>,
    area: Rect,
    calendar: &CalendarState,
    today: NaiveDate,
    messages: &Messages,
    focused: bool,
) {
    let [grid_area, time_area, slots_area] = Layout::vertical([
        Constraint::Length(10),
        Constraint::Length(3),
        Constraint::Min(3),
    ])
    .areas(area);

    let (year, month) = calendar.cursor();
    let title = NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first| first.format(" %B %Y ").to_string())
        .unwrap_or_default();
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let mut lines = vec![Line::from(Span::styled(
        WEEK_HEADER,
        Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
    ))];
    if let Some(grid) = calendar.grid(today) {
        for week in &grid.weeks {
            let mut spans = Vec::with_capacity(14);
            for cell in week {
                spans.push(match cell {
                    Some(cell) => day_span(cell, calendar.selected_date()),
                    None => Span::raw("  "),
                });
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }
    }
    let grid = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(grid, grid_area);

    let enabled = calendar.time_choices_enabled();
    let choice = |key: &str, time: TimeOfDay| {
        let style = if !enabled {
            Style::default().fg(Color::DarkGray)
        } else if calendar.selected_time() == Some(time) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        Span::styled(format!("[{key}] {}", time.label(messages)), style)
    };
    let times = Paragraph::new(Line::from(vec![
        choice("m", TimeOfDay::Morning),
        Span::raw("   "),
        choice("p", TimeOfDay::Afternoon),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(times, time_area);

    let slot_lines: Vec<Line<'static>> = if calendar.slots().is_empty() {
        vec![Line::from(Span::styled(
            messages.no_slots.clone(),
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        calendar
            .slots()
            .iter()
            .enumerate()
            .map(|(index, slot)| Line::from(format!("{}. {}", index + 1, slot.display_text(messages))))
            .collect()
    };
    let title = format!(" {}/{} ", calendar.slots().len(), calendar.max_slots());
    let slots = Paragraph::new(slot_lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(slots, slots_area);
}

fn day_span(cell: &DayCell, selected: Option<NaiveDate>) -> Span<'static> {
    let text = format!("{:>2}", cell.date.day());
    let mut style = if cell.selectable {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    if cell.is_today {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if selected == Some(cell.date) {
        style = style.fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD);
    }
    Span::styled(text, style)
}
