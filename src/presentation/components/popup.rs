use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};
use unicode_width::UnicodeWidthStr;

use crate::{domain::Messages, form::OptionPicker};

use super::layout::centered_rect;

/// Option list overlay for the open picker.
pub fn render_popup(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    picker: &OptionPicker,
    messages: &Messages,
) {
    if picker.options().is_empty() {
        return;
    }
    let widest = picker
        .options()
        .iter()
        .map(|option| option.label.width())
        .chain([title.width()])
        .max()
        .unwrap_or(10) as u16;
    let footer = picker.is_multi().then(|| {
        format!(
            "[a] {}  [c] {}  {}",
            messages.select_all,
            messages.clear_all,
            picker.summary_label(messages)
        )
    });
    let width = widest
        .saturating_add(10)
        .max(footer.as_deref().map(|text| text.width() as u16 + 4).unwrap_or(0));
    let height = (picker.options().len() as u16).saturating_add(if footer.is_some() { 3 } else { 2 });
    let rect = centered_rect(area, width, height.max(3));
    frame.render_widget(Clear, rect);

    let items: Vec<ListItem<'static>> = picker
        .options()
        .iter()
        .map(|option| {
            let selected = picker.is_selected(&option.id);
            let label = if picker.is_multi() {
                format!("[{}] {}", if selected { "x" } else { " " }, option.label)
            } else {
                format!("({}) {}", if selected { "*" } else { " " }, option.label)
            };
            ListItem::new(label)
        })
        .collect();
    let mut state = ListState::default();
    state.select(Some(picker.cursor().min(picker.options().len() - 1)));

    let mut block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL);
    if let Some(footer) = footer {
        block = block.title_bottom(Line::from(footer));
    }
    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, rect, &mut state);
}
