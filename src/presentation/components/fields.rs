use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::{
    domain::Messages,
    form::{FieldState, FieldValue, StepState},
    wizard::Notice,
};

pub fn render_fields(
    frame: &mut Frame<'_>,
    area: Rect,
    step: &StepState,
    messages: &Messages,
    focus: Option<&str>,
    notice: Option<&Notice>,
) {
    let content_width = area.width.saturating_sub(6);
    let mut items = Vec::new();
    let mut selected = None;
    let mut cursor: Option<(usize, u16)> = None;
    let mut line_offset = 0usize;

    for (index, field) in step.visible_fields().enumerate() {
        let focused = focus == Some(field.id.as_str());
        let notice = notice.filter(|notice| notice.field_id == field.id);
        let render = field_lines(field, messages, focused, notice, content_width);
        if focused {
            selected = Some(index);
            cursor = render.cursor.map(|(line, column)| (line_offset + line, column));
        }
        line_offset += render.lines.len();
        items.push(ListItem::new(render.lines));
    }

    let mut state = ListState::default();
    state.select(selected);
    let title = format!(" {} ", step.heading);
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut state);

    if let Some((line, column)) = cursor {
        let max_line = area.height.saturating_sub(2) as usize;
        if line < max_line {
            // 1 for the border, 2 for the highlight symbol, 2 for the box edge.
            let x = area.x.saturating_add(5).saturating_add(column);
            let y = area.y.saturating_add(1).saturating_add(line as u16);
            frame.set_cursor_position((x.min(area.right().saturating_sub(2)), y));
        }
    }
}

struct FieldLines {
    lines: Vec<Line<'static>>,
    /// (line, column) of the text cursor inside the field block.
    cursor: Option<(usize, u16)>,
}

fn field_lines(
    field: &FieldState,
    messages: &Messages,
    focused: bool,
    notice: Option<&Notice>,
    max_width: u16,
) -> FieldLines {
    let mut lines = Vec::new();
    let mut label = field.label.clone();
    if field.required {
        label.push_str(" *");
    }
    let label_style = match (field.disabled, focused) {
        (true, _) => Style::default().fg(Color::DarkGray),
        (false, true) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        (false, false) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    };
    lines.push(Line::from(Span::styled(label, label_style)));

    let width = max_width.max(4) as usize;
    let shown = field.display_value(messages);
    let mut segments: Vec<String> = wrap(&shown, width)
        .into_iter()
        .map(|segment| segment.into_owned())
        .collect();
    if segments.is_empty() {
        segments.push(String::new());
    }

    let mut cursor = None;
    let value_style = if field.disabled {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    if focused && !field.disabled {
        let inner = segments
            .iter()
            .map(|segment| segment.width())
            .max()
            .unwrap_or(0)
            .max(8);
        let border = Style::default().fg(Color::Yellow);
        let edge = "─".repeat(inner + 2);
        lines.push(Line::from(Span::styled(format!("┌{edge}┐"), border)));
        for segment in &segments {
            let pad = " ".repeat(inner.saturating_sub(segment.width()));
            lines.push(Line::from(vec![
                Span::styled("│ ", border),
                Span::styled(format!("{segment}{pad}"), value_style.add_modifier(Modifier::BOLD)),
                Span::styled(" │", border),
            ]));
        }
        if matches!(field.value, FieldValue::Text(_)) {
            let last = segments.last().map(|segment| segment.width()).unwrap_or(0);
            cursor = Some((lines.len() - 1, last as u16));
        }
        lines.push(Line::from(Span::styled(format!("└{edge}┘"), border)));
    } else {
        for segment in segments {
            lines.push(Line::from(Span::styled(format!("  {segment}"), value_style)));
        }
    }

    if let Some(notice) = notice {
        lines.push(Line::from(Span::styled(
            format!("  {}", notice.message),
            Style::default().fg(Color::Yellow),
        )));
    }
    if let Some(error) = &field.error {
        for segment in wrap(error, width) {
            lines.push(Line::from(Span::styled(
                format!("  ! {segment}"),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
        }
    }
    lines.push(Line::from(""));

    FieldLines { lines, cursor }
}
