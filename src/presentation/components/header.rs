use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Gauge, Paragraph},
};

use crate::wizard::{WizardPhase, WizardSession};

pub fn render_header(frame: &mut Frame<'_>, area: Rect, session: &WizardSession) {
    let [title_area, gauge_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(3)]).areas(area);

    let heading = session
        .active_step()
        .map(|step| step.heading.as_str())
        .unwrap_or_else(|| session.widget_id());
    let title = Paragraph::new(Line::from(heading.to_string())).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(title, title_area);

    let progress = session.progress();
    let label = match session.phase() {
        WizardPhase::Welcome => format!("0 / {}", progress.total),
        _ => format!("Step {} of {}", progress.current, progress.total),
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .ratio(progress.ratio().clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, gauge_area);
}
