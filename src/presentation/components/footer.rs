use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::wizard::{WizardPhase, WizardSession};

use super::super::view::ViewContext;

pub fn render_footer(frame: &mut Frame<'_>, area: Rect, session: &WizardSession, ctx: &ViewContext<'_>) {
    let [actions_area, status_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Length(1)]).areas(area);

    if let Some(help) = ctx.help {
        let actions = Paragraph::new(format!("Actions: {help}"))
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(actions, actions_area);
    }

    let errors = session.active_step().map(|step| step.error_count()).unwrap_or(0);
    let badge = match session.phase() {
        WizardPhase::Submitted => Span::styled("[sent]", Style::default().fg(Color::Green)),
        WizardPhase::LockedByTimeout => Span::styled("[locked]", Style::default().fg(Color::Red)),
        WizardPhase::Submitting => Span::styled("[...]", Style::default().fg(Color::Cyan)),
        _ if errors > 0 => Span::styled(
            format!("[! {errors}]"),
            Style::default().fg(Color::Red).bg(Color::Black),
        ),
        _ => Span::styled("[ok]", Style::default().fg(Color::Green)),
    };

    let mut status = if ctx.status.trim().is_empty() {
        "Ready".to_string()
    } else {
        ctx.status.to_string()
    };
    if let Some(notice) = session.notice() {
        status.push_str(" • ");
        status.push_str(&notice.message);
    }
    let line = Line::from(vec![Span::raw(status), Span::raw(" "), badge]);
    frame.render_widget(Paragraph::new(line), status_area);
}
