use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
};

use crate::wizard::{WizardPhase, WizardSession};

use super::components::{
    render_banner, render_calendar_panel, render_fields, render_footer, render_header,
    render_popup,
};

/// Host-side view state: focus and the status line live in the app layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewContext<'a> {
    pub focus: Option<&'a str>,
    pub status: &'a str,
    pub help: Option<&'a str>,
}

/// Mounts the wizard surface into `area`.
pub fn render(frame: &mut Frame<'_>, area: Rect, session: &WizardSession, ctx: &ViewContext<'_>) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(6),
        Constraint::Length(3),
    ])
    .areas(area);

    render_header(frame, header, session);

    let messages = session.messages();
    match session.phase() {
        WizardPhase::Welcome => render_banner(frame, body, &messages.welcome, BannerTone::Info),
        WizardPhase::Submitted => {
            render_banner(frame, body, &messages.submitted, BannerTone::Success)
        }
        WizardPhase::LockedByTimeout => {
            render_banner(frame, body, &messages.locked, BannerTone::Error)
        }
        WizardPhase::Step(_) | WizardPhase::Submitting | WizardPhase::SubmitFailed => {
            render_step(frame, body, session, ctx)
        }
    }

    render_footer(frame, footer, session, ctx);

    if let Some(field) = session.open_picker_id().and_then(|id| session.field(id))
        && let Some(picker) = field.picker()
    {
        render_popup(frame, area, &field.label, picker, messages);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BannerTone {
    Info,
    Success,
    Error,
}

fn render_step(frame: &mut Frame<'_>, area: Rect, session: &WizardSession, ctx: &ViewContext<'_>) {
    let Some(step) = session.active_step() else {
        return;
    };
    let messages = session.messages();

    let mut area = area;
    let banner = match session.phase() {
        WizardPhase::Submitting => Some((messages.submitting.as_str(), BannerTone::Info)),
        WizardPhase::SubmitFailed => Some((messages.submit_failed.as_str(), BannerTone::Error)),
        _ => None,
    };
    if let Some((text, tone)) = banner {
        let [top, rest] = Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(area);
        render_banner(frame, top, text, tone);
        area = rest;
    }

    let calendar = step
        .visible_fields()
        .find_map(|field| field.calendar().map(|calendar| (field, calendar)));
    match calendar {
        Some((field, calendar)) => {
            let [list, panel] =
                Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                    .areas(area);
            render_fields(frame, list, step, messages, ctx.focus, session.notice());
            let focused = ctx.focus == Some(field.id.as_str());
            render_calendar_panel(frame, panel, calendar, session.today(), messages, focused);
        }
        None => render_fields(frame, area, step, messages, ctx.focus, session.notice()),
    }
}
