use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::super::view::BannerTone;

pub fn render_banner(frame: &mut Frame<'_>, area: Rect, text: &str, tone: BannerTone) {
    let color = match tone {
        BannerTone::Info => Color::Cyan,
        BannerTone::Success => Color::Green,
        BannerTone::Error => Color::Red,
    };
    let banner = Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    frame.render_widget(banner, area);
}
