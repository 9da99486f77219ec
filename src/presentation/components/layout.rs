use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Rectangle of at most `width` x `height` centred in `area`.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centres_and_clamps() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_rect(area, 20, 4), Rect::new(10, 3, 20, 4));
        assert_eq!(centered_rect(area, 80, 40), area);
    }
}
