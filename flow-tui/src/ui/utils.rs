use crate::app::TextInput;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Span;

use super::theme::Palette;

/// Helper function to create a centered rectangle
pub fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height.saturating_sub(height)) / 2),
            Constraint::Length(height.min(r.height)),
            Constraint::Length((r.height.saturating_sub(height)) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((r.width.saturating_sub(width)) / 2),
            Constraint::Length(width.min(r.width)),
            Constraint::Length((r.width.saturating_sub(width)) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Input text with a block cursor when focused, or a placeholder when empty.
pub fn input_text(input: &TextInput, focused: bool, placeholder: &str) -> String {
    if focused {
        let (before, after) = input.split_at_cursor();
        format!("{}█{}", before, after)
    } else if input.value.is_empty() {
        placeholder.to_string()
    } else {
        input.value.clone()
    }
}

/// `key: label` pairs for the bottom hint rows.
pub fn key_hints<'a>(palette: &Palette, hints: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (i, (key, label)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", palette.dim()));
        }
        spans.push(Span::styled(*key, palette.accent()));
        spans.push(Span::styled(format!(": {}", label), palette.dim()));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_fits_inside_small_areas() {
        let area = Rect::new(0, 0, 20, 10);
        let popup = centered_rect(60, 14, area);
        assert!(popup.width <= area.width);
        assert!(popup.height <= area.height);

        let popup = centered_rect(10, 4, area);
        assert_eq!((popup.x, popup.y, popup.width, popup.height), (5, 3, 10, 4));
    }

    #[test]
    fn input_text_marks_the_cursor_only_when_focused() {
        let mut input = TextInput::from_str("abc");
        input.move_left();
        assert_eq!(input_text(&input, true, "-"), "ab█c");
        assert_eq!(input_text(&input, false, "-"), "abc");
        assert_eq!(input_text(&TextInput::new(), false, "-"), "-");
    }
}
