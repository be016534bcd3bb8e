use coachctl_core::BatchFilter;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{ACCENT, SECONDARY};

/// Three single-select chips; the caller only renders this for admins
pub fn render(f: &mut Frame, area: Rect, selected: BatchFilter) {
    let mut spans = vec![Span::raw(" ")];

    for (idx, filter) in BatchFilter::ALL.iter().enumerate() {
        let style = if *filter == selected {
            Style::default()
                .fg(Color::Black)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(SECONDARY)
        };

        spans.push(Span::styled(format!(" {} {} ", idx + 1, filter.label()), style));
        spans.push(Span::raw(" "));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::render_to_string;

    #[test]
    fn test_chips_in_order_with_selection() {
        let out = render_to_string(40, 1, |f| render(f, f.area(), BatchFilter::Active));
        assert_eq!(out.trim_end(), "  1 All    2 Active    3 Archived");

        let backend = ratatui::backend::TestBackend::new(40, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|f| render(f, f.area(), BatchFilter::Active))
            .unwrap();

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(10u16, 0u16)].symbol(), "2");
        assert_eq!(buffer[(10u16, 0u16)].bg, ACCENT);
        assert_ne!(buffer[(2u16, 0u16)].bg, ACCENT);
    }
}
