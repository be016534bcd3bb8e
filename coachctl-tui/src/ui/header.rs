use coachctl_core::Capability;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{ACCENT, DIM, SECONDARY, SUCCESS};

/// "1 batch", "3 batches"
pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 batch".to_string()
    } else {
        format!("{} batches", count)
    }
}

/// Render the header: title, count and (admins) the create action
pub fn render(f: &mut Frame, area: Rect, count: usize, capability: Capability) {
    let mut spans = vec![
        Span::styled(
            " Batches ",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(count_label(count), Style::default().fg(DIM)),
    ];

    if capability.is_admin() {
        let action = "[n] + New ";

        // Right-aligned
        let width = area.width as usize;
        let current_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let padding = width.saturating_sub(current_len + action.len());

        spans.push(Span::raw(" ".repeat(padding)));
        spans.push(Span::styled(
            action,
            Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(SECONDARY)),
    );

    f.render_widget(paragraph, area);
}
