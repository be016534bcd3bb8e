use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::list_body::spinner_frame;
use super::{ACCENT, DIM, ERROR, HIGHLIGHT, SECONDARY, SUCCESS};
use crate::screens::{CreateBatchScreen, FormField};

/// Render the create-batch form
pub fn render(f: &mut Frame, area: Rect, screen: &CreateBatchScreen, spinner_tick: usize) {
    let mut lines = vec![Line::from("")];

    for field in FormField::ALL {
        let focused = screen.focused() == field;
        let label_style = if focused {
            Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(SECONDARY)
        };
        let marker = if focused { "> " } else { "  " };

        let value = screen.value(field);
        let mut spans = vec![Span::styled(
            format!("{}{:<12}", marker, field.label()),
            label_style,
        )];
        if value.is_empty() && !focused {
            spans.push(Span::styled(field.placeholder(), Style::default().fg(DIM)));
        } else {
            spans.push(Span::raw(value.to_string()));
        }
        if focused {
            spans.push(Span::styled("_", Style::default().fg(SUCCESS)));
        }

        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    if screen.is_submitting() {
        lines.push(Line::from(Span::styled(
            format!("  {} Creating batch…", spinner_frame(spinner_tick)),
            Style::default().fg(DIM),
        )));
        lines.push(Line::from(""));
    }

    if let Some(error) = screen.error() {
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            Style::default().fg(ERROR),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "  Tab: next field | Shift-Tab: previous | Enter: create | Esc: cancel",
        Style::default().fg(SECONDARY),
    )));

    let block = Block::default()
        .title(" New Batch ")
        .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
