use coachctl_core::Capability;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{ACCENT, DIM, ERROR, SECONDARY};
use crate::screens::BatchesListScreen;
use crate::toast::{Toast, ToastKind};

pub fn hints(capability: Capability) -> &'static str {
    if capability.is_admin() {
        "j/k: move | Enter: open | n: new | 1-3/f: filter | r: refresh | q: quit"
    } else {
        "j/k: move | Enter: open | r: refresh | q: quit"
    }
}

fn toast_span(toast: &Toast) -> Span<'static> {
    let color = match toast.kind() {
        ToastKind::Error => ERROR,
        ToastKind::Info => ACCENT,
    };
    Span::styled(format!(" {} ", toast.message()), Style::default().fg(color))
}

/// Toast row under a child screen
pub fn render_toast(f: &mut Frame, area: Rect, toast: &Toast) {
    f.render_widget(Paragraph::new(Line::from(toast_span(toast))), area);
}

/// Render the footer: the toast if one is showing, otherwise keybind hints,
/// with the time of the last successful load on the right
pub fn render(f: &mut Frame, area: Rect, screen: &BatchesListScreen, capability: Capability) {
    let mut spans = match screen.toast() {
        Some(toast) => vec![toast_span(toast)],
        None => vec![Span::styled(
            format!(" {}", hints(capability)),
            Style::default().fg(SECONDARY),
        )],
    };

    if let Some(loaded) = screen.last_loaded() {
        let time_str = format!("updated {} ", loaded.format("%H:%M:%S"));

        // Right-aligned time
        let width = area.width as usize;
        let current_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        if current_len + time_str.len() < width {
            let padding = width - current_len - time_str.len();
            spans.push(Span::raw(" ".repeat(padding)));
            spans.push(Span::styled(time_str, Style::default().fg(DIM)));
        }
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
