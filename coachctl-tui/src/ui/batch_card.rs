//! One batch, drawn as a bordered card

use coachctl_core::{Avatar, Batch, BatchStatus, Teacher};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{truncate, ACCENT, DIM, HIGHLIGHT, SECONDARY, SUCCESS, WARNING};

/// Rows between two cards
pub const CARD_SPACING: u16 = 1;

const ICON: &str = "▣ ";

/// Total height including borders
pub fn height(batch: &Batch) -> u16 {
    let mut rows = 2; // name + stats
    if batch.subject.is_some() {
        rows += 1;
    }
    if batch.has_schedule() {
        rows += 1;
    }
    rows + 2
}

fn plural(count: u32, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Member, note and notice counts, always in that order
pub fn stats_label(batch: &Batch) -> String {
    format!(
        "{}  {}  {}",
        plural(batch.member_count, "member"),
        plural(batch.note_count, "note"),
        plural(batch.notice_count, "notice")
    )
}

/// Green pill for active, orange for archived
pub fn status_badge(status: BatchStatus) -> Span<'static> {
    let (fg, bg) = match status {
        BatchStatus::Active => (SUCCESS, Color::Rgb(20, 60, 20)),
        BatchStatus::Archived => (WARNING, Color::Rgb(70, 45, 10)),
    };
    Span::styled(
        format!(" {} ", status.label()),
        Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD),
    )
}

/// "(R) Ravi Kumar", or "[img] Ravi Kumar" when a picture is set
pub fn teacher_label(teacher: &Teacher) -> String {
    match teacher.avatar() {
        Avatar::Picture(_) => format!("[img] {}", teacher.display_name()),
        Avatar::Initial(initial) => format!("({}) {}", initial, teacher.display_name()),
    }
}

/// Card body lines for an inner width of `width` columns
pub fn lines(batch: &Batch, width: u16) -> Vec<Line<'static>> {
    let width = width as usize;
    let mut lines = Vec::new();

    let badge = status_badge(batch.status);
    let badge_len = badge.content.chars().count();
    let name_room = width.saturating_sub(ICON.chars().count() + badge_len + 1);
    let name = truncate(&batch.name, name_room);
    let padding = width.saturating_sub(ICON.chars().count() + name.chars().count() + badge_len);

    lines.push(Line::from(vec![
        Span::styled(ICON, Style::default().fg(ACCENT)),
        Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" ".repeat(padding)),
        badge,
    ]));

    if let Some(subject) = &batch.subject {
        lines.push(Line::from(Span::styled(
            format!("  {}", truncate(subject, width.saturating_sub(2))),
            Style::default().fg(DIM),
        )));
    }

    if let Some(schedule) = batch.schedule_label() {
        lines.push(Line::from(vec![
            Span::styled("  ◷ ", Style::default().fg(SECONDARY)),
            Span::raw(truncate(&schedule, width.saturating_sub(4))),
        ]));
    }

    let stats = format!("  {}", stats_label(batch));
    let mut bottom = vec![Span::styled(stats.clone(), Style::default().fg(SECONDARY))];
    if let Some(teacher) = &batch.teacher {
        let room = width.saturating_sub(stats.chars().count() + 2);
        let label = truncate(&teacher_label(teacher), room);
        let padding = width.saturating_sub(stats.chars().count() + label.chars().count());
        bottom.push(Span::raw(" ".repeat(padding)));
        bottom.push(Span::styled(label, Style::default().fg(ACCENT)));
    }
    lines.push(Line::from(bottom));

    lines
}

pub fn render(f: &mut Frame, area: Rect, batch: &Batch, selected: bool) {
    let border = if selected { HIGHLIGHT } else { SECONDARY };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let inner_width = block.inner(area).width;
    f.render_widget(Paragraph::new(lines(batch, inner_width)).block(block), area);
}
