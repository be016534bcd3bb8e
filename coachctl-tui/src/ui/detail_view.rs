use coachctl_core::{Batch, Capability};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::batch_card::{stats_label, status_badge, teacher_label};
use super::list_body::spinner_frame;
use super::{ACCENT, DIM, ERROR, SECONDARY};
use crate::screens::{BatchDetailScreen, DetailState};

fn field(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", label), Style::default().fg(SECONDARY)),
        Span::raw(value.into()),
    ])
}

fn batch_lines(batch: &Batch) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {:<10}", "Status"), Style::default().fg(SECONDARY)),
            status_badge(batch.status),
        ]),
        field("Subject", batch.subject.clone().unwrap_or_else(|| "-".to_string())),
        field(
            "Teacher",
            batch
                .teacher
                .as_ref()
                .map(teacher_label)
                .unwrap_or_else(|| "Unassigned".to_string()),
        ),
        field(
            "Schedule",
            batch.schedule_label().unwrap_or_else(|| "Not scheduled".to_string()),
        ),
        field("Activity", stats_label(batch)),
        field("Id", batch.id.to_string()),
    ];
    lines.push(Line::from(""));
    lines
}

/// Render the batch detail screen
pub fn render(
    f: &mut Frame,
    area: Rect,
    screen: &BatchDetailScreen,
    capability: Capability,
    spinner_tick: usize,
) {
    let (title, mut lines) = match screen.state() {
        DetailState::Loading => (
            format!(" Batch {} ", screen.batch_id()),
            vec![
                Line::from(""),
                Line::from(vec![
                    Span::styled(
                        format!("  {}", spinner_frame(spinner_tick)),
                        Style::default().fg(ACCENT),
                    ),
                    Span::styled(" Loading batch…", Style::default().fg(DIM)),
                ]),
                Line::from(""),
            ],
        ),
        DetailState::Loaded(batch) => (format!(" {} ", batch.name), batch_lines(batch)),
        DetailState::Failed(error) => (
            format!(" Batch {} ", screen.batch_id()),
            vec![
                Line::from(""),
                Line::from(Span::styled(format!("  {}", error), Style::default().fg(ERROR))),
                Line::from(""),
            ],
        ),
    };

    if screen.is_busy() && screen.batch().is_some() {
        lines.push(Line::from(Span::styled(
            format!("  {} Saving…", spinner_frame(spinner_tick)),
            Style::default().fg(DIM),
        )));
        lines.push(Line::from(""));
    }

    if let Some(message) = screen.message() {
        let color = if message.starts_with("Error") { ERROR } else { ACCENT };
        lines.push(Line::from(Span::styled(
            format!("  {}", message),
            Style::default().fg(color),
        )));
        lines.push(Line::from(""));
    }

    let hints = match (capability.is_admin(), screen.batch()) {
        (true, Some(batch)) if batch.is_active() => "a: archive | r: reload | Esc: back",
        (true, Some(_)) => "a: unarchive | r: reload | Esc: back",
        _ => "r: reload | Esc: back",
    };
    lines.push(Line::from(Span::styled(
        format!("  {}", hints),
        Style::default().fg(DIM),
    )));

    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
