//! Content area: spinner, empty state, or the card list

use coachctl_core::{Batch, Capability};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::batch_card::{self, CARD_SPACING};
use super::layout::Layout;
use super::{ACCENT, DIM, SECONDARY, SUCCESS};
use crate::screens::{BatchesListScreen, BodyState};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Rows left blank under the last card so it never touches the footer
const BOTTOM_PADDING: u16 = 1;

pub fn render(
    f: &mut Frame,
    area: Rect,
    screen: &BatchesListScreen,
    capability: Capability,
    spinner_tick: usize,
) {
    match screen.body_state() {
        BodyState::Loading => render_spinner(f, area, spinner_tick),
        BodyState::Empty => render_empty(f, area, capability),
        BodyState::Populated => render_cards(f, area, screen.batches(), screen.selected()),
    }
}

pub(crate) fn spinner_frame(tick: usize) -> &'static str {
    SPINNER[tick % SPINNER.len()]
}

fn render_spinner(f: &mut Frame, area: Rect, tick: usize) {
    let frame = spinner_frame(tick);
    let line = Line::from(vec![
        Span::styled(frame, Style::default().fg(ACCENT)),
        Span::styled(" Loading batches…", Style::default().fg(DIM)),
    ]);

    let paragraph = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(paragraph, Layout::centered(area, area.width, 1));
}

fn render_empty(f: &mut Frame, area: Rect, capability: Capability) {
    let (headline, supporting) = if capability.is_admin() {
        ("No batches yet", "Create a batch to start organising your students.")
    } else {
        ("No batches assigned", "Batches you are added to will show up here.")
    };

    let mut lines = vec![
        Line::from(Span::styled("▦", Style::default().fg(SECONDARY))),
        Line::from(""),
        Line::from(Span::styled(
            headline,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(supporting, Style::default().fg(DIM))),
    ];

    if capability.is_admin() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[n] Create Batch",
            Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD),
        )));
    }

    let height = lines.len() as u16;
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(paragraph, Layout::centered(area, area.width, height));
}

/// Index of the first card to draw so that `selected` is on screen
fn first_visible(batches: &[Batch], selected: usize, rows: u16) -> usize {
    let mut first = selected;
    let mut used = batches.get(selected).map(batch_card::height).unwrap_or(0);

    while first > 0 {
        let next = used + CARD_SPACING + batch_card::height(&batches[first - 1]);
        if next > rows {
            break;
        }
        used = next;
        first -= 1;
    }

    first
}

fn render_cards(f: &mut Frame, area: Rect, batches: &[Batch], selected: usize) {
    let rows = area.height.saturating_sub(BOTTOM_PADDING);
    let bottom = area.y + rows;
    let first = first_visible(batches, selected, rows);

    let mut y = area.y;
    for (idx, batch) in batches.iter().enumerate().skip(first) {
        if y >= bottom {
            break;
        }
        let height = batch_card::height(batch).min(bottom - y);
        let card_area = Rect {
            x: area.x,
            y,
            width: area.width,
            height,
        };
        batch_card::render(f, card_area, batch, idx == selected);
        y = y.saturating_add(height + CARD_SPACING);
    }
}
