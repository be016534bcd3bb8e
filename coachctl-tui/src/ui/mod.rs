//! UI rendering using ratatui

pub mod batch_card;
pub mod create_form;
pub mod detail_view;
pub mod filter_bar;
pub mod footer;
pub mod header;
pub mod layout;
pub mod list_body;

use coachctl_core::Capability;
use ratatui::{style::Color, Frame};

use crate::app::{App, ChildScreen};
use crate::screens::BatchesListScreen;

/// Primary accent color
pub(crate) const ACCENT: Color = Color::Cyan;
/// Secondary color for less important elements
pub(crate) const SECONDARY: Color = Color::DarkGray;
/// Highlight color for the selected card
pub(crate) const HIGHLIGHT: Color = Color::Yellow;
/// Success color (active badge, create actions)
pub(crate) const SUCCESS: Color = Color::Green;
/// Archived badge
pub(crate) const WARNING: Color = Color::Rgb(255, 165, 0);
pub(crate) const ERROR: Color = Color::Red;
/// Dim text color
pub(crate) const DIM: Color = Color::Rgb(100, 100, 100);

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    // One capability per pass, threaded into every view below
    let capability = app.list.capability();

    let Some(child) = &app.child else {
        render_list(frame, &app.list, capability, app.spinner_tick());
        return;
    };

    // List toasts stay visible while a child screen is open
    let toast = app.list.toast();
    let (body, toast_area) = layout::Layout::child(frame.area(), toast.is_some());
    match child {
        ChildScreen::Create(screen) => {
            create_form::render(frame, body, screen, app.spinner_tick())
        }
        ChildScreen::Detail(screen) => {
            detail_view::render(frame, body, screen, capability, app.spinner_tick())
        }
    }
    if let (Some(area), Some(toast)) = (toast_area, toast) {
        footer::render_toast(frame, area, toast);
    }
}

/// Header, filter chips (admins only), body and footer
pub fn render_list(
    frame: &mut Frame,
    screen: &BatchesListScreen,
    capability: Capability,
    spinner_tick: usize,
) {
    let (header_area, filter_area, body_area, footer_area) =
        layout::Layout::main(frame.area(), capability.is_admin());

    header::render(frame, header_area, screen.batches().len(), capability);
    if let Some(area) = filter_area {
        filter_bar::render(frame, area, screen.filter());
    }
    list_body::render(frame, body_area, screen, capability, spinner_tick);
    footer::render(frame, footer_area, screen, capability);
}

/// Cut `text` to `max` characters, ending with an ellipsis when shortened
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('…');
    out
}
