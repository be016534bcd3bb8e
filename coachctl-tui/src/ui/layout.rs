use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// Layout manager for the TUI
pub struct Layout;

impl Layout {
    /// Create the list layout with header, optional filter bar, body and footer
    ///
    /// Returns: (header_area, filter_area, body_area, footer_area)
    pub fn main(area: Rect, show_filters: bool) -> (Rect, Option<Rect>, Rect, Rect) {
        let filter_height = if show_filters { 1 } else { 0 };

        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),             // Header
                Constraint::Length(filter_height), // Filter chips
                Constraint::Min(0),                // Body
                Constraint::Length(1),             // Footer
            ])
            .split(area);

        let filters = show_filters.then_some(chunks[1]);
        (chunks[0], filters, chunks[2], chunks[3])
    }

    /// Child screen area, with a bottom row for a toast when one is showing
    pub fn child(area: Rect, show_toast: bool) -> (Rect, Option<Rect>) {
        if !show_toast {
            return (area, None);
        }
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    }

    /// Center a box of at most `width` x `height` inside `area`
    pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width);
        let height = height.min(area.height);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_row_only_for_admins() {
        let area = Rect::new(0, 0, 80, 24);

        let (header, filters, body, footer) = Layout::main(area, true);
        assert_eq!(header.height, 2);
        assert_eq!(filters.map(|f| f.height), Some(1));
        assert_eq!(body.height, 20);
        assert_eq!(footer.y, 23);

        let (_, filters, body, _) = Layout::main(area, false);
        assert!(filters.is_none());
        assert_eq!(body.height, 21);
    }

    #[test]
    fn test_child_reserves_toast_row() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(Layout::child(area, false), (area, None));

        let (body, toast) = Layout::child(area, true);
        assert_eq!(body.height, 23);
        assert_eq!(toast, Some(Rect::new(0, 23, 80, 1)));
    }

    #[test]
    fn test_centered_clamps_to_area() {
        let area = Rect::new(10, 5, 20, 6);
        assert_eq!(Layout::centered(area, 10, 2), Rect::new(15, 7, 10, 2));
        assert_eq!(Layout::centered(area, 50, 50), area);
    }
}
