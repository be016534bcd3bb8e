//! Event handling for the TUI

use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Poll for events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Key presses only; release and repeat events are dropped (Windows reports both)
pub fn key_press(event: Event) -> Option<KeyEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(key),
        _ => None,
    }
}
