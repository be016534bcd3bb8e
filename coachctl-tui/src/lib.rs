pub mod app;
pub mod commands;
pub mod event;
pub mod screens;
pub mod terminal;
pub mod toast;
pub mod tracing_setup;
pub mod ui;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use app::{App, ChildScreen};
pub use screens::{BatchesListScreen, Route, ScreenAction};
pub use toast::{Toast, ToastKind};
