//! Screens on the route stack
//!
//! The batches list sits at the root; the create form and the batch detail
//! view are pushed above it and report back whether anything changed.

pub mod batches;
pub mod create;
pub mod detail;

use coachctl_core::BatchId;

pub use batches::{BatchesListScreen, BodyState};
pub use create::{CreateBatchScreen, FormField};
pub use detail::{BatchDetailScreen, DetailState};

/// Where a screen wants to go next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    CreateBatch,
    BatchDetail(BatchId),
}

/// Result of handling a key on a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenAction {
    /// Stay on the current screen
    Continue,
    /// Leave the application
    Quit,
    /// Push a child screen
    Push(Route),
    /// Pop the current screen; `Some(true)` asks the parent to re-fetch
    Pop(Option<bool>),
}
