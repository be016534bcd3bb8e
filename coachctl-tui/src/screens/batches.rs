//! Batches list: fetch orchestration and view state

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use coachctl_core::{
    Batch, BatchFilter, BatchQuery, BatchService, Capability, CoachingContext, UserContext,
};
use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{Route, ScreenAction};
use crate::toast::Toast;

/// Completed fetch, tagged with the generation that issued it
#[derive(Debug)]
pub struct FetchOutcome {
    generation: u64,
    result: coachctl_core::Result<Vec<Batch>>,
}

#[derive(Debug)]
struct InFlight {
    generation: u64,
    token: CancellationToken,
}

/// What the content area shows, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyState {
    Loading,
    Empty,
    Populated,
}

/// Batches of one coaching, as seen by one user
pub struct BatchesListScreen {
    coaching: CoachingContext,
    user: UserContext,
    service: Arc<dyn BatchService>,

    batches: Vec<Batch>,
    filter: BatchFilter,
    selected: usize,
    last_loaded: Option<DateTime<Local>>,

    /// Cancelled when the screen is disposed; every fetch token is a child of it
    lifetime: CancellationToken,
    inflight: Option<InFlight>,
    generation: u64,
    outcomes_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<FetchOutcome>,

    toast: Option<Toast>,
    toast_ttl: Duration,
}

impl BatchesListScreen {
    pub fn new(
        coaching: CoachingContext,
        user: UserContext,
        service: Arc<dyn BatchService>,
        toast_ttl: Duration,
    ) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();

        Self {
            coaching,
            user,
            service,
            batches: Vec::new(),
            filter: BatchFilter::All,
            selected: 0,
            last_loaded: None,
            lifetime: CancellationToken::new(),
            inflight: None,
            generation: 0,
            outcomes_tx,
            outcomes_rx,
            toast: None,
            toast_ttl,
        }
    }

    /// Resolved fresh on every call; callers thread the value through a render pass
    pub fn capability(&self) -> Capability {
        Capability::resolve(&self.coaching, &self.user)
    }

    pub fn coaching(&self) -> &CoachingContext {
        &self.coaching
    }

    pub fn user(&self) -> &UserContext {
        &self.user
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn filter(&self) -> BatchFilter {
        self.filter
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_batch(&self) -> Option<&Batch> {
        self.batches.get(self.selected)
    }

    pub fn last_loaded(&self) -> Option<DateTime<Local>> {
        self.last_loaded
    }

    /// True exactly while a fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.inflight.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    pub fn body_state(&self) -> BodyState {
        if self.is_loading() {
            BodyState::Loading
        } else if self.batches.is_empty() {
            BodyState::Empty
        } else {
            BodyState::Populated
        }
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    /// Show an informational toast in the footer
    pub fn notify(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::info(message, self.toast_ttl));
    }

    pub fn dismiss_toast(&mut self) -> bool {
        self.toast.take().is_some()
    }

    pub fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
    }

    /// First fetch after the screen is shown
    pub fn mount(&mut self) {
        info!(coaching_id = %self.coaching.id, capability = ?self.capability(), "batches list mounted");
        self.load();
    }

    /// Pull-to-refresh
    pub fn refresh(&mut self) {
        self.load();
    }

    /// Start a fetch for the current capability and filter, cancelling any
    /// fetch still in flight.
    pub fn load(&mut self) {
        if self.is_disposed() {
            debug!("load ignored: screen disposed");
            return;
        }

        if let Some(previous) = self.inflight.take() {
            debug!(generation = previous.generation, "cancelling superseded fetch");
            previous.token.cancel();
        }

        self.generation += 1;
        let generation = self.generation;
        let token = self.lifetime.child_token();
        let query = BatchQuery::resolve(self.capability(), self.filter);

        debug!(generation, ?query, "fetching batches");

        let service = Arc::clone(&self.service);
        let coaching_id = self.coaching.id.clone();
        let tx = self.outcomes_tx.clone();
        let task_token = token.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {
                    debug!(generation, "fetch cancelled");
                }
                result = query.run(service.as_ref(), &coaching_id) => {
                    if tx.send(FetchOutcome { generation, result }).is_err() {
                        debug!(generation, "screen dropped before fetch completed");
                    }
                }
            }
        });

        self.inflight = Some(InFlight { generation, token });
    }

    /// Select a filter chip. Re-fetches even when the value is unchanged.
    /// Members have no filter control, so this is a no-op for them.
    pub fn select_filter(&mut self, filter: BatchFilter) {
        if !self.capability().is_admin() {
            debug!(?filter, "filter ignored for non-admin");
            return;
        }

        self.filter = filter;
        self.load();
    }

    pub fn cycle_filter(&mut self) {
        self.select_filter(self.filter.next());
    }

    /// A child screen was popped. Returns whether a re-fetch was started.
    pub fn on_route_result(&mut self, result: Option<bool>) -> bool {
        if result == Some(true) {
            self.load();
            true
        } else {
            false
        }
    }

    /// Apply every outcome that has already arrived, without waiting
    pub fn poll_outcomes(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            if self.apply(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait until no fetch is in flight
    pub async fn settle(&mut self) {
        while self.inflight.is_some() {
            match self.outcomes_rx.recv().await {
                Some(outcome) => {
                    self.apply(outcome);
                }
                None => break,
            }
        }
    }

    /// Returns false when the outcome was ignored (stale, or screen disposed)
    fn apply(&mut self, outcome: FetchOutcome) -> bool {
        if self.is_disposed() {
            debug!(generation = outcome.generation, "outcome ignored: screen disposed");
            return false;
        }

        match &self.inflight {
            Some(current) if current.generation == outcome.generation => {}
            _ => {
                debug!(generation = outcome.generation, "outcome ignored: superseded");
                return false;
            }
        }

        self.inflight = None;

        match outcome.result {
            Ok(batches) => {
                debug!(generation = outcome.generation, count = batches.len(), "batches loaded");
                self.batches = batches;
                self.selected = self.selected.min(self.batches.len().saturating_sub(1));
                self.last_loaded = Some(Local::now());
            }
            Err(err) => {
                // Keep whatever was on screen before
                warn!(generation = outcome.generation, error = %err, "failed to load batches");
                self.toast = Some(Toast::error(format!("Error: {}", err), self.toast_ttl));
            }
        }

        true
    }

    /// Tear down: cancel any in-flight fetch and refuse further updates
    pub fn dispose(&mut self) {
        if !self.lifetime.is_cancelled() {
            debug!("batches list disposed");
            self.lifetime.cancel();
        }
        self.inflight = None;
    }

    pub fn select_next(&mut self) {
        if !self.batches.is_empty() {
            self.selected = (self.selected + 1) % self.batches.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.batches.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.batches.len() - 1);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ScreenAction {
        let capability = self.capability();

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => ScreenAction::Quit,

            KeyCode::Char('j') | KeyCode::Down => {
                self.select_next();
                ScreenAction::Continue
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.select_prev();
                ScreenAction::Continue
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.selected = 0;
                ScreenAction::Continue
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = self.batches.len().saturating_sub(1);
                ScreenAction::Continue
            }

            KeyCode::Enter => match self.selected_batch() {
                Some(batch) if !self.is_loading() => {
                    ScreenAction::Push(Route::BatchDetail(batch.id.clone()))
                }
                _ => ScreenAction::Continue,
            },

            KeyCode::Char('n') if capability.is_admin() => ScreenAction::Push(Route::CreateBatch),

            KeyCode::Char('r') => {
                self.refresh();
                ScreenAction::Continue
            }

            KeyCode::Char(c @ '1'..='3') if capability.is_admin() => {
                let index = (c as usize) - ('1' as usize);
                self.select_filter(BatchFilter::ALL[index]);
                ScreenAction::Continue
            }
            KeyCode::Char('f') if capability.is_admin() => {
                self.cycle_filter();
                ScreenAction::Continue
            }

            _ => ScreenAction::Continue,
        }
    }
}

impl Drop for BatchesListScreen {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
