//! Single batch view
//!
//! Loads and status changes run as background tasks so the event loop keeps
//! drawing and reading keys while the service answers.

use std::sync::Arc;

use coachctl_core::{
    Batch, BatchId, BatchService, BatchStatus, Capability, CoachingContext, UserContext,
};
use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::ScreenAction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Loaded(Batch),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request {
    Load,
    SetStatus(BatchStatus),
}

#[derive(Debug)]
struct DetailOutcome {
    generation: u64,
    request: Request,
    result: coachctl_core::Result<Batch>,
}

pub struct BatchDetailScreen {
    coaching: CoachingContext,
    user: UserContext,
    batch_id: BatchId,
    service: Arc<dyn BatchService>,
    state: DetailState,
    /// Set once the batch was modified here; reported back on pop
    changed: bool,
    message: Option<String>,

    lifetime: CancellationToken,
    inflight: Option<(u64, CancellationToken)>,
    generation: u64,
    outcomes_tx: mpsc::UnboundedSender<DetailOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<DetailOutcome>,
}

impl BatchDetailScreen {
    /// Show the screen in its loading state and start fetching the batch
    pub fn open(
        coaching: CoachingContext,
        batch_id: BatchId,
        user: UserContext,
        service: Arc<dyn BatchService>,
    ) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        let mut screen = Self {
            coaching,
            user,
            batch_id,
            service,
            state: DetailState::Loading,
            changed: false,
            message: None,
            lifetime: CancellationToken::new(),
            inflight: None,
            generation: 0,
            outcomes_tx,
            outcomes_rx,
        };
        screen.start(Request::Load);
        screen
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn batch(&self) -> Option<&Batch> {
        match &self.state {
            DetailState::Loaded(batch) => Some(batch),
            DetailState::Loading | DetailState::Failed(_) => None,
        }
    }

    pub fn batch_id(&self) -> &BatchId {
        &self.batch_id
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn capability(&self) -> Capability {
        Capability::resolve(&self.coaching, &self.user)
    }

    /// True while a load or status change is in flight
    pub fn is_busy(&self) -> bool {
        self.inflight.is_some()
    }

    pub fn reload(&mut self) {
        self.state = DetailState::Loading;
        self.start(Request::Load);
    }

    /// Archive an active batch or restore an archived one
    pub fn toggle_status(&mut self) {
        if !self.capability().is_admin() || self.is_busy() {
            return;
        }
        let Some(target) = self.batch().map(|b| b.status.toggled()) else {
            return;
        };
        self.start(Request::SetStatus(target));
    }

    fn start(&mut self, request: Request) {
        if let Some((generation, token)) = self.inflight.take() {
            debug!(generation, "cancelling superseded detail request");
            token.cancel();
        }

        self.generation += 1;
        let generation = self.generation;
        let token = self.lifetime.child_token();

        let service = Arc::clone(&self.service);
        let coaching_id = self.coaching.id.clone();
        let batch_id = self.batch_id.clone();
        let tx = self.outcomes_tx.clone();
        let task_token = token.clone();

        tokio::spawn(async move {
            let call = async {
                match request {
                    Request::Load => service.get_batch(&coaching_id, &batch_id).await,
                    Request::SetStatus(status) => {
                        service.set_batch_status(&coaching_id, &batch_id, status).await
                    }
                }
            };
            tokio::select! {
                _ = task_token.cancelled() => {
                    debug!(generation, ?request, "detail request cancelled");
                }
                result = call => {
                    let _ = tx.send(DetailOutcome { generation, request, result });
                }
            }
        });

        self.inflight = Some((generation, token));
    }

    /// Apply every outcome that has already arrived, without waiting
    pub fn poll_outcomes(&mut self) {
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            self.apply(outcome);
        }
    }

    /// Wait until no request is in flight
    pub async fn settle(&mut self) {
        while self.inflight.is_some() {
            match self.outcomes_rx.recv().await {
                Some(outcome) => self.apply(outcome),
                None => break,
            }
        }
    }

    fn apply(&mut self, outcome: DetailOutcome) {
        match &self.inflight {
            Some((generation, _)) if *generation == outcome.generation => {}
            _ => return,
        }
        self.inflight = None;

        match (outcome.request, outcome.result) {
            (Request::Load, Ok(batch)) => self.state = DetailState::Loaded(batch),
            (Request::Load, Err(err)) => {
                warn!(batch_id = %self.batch_id, error = %err, "failed to load batch");
                self.state = DetailState::Failed(format!("Error: {}", err));
            }
            (Request::SetStatus(_), Ok(batch)) => {
                info!(batch_id = %batch.id, status = %batch.status, "batch status changed");
                self.message = Some(format!("Marked {}", batch.status.label()));
                self.state = DetailState::Loaded(batch);
                self.changed = true;
            }
            (Request::SetStatus(_), Err(err)) => {
                warn!(batch_id = %self.batch_id, error = %err, "failed to change batch status");
                self.message = Some(format!("Error: {}", err));
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ScreenAction {
        self.message = None;

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => {
                ScreenAction::Pop(Some(self.changed))
            }
            KeyCode::Char('a') => {
                self.toggle_status();
                ScreenAction::Continue
            }
            KeyCode::Char('r') => {
                self.reload();
                ScreenAction::Continue
            }
            _ => ScreenAction::Continue,
        }
    }
}

impl Drop for BatchDetailScreen {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
