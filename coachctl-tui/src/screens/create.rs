//! Create-batch form

use std::sync::Arc;

use coachctl_core::{Batch, BatchService, CoachingContext, NewBatch};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::ScreenAction;

/// Form fields, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Subject,
    Days,
    StartTime,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::Subject,
        FormField::Days,
        FormField::StartTime,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Subject => "Subject",
            FormField::Days => "Days",
            FormField::StartTime => "Start time",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            FormField::Name => "e.g. JEE Morning 2025",
            FormField::Subject => "optional",
            FormField::Days => "e.g. mon, wed, fri",
            FormField::StartTime => "HH:MM, optional",
        }
    }

    fn index(&self) -> usize {
        match self {
            FormField::Name => 0,
            FormField::Subject => 1,
            FormField::Days => 2,
            FormField::StartTime => 3,
        }
    }

    fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

pub struct CreateBatchScreen {
    coaching: CoachingContext,
    service: Arc<dyn BatchService>,
    values: [String; 4],
    focused: FormField,
    error: Option<String>,
    /// Set while a create request is in flight
    pending: Option<oneshot::Receiver<coachctl_core::Result<Batch>>>,
    lifetime: CancellationToken,
}

impl CreateBatchScreen {
    pub fn new(coaching: CoachingContext, service: Arc<dyn BatchService>) -> Self {
        Self {
            coaching,
            service,
            values: Default::default(),
            focused: FormField::Name,
            error: None,
            pending: None,
            lifetime: CancellationToken::new(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn focused(&self) -> FormField {
        self.focused
    }

    pub fn value(&self, field: FormField) -> &str {
        &self.values[field.index()]
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Build the payload from the current field values
    pub fn draft(&self) -> coachctl_core::Result<NewBatch> {
        let optional = |field: FormField| {
            let value = self.value(field).trim();
            (!value.is_empty()).then(|| value.to_string())
        };

        let draft = NewBatch {
            name: self.value(FormField::Name).trim().to_string(),
            subject: optional(FormField::Subject),
            days: NewBatch::parse_days(self.value(FormField::Days))?,
            start_time: optional(FormField::StartTime),
        };
        draft.validate()?;
        Ok(draft)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ScreenAction {
        if key.code == KeyCode::Esc {
            return ScreenAction::Pop(None);
        }
        if self.is_submitting() {
            return ScreenAction::Continue;
        }

        let chord = key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focused = self.focused.next();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focused = self.focused.prev();
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => self.submit(),
            KeyCode::Backspace => {
                self.values[self.focused.index()].pop();
            }
            KeyCode::Char(c) if !chord => {
                self.values[self.focused.index()].push(c);
                self.error = None;
            }
            _ => {}
        }
        ScreenAction::Continue
    }

    /// Validate and start the create request. Validation errors show inline
    /// and nothing is sent.
    pub fn submit(&mut self) {
        if self.is_submitting() {
            return;
        }
        let draft = match self.draft() {
            Ok(draft) => draft,
            Err(err) => {
                self.error = Some(err.to_string());
                return;
            }
        };

        self.error = None;
        let (tx, rx) = oneshot::channel();
        let service = Arc::clone(&self.service);
        let coaching_id = self.coaching.id.clone();
        let token = self.lifetime.child_token();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => debug!("create request cancelled"),
                result = service.create_batch(&coaching_id, draft) => {
                    let _ = tx.send(result);
                }
            }
        });
        self.pending = Some(rx);
    }

    /// Pops with `Some(true)` once the batch exists; stays open with an
    /// inline error when the service refused it
    pub fn poll_outcome(&mut self) -> ScreenAction {
        let Some(rx) = self.pending.as_mut() else {
            return ScreenAction::Continue;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                self.finish(result)
            }
            Err(oneshot::error::TryRecvError::Empty) => ScreenAction::Continue,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.pending = None;
                ScreenAction::Continue
            }
        }
    }

    /// Wait for the create request, if any, and report what it means for the form
    pub async fn settle(&mut self) -> ScreenAction {
        let Some(rx) = self.pending.take() else {
            return ScreenAction::Continue;
        };
        match rx.await {
            Ok(result) => self.finish(result),
            Err(_) => ScreenAction::Continue,
        }
    }

    fn finish(&mut self, result: coachctl_core::Result<Batch>) -> ScreenAction {
        match result {
            Ok(batch) => {
                info!(batch_id = %batch.id, name = %batch.name, "batch created");
                ScreenAction::Pop(Some(true))
            }
            Err(err) => {
                warn!(error = %err, "failed to create batch");
                self.error = Some(format!("Error: {}", err));
                ScreenAction::Continue
            }
        }
    }
}

impl Drop for CreateBatchScreen {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{contexts, key, sample_service, Call, ScriptedService};

    fn form() -> (CreateBatchScreen, Arc<ScriptedService>) {
        let service = sample_service();
        let (coaching, _) = contexts(true);
        (CreateBatchScreen::new(coaching, service.clone()), service)
    }

    fn type_text(screen: &mut CreateBatchScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[tokio::test]
    async fn test_escape_cancels_without_result() {
        let (mut screen, service) = form();
        assert_eq!(screen.handle_key(key(KeyCode::Esc)), ScreenAction::Pop(None));
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_name_stays_open() {
        let (mut screen, service) = form();
        assert_eq!(screen.handle_key(key(KeyCode::Enter)), ScreenAction::Continue);
        assert!(!screen.is_submitting());
        assert_eq!(screen.error(), Some("Invalid name: must not be empty"));
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_tab_moves_between_fields() {
        let (mut screen, _) = form();
        assert_eq!(screen.focused(), FormField::Name);
        screen.handle_key(key(KeyCode::Tab));
        assert_eq!(screen.focused(), FormField::Subject);
        screen.handle_key(key(KeyCode::BackTab));
        screen.handle_key(key(KeyCode::BackTab));
        assert_eq!(screen.focused(), FormField::StartTime);
    }

    #[tokio::test]
    async fn test_control_chords_are_not_typed() {
        let (mut screen, _) = form();
        type_text(&mut screen, "Eve");
        screen.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL));
        screen.handle_key(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::ALT));
        screen.handle_key(KeyEvent::new(KeyCode::Char('N'), KeyModifiers::SHIFT));

        assert_eq!(screen.value(FormField::Name), "EveN");
    }

    #[tokio::test]
    async fn test_bad_days_are_reported() {
        let (mut screen, _) = form();
        type_text(&mut screen, "Evening");
        screen.handle_key(key(KeyCode::Tab));
        screen.handle_key(key(KeyCode::Tab));
        type_text(&mut screen, "mon, someday");

        assert_eq!(screen.handle_key(key(KeyCode::Enter)), ScreenAction::Continue);
        assert!(screen.error().unwrap().contains("someday"));
    }

    #[tokio::test]
    async fn test_submit_creates_and_pops_with_change() {
        let (mut screen, service) = form();
        type_text(&mut screen, "Evening Batch");
        screen.handle_key(key(KeyCode::Tab));
        type_text(&mut screen, "Biology");
        screen.handle_key(key(KeyCode::Tab));
        type_text(&mut screen, "tue, thu");
        screen.handle_key(key(KeyCode::Tab));
        type_text(&mut screen, "18:00");

        let draft = screen.draft().unwrap();
        assert_eq!(draft.subject.as_deref(), Some("Biology"));
        assert_eq!(draft.days.len(), 2);

        assert_eq!(screen.handle_key(key(KeyCode::Enter)), ScreenAction::Continue);
        assert!(screen.is_submitting());

        // Typing while the request is out does not edit the form
        screen.handle_key(key(KeyCode::Char('x')));
        assert_eq!(screen.value(FormField::StartTime), "18:00");

        assert_eq!(screen.settle().await, ScreenAction::Pop(Some(true)));
        assert_eq!(service.calls(), vec![Call::Create("Evening Batch".into())]);
    }

    #[tokio::test]
    async fn test_service_error_is_shown_inline() {
        let (mut screen, service) = form();
        type_text(&mut screen, "Evening");
        service.fail_next("quota exceeded");

        screen.handle_key(key(KeyCode::Enter));
        assert_eq!(screen.settle().await, ScreenAction::Continue);
        assert!(!screen.is_submitting());
        assert_eq!(screen.error(), Some("Error: API error (500): quota exceeded"));
    }
}
