//! Shared helpers for screen and rendering tests

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use coachctl_core::{
    Batch, BatchId, BatchService, BatchStatus, CoachError, CoachingContext, CoachingRole, Fixture,
    MemoryBatchService, NewBatch, Teacher, UserContext,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::oneshot;

/// A service call, as recorded by [`ScriptedService`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(Option<BatchStatus>),
    Mine,
    Create(String),
    Get(BatchId),
    SetStatus(BatchId, BatchStatus),
}

enum Step {
    Fail(String),
    Hang(oneshot::Sender<()>),
}

/// Signals when the future holding it is dropped
struct DropSignal(Option<oneshot::Sender<()>>);

impl Drop for DropSignal {
    fn drop(&mut self) {
        if let Some(tx) = self.0.take() {
            let _ = tx.send(());
        }
    }
}

/// Memory-backed service that records calls and can be told to fail or hang
pub struct ScriptedService {
    inner: MemoryBatchService,
    calls: Mutex<Vec<Call>>,
    plan: Mutex<VecDeque<Step>>,
}

impl ScriptedService {
    pub fn new(inner: MemoryBatchService) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            plan: Mutex::new(VecDeque::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Next call fails with an API error carrying `message`
    pub fn fail_next(&self, message: &str) {
        self.plan
            .lock()
            .unwrap()
            .push_back(Step::Fail(message.to_string()));
    }

    /// Next call never completes; `dropped` fires when it is cancelled
    pub fn hang_next(&self, dropped: oneshot::Sender<()>) {
        self.plan.lock().unwrap().push_back(Step::Hang(dropped));
    }

    async fn record(&self, call: Call) -> coachctl_core::Result<()> {
        self.calls.lock().unwrap().push(call);
        let step = self.plan.lock().unwrap().pop_front();

        match step {
            None => Ok(()),
            Some(Step::Fail(message)) => Err(CoachError::api(500, message)),
            Some(Step::Hang(dropped)) => {
                let _signal = DropSignal(Some(dropped));
                std::future::pending::<()>().await;
                unreachable!("pending future completed")
            }
        }
    }
}

#[async_trait]
impl BatchService for ScriptedService {
    async fn list_batches(
        &self,
        coaching_id: &str,
        status: Option<BatchStatus>,
    ) -> coachctl_core::Result<Vec<Batch>> {
        self.record(Call::List(status)).await?;
        self.inner.list_batches(coaching_id, status).await
    }

    async fn get_my_batches(&self, coaching_id: &str) -> coachctl_core::Result<Vec<Batch>> {
        self.record(Call::Mine).await?;
        self.inner.get_my_batches(coaching_id).await
    }

    async fn create_batch(&self, coaching_id: &str, draft: NewBatch) -> coachctl_core::Result<Batch> {
        self.record(Call::Create(draft.name.clone())).await?;
        self.inner.create_batch(coaching_id, draft).await
    }

    async fn get_batch(&self, coaching_id: &str, batch_id: &BatchId) -> coachctl_core::Result<Batch> {
        self.record(Call::Get(batch_id.clone())).await?;
        self.inner.get_batch(coaching_id, batch_id).await
    }

    async fn set_batch_status(
        &self,
        coaching_id: &str,
        batch_id: &BatchId,
        status: BatchStatus,
    ) -> coachctl_core::Result<Batch> {
        self.record(Call::SetStatus(batch_id.clone(), status)).await?;
        self.inner.set_batch_status(coaching_id, batch_id, status).await
    }
}

pub const COACHING_ID: &str = "c1";
pub const OWNER_ID: &str = "owner";
pub const MEMBER_ID: &str = "s1";

pub fn batch(id: &str, name: &str, status: BatchStatus) -> Batch {
    Batch {
        id: BatchId::new(id),
        name: name.to_string(),
        subject: None,
        status,
        teacher: None,
        days: vec![],
        start_time: None,
        member_count: 0,
        note_count: 0,
        notice_count: 0,
    }
}

/// Three batches (two active, one archived); the member is assigned to one
pub fn sample_fixture() -> Fixture {
    let mut physics = batch("b1", "Physics Morning", BatchStatus::Active);
    physics.subject = Some("Physics".into());
    physics.teacher = Some(Teacher {
        id: Some("t1".into()),
        name: Some("Ravi Kumar".into()),
        picture: None,
    });
    physics.days = vec![chrono::Weekday::Mon, chrono::Weekday::Wed];
    physics.start_time = Some("07:30".into());
    physics.member_count = 24;
    physics.note_count = 5;
    physics.notice_count = 2;

    let mut chemistry = batch("b2", "Chemistry Evening", BatchStatus::Active);
    chemistry.member_count = 18;

    let droppers = batch("b3", "2023 Droppers", BatchStatus::Archived);

    Fixture {
        coachings: HashMap::from([(COACHING_ID.to_string(), vec![physics, chemistry, droppers])]),
        assignments: HashMap::from([(MEMBER_ID.to_string(), vec![BatchId::new("b2")])]),
    }
}

/// Sample data, acting as the member (only matters for `get_my_batches`)
pub fn sample_service() -> Arc<ScriptedService> {
    Arc::new(ScriptedService::new(MemoryBatchService::from_fixture(
        sample_fixture(),
        MEMBER_ID,
    )))
}

/// A coaching with no batches at all
pub fn empty_service() -> Arc<ScriptedService> {
    let fixture = Fixture {
        coachings: HashMap::from([(COACHING_ID.to_string(), Vec::new())]),
        assignments: HashMap::new(),
    };
    Arc::new(ScriptedService::new(MemoryBatchService::from_fixture(
        fixture, MEMBER_ID,
    )))
}

/// Admin: the owner. Member: a student who doesn't own the coaching.
pub fn contexts(admin: bool) -> (CoachingContext, UserContext) {
    let coaching = CoachingContext {
        id: COACHING_ID.to_string(),
        owner_id: OWNER_ID.to_string(),
        role: if admin { None } else { Some(CoachingRole::Student) },
    };
    let user = UserContext {
        id: if admin { OWNER_ID } else { MEMBER_ID }.to_string(),
    };
    (coaching, user)
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Render into an in-memory terminal and return the buffer, one line per row
pub fn render_to_string(
    width: u16,
    height: u16,
    draw: impl FnOnce(&mut ratatui::Frame),
) -> String {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(draw).unwrap();

    let buffer = terminal.backend().buffer();
    buffer
        .content()
        .chunks(buffer.area.width as usize)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
