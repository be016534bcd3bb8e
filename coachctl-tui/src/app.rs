//! Application state: the batches list at the root plus at most one child screen

use std::sync::Arc;
use std::time::Instant;

use coachctl_core::BatchService;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

use crate::screens::{BatchDetailScreen, BatchesListScreen, CreateBatchScreen, Route, ScreenAction};

/// Screen pushed above the list
pub enum ChildScreen {
    Create(CreateBatchScreen),
    Detail(BatchDetailScreen),
}

pub struct App {
    pub list: BatchesListScreen,
    pub child: Option<ChildScreen>,
    pub should_quit: bool,
    spinner_tick: usize,
    service: Arc<dyn BatchService>,
}

impl App {
    pub fn new(list: BatchesListScreen, service: Arc<dyn BatchService>) -> Self {
        Self {
            list,
            child: None,
            should_quit: false,
            spinner_tick: 0,
            service,
        }
    }

    pub fn mount(&mut self) {
        self.list.mount();
    }

    pub fn spinner_tick(&self) -> usize {
        self.spinner_tick
    }

    /// True while the list or the open child screen waits on the service
    pub fn is_busy(&self) -> bool {
        let child_busy = match &self.child {
            Some(ChildScreen::Create(screen)) => screen.is_submitting(),
            Some(ChildScreen::Detail(screen)) => screen.is_busy(),
            None => false,
        };
        self.list.is_loading() || child_busy
    }

    /// Dispatch a key press. Service calls it starts run in the background,
    /// so this never waits on I/O.
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Global quit shortcuts (Ctrl+C, Ctrl+Q)
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.should_quit = true;
            return;
        }

        // A toast over the list swallows the key that dismisses it;
        // under a child screen the key belongs to the child
        if self.child.is_none() && self.list.dismiss_toast() {
            return;
        }

        let action = match &mut self.child {
            Some(ChildScreen::Create(screen)) => screen.handle_key(key),
            Some(ChildScreen::Detail(screen)) => screen.handle_key(key),
            None => self.list.handle_key(key),
        };

        self.apply(action);
    }

    fn apply(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::Continue => {}
            ScreenAction::Quit => self.should_quit = true,
            ScreenAction::Push(route) => self.push(route),
            ScreenAction::Pop(result) => {
                let created = result == Some(true)
                    && matches!(self.child, Some(ChildScreen::Create(_)));
                self.child = None;
                if created {
                    self.list.notify("Batch created");
                }
                let reloading = self.list.on_route_result(result);
                info!(?result, reloading, "returned to batches list");
            }
        }
    }

    fn push(&mut self, route: Route) {
        if self.child.is_some() {
            debug!(?route, "push ignored: a child screen is already open");
            return;
        }

        info!(?route, "opening screen");
        let coaching = self.list.coaching().clone();
        let service = Arc::clone(&self.service);

        let child = match route {
            Route::CreateBatch => ChildScreen::Create(CreateBatchScreen::new(coaching, service)),
            Route::BatchDetail(batch_id) => {
                let user = self.list.user().clone();
                ChildScreen::Detail(BatchDetailScreen::open(coaching, batch_id, user, service))
            }
        };
        self.child = Some(child);
    }

    fn poll_child(&mut self) -> ScreenAction {
        match &mut self.child {
            Some(ChildScreen::Create(screen)) => screen.poll_outcome(),
            Some(ChildScreen::Detail(screen)) => {
                screen.poll_outcomes();
                ScreenAction::Continue
            }
            None => ScreenAction::Continue,
        }
    }

    /// Called once per loop iteration
    pub fn on_tick(&mut self, now: Instant) {
        self.list.poll_outcomes();
        let action = self.poll_child();
        self.apply(action);
        self.list.expire_toast(now);

        if self.is_busy() {
            self.spinner_tick = self.spinner_tick.wrapping_add(1);
        }
    }

    /// Wait for the child's request and then the list's fetch, applying both
    pub async fn settle(&mut self) {
        let action = match &mut self.child {
            Some(ChildScreen::Create(screen)) => screen.settle().await,
            Some(ChildScreen::Detail(screen)) => {
                screen.settle().await;
                ScreenAction::Continue
            }
            None => ScreenAction::Continue,
        };
        self.apply(action);
        self.list.settle().await;
    }

    pub fn shutdown(&mut self) {
        self.child = None;
        self.list.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::{DetailState, FormField};
    use crate::test_support::{contexts, key, render_to_string, sample_service, Call, ScriptedService};
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn app(admin: bool, service: Arc<ScriptedService>) -> App {
        let (coaching, user) = contexts(admin);
        let list = BatchesListScreen::new(coaching, user, service.clone(), Duration::from_secs(4));
        App::new(list, service)
    }

    async fn mounted(admin: bool) -> (App, Arc<ScriptedService>) {
        let service = sample_service();
        let mut app = app(admin, service.clone());
        app.mount();
        app.settle().await;
        (app, service)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_from_child() {
        let (mut app, _) = mounted(true).await;
        app.handle_key(key(KeyCode::Char('n')));
        assert!(matches!(app.child, Some(ChildScreen::Create(_))));

        app.handle_key(ctrl('c'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_ctrl_c_while_detail_is_loading() {
        let (mut app, service) = mounted(true).await;
        let (dropped_tx, dropped_rx) = oneshot::channel();
        service.hang_next(dropped_tx);

        app.handle_key(key(KeyCode::Enter));
        match &app.child {
            Some(ChildScreen::Detail(screen)) => assert_eq!(screen.state(), &DetailState::Loading),
            _ => panic!("expected the detail screen"),
        }
        assert!(app.is_busy());
        tokio::task::yield_now().await;

        app.handle_key(ctrl('c'));
        assert!(app.should_quit);

        app.shutdown();
        assert!(dropped_rx.await.is_ok());
    }

    #[tokio::test]
    async fn test_cancelled_create_does_not_refetch() {
        let (mut app, service) = mounted(true).await;
        app.handle_key(key(KeyCode::Char('n')));
        app.handle_key(key(KeyCode::Esc));

        assert!(app.child.is_none());
        assert!(!app.list.is_loading());
        assert_eq!(service.calls(), vec![Call::List(None)]);
    }

    #[tokio::test]
    async fn test_created_batch_refetches_once() {
        let (mut app, service) = mounted(true).await;
        app.handle_key(key(KeyCode::Char('n')));
        for c in "Evening".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
        assert!(app.is_busy());

        app.settle().await;
        assert!(app.child.is_none());
        assert_eq!(app.list.batches().len(), 4);
        assert_eq!(app.list.toast().map(|t| t.message()), Some("Batch created"));
        assert_eq!(
            service.calls(),
            vec![
                Call::List(None),
                Call::Create("Evening".into()),
                Call::List(None)
            ]
        );
    }

    #[tokio::test]
    async fn test_tick_applies_finished_create() {
        let (mut app, _) = mounted(true).await;
        app.handle_key(key(KeyCode::Char('n')));
        app.handle_key(key(KeyCode::Char('X')));
        app.handle_key(key(KeyCode::Enter));

        while app.child.is_some() {
            tokio::task::yield_now().await;
            app.on_tick(Instant::now());
        }
        assert!(app.list.is_loading());
    }

    #[tokio::test]
    async fn test_detail_change_refetches() {
        let (mut app, service) = mounted(true).await;
        app.handle_key(key(KeyCode::Enter));
        app.settle().await;
        assert!(matches!(app.child, Some(ChildScreen::Detail(_))));

        app.handle_key(key(KeyCode::Char('a')));
        app.settle().await;
        app.handle_key(key(KeyCode::Esc));
        app.settle().await;

        assert_eq!(service.calls().last(), Some(&Call::List(None)));
        assert!(!app.list.batches()[0].is_active());
    }

    #[tokio::test]
    async fn test_member_cannot_open_create() {
        let (mut app, _) = mounted(false).await;
        app.handle_key(key(KeyCode::Char('n')));
        assert!(app.child.is_none());
    }

    #[tokio::test]
    async fn test_toast_swallows_next_key() {
        let (mut app, service) = mounted(true).await;
        service.fail_next("offline");
        app.handle_key(key(KeyCode::Char('r')));
        app.settle().await;
        assert!(app.list.toast().is_some());

        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.list.toast().is_none());
        assert!(!app.should_quit);

        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_failed_fetch_under_create_form_keeps_keys() {
        let service = sample_service();
        let mut app = app(true, service.clone());
        service.fail_next("offline");
        app.mount();

        app.handle_key(key(KeyCode::Char('n')));
        app.list.settle().await;
        assert!(app.list.toast().is_some());

        app.handle_key(key(KeyCode::Char('E')));
        match &app.child {
            Some(ChildScreen::Create(screen)) => assert_eq!(screen.value(FormField::Name), "E"),
            _ => panic!("expected the create form"),
        }
        assert!(app.list.toast().is_some());

        let out = render_to_string(80, 20, |f| crate::ui::render(f, &app));
        assert!(out.contains("New Batch"));
        assert!(out.contains("Error: API error (500): offline"));
    }

    #[tokio::test]
    async fn test_shutdown_disposes_list() {
        let (mut app, _) = mounted(true).await;
        app.handle_key(key(KeyCode::Char('r')));
        app.shutdown();

        assert!(app.list.is_disposed());
        assert!(!app.list.is_loading());
        app.on_tick(Instant::now());
        assert_eq!(app.list.batches().len(), 3);
    }
}
