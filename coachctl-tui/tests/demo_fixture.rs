use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use coachctl_core::{BatchFilter, CoachingContext, MemoryBatchService, UserContext};
use coachctl_tui::BatchesListScreen;

fn demo_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/demo.json")
}

fn screen(user_id: &str) -> BatchesListScreen {
    let service = MemoryBatchService::from_fixture_file(demo_path(), user_id).unwrap();
    let coaching = CoachingContext {
        id: "sunrise-academy".into(),
        owner_id: "owner-1".into(),
        role: None,
    };
    let user = UserContext { id: user_id.into() };
    BatchesListScreen::new(coaching, user, Arc::new(service), Duration::from_secs(4))
}

#[tokio::test]
async fn test_owner_browses_demo_coaching() {
    let mut list = screen("owner-1");
    list.mount();
    list.settle().await;
    assert_eq!(list.batches().len(), 4);

    list.select_filter(BatchFilter::Archived);
    list.settle().await;
    let names: Vec<_> = list.batches().iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["2023 Droppers"]);
}

#[tokio::test]
async fn test_student_sees_assigned_demo_batches() {
    let mut list = screen("s-priya");
    list.mount();
    list.settle().await;

    let ids: Vec<_> = list.batches().iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["b-101", "b-103"]);
}

#[tokio::test]
async fn test_teacher_sees_taught_demo_batch() {
    let mut list = screen("t-anita");
    list.mount();
    list.settle().await;

    let ids: Vec<_> = list.batches().iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["b-102"]);
}
