use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use rally_app_core::{EventIntent, EventWorkflow, SideEffect};
use rally_core::{Event, EventRepository, EventStatus, TimeSlot};
use rally_persistence::MemoryStore;

fn draft(id: &str) -> Event {
    Event::draft(
        id,
        "Board game night",
        "org",
        vec![TimeSlot::new(
            "s1",
            "2026-12-01T19:00:00Z",
            "2026-12-01T23:00:00Z",
        )],
        "2026-11-25T00:00:00Z",
    )
}

async fn store_with(ids: &[&str]) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for id in ids {
        EventRepository::create(&*store, &draft(id)).await.unwrap();
    }
    store
}

#[tokio::test]
async fn late_subscriber_gets_latest_snapshot_first() {
    let workflow = EventWorkflow::new(store_with(&["e1", "e2"]).await).unwrap();
    workflow.handle(EventIntent::LoadEvents).await;

    let mut sub = workflow.subscribe();
    let first = sub.try_recv().expect("current snapshot is replayed");
    assert_eq!(first.events.len(), 2);
    assert!(!first.is_loading);
    assert!(sub.try_recv().is_none(), "history is not replayed");

    workflow.handle(EventIntent::StartPoll("e1".into())).await;
    let mut seen = Vec::new();
    while let Some(snapshot) = sub.try_recv() {
        seen.push(snapshot);
    }
    assert!(seen.first().is_some_and(|s| s.is_loading));
    let last = seen.last().unwrap();
    assert!(!last.is_loading);
    assert_eq!(last.event("e1").map(|e| e.status), Some(EventStatus::Polling));
}

#[tokio::test]
async fn state_is_published_before_the_effect_that_follows_it() {
    let workflow = EventWorkflow::new(store_with(&["e1"]).await).unwrap();
    let effects = workflow.effects();

    let _task = workflow.dispatch(EventIntent::StartPoll("e1".into()));
    let effect = tokio::time::timeout(Duration::from_secs(2), effects.next())
        .await
        .unwrap();

    assert_eq!(
        effect,
        Some(SideEffect::ShowToast("Poll started successfully".into()))
    );
    let state = workflow.state();
    assert_eq!(state.event("e1").map(|e| e.status), Some(EventStatus::Polling));
}

#[tokio::test]
async fn each_effect_reaches_exactly_one_consumer() {
    let workflow = EventWorkflow::new(store_with(&[]).await).unwrap();
    let first = workflow.effects();

    workflow.handle(EventIntent::StartPoll("ghost".into())).await;
    workflow.handle(EventIntent::Finalize("ghost".into())).await;

    assert_eq!(first.drain().len(), 2);
    let second = workflow.effects();
    assert!(second.try_next().is_none());

    workflow.handle(EventIntent::StartPoll("ghost".into())).await;
    let stream = second.into_stream();
    tokio::pin!(stream);
    let delivered = tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .unwrap();
    assert_eq!(delivered, Some(SideEffect::ShowError("Event not found".into())));
    assert!(first.try_next().is_none());
}

#[tokio::test]
async fn concurrent_dispatches_all_complete() {
    let workflow = EventWorkflow::new(store_with(&["e1", "e2", "e3"]).await).unwrap();

    let handles: Vec<_> = ["e1", "e2", "e3"]
        .into_iter()
        .map(|id| workflow.dispatch(EventIntent::StartPoll(id.into())))
        .collect();
    // Single-threaded test runtime: no handler has run before the first await.
    assert_eq!(workflow.in_flight(), 3);
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(workflow.in_flight(), 0);
    workflow.handle(EventIntent::LoadEvents).await;
    assert!(workflow
        .state()
        .events
        .iter()
        .all(|e| e.status == EventStatus::Polling));
}

#[test]
fn dispatch_works_without_an_ambient_runtime() {
    let store = Arc::new(MemoryStore::new());
    futures::executor::block_on(EventRepository::create(&*store, &draft("e1"))).unwrap();

    let workflow = EventWorkflow::new(store).unwrap();
    let handle = workflow.dispatch(EventIntent::StartPoll("e1".into()));
    futures::executor::block_on(handle).unwrap();

    assert_eq!(
        workflow.effects().try_next(),
        Some(SideEffect::ShowToast("Poll started successfully".into()))
    );
}
