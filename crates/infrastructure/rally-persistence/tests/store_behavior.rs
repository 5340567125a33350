use camino::Utf8PathBuf;
use chrono::{TimeZone, Utc};
use rally_core::{
    Event, EventRepository, EventStatus, Meeting, MeetingPlatform, MeetingRepository,
    MeetingStatus, PollVote, Scenario, ScenarioRepository, ScenarioStatus, ScenarioVote,
    ScenarioVoteType, TimeSlot,
};
use rally_persistence::{MemoryStore, RedbStore, StorageError, StorageErrorKind};

fn event(id: &str) -> Event {
    Event::draft(
        id,
        "Team dinner",
        "org",
        vec![TimeSlot::new(
            "s1",
            "2026-12-01T18:00:00Z",
            "2026-12-01T22:00:00Z",
        )],
        "2026-11-20T00:00:00Z",
    )
}

fn meeting(id: &str) -> Meeting {
    Meeting {
        id: id.into(),
        event_id: "e1".into(),
        organizer_id: "org".into(),
        title: "Kickoff".into(),
        description: String::new(),
        start_time: "2026-12-01T18:00:00Z".into(),
        end_time: "2026-12-01T19:00:00Z".into(),
        platform: MeetingPlatform::Zoom,
        link: None,
        status: MeetingStatus::Scheduled,
        participants: vec![],
    }
}

fn scenario(id: &str, day: u32) -> Scenario {
    Scenario {
        id: id.into(),
        event_id: "e1".into(),
        name: format!("Plan {id}"),
        date_or_period: "June".into(),
        location: "Lyon".into(),
        duration_days: 2,
        estimated_participants: 6,
        estimated_budget_per_person: 150.0,
        description: String::new(),
        status: ScenarioStatus::Proposed,
        created_at: Utc.with_ymd_and_hms(2026, 1, day, 0, 0, 0).unwrap(),
    }
}

fn storage_kind(err: &anyhow::Error) -> Option<StorageErrorKind> {
    err.downcast_ref::<StorageError>().map(StorageError::kind)
}

#[tokio::test]
async fn duplicate_event_is_a_conflict() {
    let store = MemoryStore::new();
    EventRepository::create(&store, &event("e1")).await.unwrap();

    let err = EventRepository::create(&store, &event("e1"))
        .await
        .unwrap_err();
    assert_eq!(storage_kind(&err), Some(StorageErrorKind::Conflict));
    assert_eq!(err.to_string(), "Event e1 already exists");
}

#[tokio::test]
async fn status_update_keeps_final_date_unless_given() {
    let store = MemoryStore::new();
    EventRepository::create(&store, &event("e1")).await.unwrap();

    let confirmed = EventRepository::update_status(
        &store,
        "e1",
        EventStatus::Confirmed,
        Some("2026-12-01T18:00:00Z"),
    )
    .await
        .unwrap();
    assert_eq!(confirmed.final_date.as_deref(), Some("2026-12-01T18:00:00Z"));

    let organizing = EventRepository::update_status(&store, "e1", EventStatus::Organizing, None)
        .await
        .unwrap();
    assert_eq!(organizing.status, EventStatus::Organizing);
    assert_eq!(
        organizing.final_date.as_deref(),
        Some("2026-12-01T18:00:00Z")
    );
}

#[tokio::test]
async fn poll_is_empty_until_someone_votes() {
    let store = MemoryStore::new();
    EventRepository::create(&store, &event("e1")).await.unwrap();
    assert!(!store.get_poll("e1").await.unwrap().has_votes());

    EventRepository::add_vote(&store, "e1", "alice", "s1", PollVote::Yes)
        .await
        .unwrap();
    let poll = store.get_poll("e1").await.unwrap();
    assert_eq!(poll.vote_count(), 1);

    EventRepository::delete(&store, "e1").await.unwrap();
    assert!(!store.get_poll("e1").await.unwrap().has_votes());
}

#[tokio::test]
async fn participants_are_not_duplicated() {
    let store = MemoryStore::new();
    EventRepository::create(&store, &event("e1")).await.unwrap();
    store.add_participant("e1", "bob").await.unwrap();
    store.add_participant("e1", "bob").await.unwrap();
    assert_eq!(store.get_participants("e1").await.unwrap(), vec!["bob"]);
}

#[tokio::test]
async fn only_the_organizer_may_cancel() {
    let store = MemoryStore::new();
    MeetingRepository::create(&store, &meeting("m1")).await.unwrap();

    let err = store.cancel("m1", "mallory").await.unwrap_err();
    assert_eq!(storage_kind(&err), Some(StorageErrorKind::Forbidden));
    let unchanged = MeetingRepository::get(&store, "m1").await.unwrap().unwrap();
    assert_eq!(unchanged.status, MeetingStatus::Scheduled);

    store.cancel("m1", "org").await.unwrap();
    let cancelled = MeetingRepository::get(&store, "m1").await.unwrap().unwrap();
    assert_eq!(cancelled.status, MeetingStatus::Cancelled);
}

#[tokio::test]
async fn scenarios_list_in_creation_order_with_votes_appended() {
    let store = MemoryStore::new();
    ScenarioRepository::create(&store, &scenario("late", 5))
        .await
        .unwrap();
    ScenarioRepository::create(&store, &scenario("early", 1))
        .await
        .unwrap();

    let ids: Vec<_> = ScenarioRepository::list(&store, "e1")
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec!["early", "late"]);

    for vote in [ScenarioVoteType::Against, ScenarioVoteType::Prefer] {
        ScenarioRepository::add_vote(
            &store,
            &ScenarioVote {
                scenario_id: "early".into(),
                participant_id: "alice".into(),
                vote,
            },
        )
        .await
        .unwrap();
    }
    assert_eq!(store.get_votes("early").await.unwrap().len(), 2);

    let err = ScenarioRepository::add_vote(
        &store,
        &ScenarioVote {
            scenario_id: "ghost".into(),
            participant_id: "alice".into(),
            vote: ScenarioVoteType::Prefer,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(storage_kind(&err), Some(StorageErrorKind::NotFound));
}

#[tokio::test]
async fn redb_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();

    {
        let store = RedbStore::open(&root).unwrap();
        EventRepository::create(&store, &event("e1")).await.unwrap();
        EventRepository::add_vote(&store, "e1", "alice", "s1", PollVote::Maybe)
            .await
            .unwrap();
        EventRepository::update_status(&store, "e1", EventStatus::Polling, None)
            .await
            .unwrap();
    }

    let store = RedbStore::open(&root).unwrap();
    let stored = EventRepository::get(&store, "e1").await.unwrap().unwrap();
    assert_eq!(stored.status, EventStatus::Polling);
    assert_eq!(
        store.get_poll("e1").await.unwrap().votes["alice"]["s1"],
        PollVote::Maybe
    );
}

#[tokio::test]
async fn failed_redb_mutation_leaves_record_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    let store = RedbStore::open(&root).unwrap();

    MeetingRepository::create(&store, &meeting("m1")).await.unwrap();
    assert!(store.cancel("m1", "someone-else").await.is_err());

    let stored = MeetingRepository::get(&store, "m1").await.unwrap().unwrap();
    assert_eq!(stored.status, MeetingStatus::Scheduled);
}
