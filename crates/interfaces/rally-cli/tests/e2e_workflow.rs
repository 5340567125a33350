use camino::Utf8PathBuf;
use rally_cli::commands::{self, EventDraft, ScenarioDraft};
use rally_cli::Session;
use rally_core::{EventStatus, PollVote, ScenarioStatus, ScenarioVoteType};
use tempfile::tempdir;

fn data_dir(tmp: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(tmp.path().join("data")).unwrap()
}

fn offsite() -> EventDraft {
    EventDraft {
        id: Some("offsite".into()),
        title: "Team offsite".into(),
        organizer: "org".into(),
        description: Some("Two days somewhere green".into()),
        slots: vec![
            "2026-06-12T09:00:00Z/2026-06-13T18:00:00Z".into(),
            "2026-06-19T09:00:00Z/2026-06-20T18:00:00Z".into(),
        ],
        deadline: "2026-05-30T00:00:00Z".into(),
    }
}

fn scenario(event_id: &str, name: &str, location: &str) -> ScenarioDraft {
    ScenarioDraft {
        event_id: event_id.into(),
        name: name.into(),
        period: "Mid June".into(),
        location: location.into(),
        days: 2,
        participants: 12,
        budget: 180.0,
        description: None,
    }
}

#[tokio::test]
async fn e2e_event_lifecycle_through_scenarios() {
    let tmp = tempdir().unwrap();
    let dir = data_dir(&tmp);
    let session = Session::open(&dir).unwrap();

    let event = commands::cmd_event_create(&session, offsite()).await.unwrap();
    assert_eq!(event.status, EventStatus::Draft);
    assert_eq!(event.proposed_slots[1].id, "s2");

    commands::cmd_event_start_poll(&session, "offsite")
        .await
        .unwrap();
    for (who, slot, vote) in [
        ("ana", "s1", PollVote::Yes),
        ("ben", "s1", PollVote::Maybe),
        ("ben", "s2", PollVote::Yes),
    ] {
        commands::cmd_event_vote(&session, "offsite", who, slot, vote)
            .await
            .unwrap();
    }

    let confirmed = commands::cmd_event_confirm(&session, "offsite", "s1")
        .await
        .unwrap();
    assert_eq!(confirmed.status, EventStatus::Confirmed);
    assert_eq!(confirmed.final_date.as_deref(), Some("2026-06-12T09:00:00Z"));

    let lake = commands::cmd_scenario_create(&session, scenario("offsite", "Lake", "Annecy"))
        .await
        .unwrap();
    let city = commands::cmd_scenario_create(&session, scenario("offsite", "City", "Lyon"))
        .await
        .unwrap();
    commands::cmd_scenario_vote(&session, "offsite", &lake, "ana", ScenarioVoteType::Prefer)
        .await
        .unwrap();
    commands::cmd_scenario_vote(&session, "offsite", &city, "ben", ScenarioVoteType::Against)
        .await
        .unwrap();

    let comparison =
        commands::cmd_scenario_compare(&session, "offsite", vec![lake.clone(), city.clone()], None)
            .await
            .unwrap();
    assert_eq!(comparison.best_id.as_deref(), Some(lake.as_str()));

    commands::cmd_scenario_select(&session, "offsite", &lake)
        .await
        .unwrap();
    let state = session.scenarios.state();
    assert_eq!(
        state.scenario(&lake).map(|s| s.scenario.status),
        Some(ScenarioStatus::Selected)
    );
    assert_eq!(
        state.scenario(&city).map(|s| s.scenario.status),
        Some(ScenarioStatus::Rejected)
    );

    commands::cmd_event_organize(&session, "offsite")
        .await
        .unwrap();
    let done = commands::cmd_event_finalize(&session, "offsite")
        .await
        .unwrap();
    assert_eq!(done.status, EventStatus::Finalized);

    let err = commands::cmd_event_start_poll(&session, "offsite")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Event is not in DRAFT status");
}

#[tokio::test]
async fn e2e_data_survives_a_new_session() {
    let tmp = tempdir().unwrap();
    let dir = data_dir(&tmp);

    {
        let session = Session::open(&dir).unwrap();
        commands::cmd_event_create(&session, offsite()).await.unwrap();
        commands::cmd_event_start_poll(&session, "offsite")
            .await
            .unwrap();
        commands::cmd_event_vote(&session, "offsite", "ana", "s2", PollVote::Yes)
            .await
            .unwrap();
    }

    let session = Session::open(&dir).unwrap();
    let events = commands::cmd_event_list(&session).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].status, EventStatus::Polling);

    let shown = commands::cmd_event_show(&session, "offsite", false)
        .await
        .unwrap();
    assert_eq!(shown.participants, vec!["ana".to_string()]);
    let tallies = session.events.state().tallies;
    assert_eq!(tallies[1].yes, 1);
    assert_eq!(tallies[0].yes, 0);
}

#[tokio::test]
async fn e2e_rejected_commands_surface_the_workflow_message() {
    let tmp = tempdir().unwrap();
    let session = Session::open(&data_dir(&tmp)).unwrap();

    let err = commands::cmd_event_confirm(&session, "missing", "s1")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Event not found");

    commands::cmd_event_create(&session, offsite()).await.unwrap();
    commands::cmd_event_start_poll(&session, "offsite")
        .await
        .unwrap();
    let err = commands::cmd_event_confirm(&session, "offsite", "s1")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Cannot confirm date: no votes submitted");

    let mut bad = offsite();
    bad.id = None;
    bad.slots = vec!["2026-06-12T09:00:00Z".into()];
    let err = commands::cmd_event_create(&session, bad)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("START/END"));

    commands::cmd_event_delete(&session, "offsite").await.unwrap();
    assert!(commands::cmd_event_list(&session).await.unwrap().is_empty());
}

#[test]
fn slots_are_numbered_from_one() {
    let slot = commands::parse_slot(2, " 2026-01-01T10:00:00Z / 2026-01-01T12:00:00Z ").unwrap();
    assert_eq!(slot.id, "s3");
    assert_eq!(slot.start, "2026-01-01T10:00:00Z");
    assert_eq!(slot.end, "2026-01-01T12:00:00Z");
}
