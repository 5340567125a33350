use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rally_app_core::{ErrorKind, ScenarioIntent, ScenarioWorkflow};
use rally_core::{Scenario, ScenarioRepository, ScenarioStatus, ScenarioVote, ScenarioVoteType};
use rally_persistence::MemoryStore;

fn scenario(id: &str, day: u32) -> Scenario {
    Scenario {
        id: id.into(),
        event_id: "e1".into(),
        name: format!("Option {id}"),
        date_or_period: "Late June".into(),
        location: "Annecy".into(),
        duration_days: 3,
        estimated_participants: 8,
        estimated_budget_per_person: 220.0,
        description: String::new(),
        status: ScenarioStatus::Proposed,
        created_at: Utc.with_ymd_and_hms(2026, 2, day, 12, 0, 0).unwrap(),
    }
}

async fn cast(store: &MemoryStore, scenario_id: &str, participant: &str, vote: ScenarioVoteType) {
    ScenarioRepository::add_vote(
        store,
        &ScenarioVote {
            scenario_id: scenario_id.into(),
            participant_id: participant.into(),
            vote,
        },
    )
    .await
    .unwrap();
}

async fn seeded() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for (id, day) in [("a", 1), ("b", 2), ("c", 3)] {
        ScenarioRepository::create(&*store, &scenario(id, day))
            .await
            .unwrap();
    }
    store
}

#[tokio::test]
async fn load_aggregates_votes_with_score() {
    let store = seeded().await;
    for (who, vote) in [
        ("p1", ScenarioVoteType::Prefer),
        ("p2", ScenarioVoteType::Prefer),
        ("p3", ScenarioVoteType::Neutral),
        ("p4", ScenarioVoteType::Against),
    ] {
        cast(&store, "b", who, vote).await;
    }
    let workflow = ScenarioWorkflow::new(store).unwrap();

    workflow
        .handle(ScenarioIntent::LoadScenarios("e1".into()))
        .await;

    let state = workflow.state();
    assert_eq!(state.scenarios.len(), 3);
    let b = state.scenario("b").unwrap();
    assert_eq!((b.votes.prefer, b.votes.neutral, b.votes.against), (2, 1, 1));
    assert_eq!(b.score(), 4);
}

#[tokio::test]
async fn voting_requires_a_participant() {
    let store = seeded().await;
    let workflow = ScenarioWorkflow::new(store.clone()).unwrap();

    workflow
        .handle(ScenarioIntent::Vote {
            scenario_id: "a".into(),
            vote: ScenarioVoteType::Prefer,
        })
        .await;

    let err = workflow.state().error.unwrap();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    assert!(store.get_votes("a").await.unwrap().is_empty());
}

#[tokio::test]
async fn revote_replaces_the_participants_previous_choice() {
    let store = seeded().await;
    let workflow = ScenarioWorkflow::new(store).unwrap();
    workflow
        .handle(ScenarioIntent::LoadScenarios("e1".into()))
        .await;
    workflow
        .handle(ScenarioIntent::SetParticipant("alice".into()))
        .await;

    for vote in [ScenarioVoteType::Against, ScenarioVoteType::Prefer] {
        workflow
            .handle(ScenarioIntent::Vote {
                scenario_id: "a".into(),
                vote,
            })
            .await;
    }

    let state = workflow.state();
    assert_eq!(state.error, None);
    assert_eq!(state.scenario("a").unwrap().score(), 2);
    assert_eq!(state.my_votes.get("a"), Some(&ScenarioVoteType::Prefer));
}

#[tokio::test]
async fn comparison_picks_best_by_tie_break_or_nomination() {
    let store = seeded().await;
    cast(&store, "a", "p1", ScenarioVoteType::Prefer).await;
    cast(&store, "c", "p1", ScenarioVoteType::Neutral).await;
    cast(&store, "c", "p2", ScenarioVoteType::Neutral).await;
    let workflow = ScenarioWorkflow::new(store).unwrap();
    workflow
        .handle(ScenarioIntent::LoadScenarios("e1".into()))
        .await;

    workflow
        .handle(ScenarioIntent::CompareScenarios {
            ids: vec!["a".into(), "c".into()],
            best_id: None,
        })
        .await;
    let comparison = workflow.state().comparison.unwrap();
    assert_eq!(comparison.scenarios.len(), 2);
    // Equal scores of 2; "c" has more votes.
    assert_eq!(comparison.best_id.as_deref(), Some("c"));

    workflow
        .handle(ScenarioIntent::CompareScenarios {
            ids: vec!["a".into(), "c".into()],
            best_id: Some("a".into()),
        })
        .await;
    assert_eq!(
        workflow.state().comparison.and_then(|c| c.best_id),
        Some("a".to_string())
    );

    workflow
        .handle(ScenarioIntent::CompareScenarios {
            ids: vec!["a".into()],
            best_id: Some("b".into()),
        })
        .await;
    assert_eq!(
        workflow.state().error.map(|e| e.kind()),
        Some(ErrorKind::ValidationFailed)
    );

    workflow.handle(ScenarioIntent::ClearComparison).await;
    assert!(workflow.state().comparison.is_none());
}

#[tokio::test]
async fn selecting_final_rejects_the_other_proposals() {
    let store = seeded().await;
    let workflow = ScenarioWorkflow::new(store.clone()).unwrap();

    workflow.handle(ScenarioIntent::SelectFinal("b".into())).await;

    let statuses: Vec<_> = ScenarioRepository::list(&*store, "e1")
        .await
        .unwrap()
        .into_iter()
        .map(|s| (s.id, s.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("a".to_string(), ScenarioStatus::Rejected),
            ("b".to_string(), ScenarioStatus::Selected),
            ("c".to_string(), ScenarioStatus::Rejected),
        ]
    );

    workflow.handle(ScenarioIntent::SelectFinal("a".into())).await;
    assert_eq!(
        workflow.state().error.map(|e| e.to_string()),
        Some("Scenario is not in PROPOSED status".to_string())
    );
}

#[tokio::test]
async fn update_cannot_move_a_scenario_to_another_event() {
    let store = seeded().await;
    let workflow = ScenarioWorkflow::new(store.clone()).unwrap();

    let mut edited = scenario("b", 2);
    edited.event_id = "e2".into();
    edited.location = "Chamonix".into();
    edited.status = ScenarioStatus::Selected;
    workflow
        .handle(ScenarioIntent::UpdateScenario(edited))
        .await;

    assert_eq!(workflow.state().error, None);
    let stored = ScenarioRepository::get(&*store, "b")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.event_id, "e1");
    assert_eq!(stored.location, "Chamonix");
    assert_eq!(stored.status, ScenarioStatus::Proposed);
    assert!(ScenarioRepository::list(&*store, "e2")
        .await
        .unwrap()
        .is_empty());
    assert_eq!(workflow.state().scenarios.len(), 3);
}
