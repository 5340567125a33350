use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use rally_app_core::{
    EventIntent, ScenarioComparison, ScenarioIntent, SideEffect, Workflow, WorkflowHandler,
};
use rally_core::{
    Event, PollVote, Scenario, ScenarioStatus, ScenarioVoteType, ScenarioWithVotes, TimeSlot,
};

use crate::Session;

/// Runs one intent to completion, then prints what the workflow asked the
/// client to show. A `ShowError` turns into the command's error.
async fn run<H: WorkflowHandler>(workflow: &Workflow<H>, intent: H::Intent) -> Result<H::State> {
    workflow
        .dispatch(intent)
        .await
        .context("workflow task failed")?;
    report(workflow.effects().drain())?;
    Ok(workflow.state())
}

fn report(effects: Vec<SideEffect>) -> Result<()> {
    let mut failure = None;
    for effect in effects {
        match effect {
            SideEffect::ShowToast(message) => println!(":: {message}"),
            SideEffect::ShowError(message) => failure = Some(message),
            SideEffect::ShareLink(url) => println!(":: Share: {url}"),
            SideEffect::NavigateTo(route) => tracing::debug!(%route, "navigate"),
            SideEffect::NavigateBack => tracing::debug!("navigate back"),
        }
    }
    match failure {
        Some(message) => Err(anyhow!(message)),
        None => Ok(()),
    }
}

fn find_event(events: &[Event], id: &str) -> Result<Event> {
    events
        .iter()
        .find(|e| e.id == id)
        .cloned()
        .ok_or_else(|| anyhow!("Event '{}' not found", id))
}

fn print_event_line(event: &Event) {
    println!(
        "   {:<12} {:<11} {}",
        event.id,
        event.status.as_str(),
        event.title
    );
}

fn print_scenario_line(entry: &ScenarioWithVotes) {
    let status = format!("{:?}", entry.scenario.status).to_uppercase();
    println!(
        "   {:<12} {:<9} score {:>3} ({} votes)  {}",
        entry.scenario.id,
        status,
        entry.score(),
        entry.votes.total(),
        entry.scenario.name
    );
}

/// Parses `START/END` into a slot with a positional id (`s1`, `s2`, ...).
pub fn parse_slot(index: usize, raw: &str) -> Result<TimeSlot> {
    let (start, end) = raw
        .split_once('/')
        .ok_or_else(|| anyhow!("Time slot '{}' must look like START/END", raw))?;
    Ok(TimeSlot::new(format!("s{}", index + 1), start.trim(), end.trim()))
}

pub struct EventDraft {
    pub id: Option<String>,
    pub title: String,
    pub organizer: String,
    pub description: Option<String>,
    pub slots: Vec<String>,
    pub deadline: String,
}

pub async fn cmd_event_list(session: &Session) -> Result<Vec<Event>> {
    let state = run(&session.events, EventIntent::LoadEvents).await?;
    if state.events.is_empty() {
        println!(":: No events yet.");
    }
    for event in &state.events {
        print_event_line(event);
    }
    Ok(state.events)
}

pub async fn cmd_event_create(session: &Session, draft: EventDraft) -> Result<Event> {
    let slots = draft
        .slots
        .iter()
        .enumerate()
        .map(|(i, raw)| parse_slot(i, raw))
        .collect::<Result<Vec<_>>>()?;
    let id = draft
        .id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let mut event = Event::draft(&id, draft.title, draft.organizer, slots, draft.deadline);
    event.description = draft.description.unwrap_or_default();

    let state = run(&session.events, EventIntent::CreateEvent(event)).await?;
    let created = find_event(&state.events, &id)?;
    println!("   id: {}", created.id);
    Ok(created)
}

pub async fn cmd_event_show(session: &Session, id: &str, json: bool) -> Result<Event> {
    run(&session.events, EventIntent::SelectEvent(id.to_string())).await?;
    run(&session.events, EventIntent::LoadParticipants(id.to_string())).await?;
    let state = run(&session.events, EventIntent::LoadPoll(id.to_string())).await?;
    let event = state
        .selected_event
        .clone()
        .ok_or_else(|| anyhow!("Event '{}' not found", id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&event)?);
        return Ok(event);
    }

    println!(":: {} [{}]", event.title, event.status);
    if !event.description.is_empty() {
        println!("   {}", event.description);
    }
    println!("   Organizer: {}", event.organizer_id);
    println!("   Deadline:  {}", event.deadline);
    if let Some(date) = &event.final_date {
        println!("   Date:      {date}");
    }
    if !state.participants.is_empty() {
        println!("   Participants: {}", state.participants.join(", "));
    }
    for (slot, tally) in event.proposed_slots.iter().zip(&state.tallies) {
        println!(
            "   {:<4} {} -> {}  yes {} / maybe {} / no {}  (score {})",
            slot.id,
            slot.start,
            slot.end,
            tally.yes,
            tally.maybe,
            tally.no,
            tally.score()
        );
    }
    Ok(event)
}

async fn transition(session: &Session, id: &str, intent: EventIntent) -> Result<Event> {
    let state = run(&session.events, intent).await?;
    let event = find_event(&state.events, id)?;
    print_event_line(&event);
    Ok(event)
}

pub async fn cmd_event_start_poll(session: &Session, id: &str) -> Result<Event> {
    transition(session, id, EventIntent::StartPoll(id.to_string())).await
}

pub async fn cmd_event_vote(
    session: &Session,
    id: &str,
    participant: &str,
    slot: &str,
    vote: PollVote,
) -> Result<()> {
    run(
        &session.events,
        EventIntent::AddParticipant {
            event_id: id.to_string(),
            participant_id: participant.to_string(),
        },
    )
    .await?;
    run(
        &session.events,
        EventIntent::SubmitVote {
            event_id: id.to_string(),
            participant_id: participant.to_string(),
            slot_id: slot.to_string(),
            vote,
        },
    )
    .await?;
    Ok(())
}

pub async fn cmd_event_confirm(session: &Session, id: &str, slot: &str) -> Result<Event> {
    transition(
        session,
        id,
        EventIntent::ConfirmDate {
            event_id: id.to_string(),
            slot_id: slot.to_string(),
        },
    )
    .await
}

pub async fn cmd_event_organize(session: &Session, id: &str) -> Result<Event> {
    transition(session, id, EventIntent::TransitionToOrganizing(id.to_string())).await
}

pub async fn cmd_event_finalize(session: &Session, id: &str) -> Result<Event> {
    transition(session, id, EventIntent::Finalize(id.to_string())).await
}

pub async fn cmd_event_delete(session: &Session, id: &str) -> Result<()> {
    run(&session.events, EventIntent::DeleteEvent(id.to_string())).await?;
    Ok(())
}

pub struct ScenarioDraft {
    pub event_id: String,
    pub name: String,
    pub period: String,
    pub location: String,
    pub days: u32,
    pub participants: u32,
    pub budget: f64,
    pub description: Option<String>,
}

pub async fn cmd_scenario_list(session: &Session, event_id: &str) -> Result<()> {
    let state = run(
        &session.scenarios,
        ScenarioIntent::LoadScenarios(event_id.to_string()),
    )
    .await?;
    if state.scenarios.is_empty() {
        println!(":: No scenarios for {event_id}.");
    }
    for entry in &state.scenarios {
        print_scenario_line(entry);
    }
    Ok(())
}

pub async fn cmd_scenario_create(session: &Session, draft: ScenarioDraft) -> Result<String> {
    let id = uuid::Uuid::new_v4().to_string();
    let scenario = Scenario {
        id: id.clone(),
        event_id: draft.event_id,
        name: draft.name,
        date_or_period: draft.period,
        location: draft.location,
        duration_days: draft.days,
        estimated_participants: draft.participants,
        estimated_budget_per_person: draft.budget,
        description: draft.description.unwrap_or_default(),
        status: ScenarioStatus::Proposed,
        created_at: Utc::now(),
    };
    let state = run(&session.scenarios, ScenarioIntent::CreateScenario(scenario)).await?;
    if state.scenario(&id).is_none() {
        bail!("Scenario '{}' was not stored", id);
    }
    println!("   id: {id}");
    Ok(id)
}

pub async fn cmd_scenario_vote(
    session: &Session,
    event_id: &str,
    scenario_id: &str,
    participant: &str,
    vote: ScenarioVoteType,
) -> Result<()> {
    run(
        &session.scenarios,
        ScenarioIntent::LoadScenarios(event_id.to_string()),
    )
    .await?;
    run(
        &session.scenarios,
        ScenarioIntent::SetParticipant(participant.to_string()),
    )
    .await?;
    run(
        &session.scenarios,
        ScenarioIntent::Vote {
            scenario_id: scenario_id.to_string(),
            vote,
        },
    )
    .await?;
    Ok(())
}

pub async fn cmd_scenario_compare(
    session: &Session,
    event_id: &str,
    ids: Vec<String>,
    best: Option<String>,
) -> Result<ScenarioComparison> {
    run(
        &session.scenarios,
        ScenarioIntent::LoadScenarios(event_id.to_string()),
    )
    .await?;
    let state = run(
        &session.scenarios,
        ScenarioIntent::CompareScenarios { ids, best_id: best },
    )
    .await?;
    let Some(comparison) = state.comparison else {
        bail!("Comparison was not produced");
    };

    for entry in &comparison.scenarios {
        print_scenario_line(entry);
    }
    if let Some(best) = comparison.best() {
        println!(":: Best: {} ({})", best.scenario.name, best.scenario.id);
    }
    Ok(comparison)
}

pub async fn cmd_scenario_select(
    session: &Session,
    event_id: &str,
    scenario_id: &str,
) -> Result<()> {
    run(
        &session.scenarios,
        ScenarioIntent::LoadScenarios(event_id.to_string()),
    )
    .await?;
    run(
        &session.scenarios,
        ScenarioIntent::SelectFinal(scenario_id.to_string()),
    )
    .await?;
    cmd_scenario_list(session, event_id).await
}
