use std::sync::Arc;

use async_trait::async_trait;
use rally_core::validation::validate_event;
use rally_core::{Event, EventRepository, EventStatus, PollVote};
use tracing::{info, warn};

use super::commands::EventIntent;
use super::reducer::reduce;
use super::state::{EventChange, EventState};
use crate::app_core::{
    EffectQueue, IntentHandler, Route, SideEffect, StateStore, Workflow, WorkflowHandler,
};
use crate::error::{GatewayResultExt, WorkflowError};

pub type EventWorkflow<R> = Workflow<EventHandler<R>>;

impl<R: EventRepository> Workflow<EventHandler<R>> {
    pub fn new(repo: Arc<R>) -> anyhow::Result<Self> {
        Self::from_handler(EventHandler::new(repo))
    }
}

/// Drives the event lifecycle DRAFT -> POLLING -> CONFIRMED -> ORGANIZING ->
/// FINALIZED. Every transition re-reads the event from the gateway before
/// checking its precondition; the in-memory list is never trusted for that.
pub struct EventHandler<R> {
    repo: Arc<R>,
    store: StateStore<EventState>,
    effects: EffectQueue<SideEffect>,
}

impl<R: EventRepository> EventHandler<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self::with_effect_capacity(repo, rally_config::DEFAULT_EFFECT_CAPACITY)
    }

    pub fn with_effect_capacity(repo: Arc<R>, capacity: usize) -> Self {
        Self {
            repo,
            store: StateStore::default(),
            effects: EffectQueue::new(capacity),
        }
    }

    fn apply(&self, change: EventChange) {
        self.store.update(|state| reduce(state.clone(), change));
    }

    async fn reject(&self, err: WorkflowError) {
        warn!(error = %err, kind = ?err.kind(), "event intent rejected");
        let message = err.message();
        self.apply(EventChange::Failed(err));
        self.effects.emit(SideEffect::ShowError(message)).await;
    }

    async fn toast(&self, message: &str) {
        self.effects
            .emit(SideEffect::ShowToast(message.to_string()))
            .await;
    }

    async fn reload(&self) -> Result<(), WorkflowError> {
        let events = self.repo.list().await.gateway()?;
        self.apply(EventChange::EventsLoaded(events));
        Ok(())
    }

    async fn fetch(&self, id: &str) -> Result<Event, WorkflowError> {
        self.repo
            .get(id)
            .await
            .gateway()?
            .ok_or_else(|| WorkflowError::not_found("Event"))
    }

    async fn run(&self, intent: EventIntent) -> Result<(), WorkflowError> {
        match intent {
            EventIntent::LoadEvents => {
                self.apply(EventChange::Started);
                self.reload().await
            }
            EventIntent::SelectEvent(id) => {
                self.apply(EventChange::Started);
                let event = self.fetch(&id).await?;
                self.apply(EventChange::EventSelected(event));
                Ok(())
            }
            EventIntent::CreateEvent(event) => self.create(event).await,
            EventIntent::UpdateEvent(event) => self.update(event).await,
            EventIntent::DeleteEvent(id) => {
                self.apply(EventChange::Started);
                self.repo.delete(&id).await.gateway()?;
                self.apply(EventChange::SelectionCleared(id));
                self.reload().await?;
                self.toast("Event deleted").await;
                self.effects.emit(SideEffect::NavigateBack).await;
                Ok(())
            }

            EventIntent::LoadParticipants(id) => {
                self.apply(EventChange::Started);
                let participants = self.repo.get_participants(&id).await.gateway()?;
                self.apply(EventChange::ParticipantsLoaded(participants));
                Ok(())
            }
            EventIntent::AddParticipant {
                event_id,
                participant_id,
            } => {
                self.apply(EventChange::Started);
                if participant_id.trim().is_empty() {
                    return Err(WorkflowError::ValidationFailed(
                        "Participant ID cannot be empty".into(),
                    ));
                }
                self.fetch(&event_id).await?;
                self.repo
                    .add_participant(&event_id, &participant_id)
                    .await
                    .gateway()?;
                let participants = self.repo.get_participants(&event_id).await.gateway()?;
                self.apply(EventChange::ParticipantsLoaded(participants));
                self.toast("Participant added").await;
                Ok(())
            }
            EventIntent::LoadPoll(id) => {
                self.apply(EventChange::Started);
                let event = self.fetch(&id).await?;
                self.load_poll(&event).await
            }
            EventIntent::SubmitVote {
                event_id,
                participant_id,
                slot_id,
                vote,
            } => {
                self.submit_vote(&event_id, &participant_id, &slot_id, vote)
                    .await
            }

            EventIntent::StartPoll(id) => {
                self.transition(&id, EventStatus::Polling, None).await?;
                self.toast("Poll started successfully").await;
                Ok(())
            }
            EventIntent::ConfirmDate { event_id, slot_id } => {
                self.transition(&event_id, EventStatus::Confirmed, Some(&slot_id))
                    .await?;
                self.apply(EventChange::ScenariosUnlocked);
                self.toast("Date confirmed successfully").await;
                self.effects
                    .emit(SideEffect::NavigateTo(Route::Scenarios(event_id)))
                    .await;
                Ok(())
            }
            EventIntent::TransitionToOrganizing(id) => {
                self.transition(&id, EventStatus::Organizing, None).await?;
                self.apply(EventChange::MeetingsUnlocked);
                self.toast("Event moved to organizing").await;
                self.effects
                    .emit(SideEffect::NavigateTo(Route::Meetings(id)))
                    .await;
                Ok(())
            }
            EventIntent::Finalize(id) => {
                self.transition(&id, EventStatus::Finalized, None).await?;
                self.toast("Event finalized").await;
                Ok(())
            }

            EventIntent::ClearError => {
                self.apply(EventChange::ErrorCleared);
                Ok(())
            }
        }
    }

    async fn create(&self, event: Event) -> Result<(), WorkflowError> {
        self.apply(EventChange::Started);
        validate_event(&event)?;
        let created = self.repo.create(&event).await.gateway()?;
        info!(event_id = %created.id, "event created");
        let id = created.id.clone();
        self.apply(EventChange::EventSelected(created));
        self.reload().await?;
        self.toast("Event created").await;
        self.effects
            .emit(SideEffect::NavigateTo(Route::EventDetail(id)))
            .await;
        Ok(())
    }

    /// Edits descriptive fields only. Status and final date move through
    /// transitions, so the stored values win.
    async fn update(&self, mut event: Event) -> Result<(), WorkflowError> {
        self.apply(EventChange::Started);
        validate_event(&event)?;
        let stored = self.fetch(&event.id).await?;
        event.status = stored.status;
        event.final_date = stored.final_date;
        event.created_at = stored.created_at;
        let updated = self.repo.update(&event).await.gateway()?;
        self.apply(EventChange::EventSelected(updated));
        self.reload().await?;
        self.toast("Event updated").await;
        Ok(())
    }

    async fn load_poll(&self, event: &Event) -> Result<(), WorkflowError> {
        let poll = self.repo.get_poll(&event.id).await.gateway()?;
        let tallies = poll.tallies(&event.proposed_slots);
        self.apply(EventChange::PollLoaded { poll, tallies });
        Ok(())
    }

    async fn submit_vote(
        &self,
        event_id: &str,
        participant_id: &str,
        slot_id: &str,
        vote: PollVote,
    ) -> Result<(), WorkflowError> {
        self.apply(EventChange::Started);
        if participant_id.trim().is_empty() {
            return Err(WorkflowError::ValidationFailed(
                "Participant ID cannot be empty".into(),
            ));
        }
        let event = self.fetch(event_id).await?;
        if event.status != EventStatus::Polling {
            return Err(not_in_status(EventStatus::Polling));
        }
        if event.slot(slot_id).is_none() {
            return Err(WorkflowError::NotFound(format!(
                "Time slot {slot_id} not found"
            )));
        }
        self.repo
            .add_vote(event_id, participant_id, slot_id, vote)
            .await
            .gateway()?;
        self.load_poll(&event).await?;
        self.toast("Vote recorded").await;
        Ok(())
    }

    /// Guarded single-step transition into `target`.
    async fn transition(
        &self,
        id: &str,
        target: EventStatus,
        slot_id: Option<&str>,
    ) -> Result<Event, WorkflowError> {
        self.apply(EventChange::Started);
        let event = self.fetch(id).await?;

        let required = EventStatus::ALL
            .into_iter()
            .find(|s| s.can_transition_to(target))
            .ok_or_else(|| {
                WorkflowError::InvalidTransition(format!("No transition leads to {target}"))
            })?;
        if event.status != required {
            return Err(not_in_status(required));
        }

        let final_date = match slot_id {
            Some(slot_id) => {
                let poll = self.repo.get_poll(id).await.gateway()?;
                if !poll.has_votes() {
                    return Err(WorkflowError::InvalidTransition(
                        "Cannot confirm date: no votes submitted".into(),
                    ));
                }
                let slot = event.slot(slot_id).ok_or_else(|| {
                    WorkflowError::NotFound(format!("Time slot {slot_id} not found"))
                })?;
                Some(slot.start.clone())
            }
            None => None,
        };

        let updated = self
            .repo
            .update_status(id, target, final_date.as_deref())
            .await
            .gateway()?;
        info!(event_id = %id, from = %required, to = %target, "event transitioned");
        self.reload().await?;
        Ok(updated)
    }
}

fn not_in_status(status: EventStatus) -> WorkflowError {
    WorkflowError::InvalidTransition(format!("Event is not in {status} status"))
}

#[async_trait]
impl<R: EventRepository> IntentHandler for EventHandler<R> {
    type Intent = EventIntent;

    async fn handle(&self, intent: EventIntent) {
        if let Err(err) = self.run(intent).await {
            self.reject(err).await;
        }
    }
}

impl<R: EventRepository> WorkflowHandler for EventHandler<R> {
    type State = EventState;

    fn store(&self) -> &StateStore<EventState> {
        &self.store
    }

    fn effects(&self) -> &EffectQueue<SideEffect> {
        &self.effects
    }
}
