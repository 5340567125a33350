use std::sync::Arc;

use async_trait::async_trait;
use rally_core::validation::validate_meeting;
use rally_core::{Meeting, MeetingLinkProvider, MeetingRepository, MeetingStatus};
use tracing::{info, warn};

use super::commands::MeetingIntent;
use super::reducer::reduce;
use super::state::{MeetingChange, MeetingState};
use crate::app_core::{
    EffectQueue, IntentHandler, Route, SideEffect, StateStore, Workflow, WorkflowHandler,
};
use crate::error::{GatewayResultExt, WorkflowError};

pub type MeetingWorkflow<R, L> = Workflow<MeetingHandler<R, L>>;

impl<R: MeetingRepository, L: MeetingLinkProvider> Workflow<MeetingHandler<R, L>> {
    pub fn new(repo: Arc<R>, links: Arc<L>) -> anyhow::Result<Self> {
        Self::from_handler(MeetingHandler::new(repo, links))
    }
}

pub struct MeetingHandler<R, L> {
    repo: Arc<R>,
    links: Arc<L>,
    store: StateStore<MeetingState>,
    effects: EffectQueue<SideEffect>,
}

impl<R: MeetingRepository, L: MeetingLinkProvider> MeetingHandler<R, L> {
    pub fn new(repo: Arc<R>, links: Arc<L>) -> Self {
        Self {
            repo,
            links,
            store: StateStore::default(),
            effects: EffectQueue::default(),
        }
    }

    fn apply(&self, change: MeetingChange) {
        self.store.update(|state| reduce(state.clone(), change));
    }

    async fn reject(&self, err: WorkflowError) {
        warn!(error = %err, kind = ?err.kind(), "meeting intent rejected");
        let message = err.message();
        self.apply(MeetingChange::Failed(err));
        self.effects.emit(SideEffect::ShowError(message)).await;
    }

    async fn toast(&self, message: &str) {
        self.effects
            .emit(SideEffect::ShowToast(message.to_string()))
            .await;
    }

    async fn reload(&self, event_id: &str) -> Result<(), WorkflowError> {
        let meetings = self.repo.list(event_id).await.gateway()?;
        self.apply(MeetingChange::MeetingsLoaded {
            event_id: event_id.to_string(),
            meetings,
        });
        Ok(())
    }

    async fn fetch(&self, id: &str) -> Result<Meeting, WorkflowError> {
        self.repo
            .get(id)
            .await
            .gateway()?
            .ok_or_else(|| WorkflowError::not_found("Meeting"))
    }

    async fn run(&self, intent: MeetingIntent) -> Result<(), WorkflowError> {
        match intent {
            MeetingIntent::LoadMeetings(event_id) => {
                self.apply(MeetingChange::Started);
                self.reload(&event_id).await
            }
            MeetingIntent::SelectMeeting(id) => {
                self.apply(MeetingChange::Started);
                let meeting = self.fetch(&id).await?;
                self.apply(MeetingChange::MeetingSelected(meeting));
                Ok(())
            }
            MeetingIntent::CreateMeeting(meeting) => self.create(meeting).await,
            MeetingIntent::UpdateMeeting(mut meeting) => {
                self.apply(MeetingChange::Started);
                validate_meeting(&meeting)?;
                let stored = self.fetch(&meeting.id).await?;
                if stored.status.is_closed() {
                    return Err(WorkflowError::InvalidTransition(
                        "Cannot update a closed meeting".into(),
                    ));
                }
                // Status, ownership and link only change through their own intents.
                meeting.status = stored.status;
                meeting.organizer_id = stored.organizer_id;
                meeting.link = stored.link;
                meeting.event_id = stored.event_id;
                let updated = self.repo.update(&meeting).await.gateway()?;
                self.reload(&updated.event_id).await?;
                self.toast("Meeting updated").await;
                Ok(())
            }
            MeetingIntent::CancelMeeting(id) => self.cancel(&id).await,
            MeetingIntent::GenerateLink(id) => self.generate_link(&id).await,
            MeetingIntent::ShareLink(id) => {
                self.apply(MeetingChange::Started);
                let meeting = self.fetch(&id).await?;
                let link = meeting
                    .link
                    .filter(|l| !l.trim().is_empty())
                    .ok_or_else(|| {
                        WorkflowError::ValidationFailed("Meeting has no link yet".into())
                    })?;
                self.apply(MeetingChange::Finished);
                self.effects.emit(SideEffect::ShareLink(link)).await;
                Ok(())
            }
            MeetingIntent::ClearError => {
                self.apply(MeetingChange::ErrorCleared);
                Ok(())
            }
        }
    }

    async fn create(&self, mut meeting: Meeting) -> Result<(), WorkflowError> {
        self.apply(MeetingChange::Started);
        validate_meeting(&meeting)?;
        if meeting.id.trim().is_empty() {
            meeting.id = uuid::Uuid::new_v4().to_string();
        }
        let created = self.repo.create(&meeting).await.gateway()?;
        info!(meeting_id = %created.id, event_id = %created.event_id, "meeting created");
        self.reload(&created.event_id).await?;
        self.toast("Meeting created").await;
        self.effects
            .emit(SideEffect::NavigateTo(Route::MeetingDetail(created.id)))
            .await;
        Ok(())
    }

    /// The organizer comes from the loaded list, so a meeting that was never
    /// loaded is rejected without touching the gateway.
    async fn cancel(&self, id: &str) -> Result<(), WorkflowError> {
        self.apply(MeetingChange::Started);
        let state = self.store.current();
        let meeting = state
            .meeting(id)
            .ok_or_else(|| WorkflowError::not_found("Meeting"))?;
        match meeting.status {
            MeetingStatus::Cancelled => {
                return Err(WorkflowError::InvalidTransition(
                    "Meeting is already cancelled".into(),
                ))
            }
            MeetingStatus::Ended => {
                return Err(WorkflowError::InvalidTransition(
                    "Meeting has already ended".into(),
                ))
            }
            MeetingStatus::Scheduled | MeetingStatus::Started => {}
        }

        self.repo
            .cancel(id, &meeting.organizer_id)
            .await
            .gateway()?;
        info!(meeting_id = %id, "meeting cancelled");
        self.reload(&meeting.event_id).await?;
        self.toast("Meeting cancelled").await;
        Ok(())
    }

    async fn generate_link(&self, id: &str) -> Result<(), WorkflowError> {
        self.apply(MeetingChange::Started);
        let mut meeting = self.fetch(id).await?;
        if meeting.status.is_closed() {
            return Err(WorkflowError::InvalidTransition(
                "Cannot generate a link for a closed meeting".into(),
            ));
        }
        let link = self.links.generate_link(&meeting).await.gateway()?;
        meeting.link = Some(link);
        let updated = self.repo.update(&meeting).await.gateway()?;
        self.reload(&updated.event_id).await?;
        self.toast("Meeting link generated").await;
        Ok(())
    }
}

#[async_trait]
impl<R: MeetingRepository, L: MeetingLinkProvider> IntentHandler for MeetingHandler<R, L> {
    type Intent = MeetingIntent;

    async fn handle(&self, intent: MeetingIntent) {
        if let Err(err) = self.run(intent).await {
            self.reject(err).await;
        }
    }
}

impl<R: MeetingRepository, L: MeetingLinkProvider> WorkflowHandler for MeetingHandler<R, L> {
    type State = MeetingState;

    fn store(&self) -> &StateStore<MeetingState> {
        &self.store
    }

    fn effects(&self) -> &EffectQueue<SideEffect> {
        &self.effects
    }
}
