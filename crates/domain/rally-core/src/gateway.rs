//! Persistence and provider boundaries. Workflows depend on these traits only;
//! every call either succeeds with a value or fails with a message.

use async_trait::async_trait;

use crate::event::{Event, EventStatus};
use crate::meeting::Meeting;
use crate::poll::{Poll, PollVote};
use crate::scenario::{Scenario, ScenarioStatus, ScenarioVote};
use crate::ParticipantId;

#[async_trait]
pub trait EventRepository: Send + Sync + 'static {
    async fn create(&self, event: &Event) -> anyhow::Result<Event>;
    /// `Ok(None)` when no event has this id.
    async fn get(&self, id: &str) -> anyhow::Result<Option<Event>>;
    async fn update(&self, event: &Event) -> anyhow::Result<Event>;
    async fn update_status(
        &self,
        id: &str,
        status: EventStatus,
        final_date: Option<&str>,
    ) -> anyhow::Result<Event>;
    async fn delete(&self, id: &str) -> anyhow::Result<()>;
    async fn list(&self) -> anyhow::Result<Vec<Event>>;
    async fn get_participants(&self, event_id: &str) -> anyhow::Result<Vec<ParticipantId>>;
    async fn add_participant(&self, event_id: &str, participant_id: &str) -> anyhow::Result<()>;
    /// An event without votes yields an empty poll, not `None`.
    async fn get_poll(&self, event_id: &str) -> anyhow::Result<Poll>;
    async fn add_vote(
        &self,
        event_id: &str,
        participant_id: &str,
        slot_id: &str,
        vote: PollVote,
    ) -> anyhow::Result<()>;
}

#[async_trait]
pub trait MeetingRepository: Send + Sync + 'static {
    async fn create(&self, meeting: &Meeting) -> anyhow::Result<Meeting>;
    async fn get(&self, id: &str) -> anyhow::Result<Option<Meeting>>;
    async fn update(&self, meeting: &Meeting) -> anyhow::Result<Meeting>;
    /// Only the organizer may cancel; implementations enforce it.
    async fn cancel(&self, id: &str, organizer_id: &str) -> anyhow::Result<()>;
    async fn list(&self, event_id: &str) -> anyhow::Result<Vec<Meeting>>;
}

#[async_trait]
pub trait ScenarioRepository: Send + Sync + 'static {
    async fn create(&self, scenario: &Scenario) -> anyhow::Result<Scenario>;
    async fn get(&self, id: &str) -> anyhow::Result<Option<Scenario>>;
    async fn update(&self, scenario: &Scenario) -> anyhow::Result<Scenario>;
    async fn update_status(&self, id: &str, status: ScenarioStatus) -> anyhow::Result<Scenario>;
    async fn delete(&self, id: &str) -> anyhow::Result<()>;
    async fn list(&self, event_id: &str) -> anyhow::Result<Vec<Scenario>>;
    async fn add_vote(&self, vote: &ScenarioVote) -> anyhow::Result<()>;
    async fn get_votes(&self, scenario_id: &str) -> anyhow::Result<Vec<ScenarioVote>>;
}

/// Platform-specific meeting link generation (Zoom, Meet, ...).
#[async_trait]
pub trait MeetingLinkProvider: Send + Sync + 'static {
    async fn generate_link(&self, meeting: &Meeting) -> anyhow::Result<String>;
}
