use async_trait::async_trait;
use chrono::Utc;
use rally_core::{
    Event, EventRepository, EventStatus, Meeting, MeetingRepository, MeetingStatus, ParticipantId,
    Poll, PollVote, Scenario, ScenarioRepository, ScenarioStatus, ScenarioVote,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{Backend, Table};
use crate::codec::{decode, encode};
use crate::StorageError;

/// Gateway implementation over any [`Backend`]. Record rules live here so the
/// in-memory and redb stores behave the same.
pub struct RallyStore<B> {
    backend: B,
}

impl<B: Backend> RallyStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn load<T: DeserializeOwned>(
        &self,
        table: Table,
        key: &str,
    ) -> Result<Option<T>, StorageError> {
        self.backend
            .get(table, key)?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    fn load_all<T: DeserializeOwned>(&self, table: Table) -> Result<Vec<T>, StorageError> {
        self.backend
            .scan(table)?
            .iter()
            .map(|bytes| decode(bytes))
            .collect()
    }

    /// Atomic read-modify-write of one typed record; returns what was written.
    fn modify<T, F>(&self, table: Table, key: &str, f: F) -> Result<T, StorageError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(Option<T>) -> Result<T, StorageError>,
    {
        let mut written = None;
        self.backend.mutate(
            table,
            key,
            Box::new(|current: Option<&[u8]>| -> Result<Option<Vec<u8>>, StorageError> {
                let current = current.map(decode::<T>).transpose()?;
                let next = f(current)?;
                let bytes = encode(&next)?;
                written = Some(next);
                Ok(Some(bytes))
            }),
        )?;
        written.ok_or(StorageError::Corrupt)
    }

    fn remove(&self, table: Table, key: &str) -> Result<bool, StorageError> {
        let mut existed = false;
        self.backend.mutate(
            table,
            key,
            Box::new(|current: Option<&[u8]>| -> Result<Option<Vec<u8>>, StorageError> {
                existed = current.is_some();
                Ok(None)
            }),
        )?;
        Ok(existed)
    }

    fn insert_new<T>(
        &self,
        table: Table,
        entity: &'static str,
        id: &str,
        value: &T,
    ) -> Result<(), StorageError>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        self.modify(table, id, |current: Option<T>| match current {
            Some(_) => Err(StorageError::already_exists(entity, id)),
            None => Ok(value.clone()),
        })
        .map(|_| ())
    }

    fn modify_existing<T, F>(
        &self,
        table: Table,
        entity: &'static str,
        id: &str,
        f: F,
    ) -> Result<T, StorageError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(T) -> Result<T, StorageError>,
    {
        self.modify(table, id, |current: Option<T>| {
            f(current.ok_or_else(|| StorageError::not_found(entity, id))?)
        })
    }

    fn require_event(&self, id: &str) -> Result<Event, StorageError> {
        self.load(Table::Events, id)?
            .ok_or_else(|| StorageError::not_found("Event", id))
    }
}

#[async_trait]
impl<B: Backend> EventRepository for RallyStore<B> {
    async fn create(&self, event: &Event) -> anyhow::Result<Event> {
        self.insert_new(Table::Events, "Event", &event.id, event)?;
        Ok(event.clone())
    }

    async fn get(&self, id: &str) -> anyhow::Result<Option<Event>> {
        Ok(self.load(Table::Events, id)?)
    }

    async fn update(&self, event: &Event) -> anyhow::Result<Event> {
        let updated = self.modify_existing(Table::Events, "Event", &event.id, |_: Event| {
            let mut next = event.clone();
            next.updated_at = Utc::now();
            Ok(next)
        })?;
        Ok(updated)
    }

    async fn update_status(
        &self,
        id: &str,
        status: EventStatus,
        final_date: Option<&str>,
    ) -> anyhow::Result<Event> {
        let updated = self.modify_existing(Table::Events, "Event", id, |mut event: Event| {
            event.status = status;
            if let Some(date) = final_date {
                event.final_date = Some(date.to_string());
            }
            event.updated_at = Utc::now();
            Ok(event)
        })?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> anyhow::Result<()> {
        if !self.remove(Table::Events, id)? {
            return Err(StorageError::not_found("Event", id).into());
        }
        self.remove(Table::Polls, id)?;
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<Event>> {
        let mut events: Vec<Event> = self.load_all(Table::Events)?;
        events.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(events)
    }

    async fn get_participants(&self, event_id: &str) -> anyhow::Result<Vec<ParticipantId>> {
        Ok(self.require_event(event_id)?.participants)
    }

    async fn add_participant(&self, event_id: &str, participant_id: &str) -> anyhow::Result<()> {
        self.modify_existing(Table::Events, "Event", event_id, |mut event: Event| {
            if !event.participants.iter().any(|p| p == participant_id) {
                event.participants.push(participant_id.to_string());
                event.updated_at = Utc::now();
            }
            Ok(event)
        })?;
        Ok(())
    }

    async fn get_poll(&self, event_id: &str) -> anyhow::Result<Poll> {
        Ok(self
            .load(Table::Polls, event_id)?
            .unwrap_or_else(|| Poll::empty(event_id)))
    }

    async fn add_vote(
        &self,
        event_id: &str,
        participant_id: &str,
        slot_id: &str,
        vote: PollVote,
    ) -> anyhow::Result<()> {
        self.require_event(event_id)?;
        self.modify(Table::Polls, event_id, |poll: Option<Poll>| {
            let mut poll = poll.unwrap_or_else(|| Poll::empty(event_id));
            poll.record(participant_id, slot_id, vote);
            Ok(poll)
        })?;
        Ok(())
    }
}

#[async_trait]
impl<B: Backend> MeetingRepository for RallyStore<B> {
    async fn create(&self, meeting: &Meeting) -> anyhow::Result<Meeting> {
        self.insert_new(Table::Meetings, "Meeting", &meeting.id, meeting)?;
        Ok(meeting.clone())
    }

    async fn get(&self, id: &str) -> anyhow::Result<Option<Meeting>> {
        Ok(self.load(Table::Meetings, id)?)
    }

    async fn update(&self, meeting: &Meeting) -> anyhow::Result<Meeting> {
        let updated = self.modify_existing(Table::Meetings, "Meeting", &meeting.id, |_: Meeting| {
            Ok(meeting.clone())
        })?;
        Ok(updated)
    }

    async fn cancel(&self, id: &str, organizer_id: &str) -> anyhow::Result<()> {
        self.modify_existing(Table::Meetings, "Meeting", id, |mut meeting: Meeting| {
            if meeting.organizer_id != organizer_id {
                return Err(StorageError::Forbidden(
                    "Only the organizer can cancel this meeting".into(),
                ));
            }
            meeting.status = MeetingStatus::Cancelled;
            Ok(meeting)
        })?;
        Ok(())
    }

    async fn list(&self, event_id: &str) -> anyhow::Result<Vec<Meeting>> {
        let mut meetings: Vec<Meeting> = self.load_all(Table::Meetings)?;
        meetings.retain(|m| m.event_id == event_id);
        meetings.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
        Ok(meetings)
    }
}

#[async_trait]
impl<B: Backend> ScenarioRepository for RallyStore<B> {
    async fn create(&self, scenario: &Scenario) -> anyhow::Result<Scenario> {
        self.insert_new(Table::Scenarios, "Scenario", &scenario.id, scenario)?;
        Ok(scenario.clone())
    }

    async fn get(&self, id: &str) -> anyhow::Result<Option<Scenario>> {
        Ok(self.load(Table::Scenarios, id)?)
    }

    async fn update(&self, scenario: &Scenario) -> anyhow::Result<Scenario> {
        let updated =
            self.modify_existing(Table::Scenarios, "Scenario", &scenario.id, |_: Scenario| {
                Ok(scenario.clone())
            })?;
        Ok(updated)
    }

    async fn update_status(&self, id: &str, status: ScenarioStatus) -> anyhow::Result<Scenario> {
        let updated = self.modify_existing(Table::Scenarios, "Scenario", id, |mut s: Scenario| {
            s.status = status;
            Ok(s)
        })?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> anyhow::Result<()> {
        if !self.remove(Table::Scenarios, id)? {
            return Err(StorageError::not_found("Scenario", id).into());
        }
        self.remove(Table::ScenarioVotes, id)?;
        Ok(())
    }

    async fn list(&self, event_id: &str) -> anyhow::Result<Vec<Scenario>> {
        let mut scenarios: Vec<Scenario> = self.load_all(Table::Scenarios)?;
        scenarios.retain(|s| s.event_id == event_id);
        scenarios.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(scenarios)
    }

    async fn add_vote(&self, vote: &ScenarioVote) -> anyhow::Result<()> {
        if self
            .load::<Scenario>(Table::Scenarios, &vote.scenario_id)?
            .is_none()
        {
            return Err(StorageError::not_found("Scenario", &vote.scenario_id).into());
        }
        self.modify(
            Table::ScenarioVotes,
            &vote.scenario_id,
            |votes: Option<Vec<ScenarioVote>>| {
                let mut votes = votes.unwrap_or_default();
                votes.push(vote.clone());
                Ok(votes)
            },
        )?;
        Ok(())
    }

    async fn get_votes(&self, scenario_id: &str) -> anyhow::Result<Vec<ScenarioVote>> {
        Ok(self
            .load(Table::ScenarioVotes, scenario_id)?
            .unwrap_or_default())
    }
}
