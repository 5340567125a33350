use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ParticipantId;

pub type EventId = String;

/// Lifecycle of an event. Status only moves forward, one edge at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Draft,
    Polling,
    Confirmed,
    Organizing,
    Finalized,
}

impl EventStatus {
    pub const ALL: [EventStatus; 5] = [
        EventStatus::Draft,
        EventStatus::Polling,
        EventStatus::Confirmed,
        EventStatus::Organizing,
        EventStatus::Finalized,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "DRAFT",
            EventStatus::Polling => "POLLING",
            EventStatus::Confirmed => "CONFIRMED",
            EventStatus::Organizing => "ORGANIZING",
            EventStatus::Finalized => "FINALIZED",
        }
    }

    /// The single status reachable from `self`, or `None` when terminal.
    pub fn next(&self) -> Option<EventStatus> {
        match self {
            EventStatus::Draft => Some(EventStatus::Polling),
            EventStatus::Polling => Some(EventStatus::Confirmed),
            EventStatus::Confirmed => Some(EventStatus::Organizing),
            EventStatus::Organizing => Some(EventStatus::Finalized),
            EventStatus::Finalized => None,
        }
    }

    pub fn can_transition_to(&self, target: EventStatus) -> bool {
        self.next() == Some(target)
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: String,
    /// ISO-8601 start; becomes the event's final date when confirmed.
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl TimeSlot {
    pub fn new(id: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start: start.into(),
            end: end.into(),
            timezone: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub organizer_id: ParticipantId,
    #[serde(default)]
    pub participants: Vec<ParticipantId>,
    pub proposed_slots: Vec<TimeSlot>,
    pub deadline: String,
    #[serde(default)]
    pub final_date: Option<String>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// A fresh DRAFT event with no participants.
    pub fn draft(
        id: impl Into<String>,
        title: impl Into<String>,
        organizer_id: impl Into<String>,
        proposed_slots: Vec<TimeSlot>,
        deadline: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            organizer_id: organizer_id.into(),
            participants: Vec::new(),
            proposed_slots,
            deadline: deadline.into(),
            final_date: None,
            status: EventStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn slot(&self, slot_id: &str) -> Option<&TimeSlot> {
        self.proposed_slots.iter().find(|s| s.id == slot_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_forward_single_step_edges_are_allowed() {
        for from in EventStatus::ALL {
            for to in EventStatus::ALL {
                let expected = matches!(
                    (from, to),
                    (EventStatus::Draft, EventStatus::Polling)
                        | (EventStatus::Polling, EventStatus::Confirmed)
                        | (EventStatus::Confirmed, EventStatus::Organizing)
                        | (EventStatus::Organizing, EventStatus::Finalized)
                );
                assert_eq!(from.can_transition_to(to), expected, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn finalized_is_the_only_terminal_status() {
        let terminal: Vec<_> = EventStatus::ALL
            .into_iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(terminal, vec![EventStatus::Finalized]);
    }

    #[test]
    fn status_serializes_in_upper_case() {
        let json = serde_json::to_string(&EventStatus::Organizing).unwrap();
        assert_eq!(json, "\"ORGANIZING\"");
    }
}
