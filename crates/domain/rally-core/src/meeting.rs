use serde::{Deserialize, Serialize};

use crate::event::EventId;
use crate::ParticipantId;

pub type MeetingId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeetingPlatform {
    Zoom,
    GoogleMeet,
    Facetime,
    Teams,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeetingStatus {
    Scheduled,
    Started,
    Ended,
    Cancelled,
}

impl MeetingStatus {
    pub fn is_closed(&self) -> bool {
        matches!(self, MeetingStatus::Ended | MeetingStatus::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: MeetingId,
    pub event_id: EventId,
    pub organizer_id: ParticipantId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// RFC 3339 timestamps.
    pub start_time: String,
    pub end_time: String,
    pub platform: MeetingPlatform,
    #[serde(default)]
    pub link: Option<String>,
    pub status: MeetingStatus,
    #[serde(default)]
    pub participants: Vec<ParticipantId>,
}
