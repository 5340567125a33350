use rally_core::{EventId, Meeting};

use crate::error::WorkflowError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeetingState {
    pub is_loading: bool,
    pub error: Option<WorkflowError>,
    /// Event whose meetings are listed.
    pub event_id: Option<EventId>,
    pub meetings: Vec<Meeting>,
    pub selected_meeting: Option<Meeting>,
}

impl MeetingState {
    pub fn meeting(&self, id: &str) -> Option<&Meeting> {
        self.meetings.iter().find(|m| m.id == id)
    }
}

#[derive(Debug, Clone)]
pub enum MeetingChange {
    Started,
    Failed(WorkflowError),
    Finished,
    ErrorCleared,

    MeetingsLoaded {
        event_id: EventId,
        meetings: Vec<Meeting>,
    },
    MeetingSelected(Meeting),
}
