use rally_core::{Event, EventId, ParticipantId, Poll, SlotTally};

use crate::error::WorkflowError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventState {
    pub is_loading: bool,
    pub error: Option<WorkflowError>,
    pub events: Vec<Event>,
    pub selected_event: Option<Event>,
    pub participants: Vec<ParticipantId>,
    pub poll: Option<Poll>,
    pub tallies: Vec<SlotTally>,
    /// Set once a date is confirmed; the client may open scenario planning.
    pub scenarios_unlocked: bool,
    /// Set once the event is organizing; the client may open meetings.
    pub meetings_unlocked: bool,
}

impl EventState {
    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }
}

#[derive(Debug, Clone)]
pub enum EventChange {
    Started,
    Failed(WorkflowError),
    ErrorCleared,

    EventsLoaded(Vec<Event>),
    EventSelected(Event),
    SelectionCleared(EventId),

    ParticipantsLoaded(Vec<ParticipantId>),
    PollLoaded { poll: Poll, tallies: Vec<SlotTally> },

    ScenariosUnlocked,
    MeetingsUnlocked,
}
