use rally_core::{Event, EventId, PollVote};

#[derive(Debug, Clone)]
pub enum EventIntent {
    // Listing and selection
    LoadEvents,
    SelectEvent(EventId),

    // Editing
    CreateEvent(Event),
    UpdateEvent(Event),
    DeleteEvent(EventId),

    // Participants and poll
    LoadParticipants(EventId),
    AddParticipant {
        event_id: EventId,
        participant_id: String,
    },
    LoadPoll(EventId),
    SubmitVote {
        event_id: EventId,
        participant_id: String,
        slot_id: String,
        vote: PollVote,
    },

    // Lifecycle transitions
    StartPoll(EventId),
    ConfirmDate {
        event_id: EventId,
        slot_id: String,
    },
    TransitionToOrganizing(EventId),
    Finalize(EventId),

    ClearError,
}
