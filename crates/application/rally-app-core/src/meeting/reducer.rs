use super::state::{MeetingChange, MeetingState};

pub fn reduce(mut state: MeetingState, change: MeetingChange) -> MeetingState {
    match change {
        MeetingChange::Started => {
            state.is_loading = true;
            state.error = None;
        }
        MeetingChange::Failed(err) => {
            state.is_loading = false;
            state.error = Some(err);
        }
        MeetingChange::Finished => state.is_loading = false,
        MeetingChange::ErrorCleared => state.error = None,

        MeetingChange::MeetingsLoaded { event_id, meetings } => {
            state.selected_meeting = state
                .selected_meeting
                .take()
                .and_then(|selected| meetings.iter().find(|m| m.id == selected.id).cloned());
            state.event_id = Some(event_id);
            state.meetings = meetings;
            state.is_loading = false;
        }
        MeetingChange::MeetingSelected(meeting) => {
            state.selected_meeting = Some(meeting);
            state.is_loading = false;
        }
    }
    state
}
