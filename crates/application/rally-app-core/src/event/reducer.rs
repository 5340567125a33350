use super::state::{EventChange, EventState};

pub fn reduce(mut state: EventState, change: EventChange) -> EventState {
    match change {
        EventChange::Started => {
            state.is_loading = true;
            state.error = None;
        }
        EventChange::Failed(err) => {
            state.is_loading = false;
            state.error = Some(err);
        }
        EventChange::ErrorCleared => state.error = None,

        EventChange::EventsLoaded(events) => {
            // The selection follows the freshest copy, or goes with the event.
            if let Some(selected) = state.selected_event.take() {
                state.selected_event = events.iter().find(|e| e.id == selected.id).cloned();
                if state.selected_event.is_none() {
                    state.participants.clear();
                    state.poll = None;
                    state.tallies.clear();
                }
            }
            state.events = events;
            state.is_loading = false;
        }
        EventChange::EventSelected(event) => {
            state.selected_event = Some(event);
            state.is_loading = false;
        }
        EventChange::SelectionCleared(id) => {
            if state.selected_event.as_ref().is_some_and(|e| e.id == id) {
                state.selected_event = None;
                state.participants.clear();
                state.poll = None;
                state.tallies.clear();
            }
        }

        EventChange::ParticipantsLoaded(participants) => {
            state.participants = participants;
            state.is_loading = false;
        }
        EventChange::PollLoaded { poll, tallies } => {
            state.poll = Some(poll);
            state.tallies = tallies;
            state.is_loading = false;
        }

        EventChange::ScenariosUnlocked => state.scenarios_unlocked = true,
        EventChange::MeetingsUnlocked => state.meetings_unlocked = true,
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkflowError;
    use rally_core::{Event, EventStatus, TimeSlot};

    fn event(id: &str, status: EventStatus) -> Event {
        let mut e = Event::draft(
            id,
            "Dinner",
            "org",
            vec![TimeSlot::new("s1", "2026-12-01T18:00:00Z", "2026-12-01T22:00:00Z")],
            "2026-11-20T00:00:00Z",
        );
        e.status = status;
        e
    }

    #[test]
    fn started_clears_previous_error() {
        let state = EventState {
            error: Some(WorkflowError::NotFound("gone".into())),
            ..Default::default()
        };
        let state = reduce(state, EventChange::Started);
        assert!(state.is_loading);
        assert_eq!(state.error, None);
    }

    #[test]
    fn reload_refreshes_selected_event() {
        let state = reduce(
            EventState::default(),
            EventChange::EventSelected(event("e1", EventStatus::Draft)),
        );
        let state = reduce(
            state,
            EventChange::EventsLoaded(vec![event("e1", EventStatus::Polling)]),
        );
        assert_eq!(
            state.selected_event.map(|e| e.status),
            Some(EventStatus::Polling)
        );
    }

    #[test]
    fn clearing_another_id_keeps_selection() {
        let state = reduce(
            EventState::default(),
            EventChange::EventSelected(event("e1", EventStatus::Draft)),
        );
        let state = reduce(state, EventChange::SelectionCleared("e2".into()));
        assert!(state.selected_event.is_some());
        let state = reduce(state, EventChange::SelectionCleared("e1".into()));
        assert!(state.selected_event.is_none());
    }

    #[test]
    fn reload_drops_selection_missing_from_list() {
        let mut state = reduce(
            EventState::default(),
            EventChange::EventSelected(event("e1", EventStatus::Draft)),
        );
        state.participants = vec!["ana".into()];
        let state = reduce(
            state,
            EventChange::EventsLoaded(vec![event("e2", EventStatus::Draft)]),
        );
        assert_eq!(state.selected_event, None);
        assert!(state.participants.is_empty());
        assert_eq!(state.events.len(), 1);
    }
}
