use std::fmt;

use rally_core::{EventId, MeetingId, ScenarioId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    EventDetail(EventId),
    Scenarios(EventId),
    ScenarioDetail(ScenarioId),
    Meetings(EventId),
    MeetingDetail(MeetingId),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::EventDetail(id) => write!(f, "events/{id}"),
            Route::Scenarios(event_id) => write!(f, "scenarios/{event_id}"),
            Route::ScenarioDetail(id) => write!(f, "scenario/{id}"),
            Route::Meetings(event_id) => write!(f, "meetings/{event_id}"),
            Route::MeetingDetail(id) => write!(f, "meeting/{id}"),
        }
    }
}

/// One-shot instructions for the client. Never part of state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    NavigateTo(Route),
    NavigateBack,
    ShowToast(String),
    ShowError(String),
    ShareLink(String),
}
