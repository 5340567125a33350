use chrono::DateTime;

use crate::event::Event;
use crate::meeting::Meeting;
use crate::scenario::Scenario;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),
    #[error("At least one time slot must be proposed")]
    NoTimeSlots,
    #[error("Time slot {0} has an empty start or end")]
    IncompleteSlot(String),
    #[error("{field} is not a valid timestamp: {value}")]
    BadTimestamp { field: &'static str, value: String },
    #[error("Meeting must end after it starts")]
    EndBeforeStart,
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(())
}

/// Field-level checks run before a new event ever reaches the gateway.
pub fn validate_event(event: &Event) -> Result<(), ValidationError> {
    require(&event.id, "Event ID")?;
    require(&event.title, "Title")?;
    require(&event.organizer_id, "Organizer ID")?;
    if event.proposed_slots.is_empty() {
        return Err(ValidationError::NoTimeSlots);
    }
    if let Some(slot) = event
        .proposed_slots
        .iter()
        .find(|s| s.start.trim().is_empty() || s.end.trim().is_empty())
    {
        return Err(ValidationError::IncompleteSlot(slot.id.clone()));
    }
    require(&event.deadline, "Deadline")?;
    Ok(())
}

pub fn validate_meeting(meeting: &Meeting) -> Result<(), ValidationError> {
    require(&meeting.title, "Title")?;
    require(&meeting.organizer_id, "Organizer ID")?;
    require(&meeting.event_id, "Event ID")?;

    let parse = |field: &'static str, value: &str| {
        DateTime::parse_from_rfc3339(value).map_err(|_| ValidationError::BadTimestamp {
            field,
            value: value.to_string(),
        })
    };
    let start = parse("Start time", &meeting.start_time)?;
    let end = parse("End time", &meeting.end_time)?;
    if end <= start {
        return Err(ValidationError::EndBeforeStart);
    }
    Ok(())
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    require(&scenario.event_id, "Event ID")?;
    require(&scenario.name, "Name")?;
    require(&scenario.location, "Location")?;
    if scenario.duration_days == 0 {
        return Err(ValidationError::NotPositive("Duration"));
    }
    if scenario.estimated_participants == 0 {
        return Err(ValidationError::NotPositive("Estimated participants"));
    }
    Ok(())
}
