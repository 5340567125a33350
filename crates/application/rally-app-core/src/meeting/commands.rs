use rally_core::{EventId, Meeting, MeetingId};

#[derive(Debug, Clone)]
pub enum MeetingIntent {
    LoadMeetings(EventId),
    SelectMeeting(MeetingId),

    CreateMeeting(Meeting),
    UpdateMeeting(Meeting),
    CancelMeeting(MeetingId),

    // Links
    GenerateLink(MeetingId),
    ShareLink(MeetingId),

    ClearError,
}
