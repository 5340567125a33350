pub mod event;
pub mod gateway;
pub mod meeting;
pub mod poll;
pub mod scenario;
pub mod validation;

pub use event::{Event, EventId, EventStatus, TimeSlot};
pub use gateway::{EventRepository, MeetingLinkProvider, MeetingRepository, ScenarioRepository};
pub use meeting::{Meeting, MeetingId, MeetingPlatform, MeetingStatus};
pub use poll::{Poll, PollVote, SlotTally};
pub use scenario::{
    best_scenario, Scenario, ScenarioId, ScenarioStatus, ScenarioVote, ScenarioVoteType,
    ScenarioWithVotes, VotingResult,
};
pub use validation::ValidationError;

pub type ParticipantId = String;
