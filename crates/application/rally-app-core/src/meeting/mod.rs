pub mod commands;
pub mod reducer;
pub mod state;
pub mod workflow;

pub use commands::MeetingIntent;
pub use reducer::reduce;
pub use state::{MeetingChange, MeetingState};
pub use workflow::{MeetingHandler, MeetingWorkflow};
