pub mod commands;
pub mod reducer;
pub mod state;
pub mod workflow;

pub use commands::EventIntent;
pub use reducer::reduce;
pub use state::{EventChange, EventState};
pub use workflow::{EventHandler, EventWorkflow};
