pub mod app_core;
mod async_runtime;
pub mod error;
pub mod event;
pub mod meeting;
pub mod scenario;

pub use app_core::*;
pub use error::{ErrorKind, WorkflowError};
pub use event::{EventChange, EventHandler, EventIntent, EventState, EventWorkflow};
pub use meeting::{MeetingChange, MeetingHandler, MeetingIntent, MeetingState, MeetingWorkflow};
pub use scenario::{
    ScenarioChange, ScenarioComparison, ScenarioHandler, ScenarioIntent, ScenarioState,
    ScenarioWorkflow,
};
