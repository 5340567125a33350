pub mod dispatcher;
pub mod effects;
pub mod side_effect;
pub mod store;
pub mod workflow;

pub use dispatcher::{Dispatcher, IntentHandler};
pub use effects::{EffectConsumer, EffectQueue};
pub use side_effect::{Route, SideEffect};
pub use store::{StaleSnapshot, StateStore, StateSubscription};
pub use workflow::{Workflow, WorkflowHandler};
