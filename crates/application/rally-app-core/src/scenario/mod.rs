pub mod commands;
pub mod reducer;
pub mod state;
pub mod workflow;

pub use commands::ScenarioIntent;
pub use reducer::reduce;
pub use state::{ScenarioChange, ScenarioComparison, ScenarioState};
pub use workflow::{ScenarioHandler, ScenarioWorkflow};
