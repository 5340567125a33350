use std::collections::BTreeMap;

use rally_core::{EventId, ScenarioId, ScenarioVoteType, ScenarioWithVotes};

use crate::error::WorkflowError;

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioComparison {
    pub scenarios: Vec<ScenarioWithVotes>,
    pub best_id: Option<ScenarioId>,
}

impl ScenarioComparison {
    pub fn best(&self) -> Option<&ScenarioWithVotes> {
        let id = self.best_id.as_deref()?;
        self.scenarios.iter().find(|s| s.scenario.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioState {
    pub is_loading: bool,
    pub error: Option<WorkflowError>,
    pub event_id: Option<EventId>,
    pub scenarios: Vec<ScenarioWithVotes>,
    pub selected_scenario: Option<ScenarioWithVotes>,
    /// Who is voting from this client.
    pub participant_id: Option<String>,
    /// The current participant's vote per scenario.
    pub my_votes: BTreeMap<ScenarioId, ScenarioVoteType>,
    pub comparison: Option<ScenarioComparison>,
}

impl ScenarioState {
    pub fn scenario(&self, id: &str) -> Option<&ScenarioWithVotes> {
        self.scenarios.iter().find(|s| s.scenario.id == id)
    }
}

#[derive(Debug, Clone)]
pub enum ScenarioChange {
    Started,
    Failed(WorkflowError),
    ErrorCleared,

    ScenariosLoaded {
        event_id: EventId,
        scenarios: Vec<ScenarioWithVotes>,
        my_votes: BTreeMap<ScenarioId, ScenarioVoteType>,
    },
    ScenarioSelected(ScenarioWithVotes),
    ParticipantSet(String),

    ComparisonReady(ScenarioComparison),
    ComparisonCleared,
}
