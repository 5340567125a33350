use rally_core::{EventId, Scenario, ScenarioId, ScenarioVoteType};

#[derive(Debug, Clone)]
pub enum ScenarioIntent {
    LoadScenarios(EventId),
    SelectScenario(ScenarioId),

    CreateScenario(Scenario),
    UpdateScenario(Scenario),
    DeleteScenario(ScenarioId),

    // Voting
    SetParticipant(String),
    Vote {
        scenario_id: ScenarioId,
        vote: ScenarioVoteType,
    },

    // Comparison and final choice
    CompareScenarios {
        ids: Vec<ScenarioId>,
        /// Caller's pick; the highest-ranked scenario is used when absent.
        best_id: Option<ScenarioId>,
    },
    ClearComparison,
    SelectFinal(ScenarioId),

    ClearError,
}
