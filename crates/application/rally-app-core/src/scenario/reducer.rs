use super::state::{ScenarioChange, ScenarioState};

pub fn reduce(mut state: ScenarioState, change: ScenarioChange) -> ScenarioState {
    match change {
        ScenarioChange::Started => {
            state.is_loading = true;
            state.error = None;
        }
        ScenarioChange::Failed(err) => {
            state.is_loading = false;
            state.error = Some(err);
        }
        ScenarioChange::ErrorCleared => state.error = None,

        ScenarioChange::ScenariosLoaded {
            event_id,
            scenarios,
            my_votes,
        } => {
            state.selected_scenario = state.selected_scenario.take().and_then(|selected| {
                scenarios
                    .iter()
                    .find(|s| s.scenario.id == selected.scenario.id)
                    .cloned()
            });
            // Comparisons never outlive the list they were built from.
            state.comparison = None;
            state.event_id = Some(event_id);
            state.scenarios = scenarios;
            state.my_votes = my_votes;
            state.is_loading = false;
        }
        ScenarioChange::ScenarioSelected(scenario) => {
            state.selected_scenario = Some(scenario);
            state.is_loading = false;
        }
        ScenarioChange::ParticipantSet(participant_id) => {
            if state.participant_id.as_deref() != Some(participant_id.as_str()) {
                state.my_votes.clear();
            }
            state.participant_id = Some(participant_id);
        }

        ScenarioChange::ComparisonReady(comparison) => state.comparison = Some(comparison),
        ScenarioChange::ComparisonCleared => state.comparison = None,
    }
    state
}
