use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use rally_core::validation::validate_scenario;
use rally_core::{
    best_scenario, Scenario, ScenarioRepository, ScenarioStatus, ScenarioVote, ScenarioWithVotes,
    VotingResult,
};
use tracing::{info, warn};

use super::commands::ScenarioIntent;
use super::reducer::reduce;
use super::state::{ScenarioChange, ScenarioComparison, ScenarioState};
use crate::app_core::{
    EffectQueue, IntentHandler, Route, SideEffect, StateStore, Workflow, WorkflowHandler,
};
use crate::error::{GatewayResultExt, WorkflowError};

pub type ScenarioWorkflow<R> = Workflow<ScenarioHandler<R>>;

impl<R: ScenarioRepository> Workflow<ScenarioHandler<R>> {
    pub fn new(repo: Arc<R>) -> anyhow::Result<Self> {
        Self::from_handler(ScenarioHandler::new(repo))
    }
}

pub struct ScenarioHandler<R> {
    repo: Arc<R>,
    store: StateStore<ScenarioState>,
    effects: EffectQueue<SideEffect>,
}

impl<R: ScenarioRepository> ScenarioHandler<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            store: StateStore::default(),
            effects: EffectQueue::default(),
        }
    }

    fn apply(&self, change: ScenarioChange) {
        self.store.update(|state| reduce(state.clone(), change));
    }

    async fn reject(&self, err: WorkflowError) {
        warn!(error = %err, kind = ?err.kind(), "scenario intent rejected");
        let message = err.message();
        self.apply(ScenarioChange::Failed(err));
        self.effects.emit(SideEffect::ShowError(message)).await;
    }

    async fn toast(&self, message: &str) {
        self.effects
            .emit(SideEffect::ShowToast(message.to_string()))
            .await;
    }

    async fn fetch(&self, id: &str) -> Result<Scenario, WorkflowError> {
        self.repo
            .get(id)
            .await
            .gateway()?
            .ok_or_else(|| WorkflowError::not_found("Scenario"))
    }

    async fn with_votes(&self, scenario: Scenario) -> Result<ScenarioWithVotes, WorkflowError> {
        let votes = self.repo.get_votes(&scenario.id).await.gateway()?;
        Ok(ScenarioWithVotes {
            scenario,
            votes: VotingResult::from_votes(&votes),
        })
    }

    /// Reloads scenarios of `event_id` with fresh vote aggregates, plus the
    /// current participant's own votes.
    async fn reload(&self, event_id: &str) -> Result<(), WorkflowError> {
        let participant = self.store.current().participant_id;
        let scenarios = self.repo.list(event_id).await.gateway()?;

        let mut loaded = Vec::with_capacity(scenarios.len());
        let mut my_votes = BTreeMap::new();
        for scenario in scenarios {
            let votes = self.repo.get_votes(&scenario.id).await.gateway()?;
            if let Some(participant) = participant.as_deref() {
                if let Some(mine) = votes.iter().rev().find(|v| v.participant_id == participant) {
                    my_votes.insert(scenario.id.clone(), mine.vote);
                }
            }
            loaded.push(ScenarioWithVotes {
                votes: VotingResult::from_votes(&votes),
                scenario,
            });
        }

        self.apply(ScenarioChange::ScenariosLoaded {
            event_id: event_id.to_string(),
            scenarios: loaded,
            my_votes,
        });
        Ok(())
    }

    async fn run(&self, intent: ScenarioIntent) -> Result<(), WorkflowError> {
        match intent {
            ScenarioIntent::LoadScenarios(event_id) => {
                self.apply(ScenarioChange::Started);
                self.reload(&event_id).await
            }
            ScenarioIntent::SelectScenario(id) => {
                self.apply(ScenarioChange::Started);
                let scenario = self.fetch(&id).await?;
                let selected = self.with_votes(scenario).await?;
                self.apply(ScenarioChange::ScenarioSelected(selected));
                Ok(())
            }
            ScenarioIntent::CreateScenario(scenario) => self.create(scenario).await,
            ScenarioIntent::UpdateScenario(mut scenario) => {
                self.apply(ScenarioChange::Started);
                validate_scenario(&scenario)?;
                let stored = self.fetch(&scenario.id).await?;
                scenario.event_id = stored.event_id;
                scenario.status = stored.status;
                scenario.created_at = stored.created_at;
                let updated = self.repo.update(&scenario).await.gateway()?;
                self.reload(&updated.event_id).await?;
                self.toast("Scenario updated").await;
                Ok(())
            }
            ScenarioIntent::DeleteScenario(id) => {
                self.apply(ScenarioChange::Started);
                let scenario = self.fetch(&id).await?;
                self.repo.delete(&id).await.gateway()?;
                self.reload(&scenario.event_id).await?;
                self.toast("Scenario deleted").await;
                self.effects.emit(SideEffect::NavigateBack).await;
                Ok(())
            }

            ScenarioIntent::SetParticipant(participant_id) => {
                if participant_id.trim().is_empty() {
                    return Err(WorkflowError::ValidationFailed(
                        "Participant ID cannot be empty".into(),
                    ));
                }
                self.apply(ScenarioChange::ParticipantSet(participant_id));
                if let Some(event_id) = self.store.current().event_id {
                    self.reload(&event_id).await?;
                }
                Ok(())
            }
            ScenarioIntent::Vote { scenario_id, vote } => {
                self.apply(ScenarioChange::Started);
                let participant_id = self
                    .store
                    .current()
                    .participant_id
                    .filter(|p| !p.trim().is_empty())
                    .ok_or_else(|| {
                        WorkflowError::ValidationFailed(
                            "Participant must be set before voting".into(),
                        )
                    })?;
                let scenario = self.fetch(&scenario_id).await?;
                if scenario.status != ScenarioStatus::Proposed {
                    return Err(WorkflowError::InvalidTransition(
                        "Voting is closed for this scenario".into(),
                    ));
                }
                self.repo
                    .add_vote(&ScenarioVote {
                        scenario_id,
                        participant_id,
                        vote,
                    })
                    .await
                    .gateway()?;
                self.reload(&scenario.event_id).await?;
                self.toast("Vote recorded").await;
                Ok(())
            }

            ScenarioIntent::CompareScenarios { ids, best_id } => self.compare(&ids, best_id),
            ScenarioIntent::ClearComparison => {
                self.apply(ScenarioChange::ComparisonCleared);
                Ok(())
            }
            ScenarioIntent::SelectFinal(id) => self.select_final(&id).await,

            ScenarioIntent::ClearError => {
                self.apply(ScenarioChange::ErrorCleared);
                Ok(())
            }
        }
    }

    async fn create(&self, mut scenario: Scenario) -> Result<(), WorkflowError> {
        self.apply(ScenarioChange::Started);
        validate_scenario(&scenario)?;
        if scenario.id.trim().is_empty() {
            scenario.id = uuid::Uuid::new_v4().to_string();
        }
        scenario.status = ScenarioStatus::Proposed;
        let created = self.repo.create(&scenario).await.gateway()?;
        info!(scenario_id = %created.id, event_id = %created.event_id, "scenario created");
        self.reload(&created.event_id).await?;
        self.toast("Scenario created").await;
        self.effects
            .emit(SideEffect::NavigateTo(Route::ScenarioDetail(created.id)))
            .await;
        Ok(())
    }

    /// Works on the loaded list only.
    fn compare(&self, ids: &[String], best_id: Option<String>) -> Result<(), WorkflowError> {
        let state = self.store.current();
        let scenarios: Vec<ScenarioWithVotes> = state
            .scenarios
            .into_iter()
            .filter(|s| ids.contains(&s.scenario.id))
            .collect();
        if scenarios.is_empty() {
            return Err(WorkflowError::ValidationFailed(
                "No scenarios to compare".into(),
            ));
        }

        let best_id = match best_id {
            Some(id) if scenarios.iter().any(|s| s.scenario.id == id) => Some(id),
            Some(_) => {
                return Err(WorkflowError::ValidationFailed(
                    "Preferred scenario is not part of the comparison".into(),
                ))
            }
            None => best_scenario(&scenarios).map(|s| s.scenario.id.clone()),
        };
        self.apply(ScenarioChange::ComparisonReady(ScenarioComparison {
            scenarios,
            best_id,
        }));
        Ok(())
    }

    async fn select_final(&self, id: &str) -> Result<(), WorkflowError> {
        self.apply(ScenarioChange::Started);
        let scenario = self.fetch(id).await?;
        if scenario.status != ScenarioStatus::Proposed {
            return Err(WorkflowError::InvalidTransition(
                "Scenario is not in PROPOSED status".into(),
            ));
        }

        self.repo
            .update_status(id, ScenarioStatus::Selected)
            .await
            .gateway()?;
        let siblings = self.repo.list(&scenario.event_id).await.gateway()?;
        for other in siblings
            .iter()
            .filter(|s| s.id != id && s.status == ScenarioStatus::Proposed)
        {
            self.repo
                .update_status(&other.id, ScenarioStatus::Rejected)
                .await
                .gateway()?;
        }
        info!(scenario_id = %id, event_id = %scenario.event_id, "final scenario selected");

        self.reload(&scenario.event_id).await?;
        self.toast("Scenario selected").await;
        Ok(())
    }
}

#[async_trait]
impl<R: ScenarioRepository> IntentHandler for ScenarioHandler<R> {
    type Intent = ScenarioIntent;

    async fn handle(&self, intent: ScenarioIntent) {
        if let Err(err) = self.run(intent).await {
            self.reject(err).await;
        }
    }
}

impl<R: ScenarioRepository> WorkflowHandler for ScenarioHandler<R> {
    type State = ScenarioState;

    fn store(&self) -> &StateStore<ScenarioState> {
        &self.store
    }

    fn effects(&self) -> &EffectQueue<SideEffect> {
        &self.effects
    }
}
