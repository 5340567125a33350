pub mod commands;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use directories::ProjectDirs;
use rally_app_core::{EventWorkflow, ScenarioWorkflow};
use rally_core::{PollVote, ScenarioVoteType};
use rally_persistence::RedbStore;

#[derive(ValueEnum, Clone, Debug, Copy)]
pub enum CliPollVote {
    Yes,
    Maybe,
    No,
}

impl From<CliPollVote> for PollVote {
    fn from(v: CliPollVote) -> Self {
        match v {
            CliPollVote::Yes => PollVote::Yes,
            CliPollVote::Maybe => PollVote::Maybe,
            CliPollVote::No => PollVote::No,
        }
    }
}

#[derive(ValueEnum, Clone, Debug, Copy)]
pub enum CliScenarioVote {
    Prefer,
    Neutral,
    Against,
}

impl From<CliScenarioVote> for ScenarioVoteType {
    fn from(v: CliScenarioVote) -> Self {
        match v {
            CliScenarioVote::Prefer => ScenarioVoteType::Prefer,
            CliScenarioVote::Neutral => ScenarioVoteType::Neutral,
            CliScenarioVote::Against => ScenarioVoteType::Against,
        }
    }
}

/// Platform data directory used when neither `--data-dir` nor the
/// environment override is given.
pub fn default_data_dir() -> Result<Utf8PathBuf> {
    let dirs = ProjectDirs::from(rally_config::QUALIFIER, rally_config::ORG, rally_config::APP)
        .ok_or_else(|| anyhow!("Could not determine data directory"))?;
    Utf8PathBuf::from_path_buf(dirs.data_dir().to_path_buf())
        .map_err(|p| anyhow!("Data directory is not valid UTF-8: {}", p.display()))
}

/// The store plus one open workflow per domain, for a single CLI invocation.
pub struct Session {
    pub store: Arc<RedbStore>,
    pub events: EventWorkflow<RedbStore>,
    pub scenarios: ScenarioWorkflow<RedbStore>,
}

impl Session {
    pub fn open(data_dir: &Utf8Path) -> Result<Self> {
        let store = Arc::new(RedbStore::open(data_dir)?);
        tracing::debug!(path = %store.path(), "opened rally store");
        Ok(Self {
            events: EventWorkflow::new(store.clone())?,
            scenarios: ScenarioWorkflow::new(store.clone())?,
            store,
        })
    }
}
