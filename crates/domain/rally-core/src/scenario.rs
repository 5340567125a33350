use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::EventId;
use crate::ParticipantId;

pub type ScenarioId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioStatus {
    Proposed,
    Selected,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioVoteType {
    Prefer,
    Neutral,
    Against,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: ScenarioId,
    pub event_id: EventId,
    pub name: String,
    pub date_or_period: String,
    pub location: String,
    pub duration_days: u32,
    pub estimated_participants: u32,
    pub estimated_budget_per_person: f64,
    #[serde(default)]
    pub description: String,
    pub status: ScenarioStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioVote {
    pub scenario_id: ScenarioId,
    pub participant_id: ParticipantId,
    pub vote: ScenarioVoteType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingResult {
    pub prefer: u32,
    pub neutral: u32,
    pub against: u32,
}

impl VotingResult {
    /// Aggregate a vote list. One participant's latest vote wins.
    pub fn from_votes<'a>(votes: impl IntoIterator<Item = &'a ScenarioVote>) -> Self {
        let mut latest: Vec<&ScenarioVote> = Vec::new();
        for vote in votes {
            match latest
                .iter_mut()
                .find(|v| v.participant_id == vote.participant_id)
            {
                Some(slot) => *slot = vote,
                None => latest.push(vote),
            }
        }

        let mut result = VotingResult::default();
        for vote in latest {
            match vote.vote {
                ScenarioVoteType::Prefer => result.prefer += 1,
                ScenarioVoteType::Neutral => result.neutral += 1,
                ScenarioVoteType::Against => result.against += 1,
            }
        }
        result
    }

    pub fn total(&self) -> u32 {
        self.prefer + self.neutral + self.against
    }

    /// `prefer * 2 + neutral - against`
    pub fn score(&self) -> i64 {
        i64::from(self.prefer) * 2 + i64::from(self.neutral) - i64::from(self.against)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioWithVotes {
    pub scenario: Scenario,
    pub votes: VotingResult,
}

impl ScenarioWithVotes {
    pub fn score(&self) -> i64 {
        self.votes.score()
    }
}

/// Pick the best entry: highest score, then most votes, then earliest
/// creation, then smallest id. `None` only for an empty slice.
pub fn best_scenario(entries: &[ScenarioWithVotes]) -> Option<&ScenarioWithVotes> {
    entries.iter().min_by(|a, b| rank(a, b))
}

fn rank(a: &ScenarioWithVotes, b: &ScenarioWithVotes) -> Ordering {
    b.score()
        .cmp(&a.score())
        .then_with(|| b.votes.total().cmp(&a.votes.total()))
        .then_with(|| a.scenario.created_at.cmp(&b.scenario.created_at))
        .then_with(|| a.scenario.id.cmp(&b.scenario.id))
}
