use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::event::{EventId, TimeSlot};
use crate::ParticipantId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PollVote {
    Yes,
    Maybe,
    No,
}

impl PollVote {
    pub fn weight(&self) -> u32 {
        match self {
            PollVote::Yes => 2,
            PollVote::Maybe => 1,
            PollVote::No => 0,
        }
    }
}

/// Date poll for one event: participant id -> (slot id -> vote).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub event_id: EventId,
    #[serde(default)]
    pub votes: BTreeMap<ParticipantId, BTreeMap<String, PollVote>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotTally {
    pub slot_id: String,
    pub yes: u32,
    pub maybe: u32,
    pub no: u32,
}

impl SlotTally {
    pub fn score(&self) -> u32 {
        self.yes * PollVote::Yes.weight() + self.maybe * PollVote::Maybe.weight()
    }
}

impl Poll {
    pub fn empty(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            votes: BTreeMap::new(),
        }
    }

    /// Total recorded votes across all participants and slots.
    pub fn vote_count(&self) -> usize {
        self.votes.values().map(|slots| slots.len()).sum()
    }

    pub fn has_votes(&self) -> bool {
        self.vote_count() > 0
    }

    pub fn record(&mut self, participant_id: &str, slot_id: &str, vote: PollVote) {
        self.votes
            .entry(participant_id.to_string())
            .or_default()
            .insert(slot_id.to_string(), vote);
    }

    /// One tally per proposed slot, in slot order. Votes for unknown slots are ignored.
    pub fn tallies(&self, slots: &[TimeSlot]) -> Vec<SlotTally> {
        slots
            .iter()
            .map(|slot| {
                let mut tally = SlotTally {
                    slot_id: slot.id.clone(),
                    ..Default::default()
                };
                for vote in self.votes.values().filter_map(|v| v.get(&slot.id)) {
                    match vote {
                        PollVote::Yes => tally.yes += 1,
                        PollVote::Maybe => tally.maybe += 1,
                        PollVote::No => tally.no += 1,
                    }
                }
                tally
            })
            .collect()
    }
}
