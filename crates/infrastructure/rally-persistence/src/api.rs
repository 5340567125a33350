use crate::StorageError;

pub const CURRENT_SCHEMA: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbState {
    Missing,
    Valid,
    Busy,
    Corrupt,
    NewerSchema { found: u32, supported: u32 },
}

/// Record families. Every table maps a string id to a JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Table {
    Events,
    /// Keyed by event id.
    Polls,
    Meetings,
    Scenarios,
    /// Keyed by scenario id; the value is every vote cast, oldest first.
    ScenarioVotes,
}

impl Table {
    pub const ALL: [Table; 5] = [
        Table::Events,
        Table::Polls,
        Table::Meetings,
        Table::Scenarios,
        Table::ScenarioVotes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Events => "events",
            Table::Polls => "polls",
            Table::Meetings => "meetings",
            Table::Scenarios => "scenarios",
            Table::ScenarioVotes => "scenario_votes",
        }
    }
}

/// Read-modify-write step over the raw bytes stored at one key. Returning
/// `Ok(None)` deletes the key; returning an error leaves it untouched.
pub type Mutation<'a> =
    Box<dyn FnOnce(Option<&[u8]>) -> Result<Option<Vec<u8>>, StorageError> + 'a>;

/// Raw key-value storage under the repositories.
pub trait Backend: Send + Sync + 'static {
    fn get(&self, table: Table, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// All values of a table in key order.
    fn scan(&self, table: Table) -> Result<Vec<Vec<u8>>, StorageError>;

    /// Applies `mutation` to the value at `key` atomically.
    fn mutate(&self, table: Table, key: &str, mutation: Mutation<'_>) -> Result<(), StorageError>;
}
