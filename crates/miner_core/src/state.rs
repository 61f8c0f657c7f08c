use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::filename::{next_sequence_number, SequenceExhausted};

/// Cursor used when no state has ever been persisted.
pub const DEFAULT_FIRST_STORY_NUM: u64 = 1;

/// Append-only set of published document numbers.
///
/// Keeps insertion order for the persisted file and a hash index for
/// membership checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Ledger {
    ids: Vec<String>,
    index: HashSet<String>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, document_number: &str) -> bool {
        self.index.contains(document_number)
    }

    /// Returns `false` if the id was already present.
    pub fn insert(&mut self, document_number: impl Into<String>) -> bool {
        let document_number = document_number.into();
        if self.index.contains(&document_number) {
            return false;
        }
        self.index.insert(document_number.clone());
        self.ids.push(document_number);
        true
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for Ledger {
    fn from(ids: Vec<String>) -> Self {
        let mut ledger = Ledger::new();
        for id in ids {
            ledger.insert(id);
        }
        ledger
    }
}

impl From<Ledger> for Vec<String> {
    fn from(ledger: Ledger) -> Self {
        ledger.ids
    }
}

/// Durable miner state: what has been published and the next story number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationState {
    #[serde(default)]
    pub published_docs: Ledger,
    #[serde(default = "default_next_story_num")]
    pub next_story_num: u64,
}

impl PublicationState {
    /// Empty state whose cursor starts at `first_story_num`.
    pub fn starting_at(first_story_num: u64) -> Self {
        Self {
            published_docs: Ledger::new(),
            next_story_num: first_story_num,
        }
    }

    pub fn is_published(&self, document_number: &str) -> bool {
        self.published_docs.contains(document_number)
    }

    /// The number the next story will get. Fails when the cursor could not
    /// advance past it afterwards.
    pub fn next_number(&self) -> Result<u64, SequenceExhausted> {
        let number = self.next_story_num;
        number
            .checked_add(1)
            .map(|_| number)
            .ok_or(SequenceExhausted { last: number })
    }

    /// Records a document as published under the current cursor and advances
    /// the cursor. Returns the number that was consumed. Nothing changes when
    /// the cursor is exhausted.
    pub fn mark_published(&mut self, document_number: &str) -> Result<u64, SequenceExhausted> {
        let number = self.next_number()?;
        self.published_docs.insert(document_number);
        self.next_story_num = number + 1;
        Ok(number)
    }
}

impl Default for PublicationState {
    fn default() -> Self {
        Self::starting_at(DEFAULT_FIRST_STORY_NUM)
    }
}

fn default_next_story_num() -> u64 {
    DEFAULT_FIRST_STORY_NUM
}

/// One story produced during a run; feeds the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryRecord {
    pub number: u64,
    pub filename: String,
    pub headline: String,
}

/// Replaces the persisted cursor with the one derived from the artifacts on
/// disk. The directory is the source of truth; the state file may be stale.
pub fn reconcile_sequence<I, S>(
    state: &mut PublicationState,
    artifact_names: I,
) -> Result<(), SequenceExhausted>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    state.next_story_num = next_sequence_number(artifact_names)?;
    Ok(())
}
