use serde::{Deserialize, Serialize};

use quiz_core::{Band, Classification, EndReason, Item, ItemId, SessionSnapshot};

/// An item as handed to the client, options already shuffled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServedItem {
    pub id: ItemId,
    pub band: Band,
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl From<&Item> for ServedItem {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id(),
            band: item.band(),
            text: item.text().to_string(),
            options: item.options().to_vec(),
            correct_index: item.correct_index(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextOutcome {
    Item {
        item: ServedItem,
        /// Whole seconds left in the session window.
        time_left: u64,
    },
    Ended {
        reason: EndReason,
    },
}

/// A learner's answer to one served item.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerSubmission {
    pub item_id: ItemId,
    pub chosen_index: usize,
    pub hint_used: bool,
    /// Missing or non-positive values are replaced by the item's expected time.
    pub elapsed_secs: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerResult {
    pub correct: bool,
    pub correct_index: usize,
    pub snapshot: SessionSnapshot,
}

/// One answered question submitted for end-of-quiz scoring.
///
/// Entries are trusted as given; nothing is checked against the bank.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExplainEntry {
    pub item_id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub chosen_index: usize,
    #[serde(default)]
    pub hint_used: bool,
    #[serde(default)]
    pub time_sec: f64,
}

impl ExplainEntry {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.chosen_index == self.correct_index
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub item_id: String,
    pub explanation: String,
    pub chosen_index: usize,
    pub correct_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub classification: Classification,
    pub score: u32,
    /// Number of submitted entries.
    pub asked_count: usize,
    pub snapshot: SessionSnapshot,
    /// Same order as the submitted entries.
    pub explanations: Vec<Explanation>,
}
