use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::model::{Band, ItemId, TimeProfile};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ItemError {
    #[error("item must have at least two options, got {len}")]
    TooFewOptions { len: usize },

    #[error("correct index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// An item before it has been placed in a bank: no id, options in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub subskill: Option<String>,
}

impl ItemDraft {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        correct_index: usize,
    ) -> Self {
        Self {
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_index,
            subskill: None,
        }
    }

    #[must_use]
    pub fn with_subskill(mut self, subskill: impl Into<String>) -> Self {
        self.subskill = Some(subskill.into());
        self
    }

    /// Check that the draft can become a well-formed item.
    ///
    /// # Errors
    ///
    /// Returns `ItemError` if there are fewer than two options or the correct
    /// index does not point into the options.
    pub fn validate(&self) -> Result<(), ItemError> {
        let len = self.options.len();
        if len < 2 {
            return Err(ItemError::TooFewOptions { len });
        }
        if self.correct_index >= len {
            return Err(ItemError::CorrectIndexOutOfRange {
                index: self.correct_index,
                len,
            });
        }
        Ok(())
    }

    /// Assign an id and topic, then shuffle the options.
    ///
    /// # Errors
    ///
    /// Returns `ItemError` if the draft fails validation.
    pub fn into_item<R: Rng + ?Sized>(
        self,
        id: ItemId,
        topic: &str,
        rng: &mut R,
    ) -> Result<Item, ItemError> {
        self.validate()?;
        let mut item = Item {
            id,
            topic: topic.to_string(),
            text: self.text,
            options: self.options,
            correct_index: self.correct_index,
            expected_time: id.band().expected_time(),
            subskill: self.subskill,
        };
        item.shuffle_options(rng);
        Ok(item)
    }
}

//
// ─── ITEM ──────────────────────────────────────────────────────────────────────
//

/// A multiple-choice question held by an item bank.
///
/// `correct_index` always points at the correct option in the current option
/// order; [`Item::shuffle_options`] keeps the two in sync.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    id: ItemId,
    topic: String,
    text: String,
    options: Vec<String>,
    correct_index: usize,
    expected_time: TimeProfile,
    subskill: Option<String>,
}

impl Item {
    /// Permute the options and rewrite the correct index to follow the correct option.
    pub fn shuffle_options<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut order: Vec<usize> = (0..self.options.len()).collect();
        order.shuffle(rng);

        let Some(new_correct) = order.iter().position(|&i| i == self.correct_index) else {
            return;
        };
        self.options = order.iter().map(|&i| self.options[i].clone()).collect();
        self.correct_index = new_correct;
    }

    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[must_use]
    pub fn band(&self) -> Band {
        self.id.band()
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    #[must_use]
    pub fn expected_time(&self) -> TimeProfile {
        self.expected_time
    }

    #[must_use]
    pub fn subskill(&self) -> Option<&str> {
        self.subskill.as_deref()
    }

    /// True when `choice` is a valid index into the options.
    #[must_use]
    pub fn accepts_choice(&self, choice: usize) -> bool {
        choice < self.options.len()
    }

    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_index
    }
}
