//! The review deck.
//!
//! An ordered queue of exercise ids. The head is the current card; swipes
//! reorder the queue:
//! - Skip defers the head by a fixed offset (spaced repetition)
//! - Completing a card moves it to the tail
//! - Cancelling a completion leaves the order as it was

use serde::{Deserialize, Serialize};

/// Default number of cards a skipped card goes behind
pub const DEFAULT_SKIP_OFFSET: usize = 4;

/// Ordered queue of exercise ids
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Deck {
    ids: Vec<String>,
}

impl Deck {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Id at the head of the deck
    pub fn current(&self) -> Option<&str> {
        self.ids.first().map(String::as_str)
    }

    /// Position of an id in the deck
    pub fn position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|i| i == id)
    }

    /// Defer the head card
    ///
    /// The head is removed and reinserted at `min(offset, remaining)` of the
    /// remaining sequence, so it resurfaces after up to `offset` other cards.
    /// Returns the skipped id.
    pub fn skip(&mut self, offset: usize) -> Option<String> {
        if self.ids.is_empty() {
            return None;
        }

        let head = self.ids.remove(0);
        let at = offset.min(self.ids.len());
        self.ids.insert(at, head.clone());

        tracing::debug!("Skipped {} to position {}", head, at);
        Some(head)
    }

    /// Move the head card to the tail after it has been logged
    pub fn commit_complete(&mut self) -> Option<String> {
        if self.ids.is_empty() {
            return None;
        }

        let head = self.ids.remove(0);
        self.ids.push(head.clone());

        tracing::debug!("Completed {}, moved to back of deck", head);
        Some(head)
    }

    /// Restore a pending card to the head after a cancelled completion
    ///
    /// Opening a completion does not reorder the deck, so this is a no-op
    /// unless the pending id is no longer at the head.
    pub fn abort_complete(&mut self, pending: Option<&str>) {
        let Some(id) = pending else {
            return;
        };

        if self.current() == Some(id) {
            return;
        }

        if let Some(index) = self.position(id) {
            self.ids.remove(index);
        }
        self.ids.insert(0, id.to_string());
        tracing::debug!("Restored {} to head of deck", id);
    }

    /// Append a new id to the tail
    pub fn add(&mut self, id: impl Into<String>) {
        self.ids.push(id.into());
    }

    /// Remove every occurrence of an id, returning how many were removed
    pub fn remove(&mut self, id: &str) -> usize {
        let before = self.ids.len();
        self.ids.retain(|i| i != id);
        before - self.ids.len()
    }
}
