//! Application controller.
//!
//! [`Tracker`] owns the catalog, the deck, the logging modal and the
//! gesture interpreter. Every user action goes through one of its
//! transition methods, and every transition that changes the catalog or the
//! deck writes both back to the store before returning.
//!
//! Flow of a card:
//! 1. Pointer events feed the gesture interpreter
//! 2. A left swipe skips the current card
//! 3. A right swipe opens the modal; swiping is suspended until it closes
//! 4. Save logs the set and moves the card to the back; cancel leaves the
//!    deck as it was

use crate::gesture::{GestureInterpreter, PointerEvent, SwipeOutcome};
use crate::modal::{SessionModal, SetForm};
use crate::seed::seed_catalog;
use crate::store::{BlobStore, DECK_KEY, EXERCISES_KEY};
use crate::{Catalog, Config, Deck, Error, ExerciseRecord, Result, SetEntry};
use chrono::{DateTime, Utc};

/// What a classified swipe did to the session
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SwipeEffect {
    /// The card was deferred
    Skipped(String),
    /// The logging modal opened for the card
    OpenedLog(String),
    /// Nothing happened (cancelled drag, empty deck)
    Ignored,
}

/// Single-user session over a store
pub struct Tracker<S: BlobStore> {
    store: S,
    catalog: Catalog,
    deck: Deck,
    modal: SessionModal,
    gesture: GestureInterpreter,
    skip_offset: usize,
}

impl<S: BlobStore> Tracker<S> {
    /// Load catalog and deck from the store, seeding on first run
    ///
    /// Each key is read exactly once. A missing deck defaults to the
    /// catalog's order. Deck ids with no matching exercise are dropped.
    pub fn open(store: S, config: &Config) -> Self {
        let catalog: Catalog = store.load(EXERCISES_KEY, seed_catalog().clone());
        let mut deck: Deck = store.load(DECK_KEY, Deck::new(catalog.ids()));

        let dangling: Vec<String> = deck
            .ids()
            .iter()
            .filter(|id| !catalog.contains(id))
            .cloned()
            .collect();
        for id in &dangling {
            tracing::warn!("Deck references unknown exercise {:?}, dropping it", id);
            deck.remove(id);
        }

        tracing::info!(
            "Opened tracker with {} exercises, {} cards in deck",
            catalog.len(),
            deck.len()
        );

        Self {
            store,
            catalog,
            deck,
            modal: SessionModal::default(),
            gesture: GestureInterpreter::new(config.gesture),
            skip_offset: config.deck.skip_offset,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn modal(&self) -> &SessionModal {
        &self.modal
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Exercise at the head of the deck
    pub fn current(&self) -> Option<&ExerciseRecord> {
        self.deck.current().and_then(|id| self.catalog.get(id))
    }

    /// Horizontal offset of the drag in progress, for card tracking
    pub fn drag_offset(&self) -> f64 {
        self.gesture.offset()
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    /// Feed a pointer event for the current card
    ///
    /// Input is ignored while the modal is open. Returns the effect of a
    /// gesture when one ends.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<Option<SwipeEffect>> {
        if self.modal.is_open() {
            self.gesture.reset();
            return Ok(None);
        }

        match self.gesture.handle(event) {
            Some(outcome) => self.apply_swipe(outcome).map(Some),
            None => Ok(None),
        }
    }

    /// Apply a classified swipe to the current card
    pub fn apply_swipe(&mut self, outcome: SwipeOutcome) -> Result<SwipeEffect> {
        let effect = match outcome {
            SwipeOutcome::SwipedLeft => self.skip()?.map(SwipeEffect::Skipped),
            SwipeOutcome::SwipedRight => self.begin_completion()?.map(SwipeEffect::OpenedLog),
            SwipeOutcome::Cancelled => None,
        };
        Ok(effect.unwrap_or(SwipeEffect::Ignored))
    }

    /// Defer the current card, returning its id
    pub fn skip(&mut self) -> Result<Option<String>> {
        self.ensure_swipeable()?;
        if self.current().is_none() {
            return Ok(None);
        }

        let skipped = self.deck.skip(self.skip_offset);
        self.persist()?;
        Ok(skipped)
    }

    /// Open the logging modal for the current card
    pub fn begin_completion(&mut self) -> Result<Option<String>> {
        self.begin_completion_at(Utc::now())
    }

    /// Open the logging modal, recording `now` as the opening time
    ///
    /// The deck is not reordered until the set is saved.
    pub fn begin_completion_at(&mut self, now: DateTime<Utc>) -> Result<Option<String>> {
        self.ensure_swipeable()?;
        let Some(id) = self.current().map(|e| e.id.clone()) else {
            return Ok(None);
        };

        self.modal.open(id.clone(), now)?;
        tracing::debug!("Logging a set for {}", id);
        Ok(Some(id))
    }

    /// Form fields of the open modal
    pub fn form_mut(&mut self) -> Option<&mut SetForm> {
        self.modal.form_mut()
    }

    /// Save the open modal's set
    pub fn save_set(&mut self) -> Result<SetEntry> {
        self.save_set_at(Utc::now())
    }

    /// Save the open modal's set stamped at `now`
    ///
    /// Appends the entry to the pending exercise and moves its card to the
    /// back of the deck. Invalid numeric input leaves the modal open and
    /// changes nothing.
    pub fn save_set_at(&mut self, now: DateTime<Utc>) -> Result<SetEntry> {
        let (id, entry) = self.modal.submit(now)?;

        if !self.catalog.append_entry(&id, entry.clone()) {
            return Err(Error::State(format!("exercise {} no longer exists", id)));
        }

        if self.deck.current() == Some(id.as_str()) {
            self.deck.commit_complete();
        } else {
            self.deck.remove(&id);
            self.deck.add(id.clone());
        }

        self.persist()?;
        tracing::info!(
            "Logged set for {}: weight={:?} reps={:?}",
            id,
            entry.weight,
            entry.reps
        );
        Ok(entry)
    }

    /// Close the modal without logging, returning the pending id
    pub fn cancel_set(&mut self) -> Result<Option<String>> {
        let pending = self.modal.cancel();
        let before = self.deck.clone();

        self.deck.abort_complete(pending.as_deref());
        if self.deck != before {
            self.persist()?;
        }
        Ok(pending)
    }

    /// Create an exercise and append it to the deck
    ///
    /// Returns the new id, or `None` if the name derives an empty or taken id.
    pub fn add_exercise(&mut self, name: &str, muscle: Option<&str>) -> Result<Option<String>> {
        let Some(id) = self.catalog.create(name, muscle).map(|e| e.id.clone()) else {
            return Ok(None);
        };

        self.deck.add(id.clone());
        self.persist()?;
        tracing::info!("Added exercise {}", id);
        Ok(Some(id))
    }

    /// Delete an exercise and every deck occurrence of its id
    ///
    /// An open modal for the same exercise is closed without logging.
    /// Unknown ids are a no-op.
    pub fn remove_exercise(&mut self, id: &str) -> Result<Option<ExerciseRecord>> {
        if self.modal.pending_id() == Some(id) {
            self.modal.cancel();
            self.gesture.reset();
        }

        let removed = self.catalog.delete(id);
        let occurrences = self.deck.remove(id);

        if removed.is_some() || occurrences > 0 {
            self.persist()?;
            tracing::info!("Removed exercise {}", id);
        }
        Ok(removed)
    }

    fn ensure_swipeable(&self) -> Result<()> {
        match self.modal.pending_id() {
            Some(id) => Err(Error::State(format!(
                "finish logging {} before swiping",
                id
            ))),
            None => Ok(()),
        }
    }

    fn persist(&mut self) -> Result<()> {
        self.store.save(EXERCISES_KEY, &self.catalog)?;
        self.store.save(DECK_KEY, &self.deck)?;
        Ok(())
    }
}
