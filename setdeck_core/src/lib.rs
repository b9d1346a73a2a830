#![forbid(unsafe_code)]

//! Core domain model and business logic for SetDeck.
//!
//! This crate provides:
//! - Domain types (exercises, logged sets)
//! - Catalog management and id derivation
//! - The review deck and its swipe-driven reordering
//! - Gesture interpretation for card swipes
//! - The set-logging modal
//! - Persistence (key-value JSON store) and CSV export

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod deck;
pub mod gesture;
pub mod modal;
pub mod seed;
pub mod store;
pub mod export;
pub mod tracker;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{derive_id, Catalog};
pub use config::Config;
pub use deck::Deck;
pub use gesture::{GestureInterpreter, PointerEvent, PointerSample, SwipeOutcome};
pub use modal::{SessionModal, SetForm};
pub use seed::{seed_catalog, seed_deck};
pub use store::{BlobStore, JsonFileStore, MemoryStore};
pub use export::export_history_csv;
pub use tracker::{SwipeEffect, Tracker};
