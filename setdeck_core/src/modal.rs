//! Set-logging modal.
//!
//! Opened by a right swipe on the current card. Holds the id of the
//! exercise being logged and three free-text fields until the user either
//! saves (producing a [`SetEntry`]) or cancels.

use crate::{Error, Result, SetEntry};
use chrono::{DateTime, Utc};

/// Raw text entered into the modal
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SetForm {
    pub weight: String,
    pub reps: String,
    pub notes: String,
}

impl SetForm {
    pub fn new(weight: impl Into<String>, reps: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            weight: weight.into(),
            reps: reps.into(),
            notes: notes.into(),
        }
    }

    /// Build a set entry from the form, stamped at `date`
    pub fn to_entry(&self, date: DateTime<Utc>) -> Result<SetEntry> {
        let weight = parse_weight(&self.weight)?;
        let reps = parse_reps(&self.reps)?;
        let notes = Some(self.notes.trim())
            .filter(|n| !n.is_empty())
            .map(String::from);

        Ok(SetEntry::new(date, weight, reps, notes))
    }
}

/// Parse a weight field; blank means absent
pub fn parse_weight(input: &str) -> Result<Option<f64>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(Some(value)),
        _ => Err(Error::InvalidInput(format!(
            "weight must be a non-negative number, got {:?}",
            trimmed
        ))),
    }
}

/// Parse a reps field; blank means absent
pub fn parse_reps(input: &str) -> Result<Option<u32>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed.parse::<u32>().map(Some).map_err(|_| {
        Error::InvalidInput(format!("reps must be a whole number, got {:?}", trimmed))
    })
}

/// An open logging interaction
#[derive(Clone, Debug, PartialEq)]
pub struct PendingSet {
    pub exercise_id: String,
    pub opened_at: DateTime<Utc>,
    pub form: SetForm,
}

/// Modal state: closed, or open for one exercise
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionModal {
    #[default]
    Closed,
    Open(PendingSet),
}

impl SessionModal {
    pub fn is_open(&self) -> bool {
        matches!(self, SessionModal::Open(_))
    }

    /// Id of the exercise being logged
    pub fn pending_id(&self) -> Option<&str> {
        match self {
            SessionModal::Open(pending) => Some(&pending.exercise_id),
            SessionModal::Closed => None,
        }
    }

    pub fn pending(&self) -> Option<&PendingSet> {
        match self {
            SessionModal::Open(pending) => Some(pending),
            SessionModal::Closed => None,
        }
    }

    /// Mutable access to the form fields while open
    pub fn form_mut(&mut self) -> Option<&mut SetForm> {
        match self {
            SessionModal::Open(pending) => Some(&mut pending.form),
            SessionModal::Closed => None,
        }
    }

    /// Open the modal for an exercise with empty fields
    pub fn open(&mut self, exercise_id: impl Into<String>, now: DateTime<Utc>) -> Result<()> {
        if let SessionModal::Open(pending) = self {
            return Err(Error::State(format!(
                "already logging a set for {}",
                pending.exercise_id
            )));
        }

        *self = SessionModal::Open(PendingSet {
            exercise_id: exercise_id.into(),
            opened_at: now,
            form: SetForm::default(),
        });
        Ok(())
    }

    /// Parse the form and close the modal
    ///
    /// The entry is stamped at `now`, or at the opening time if the clock
    /// went backwards. On a parse error the modal stays open with its
    /// fields intact.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<(String, SetEntry)> {
        let pending = match self {
            SessionModal::Open(pending) => pending,
            SessionModal::Closed => {
                return Err(Error::State("no set is being logged".into()));
            }
        };

        let entry = pending.form.to_entry(now.max(pending.opened_at))?;
        let exercise_id = pending.exercise_id.clone();
        *self = SessionModal::Closed;
        Ok((exercise_id, entry))
    }

    /// Close the modal without logging, returning the pending id if any
    pub fn cancel(&mut self) -> Option<String> {
        match std::mem::take(self) {
            SessionModal::Open(pending) => Some(pending.exercise_id),
            SessionModal::Closed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_parse_blank_fields_as_absent() {
        assert_eq!(parse_weight("").unwrap(), None);
        assert_eq!(parse_weight("   ").unwrap(), None);
        assert_eq!(parse_reps("\t").unwrap(), None);
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_weight("100").unwrap(), Some(100.0));
        assert_eq!(parse_weight(" 62.5 ").unwrap(), Some(62.5));
        assert_eq!(parse_reps("5").unwrap(), Some(5));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_weight("heavy"), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_weight("-5"), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_weight("NaN"), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_weight("inf"), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_reps("5.5"), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_reps("-1"), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_reps("five"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_submit_produces_entry_and_closes() {
        let opened = Utc::now();
        let mut modal = SessionModal::default();
        modal.open("deadlift", opened).unwrap();
        *modal.form_mut().unwrap() = SetForm::new("100", "5", "  ");

        let (id, entry) = modal.submit(opened + Duration::seconds(30)).unwrap();
        assert_eq!(id, "deadlift");
        assert_eq!(entry.weight, Some(100.0));
        assert_eq!(entry.reps, Some(5));
        assert_eq!(entry.notes, None);
        assert!(entry.date >= opened);
        assert!(!modal.is_open());
    }

    #[test]
    fn test_submit_never_stamps_before_opening() {
        let opened = Utc::now();
        let mut modal = SessionModal::default();
        modal.open("deadlift", opened).unwrap();

        let (_, entry) = modal.submit(opened - Duration::seconds(5)).unwrap();
        assert_eq!(entry.date, opened);
    }

    #[test]
    fn test_submit_invalid_input_keeps_modal_open() {
        let mut modal = SessionModal::default();
        modal.open("deadlift", Utc::now()).unwrap();
        modal.form_mut().unwrap().reps = "lots".into();

        assert!(matches!(modal.submit(Utc::now()), Err(Error::InvalidInput(_))));
        assert_eq!(modal.pending_id(), Some("deadlift"));
        assert_eq!(modal.pending().unwrap().form.reps, "lots");
    }

    #[test]
    fn test_submit_when_closed_is_state_error() {
        let mut modal = SessionModal::default();
        assert!(matches!(modal.submit(Utc::now()), Err(Error::State(_))));
    }

    #[test]
    fn test_open_twice_is_state_error() {
        let mut modal = SessionModal::default();
        modal.open("a", Utc::now()).unwrap();
        assert!(matches!(modal.open("b", Utc::now()), Err(Error::State(_))));
        assert_eq!(modal.pending_id(), Some("a"));
    }

    #[test]
    fn test_cancel_clears_everything() {
        let mut modal = SessionModal::default();
        modal.open("a", Utc::now()).unwrap();
        modal.form_mut().unwrap().notes = "tired".into();

        assert_eq!(modal.cancel(), Some("a".into()));
        assert_eq!(modal, SessionModal::Closed);
        assert_eq!(modal.cancel(), None);
        assert!(modal.form_mut().is_none());
    }
}
