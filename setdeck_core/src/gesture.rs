//! Swipe gesture interpreter.
//!
//! A small state machine fed with pointer events for the active card. While
//! a drag is in progress it reports the horizontal offset for visual
//! tracking; when the pointer is released it classifies the gesture as a
//! left swipe, a right swipe, or a cancelled drag.
//!
//! The interpreter knows nothing about cards. It only reports direction.

use crate::config::GestureConfig;

/// A raw pointer position with a monotonic timestamp in milliseconds
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub at_ms: u64,
}

impl PointerSample {
    pub fn new(x: f64, y: f64, at_ms: u64) -> Self {
        Self { x, y, at_ms }
    }
}

/// Pointer/touch input for the active card
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down(PointerSample),
    Move(PointerSample),
    Up(PointerSample),
    /// The platform aborted the interaction (e.g. touch cancelled)
    Cancel,
}

/// Classified result of a finished gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeOutcome {
    SwipedLeft,
    SwipedRight,
    /// Released without crossing a commit threshold
    Cancelled,
}

#[derive(Clone, Copy, Debug)]
enum DragState {
    Idle,
    Tracking {
        origin: PointerSample,
        previous: Option<PointerSample>,
        latest: PointerSample,
    },
}

/// Converts pointer events into drag feedback and classified swipes
#[derive(Clone, Debug)]
pub struct GestureInterpreter {
    thresholds: GestureConfig,
    state: DragState,
}

impl GestureInterpreter {
    pub fn new(thresholds: GestureConfig) -> Self {
        Self {
            thresholds,
            state: DragState::Idle,
        }
    }

    /// Horizontal offset of the drag in progress (zero when idle)
    pub fn offset(&self) -> f64 {
        match self.state {
            DragState::Idle => 0.0,
            DragState::Tracking { origin, latest, .. } => latest.x - origin.x,
        }
    }

    /// True while a drag is physically in progress
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Tracking { .. })
    }

    /// Drop any drag in progress without producing an outcome
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }

    /// Feed one pointer event
    ///
    /// Returns an outcome only when a gesture ends.
    pub fn handle(&mut self, event: PointerEvent) -> Option<SwipeOutcome> {
        match (event, self.state) {
            (PointerEvent::Down(sample), _) => {
                self.state = DragState::Tracking {
                    origin: sample,
                    previous: None,
                    latest: sample,
                };
                None
            }
            (PointerEvent::Move(sample), DragState::Tracking { origin, latest, .. }) => {
                self.state = DragState::Tracking {
                    origin,
                    previous: Some(latest),
                    latest: sample,
                };
                None
            }
            (
                PointerEvent::Up(end),
                DragState::Tracking {
                    origin,
                    previous,
                    latest,
                },
            ) => {
                self.state = DragState::Idle;
                let outcome = self.classify(origin, previous, latest, end);
                tracing::debug!(
                    "Gesture ended: dx={:.1} dy={:.1} -> {:?}",
                    end.x - origin.x,
                    end.y - origin.y,
                    outcome
                );
                Some(outcome)
            }
            (PointerEvent::Cancel, DragState::Tracking { .. }) => {
                self.state = DragState::Idle;
                Some(SwipeOutcome::Cancelled)
            }
            // Move/Up/Cancel with no pointer down
            (_, DragState::Idle) => None,
        }
    }

    fn classify(
        &self,
        origin: PointerSample,
        previous: Option<PointerSample>,
        latest: PointerSample,
        end: PointerSample,
    ) -> SwipeOutcome {
        let dx = end.x - origin.x;
        let dy = end.y - origin.y;

        if dy.abs() > dx.abs() {
            return SwipeOutcome::Cancelled;
        }

        let direction = if dx < 0.0 {
            SwipeOutcome::SwipedLeft
        } else {
            SwipeOutcome::SwipedRight
        };

        if dx.abs() >= self.thresholds.distance_threshold && dx != 0.0 {
            return direction;
        }

        let velocity = release_velocity(origin, previous, latest, end);
        let same_sign = velocity * dx > 0.0;
        if same_sign
            && velocity.abs() >= self.thresholds.velocity_threshold
            && dx.abs() >= self.thresholds.flick_min_distance
        {
            return direction;
        }

        SwipeOutcome::Cancelled
    }
}

/// Horizontal speed in px/ms over the last movement segment
///
/// Falls back to the earlier segment when the release carries no new time,
/// then to the whole-gesture average.
fn release_velocity(
    origin: PointerSample,
    previous: Option<PointerSample>,
    latest: PointerSample,
    end: PointerSample,
) -> f64 {
    let segment = |from: PointerSample, to: PointerSample| {
        let dt = to.at_ms.saturating_sub(from.at_ms);
        (dt > 0).then(|| (to.x - from.x) / dt as f64)
    };

    segment(latest, end)
        .or_else(|| previous.and_then(|p| segment(p, latest)))
        .or_else(|| segment(origin, end))
        .unwrap_or(0.0)
}
