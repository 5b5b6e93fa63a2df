// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan gesture input: phases, admission, and a tracker for raw pointer samples.
//!
//! Hosts with a native pan recognizer build [`PanEvent`]s directly. Hosts that
//! only see pointer down/move/up can feed them to [`PanTracker`], which derives
//! cumulative translation and instantaneous velocity.
//!
//! ## Usage
//!
//! 1) Call [`PanTracker::press`] on pointer down.
//! 2) On each move, call [`PanTracker::update`]. The first movement yields a
//!    [`PanPhase::Began`] event; ask the row whether it admits the pan and call
//!    [`PanTracker::reset`] if it does not.
//! 3) Call [`PanTracker::release`] on pointer up, or [`PanTracker::cancel`] if the
//!    platform cancels the interaction.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_swipe::gesture::{PanPhase, PanTracker};
//!
//! let mut pan = PanTracker::default();
//! pan.press(Point::new(200.0, 10.0), 0);
//!
//! // 10 px left in 10 ms: 1000 px/s leftward.
//! let began = pan.update(Point::new(190.0, 10.0), 10).unwrap();
//! assert_eq!(began.phase, PanPhase::Began);
//! assert_eq!(began.velocity.x, -1000.0);
//!
//! let moved = pan.update(Point::new(150.0, 10.0), 20).unwrap();
//! assert_eq!(moved.phase, PanPhase::Changed);
//! assert_eq!(moved.translation.x, -50.0);
//!
//! let ended = pan.release(Point::new(150.0, 10.0), 30).unwrap();
//! assert_eq!(ended.phase, PanPhase::Ended);
//! assert!(!pan.is_tracking());
//! ```

use kurbo::{Point, Vec2};

/// Phase of a continuous pan gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PanPhase {
    /// The pan was recognized.
    Began,
    /// The pointer moved.
    Changed,
    /// The pointer was released.
    Ended,
    /// The platform aborted the pan.
    Cancelled,
}

/// One pan update.
///
/// `translation` is cumulative from the gesture start point; `velocity` is
/// instantaneous, in units per second. Positive `x` points right.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PanEvent {
    /// Phase of the gesture.
    pub phase: PanPhase,
    /// Offset of the pointer from where the gesture started.
    pub translation: Vec2,
    /// Current pointer velocity.
    pub velocity: Vec2,
}

impl PanEvent {
    /// A [`PanPhase::Began`] event.
    #[must_use]
    pub fn began(velocity: Vec2) -> Self {
        Self {
            phase: PanPhase::Began,
            translation: Vec2::ZERO,
            velocity,
        }
    }

    /// A [`PanPhase::Changed`] event.
    #[must_use]
    pub fn changed(translation: Vec2, velocity: Vec2) -> Self {
        Self {
            phase: PanPhase::Changed,
            translation,
            velocity,
        }
    }

    /// A [`PanPhase::Ended`] event.
    #[must_use]
    pub fn ended(translation: Vec2, velocity: Vec2) -> Self {
        Self {
            phase: PanPhase::Ended,
            translation,
            velocity,
        }
    }

    /// A [`PanPhase::Cancelled`] event.
    #[must_use]
    pub fn cancelled(translation: Vec2, velocity: Vec2) -> Self {
        Self {
            phase: PanPhase::Cancelled,
            translation,
            velocity,
        }
    }
}

/// Returns `true` if `velocity` is horizontal enough to start a swipe.
///
/// The horizontal magnitude must exceed `ratio` times the vertical magnitude.
/// Vertical and diagonal motion is left to the enclosing list's scrolling.
#[must_use]
pub fn admits_horizontal_pan(velocity: Vec2, ratio: f64) -> bool {
    velocity.x.abs() > ratio * velocity.y.abs()
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Sample {
    pos: Point,
    time_ms: u64,
}

/// Turns pointer samples into [`PanEvent`]s.
#[derive(Debug, Clone, Default, Copy)]
pub struct PanTracker {
    start: Option<Sample>,
    last: Option<Sample>,
    velocity: Vec2,
    began: bool,
}

impl PanTracker {
    /// Starts tracking from a pointer press. No event is produced until the pointer moves.
    pub fn press(&mut self, pos: Point, time_ms: u64) {
        let sample = Sample { pos, time_ms };
        self.start = Some(sample);
        self.last = Some(sample);
        self.velocity = Vec2::ZERO;
        self.began = false;
    }

    /// Records a pointer move.
    ///
    /// Returns [`PanPhase::Began`] for the first movement after a press and
    /// [`PanPhase::Changed`] afterwards. Returns `None` when not tracking, or
    /// when the pointer has not moved yet.
    pub fn update(&mut self, pos: Point, time_ms: u64) -> Option<PanEvent> {
        let start = self.start?;
        if !self.began && pos == start.pos {
            return None;
        }
        self.record(pos, time_ms);
        if self.began {
            Some(PanEvent::changed(pos - start.pos, self.velocity))
        } else {
            self.began = true;
            Some(PanEvent::began(self.velocity))
        }
    }

    /// Records the pointer release and stops tracking.
    ///
    /// Returns [`PanPhase::Ended`] if a pan had begun.
    pub fn release(&mut self, pos: Point, time_ms: u64) -> Option<PanEvent> {
        let start = self.start?;
        let began = self.began;
        self.record(pos, time_ms);
        let event = PanEvent::ended(pos - start.pos, self.velocity);
        self.reset();
        began.then_some(event)
    }

    /// Aborts tracking.
    ///
    /// Returns [`PanPhase::Cancelled`] with the last known translation if a pan had begun.
    pub fn cancel(&mut self) -> Option<PanEvent> {
        let event = match (self.start, self.last) {
            (Some(start), Some(last)) if self.began => {
                Some(PanEvent::cancelled(last.pos - start.pos, self.velocity))
            }
            _ => None,
        };
        self.reset();
        event
    }

    /// Forgets the current gesture without producing an event.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` between a press and its release.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }

    /// Returns `true` once a [`PanPhase::Began`] event has been produced.
    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.began
    }

    /// Cumulative translation of the last recorded sample.
    #[must_use]
    pub fn translation(&self) -> Option<Vec2> {
        Some(self.last?.pos - self.start?.pos)
    }

    fn record(&mut self, pos: Point, time_ms: u64) {
        if let Some(last) = self.last {
            let elapsed = time_ms.saturating_sub(last.time_ms);
            // Same-timestamp samples keep the previous velocity.
            if elapsed > 0 {
                self.velocity = (pos - last.pos) * (1000.0 / elapsed as f64);
            }
        }
        self.last = Some(Sample { pos, time_ms });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admission_requires_dominant_horizontal_velocity() {
        assert!(admits_horizontal_pan(Vec2::new(-400.0, 100.0), 3.0));
        assert!(admits_horizontal_pan(Vec2::new(400.0, -100.0), 3.0));
        // Exactly three times is not enough.
        assert!(!admits_horizontal_pan(Vec2::new(300.0, 100.0), 3.0));
        assert!(!admits_horizontal_pan(Vec2::new(0.0, 500.0), 3.0));
        assert!(!admits_horizontal_pan(Vec2::ZERO, 3.0));
    }

    #[test]
    fn fresh_tracker_produces_nothing() {
        let mut pan = PanTracker::default();
        assert!(!pan.is_tracking());
        assert_eq!(pan.update(Point::new(1.0, 1.0), 5), None);
        assert_eq!(pan.release(Point::new(1.0, 1.0), 10), None);
        assert_eq!(pan.cancel(), None);
        assert_eq!(pan.translation(), None);
    }

    #[test]
    fn press_without_movement_waits() {
        let mut pan = PanTracker::default();
        pan.press(Point::new(50.0, 50.0), 0);
        assert!(pan.is_tracking());
        assert!(!pan.is_panning());
        assert_eq!(pan.update(Point::new(50.0, 50.0), 8), None);
    }

    #[test]
    fn first_move_begins_then_changes() {
        let mut pan = PanTracker::default();
        pan.press(Point::new(100.0, 20.0), 1000);

        let began = pan.update(Point::new(90.0, 20.0), 1010).unwrap();
        assert_eq!(began.phase, PanPhase::Began);
        assert_eq!(began.translation, Vec2::ZERO);
        assert_eq!(began.velocity, Vec2::new(-1000.0, 0.0));
        assert!(pan.is_panning());

        let changed = pan.update(Point::new(70.0, 25.0), 1020).unwrap();
        assert_eq!(changed.phase, PanPhase::Changed);
        assert_eq!(changed.translation, Vec2::new(-30.0, 5.0));
        assert_eq!(changed.velocity, Vec2::new(-2000.0, 500.0));
    }

    #[test]
    fn release_reports_final_velocity_and_resets() {
        let mut pan = PanTracker::default();
        pan.press(Point::new(0.0, 0.0), 0);
        pan.update(Point::new(-10.0, 0.0), 10);
        pan.update(Point::new(-40.0, 0.0), 20);

        let ended = pan.release(Point::new(-30.0, 0.0), 30).unwrap();
        assert_eq!(ended.phase, PanPhase::Ended);
        assert_eq!(ended.translation, Vec2::new(-30.0, 0.0));
        assert_eq!(ended.velocity, Vec2::new(1000.0, 0.0));
        assert!(!pan.is_tracking());
        assert!(!pan.is_panning());
    }

    #[test]
    fn same_timestamp_keeps_previous_velocity() {
        let mut pan = PanTracker::default();
        pan.press(Point::new(0.0, 0.0), 0);
        pan.update(Point::new(-10.0, 0.0), 10);

        let ended = pan.release(Point::new(-12.0, 0.0), 10).unwrap();
        assert_eq!(ended.velocity, Vec2::new(-1000.0, 0.0));
    }

    #[test]
    fn release_before_movement_is_silent() {
        let mut pan = PanTracker::default();
        pan.press(Point::new(0.0, 0.0), 0);
        assert_eq!(pan.release(Point::new(0.0, 0.0), 50), None);
        assert!(!pan.is_tracking());
    }

    #[test]
    fn cancel_uses_last_sample() {
        let mut pan = PanTracker::default();
        pan.press(Point::new(10.0, 10.0), 0);
        pan.update(Point::new(0.0, 10.0), 10);
        pan.update(Point::new(-20.0, 10.0), 20);

        let cancelled = pan.cancel().unwrap();
        assert_eq!(cancelled.phase, PanPhase::Cancelled);
        assert_eq!(cancelled.translation, Vec2::new(-30.0, 0.0));
        assert!(!pan.is_tracking());
    }

    #[test]
    fn press_restarts_a_running_gesture() {
        let mut pan = PanTracker::default();
        pan.press(Point::new(0.0, 0.0), 0);
        pan.update(Point::new(-10.0, 0.0), 10);

        pan.press(Point::new(100.0, 0.0), 100);
        assert!(!pan.is_panning());
        let began = pan.update(Point::new(105.0, 0.0), 110).unwrap();
        assert_eq!(began.phase, PanPhase::Began);
        assert_eq!(pan.translation(), Some(Vec2::new(5.0, 0.0)));
    }
}
