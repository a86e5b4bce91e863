#![forbid(unsafe_code)]

//! Per-frame touch snapshots and their mapping to [`TapEvent`]s.
//!
//! Contact tracking owns the slots; this module only reads them. A frame is
//! a batch of slot changes that share one timestamp. Slots are visited in
//! ascending index order so two fingers changing in the same frame always
//! produce the same event sequence.

use crate::state::{TapEvent, TapState};

/// Lifecycle of a touch slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TouchPhase {
    /// Slot not in use.
    #[default]
    None,
    /// Finger touched down this frame.
    Begin,
    /// Finger still down.
    Update,
    /// Finger lifted this frame.
    End,
}

/// Read-only view of one contact slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchSlot {
    pub phase: TouchPhase,
    /// The slot changed during this frame.
    pub dirty: bool,
    /// Planar motion accumulated since the tracker last consumed it.
    pub delta: (f64, f64),
}

impl TouchSlot {
    #[must_use]
    pub const fn new(phase: TouchPhase, dirty: bool, delta: (f64, f64)) -> Self {
        Self {
            phase,
            dirty,
            delta,
        }
    }

    /// A finger that touched down this frame.
    #[must_use]
    pub const fn begin() -> Self {
        Self::new(TouchPhase::Begin, true, (0.0, 0.0))
    }

    /// A finger that stayed down and moved by `(dx, dy)`.
    #[must_use]
    pub const fn moved(dx: f64, dy: f64) -> Self {
        Self::new(TouchPhase::Update, true, (dx, dy))
    }

    /// A finger that lifted this frame.
    #[must_use]
    pub const fn end() -> Self {
        Self::new(TouchPhase::End, true, (0.0, 0.0))
    }

    /// A finger still down with nothing new to report.
    #[must_use]
    pub const fn resting() -> Self {
        Self::new(TouchPhase::Update, false, (0.0, 0.0))
    }

    /// `dx² + dy² > threshold²`.
    #[inline]
    #[must_use]
    pub fn exceeds_motion_threshold(&self, threshold: f64) -> bool {
        let (dx, dy) = self.delta;
        dx * dx + dy * dy > threshold * threshold
    }

    /// The event this slot contributes given the machine's current state.
    #[must_use]
    pub fn classify(&self, state: TapState, motion_threshold: f64) -> Option<TapEvent> {
        if !self.dirty {
            return None;
        }
        match self.phase {
            TouchPhase::None => None,
            TouchPhase::Begin => Some(TapEvent::Touch),
            TouchPhase::End => Some(TapEvent::Release),
            TouchPhase::Update
                if state != TapState::Idle && self.exceeds_motion_threshold(motion_threshold) =>
            {
                Some(TapEvent::Motion)
            }
            TouchPhase::Update => None,
        }
    }
}

/// Everything the recognizer reads for one input frame.
#[derive(Debug, Clone, Copy)]
pub struct TouchFrame<'a> {
    /// Slots in ascending slot index order.
    pub slots: &'a [TouchSlot],
    /// A physical button press was queued during this frame.
    pub button_pressed: bool,
    /// Fingers on the pad after this frame, as counted by contact tracking.
    pub fingers_down: usize,
}

impl<'a> TouchFrame<'a> {
    #[must_use]
    pub const fn new(slots: &'a [TouchSlot], fingers_down: usize) -> Self {
        Self {
            slots,
            button_pressed: false,
            fingers_down,
        }
    }

    #[must_use]
    pub const fn with_button(mut self) -> Self {
        self.button_pressed = true;
        self
    }
}
