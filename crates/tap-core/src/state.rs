#![forbid(unsafe_code)]

//! The tap recognition state machine.
//!
//! [`TapState::transition`] is the whole machine: one exhaustive match over
//! `(state, event)`. It is pure. It reports what the caller must do to the
//! gesture timer and which button notifications to emit, and the caller
//! ([`TapDevice`](crate::TapDevice)) applies those effects in order.
//!
//! # States
//!
//! | State | Meaning |
//! |-------|---------|
//! | `Idle` | No fingers down, nothing pending. |
//! | `Touch` | One finger down, still a tap candidate. |
//! | `Hold` | Finger(s) down too long or moved; no tap will fire. |
//! | `Tapped` | One-finger tap seen, left button held until timeout. |
//! | `Touch2` / `Touch3` | Two or three fingers down, still a tap candidate. |
//! | `Touch2Hold` / `Touch3Hold` | Two or three fingers, no longer a tap. |
//! | `DraggingOrDoubleTap` | Finger back down after a tap. |
//! | `Dragging` | Drag in progress, left button held. |
//! | `DraggingWait` | Finger lifted mid-drag, waiting for it to return. |
//! | `Dragging2` | Second finger added during a drag. |
//! | `Dead` | Unsupported input; waits for every finger to lift. |
//!
//! # Invariants
//!
//! 1. Every `(state, event)` pair has a defined outcome.
//! 2. Any transition that lands in `Idle` or `Dead` disarms the timer.
//! 3. A press is always balanced by a release before `Idle` is reached.

use std::fmt;

use crate::notify::{ButtonState, TapNotification};

const PRESS_1: TapNotification = TapNotification::new(1, ButtonState::Pressed);
const RELEASE_1: TapNotification = TapNotification::new(1, ButtonState::Released);
const PRESS_2: TapNotification = TapNotification::new(2, ButtonState::Pressed);
const RELEASE_2: TapNotification = TapNotification::new(2, ButtonState::Released);
const PRESS_3: TapNotification = TapNotification::new(3, ButtonState::Pressed);
const RELEASE_3: TapNotification = TapNotification::new(3, ButtonState::Released);

/// Recognizer state, one per touchpad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TapState {
    #[default]
    Idle,
    Touch,
    Hold,
    Tapped,
    Touch2,
    Touch2Hold,
    Touch3,
    Touch3Hold,
    DraggingOrDoubleTap,
    Dragging,
    DraggingWait,
    Dragging2,
    Dead,
}

impl TapState {
    pub const ALL: [TapState; 13] = [
        Self::Idle,
        Self::Touch,
        Self::Hold,
        Self::Tapped,
        Self::Touch2,
        Self::Touch2Hold,
        Self::Touch3,
        Self::Touch3Hold,
        Self::DraggingOrDoubleTap,
        Self::Dragging,
        Self::DraggingWait,
        Self::Dragging2,
        Self::Dead,
    ];

    /// Stable name used in log fields.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Touch => "touch",
            Self::Hold => "hold",
            Self::Tapped => "tapped",
            Self::Touch2 => "touch_2",
            Self::Touch2Hold => "touch_2_hold",
            Self::Touch3 => "touch_3",
            Self::Touch3Hold => "touch_3_hold",
            Self::DraggingOrDoubleTap => "dragging_or_doubletap",
            Self::Dragging => "dragging",
            Self::DraggingWait => "dragging_wait",
            Self::Dragging2 => "dragging_2",
            Self::Dead => "dead",
        }
    }

    /// Whether the recognizer currently holds the left button down on the
    /// user's behalf (tap pending or drag in progress).
    #[inline]
    #[must_use]
    pub const fn holds_button(self) -> bool {
        matches!(
            self,
            Self::Tapped
                | Self::DraggingOrDoubleTap
                | Self::Dragging
                | Self::DraggingWait
                | Self::Dragging2
        )
    }

    /// Compute the outcome of feeding `event` in this state.
    ///
    /// `fingers_down` is the externally tracked count of fingers on the pad.
    /// Only `Dead` consults it, to decide whether a release ends the gesture.
    #[must_use]
    pub fn transition(self, event: TapEvent, fingers_down: usize) -> Transition {
        use TapEvent as E;
        use TapState as S;

        let transition = match (self, event) {
            (S::Idle, E::Touch) => Transition::to(S::Touch).arm(),
            (S::Idle, E::Release | E::Motion) => Transition::desync(S::Idle),
            (S::Idle, E::Timeout) => Transition::stay(S::Idle),
            (S::Idle, E::Button) => Transition::to(S::Dead),

            (S::Touch, E::Touch) => Transition::to(S::Touch2).arm(),
            (S::Touch, E::Release) => Transition::to(S::Tapped).arm().emit(&[PRESS_1]),
            (S::Touch, E::Motion | E::Timeout) => Transition::to(S::Hold).disarm(),
            (S::Touch, E::Button) => Transition::to(S::Dead),

            (S::Hold, E::Touch) => Transition::to(S::Touch2).arm(),
            (S::Hold, E::Release) => Transition::to(S::Idle),
            (S::Hold, E::Motion | E::Timeout) => Transition::stay(S::Hold),
            (S::Hold, E::Button) => Transition::to(S::Dead),

            (S::Tapped, E::Touch) => Transition::to(S::DraggingOrDoubleTap).disarm(),
            (S::Tapped, E::Release | E::Motion) => Transition::desync(S::Tapped),
            (S::Tapped, E::Timeout) => Transition::to(S::Idle).emit(&[RELEASE_1]),
            (S::Tapped, E::Button) => Transition::to(S::Dead).emit(&[RELEASE_1]),

            (S::Touch2, E::Touch) => Transition::to(S::Touch3).arm(),
            (S::Touch2, E::Release) => Transition::to(S::Hold)
                .disarm()
                .emit(&[PRESS_2, RELEASE_2]),
            (S::Touch2, E::Motion) => Transition::to(S::Touch2Hold).disarm(),
            (S::Touch2, E::Timeout) => Transition::to(S::Touch2Hold),
            (S::Touch2, E::Button) => Transition::to(S::Dead),

            (S::Touch2Hold, E::Touch) => Transition::to(S::Touch3).arm(),
            (S::Touch2Hold, E::Release) => Transition::to(S::Hold),
            (S::Touch2Hold, E::Motion | E::Timeout) => Transition::stay(S::Touch2Hold),
            (S::Touch2Hold, E::Button) => Transition::to(S::Dead),

            (S::Touch3, E::Touch) => Transition::to(S::Dead).disarm(),
            (S::Touch3, E::Release) => {
                Transition::to(S::Touch2Hold).emit(&[PRESS_3, RELEASE_3])
            }
            (S::Touch3, E::Motion | E::Timeout) => Transition::to(S::Touch3Hold).disarm(),
            (S::Touch3, E::Button) => Transition::to(S::Dead),

            // The arm is immediately undone by the Dead invariant.
            (S::Touch3Hold, E::Touch) => Transition::to(S::Dead).arm(),
            (S::Touch3Hold, E::Release) => Transition::to(S::Touch2Hold),
            (S::Touch3Hold, E::Motion | E::Timeout) => Transition::stay(S::Touch3Hold),
            (S::Touch3Hold, E::Button) => Transition::to(S::Dead),

            (S::DraggingOrDoubleTap, E::Touch) => Transition::to(S::Dragging2),
            (S::DraggingOrDoubleTap, E::Release) => Transition::to(S::Idle)
                .disarm()
                .emit(&[RELEASE_1, PRESS_1, RELEASE_1]),
            (S::DraggingOrDoubleTap, E::Motion | E::Timeout) => Transition::to(S::Dragging),
            (S::DraggingOrDoubleTap, E::Button) => Transition::to(S::Dead).emit(&[RELEASE_1]),

            (S::Dragging, E::Touch) => Transition::to(S::Dragging2),
            (S::Dragging, E::Release) => Transition::to(S::DraggingWait).arm(),
            (S::Dragging, E::Motion | E::Timeout) => Transition::stay(S::Dragging),
            (S::Dragging, E::Button) => Transition::to(S::Dead).emit(&[RELEASE_1]),

            (S::DraggingWait, E::Touch) => Transition::to(S::Dragging).disarm(),
            (S::DraggingWait, E::Release | E::Motion) => Transition::stay(S::DraggingWait),
            (S::DraggingWait, E::Timeout) => Transition::to(S::Idle).emit(&[RELEASE_1]),
            (S::DraggingWait, E::Button) => Transition::to(S::Dead).emit(&[RELEASE_1]),

            (S::Dragging2, E::Touch) => Transition::to(S::Dead).emit(&[RELEASE_1]),
            (S::Dragging2, E::Release) => Transition::to(S::Dragging),
            (S::Dragging2, E::Motion | E::Timeout) => Transition::stay(S::Dragging2),
            (S::Dragging2, E::Button) => Transition::to(S::Dead).emit(&[RELEASE_1]),

            (S::Dead, E::Release) if fingers_down == 0 => Transition::to(S::Idle),
            (S::Dead, _) => Transition::stay(S::Dead),
        };
        transition.settle()
    }
}

impl fmt::Display for TapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Input to the state machine, produced per frame or by the gesture timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TapEvent {
    /// A finger touched down.
    Touch,
    /// A finger moved past the motion threshold.
    Motion,
    /// A finger lifted.
    Release,
    /// The physical button was pressed.
    Button,
    /// The gesture deadline elapsed.
    Timeout,
}

impl TapEvent {
    pub const ALL: [TapEvent; 5] = [
        Self::Touch,
        Self::Motion,
        Self::Release,
        Self::Button,
        Self::Timeout,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Touch => "touch",
            Self::Motion => "motion",
            Self::Release => "release",
            Self::Button => "button",
            Self::Timeout => "timeout",
        }
    }
}

impl fmt::Display for TapEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a transition asks of the gesture timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Leave the deadline untouched.
    Keep,
    /// Set the deadline relative to the event's timestamp, replacing any
    /// earlier one.
    Arm,
    /// Clear the deadline.
    Disarm,
}

/// Outcome of a single `(state, event)` step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: TapState,
    pub timer: TimerAction,
    /// Button notifications, in emission order.
    pub notify: &'static [TapNotification],
    /// The event contradicts the machine's view of how many fingers are down.
    pub desync: bool,
}

impl Transition {
    const fn to(next: TapState) -> Self {
        Self {
            next,
            timer: TimerAction::Keep,
            notify: &[],
            desync: false,
        }
    }

    const fn stay(state: TapState) -> Self {
        Self::to(state)
    }

    const fn desync(state: TapState) -> Self {
        Self {
            desync: true,
            ..Self::to(state)
        }
    }

    const fn arm(self) -> Self {
        Self {
            timer: TimerAction::Arm,
            ..self
        }
    }

    const fn disarm(self) -> Self {
        Self {
            timer: TimerAction::Disarm,
            ..self
        }
    }

    const fn emit(self, notify: &'static [TapNotification]) -> Self {
        Self { notify, ..self }
    }

    /// Idle and Dead never keep a deadline, whatever the cell asked for.
    const fn settle(self) -> Self {
        match self.next {
            TapState::Idle | TapState::Dead => self.disarm(),
            _ => self,
        }
    }
}
