//! Mapping tap finger counts to emulated pointer buttons.

use std::fmt;

/// Linux evdev button codes, for sinks that forward to a kernel-style API.
const BTN_LEFT: u32 = 0x110;
const BTN_RIGHT: u32 = 0x111;
const BTN_MIDDLE: u32 = 0x112;

/// Button emitted for a tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TapButton {
    Left,
    Right,
    Middle,
}

impl TapButton {
    /// Button for an `n`-finger tap, or `None` for unsupported counts.
    #[must_use]
    pub const fn for_fingers(fingers: u8) -> Option<Self> {
        match fingers {
            1 => Some(Self::Left),
            2 => Some(Self::Right),
            3 => Some(Self::Middle),
            _ => None,
        }
    }

    /// The evdev `BTN_*` code for this button.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Left => BTN_LEFT,
            Self::Right => BTN_RIGHT,
            Self::Middle => BTN_MIDDLE,
        }
    }
}

impl fmt::Display for TapButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Middle => "middle",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// A press or release for an n-finger tap, as requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapNotification {
    pub fingers: u8,
    pub state: ButtonState,
}

impl TapNotification {
    #[must_use]
    pub const fn new(fingers: u8, state: ButtonState) -> Self {
        Self { fingers, state }
    }
}

/// Pointer-event delivery. Fire-and-forget.
pub trait ButtonSink {
    fn button(&mut self, time_ms: u64, button: TapButton, state: ButtonState);
}

impl<S: ButtonSink + ?Sized> ButtonSink for &mut S {
    fn button(&mut self, time_ms: u64, button: TapButton, state: ButtonState) {
        (**self).button(time_ms, button, state);
    }
}

impl<S: ButtonSink + ?Sized> ButtonSink for Box<S> {
    fn button(&mut self, time_ms: u64, button: TapButton, state: ButtonState) {
        (**self).button(time_ms, button, state);
    }
}

/// Forward `notification` to `sink`, stamped with `time_ms`.
///
/// Finger counts without a button mapping are dropped.
pub fn notify<S: ButtonSink + ?Sized>(sink: &mut S, time_ms: u64, notification: TapNotification) {
    let Some(button) = TapButton::for_fingers(notification.fingers) else {
        tracing::trace!(
            target: crate::LOG_TARGET,
            fingers = notification.fingers,
            "no button for finger count"
        );
        return;
    };
    sink.button(time_ms, button, notification.state);
}
