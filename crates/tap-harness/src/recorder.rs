//! Button sink that keeps everything it is given.

use std::fmt;

use tap_core::{ButtonSink, ButtonState, TapButton};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonRecord {
    pub time_ms: u64,
    pub button: TapButton,
    pub state: ButtonState,
}

impl fmt::Display for ButtonRecord {
    /// `"230 left up"` style, compact enough for transcript asserts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            ButtonState::Pressed => "down",
            ButtonState::Released => "up",
        };
        write!(f, "{} {} {}", self.time_ms, self.button, state)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    records: Vec<ButtonRecord>,
}

impl RecordingSink {
    #[must_use]
    pub fn records(&self) -> &[ButtonRecord] {
        &self.records
    }

    /// Whether every button that went down has come back up.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        [TapButton::Left, TapButton::Right, TapButton::Middle]
            .into_iter()
            .all(|button| self.held(button) == 0)
    }

    /// Presses minus releases for `button`. Negative means a stray release.
    #[must_use]
    pub fn held(&self, button: TapButton) -> i64 {
        self.records
            .iter()
            .filter(|r| r.button == button)
            .map(|r| match r.state {
                ButtonState::Pressed => 1,
                ButtonState::Released => -1,
            })
            .sum()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl ButtonSink for RecordingSink {
    fn button(&mut self, time_ms: u64, button: TapButton, state: ButtonState) {
        self.records.push(ButtonRecord {
            time_ms,
            button,
            state,
        });
    }
}
