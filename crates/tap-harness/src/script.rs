//! JSON-scripted tap scenarios.
//!
//! # Schema
//!
//! ```json
//! {
//!   "config": {"timeout_ms": 180},
//!   "steps": [
//!     {"op": "begin", "slot": 0},
//!     {"op": "commit", "at": 0},
//!     {"op": "end", "slot": 0},
//!     {"op": "commit", "at": 50},
//!     {"op": "advance", "to": 400}
//!   ]
//! }
//! ```
//!
//! Running a script yields the button transcript (see
//! [`TapHarness::transcript`]) and the final state.

use serde::Deserialize;
use tap_core::{TapConfig, TapError, TapState};
use thiserror::Error;

use crate::harness::TapHarness;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("script parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Tap(#[from] TapError),

    #[error("step {step}: slot {slot} out of range (have {available})")]
    SlotOutOfRange {
        step: usize,
        slot: usize,
        available: usize,
    },

    #[error("step {step}: time {at} is before current time {now}")]
    TimeWentBackwards { step: usize, at: u64, now: u64 },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Begin { slot: usize },
    Move { slot: usize, dx: f64, dy: f64 },
    End { slot: usize },
    Button,
    SetEnabled { enabled: bool },
    Commit { at: u64 },
    Advance { to: u64 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: TapConfig,
    #[serde(default = "default_slots")]
    pub slots: usize,
    pub steps: Vec<Step>,
}

fn default_slots() -> usize {
    crate::harness::DEFAULT_SLOTS
}

/// Result of replaying a script.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptOutcome {
    pub state: TapState,
    pub transcript: Vec<String>,
}

impl Script {
    pub fn from_json(s: &str) -> Result<Self, HarnessError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn run(&self) -> Result<ScriptOutcome, HarnessError> {
        let config = self.config.clone().validated()?;
        let mut harness = TapHarness::with_slots(config, self.slots)?;

        for (index, step) in self.steps.iter().enumerate() {
            if let Step::Begin { slot } | Step::Move { slot, .. } | Step::End { slot } = *step
                && slot >= harness.slot_count()
            {
                return Err(HarnessError::SlotOutOfRange {
                    step: index,
                    slot,
                    available: harness.slot_count(),
                });
            }
            match *step {
                Step::Begin { slot } => {
                    harness.begin(slot);
                }
                Step::Move { slot, dx, dy } => {
                    harness.move_by(slot, dx, dy);
                }
                Step::End { slot } => {
                    harness.end(slot);
                }
                Step::Button => {
                    harness.press_button();
                }
                Step::SetEnabled { enabled } => {
                    harness.set_enabled(enabled);
                }
                Step::Commit { at } | Step::Advance { to: at } if at < harness.now() => {
                    return Err(HarnessError::TimeWentBackwards {
                        step: index,
                        at,
                        now: harness.now(),
                    });
                }
                Step::Commit { at } => {
                    harness.commit(at);
                }
                Step::Advance { to } => {
                    harness.advance_to(to);
                }
            }
        }

        Ok(ScriptOutcome {
            state: harness.state(),
            transcript: harness.transcript(),
        })
    }
}

/// Parse and replay a JSON script.
pub fn run_script(json: &str) -> Result<ScriptOutcome, HarnessError> {
    Script::from_json(json)?.run()
}
