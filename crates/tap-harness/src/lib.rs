#![forbid(unsafe_code)]

//! Deterministic test harness for `tap-core`.
//!
//! Provides a simulated clock and host timer so gesture timeouts fire at
//! exact millisecond deadlines, a sink that records every emitted button
//! event, and [`TapHarness`], which plays the role of contact tracking: it
//! owns the touch slots, builds a [`TouchFrame`](tap_core::TouchFrame) per
//! commit, and consumes slot changes afterwards.
//!
//! Scenarios can also be written as JSON and replayed with
//! [`script::run_script`].

pub mod harness;
pub mod recorder;
pub mod script;
pub mod sim;

pub use harness::TapHarness;
pub use recorder::{ButtonRecord, RecordingSink};
pub use script::{HarnessError, Script, ScriptOutcome, Step, run_script};
pub use sim::{SimClock, SimTimer, SimTimerFacility, SimTimerHandle};
