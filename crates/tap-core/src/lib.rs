#![forbid(unsafe_code)]

//! Core: tap and tap-and-drag recognition for multi-touch touchpads.
//!
//! # Role in the pipeline
//! `tap-core` sits between contact tracking (debounced per-slot touch state)
//! and pointer-event delivery. It turns touch lifecycle changes into emulated
//! button presses: one, two and three finger taps map to left, right and
//! middle clicks, and a tap followed by a touch within the gesture window
//! holds the left button down for dragging.
//!
//! # Primary responsibilities
//! - **State machine** ([`state`]): the 13-state tap recognizer as a single
//!   exhaustive transition function.
//! - **Frame synthesis** ([`frame`]): ordered [`TapEvent`]s from one frame of
//!   touch slots.
//! - **Gesture timer** ([`timer`]): one pending deadline per device, backed by
//!   an injected host timer.
//! - **Notification** ([`notify`]): finger count to button mapping.
//! - **Device** ([`device`]): the per-touchpad handle tying it all together.
//!
//! # Usage
//!
//! ```
//! use tap_core::{
//!     ButtonSink, ButtonState, HostTimer, TapButton, TapConfig, TapDevice, TapState,
//!     TimerFacility, TouchFrame, TouchSlot,
//! };
//!
//! #[derive(Default)]
//! struct Timer(Option<u64>);
//! impl HostTimer for Timer {
//!     fn arm_at(&mut self, deadline_ms: u64) { self.0 = Some(deadline_ms); }
//!     fn cancel(&mut self) { self.0 = None; }
//! }
//!
//! struct Facility;
//! impl TimerFacility for Facility {
//!     type Timer = Timer;
//!     fn create_timer(&mut self) -> std::io::Result<Timer> { Ok(Timer::default()) }
//! }
//!
//! #[derive(Default)]
//! struct Log(Vec<(u64, TapButton, ButtonState)>);
//! impl ButtonSink for Log {
//!     fn button(&mut self, time_ms: u64, button: TapButton, state: ButtonState) {
//!         self.0.push((time_ms, button, state));
//!     }
//! }
//!
//! let mut device = TapDevice::initialize(TapConfig::default(), &mut Facility, Log::default())?;
//!
//! device.process_frame(&TouchFrame::new(&[TouchSlot::begin()], 1), 0);
//! device.process_frame(&TouchFrame::new(&[TouchSlot::end()], 0), 50);
//! assert_eq!(device.state(), TapState::Tapped);
//!
//! assert_eq!(device.on_timer_expired(230), None);
//! assert_eq!(device.state(), TapState::Idle);
//! assert_eq!(device.sink().0.len(), 2);
//! # Ok::<(), tap_core::TapError>(())
//! ```

pub mod clock;
pub mod config;
pub mod device;
pub mod error;
pub mod frame;
pub mod notify;
pub mod state;
pub mod timer;

pub use clock::{Clock, MonotonicClock};
pub use config::TapConfig;
pub use device::TapDevice;
pub use error::{Result, TapError};
pub use frame::{TouchFrame, TouchPhase, TouchSlot};
pub use notify::{ButtonSink, ButtonState, TapButton, TapNotification};
pub use state::{TapEvent, TapState, TimerAction, Transition};
pub use timer::{GestureTimer, HostTimer, TimerFacility};

/// Log target shared by every event this crate emits.
pub(crate) const LOG_TARGET: &str = "tap";
