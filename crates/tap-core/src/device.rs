#![forbid(unsafe_code)]

//! Per-touchpad tap recognizer handle.
//!
//! [`TapDevice`] owns the recognizer state, the gesture timer and the button
//! sink for one physical touchpad. The host drives it from exactly two
//! places:
//!
//! - [`process_frame`](TapDevice::process_frame), once per input frame;
//! - [`on_timer_expired`](TapDevice::on_timer_expired), whenever the host
//!   timer created at initialization fires.
//!
//! Both take `&mut self`, so calls for one device cannot interleave. The
//! embedding event loop is the serialization point; nothing here locks.
//!
//! # Failure Modes
//!
//! - A release or motion while the machine believes no finger is down is
//!   logged at `info` and otherwise ignored.
//! - A fourth finger or a physical click mid-gesture parks the machine in
//!   [`TapState::Dead`] until contact tracking reports zero fingers down.

use crate::config::TapConfig;
use crate::error::{Result, TapError};
use crate::frame::TouchFrame;
use crate::notify::{ButtonSink, notify};
use crate::state::{TapEvent, TapState, TimerAction};
use crate::timer::{GestureTimer, HostTimer, TimerFacility};

pub struct TapDevice<T: HostTimer, S: ButtonSink> {
    config: TapConfig,
    enabled: bool,
    state: TapState,
    /// Last finger count reported by contact tracking.
    fingers_down: usize,
    timer: GestureTimer<T>,
    sink: S,
}

impl<T: HostTimer, S: ButtonSink> std::fmt::Debug for TapDevice<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapDevice")
            .field("enabled", &self.enabled)
            .field("state", &self.state)
            .field("fingers_down", &self.fingers_down)
            .field("deadline", &self.timer.deadline())
            .finish()
    }
}

impl<T: HostTimer, S: ButtonSink> TapDevice<T, S> {
    /// Validate `config` and create the device's host timer.
    ///
    /// Fails if the configuration is unusable or the facility cannot provide
    /// a timer; there is no fallback without one.
    pub fn initialize<F>(config: TapConfig, facility: &mut F, sink: S) -> Result<Self>
    where
        F: TimerFacility<Timer = T> + ?Sized,
    {
        let config = config.validated()?;
        let host = facility.create_timer().map_err(TapError::TimerCreation)?;

        tracing::debug!(
            target: crate::LOG_TARGET,
            enabled = config.enabled,
            timeout_ms = config.timeout_ms,
            motion_threshold = config.motion_threshold,
            "tap device initialized"
        );

        let mut timer = GestureTimer::new(host, config.timeout_ms);
        if !config.enabled {
            timer.suspend();
        }

        Ok(Self {
            enabled: config.enabled,
            state: TapState::Idle,
            fingers_down: 0,
            timer,
            sink,
            config,
        })
    }

    /// Turn event handling on or off.
    ///
    /// Disabling freezes the recognizer where it is: no transitions and no
    /// notifications until it is enabled again. A pending deadline is kept
    /// but its host registration is dropped. Enabling registers it again,
    /// so a deadline that passed while disabled fires on the next wakeup.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        tracing::debug!(
            target: crate::LOG_TARGET,
            enabled,
            state = %self.state,
            deadline_ms = ?self.timer.deadline(),
            "tap recognition toggled"
        );
        self.enabled = enabled;
        if enabled {
            self.timer.resume();
        } else {
            self.timer.suspend();
        }
    }

    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn one frame of touch changes into state machine input.
    ///
    /// A queued button press is handled first, then every dirty slot in
    /// ascending index order. Each event is fully applied before the next
    /// slot is looked at, so motion classification sees the updated state.
    pub fn process_frame(&mut self, frame: &TouchFrame<'_>, now_ms: u64) {
        if !self.enabled {
            return;
        }
        let _span = tracing::trace_span!("tap.frame", time_ms = now_ms).entered();

        self.fingers_down = frame.fingers_down;

        if frame.button_pressed {
            self.handle_event(TapEvent::Button, now_ms);
        }

        for slot in frame.slots {
            if let Some(event) = slot.classify(self.state, self.config.motion_threshold) {
                self.handle_event(event, now_ms);
            }
        }
    }

    /// Host timer callback.
    ///
    /// Feeds a timeout only if the pending deadline has really passed, then
    /// returns the deadline still pending (if any) so the host can re-register.
    ///
    /// While disabled this always returns `None`; any kept deadline is
    /// registered again by [`set_enabled`](Self::set_enabled).
    pub fn on_timer_expired(&mut self, now_ms: u64) -> Option<u64> {
        if !self.enabled {
            return None;
        }
        if self.timer.expire_if_due(now_ms) {
            self.handle_event(TapEvent::Timeout, now_ms);
        }
        self.timer.deadline()
    }

    /// Apply a single event and return the resulting state.
    pub fn handle_event(&mut self, event: TapEvent, time_ms: u64) -> TapState {
        if !self.enabled {
            return self.state;
        }

        let current = self.state;
        let transition = current.transition(event, self.fingers_down);

        if transition.desync {
            tracing::info!(
                target: crate::LOG_TARGET,
                state = %current,
                event = %event,
                "invalid tap event, no fingers are down"
            );
        }

        match transition.timer {
            TimerAction::Keep => {}
            TimerAction::Arm => self.timer.arm(time_ms),
            TimerAction::Disarm => self.timer.disarm(),
        }
        self.state = transition.next;

        for &notification in transition.notify {
            notify(&mut self.sink, time_ms, notification);
        }

        tracing::debug!(
            target: crate::LOG_TARGET,
            from = %current,
            event = %event,
            to = %self.state,
            time_ms,
            "tap transition"
        );

        self.state
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> TapState {
        self.state
    }

    /// Absolute deadline of the pending gesture timeout.
    #[inline]
    #[must_use]
    pub fn deadline(&self) -> Option<u64> {
        self.timer.deadline()
    }

    #[inline]
    #[must_use]
    pub fn fingers_down(&self) -> usize {
        self.fingers_down
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &TapConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[inline]
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    #[inline]
    #[must_use]
    pub fn host_timer(&self) -> &T {
        self.timer.host()
    }
}
