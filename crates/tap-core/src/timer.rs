#![forbid(unsafe_code)]

//! Gesture timer: one pending deadline per device.
//!
//! The deadline lives here as plain data. The host's timer facility only
//! provides wakeups, and a wakeup is checked against the deadline before it
//! counts, because host timers may fire late, early, or after the deadline
//! was already cleared.
//!
//! # Invariants
//!
//! 1. At most one deadline is pending; arming again replaces it.
//! 2. Unless suspended, the host timer is armed exactly when a deadline is
//!    pending. A suspended timer keeps its deadline but no host registration.
//! 3. Dropping the timer cancels any host registration.

/// A single-shot wakeup provided by the host event loop.
///
/// `arm_at` takes an absolute deadline in milliseconds on the same monotonic
/// clock as the timestamps handed to the device. When it fires, the host
/// calls [`TapDevice::on_timer_expired`](crate::TapDevice::on_timer_expired).
pub trait HostTimer {
    fn arm_at(&mut self, deadline_ms: u64);
    fn cancel(&mut self);
}

/// Creates host timers at device initialization.
pub trait TimerFacility {
    type Timer: HostTimer;

    fn create_timer(&mut self) -> std::io::Result<Self::Timer>;
}

/// Pending gesture deadline plus the host timer that wakes us for it.
#[derive(Debug)]
pub struct GestureTimer<T: HostTimer> {
    timeout_ms: u64,
    deadline: Option<u64>,
    suspended: bool,
    host: T,
}

impl<T: HostTimer> GestureTimer<T> {
    #[must_use]
    pub fn new(host: T, timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            deadline: None,
            suspended: false,
            host,
        }
    }

    /// Set the deadline to `origin_ms + timeout`, replacing any previous one.
    pub fn arm(&mut self, origin_ms: u64) {
        let deadline = origin_ms.saturating_add(self.timeout_ms);
        tracing::trace!(target: crate::LOG_TARGET, deadline_ms = deadline, "arm tap timer");
        self.deadline = Some(deadline);
        if !self.suspended {
            self.host.arm_at(deadline);
        }
    }

    /// Clear the deadline. A no-op when nothing is pending.
    pub fn disarm(&mut self) {
        if self.deadline.take().is_some() {
            self.cancel_host();
        }
    }

    /// If a deadline is pending and `now_ms` has reached it, clear it and
    /// return `true`.
    ///
    /// Expiry also cancels the host registration, which may still be live
    /// when the wakeup came from elsewhere.
    pub fn expire_if_due(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now_ms => {
                self.deadline = None;
                self.cancel_host();
                true
            }
            _ => false,
        }
    }

    /// Drop the host registration but keep the deadline.
    pub fn suspend(&mut self) {
        if self.suspended {
            return;
        }
        self.suspended = true;
        if self.deadline.is_some() {
            self.host.cancel();
        }
        tracing::trace!(
            target: crate::LOG_TARGET,
            deadline_ms = ?self.deadline,
            "suspend tap timer"
        );
    }

    /// Re-register a kept deadline with the host, even if it already passed.
    pub fn resume(&mut self) {
        if !self.suspended {
            return;
        }
        self.suspended = false;
        if let Some(deadline) = self.deadline {
            tracing::trace!(target: crate::LOG_TARGET, deadline_ms = deadline, "resume tap timer");
            self.host.arm_at(deadline);
        }
    }

    fn cancel_host(&mut self) {
        if !self.suspended {
            tracing::trace!(target: crate::LOG_TARGET, "cancel tap timer");
            self.host.cancel();
        }
    }

    #[inline]
    #[must_use]
    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    #[inline]
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    #[inline]
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    #[inline]
    #[must_use]
    pub fn host(&self) -> &T {
        &self.host
    }
}

impl<T: HostTimer> Drop for GestureTimer<T> {
    fn drop(&mut self) {
        self.disarm();
    }
}
