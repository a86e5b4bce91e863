//! Simulated clock and host timer.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tap_core::{Clock, HostTimer, TimerFacility};

/// Manually advanced clock.
#[derive(Debug, Default)]
pub struct SimClock {
    now: Cell<u64>,
}

impl SimClock {
    #[must_use]
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Move the clock to `ms`. Time never runs backwards.
    pub fn set(&self, ms: u64) {
        self.now.set(self.now.get().max(ms));
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

#[derive(Debug, Default)]
struct TimerLog {
    armed: Option<u64>,
    arms: u32,
    cancels: u32,
    fired: u32,
}

/// Observer for the simulated host timer, shared with the timer itself.
#[derive(Debug, Clone, Default)]
pub struct SimTimerHandle(Rc<RefCell<TimerLog>>);

impl SimTimerHandle {
    /// Deadline the host timer is currently registered for.
    #[must_use]
    pub fn armed(&self) -> Option<u64> {
        self.0.borrow().armed
    }

    #[must_use]
    pub fn arms(&self) -> u32 {
        self.0.borrow().arms
    }

    #[must_use]
    pub fn cancels(&self) -> u32 {
        self.0.borrow().cancels
    }

    #[must_use]
    pub fn fired(&self) -> u32 {
        self.0.borrow().fired
    }

    /// Consume the registration if it is due at `now_ms`, as a one-shot host
    /// timer would. Returns the deadline that fired.
    pub fn fire_if_due(&self, now_ms: u64) -> Option<u64> {
        let mut log = self.0.borrow_mut();
        match log.armed {
            Some(deadline) if deadline <= now_ms => {
                log.armed = None;
                log.fired += 1;
                Some(deadline)
            }
            _ => None,
        }
    }
}

/// Host timer backed by a [`SimTimerHandle`].
#[derive(Debug)]
pub struct SimTimer {
    log: SimTimerHandle,
}

impl HostTimer for SimTimer {
    fn arm_at(&mut self, deadline_ms: u64) {
        let mut log = self.log.0.borrow_mut();
        log.armed = Some(deadline_ms);
        log.arms += 1;
    }

    fn cancel(&mut self) {
        let mut log = self.log.0.borrow_mut();
        log.armed = None;
        log.cancels += 1;
    }
}

/// Timer facility that can be told to fail, for setup error paths.
#[derive(Debug, Default)]
pub struct SimTimerFacility {
    fail: bool,
    handle: SimTimerHandle,
}

impl SimTimerFacility {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Observer for timers created by this facility.
    #[must_use]
    pub fn handle(&self) -> SimTimerHandle {
        self.handle.clone()
    }
}

impl TimerFacility for SimTimerFacility {
    type Timer = SimTimer;

    fn create_timer(&mut self) -> std::io::Result<SimTimer> {
        if self.fail {
            return Err(std::io::Error::other("simulated timer creation failure"));
        }
        Ok(SimTimer {
            log: self.handle.clone(),
        })
    }
}
