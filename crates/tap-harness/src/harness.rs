//! Contact-tracking stand-in that drives a [`TapDevice`] frame by frame.

use tap_core::{
    Clock, TapConfig, TapDevice, TapError, TapState, TouchFrame, TouchPhase, TouchSlot,
};

use crate::recorder::{ButtonRecord, RecordingSink};
use crate::sim::{SimClock, SimTimer, SimTimerFacility, SimTimerHandle};

/// Slots available unless a harness is built with [`TapHarness::with_slots`].
pub const DEFAULT_SLOTS: usize = 5;

/// Owns touch slots and a simulated event loop around one [`TapDevice`].
///
/// Touch changes are staged with [`begin`](Self::begin),
/// [`move_by`](Self::move_by), [`end`](Self::end) and
/// [`press_button`](Self::press_button), then delivered together by
/// [`commit`](Self::commit). Before a frame is delivered, any host timer due
/// at or before the frame's timestamp fires first.
///
/// Slot indices must be below [`slot_count`](Self::slot_count); the staging
/// methods panic otherwise. [`Script::run`](crate::Script::run) checks the
/// range and reports [`HarnessError::SlotOutOfRange`](crate::HarnessError)
/// instead.
#[derive(Debug)]
pub struct TapHarness {
    device: TapDevice<SimTimer, RecordingSink>,
    clock: SimClock,
    timer: SimTimerHandle,
    slots: Vec<TouchSlot>,
    button_queued: bool,
}

impl TapHarness {
    pub fn new(config: TapConfig) -> Result<Self, TapError> {
        Self::with_slots(config, DEFAULT_SLOTS)
    }

    pub fn with_slots(config: TapConfig, slots: usize) -> Result<Self, TapError> {
        let mut facility = SimTimerFacility::new();
        let timer = facility.handle();
        let device = TapDevice::initialize(config, &mut facility, RecordingSink::default())?;
        Ok(Self {
            device,
            clock: SimClock::default(),
            timer,
            slots: vec![TouchSlot::default(); slots],
            button_queued: false,
        })
    }

    /// Stage a touch-down in `slot`.
    ///
    /// # Panics
    ///
    /// If `slot` is out of range.
    pub fn begin(&mut self, slot: usize) -> &mut Self {
        self.slots[slot] = TouchSlot::begin();
        self
    }

    /// Stage motion for a finger already down in `slot`.
    ///
    /// Deltas accumulate until the next commit.
    ///
    /// # Panics
    ///
    /// If `slot` is out of range.
    pub fn move_by(&mut self, slot: usize, dx: f64, dy: f64) -> &mut Self {
        let s = &mut self.slots[slot];
        s.dirty = true;
        s.delta.0 += dx;
        s.delta.1 += dy;
        self
    }

    /// Stage a lift in `slot`.
    ///
    /// # Panics
    ///
    /// If `slot` is out of range.
    pub fn end(&mut self, slot: usize) -> &mut Self {
        self.slots[slot] = TouchSlot::end();
        self
    }

    /// Queue a physical button press for the next frame.
    pub fn press_button(&mut self) -> &mut Self {
        self.button_queued = true;
        self
    }

    /// Deliver the staged frame at `at_ms`.
    pub fn commit(&mut self, at_ms: u64) -> TapState {
        self.advance_to(at_ms);

        let fingers_down = self
            .slots
            .iter()
            .filter(|s| matches!(s.phase, TouchPhase::Begin | TouchPhase::Update))
            .count();
        let mut frame = TouchFrame::new(&self.slots, fingers_down);
        if self.button_queued {
            frame = frame.with_button();
        }
        self.device.process_frame(&frame, self.clock.now_ms());

        self.consume();
        self.device.state()
    }

    /// Run the simulated event loop up to `to_ms`, firing due timers at their
    /// deadlines. A timer registered for a deadline already behind the clock
    /// fires at the current time.
    pub fn advance_to(&mut self, to_ms: u64) -> TapState {
        while let Some(deadline) = self.timer.fire_if_due(to_ms) {
            self.clock.set(deadline);
            if let Some(next) = self.device.on_timer_expired(self.clock.now_ms()) {
                tracing::trace!(next_deadline_ms = next, "tap timer still pending");
            }
        }
        self.clock.set(to_ms);
        self.device.state()
    }

    /// Toggle tap recognition on the device.
    pub fn set_enabled(&mut self, enabled: bool) -> TapState {
        self.device.set_enabled(enabled);
        self.device.state()
    }

    /// Deliver a host wakeup at `at_ms` regardless of any registered deadline.
    pub fn spurious_wakeup(&mut self, at_ms: u64) -> Option<u64> {
        self.clock.set(at_ms);
        self.device.on_timer_expired(self.clock.now_ms())
    }

    fn consume(&mut self) {
        for slot in &mut self.slots {
            slot.phase = match slot.phase {
                TouchPhase::Begin | TouchPhase::Update => TouchPhase::Update,
                TouchPhase::End | TouchPhase::None => TouchPhase::None,
            };
            slot.dirty = false;
            slot.delta = (0.0, 0.0);
        }
        self.button_queued = false;
    }

    #[must_use]
    pub fn state(&self) -> TapState {
        self.device.state()
    }

    #[must_use]
    pub fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    #[must_use]
    pub fn fingers_down(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.phase != TouchPhase::None)
            .count()
    }

    #[must_use]
    pub fn records(&self) -> &[ButtonRecord] {
        self.device.sink().records()
    }

    /// Recorded button events rendered as `"time button down|up"`.
    #[must_use]
    pub fn transcript(&self) -> Vec<String> {
        self.records().iter().map(ToString::to_string).collect()
    }

    #[must_use]
    pub fn sink(&self) -> &RecordingSink {
        self.device.sink()
    }

    #[must_use]
    pub fn timer(&self) -> &SimTimerHandle {
        &self.timer
    }

    #[must_use]
    pub fn device(&self) -> &TapDevice<SimTimer, RecordingSink> {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut TapDevice<SimTimer, RecordingSink> {
        &mut self.device
    }

    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Lift every finger still down, one frame at `at_ms`.
    pub fn lift_all(&mut self, at_ms: u64) -> TapState {
        for slot in 0..self.slots.len() {
            if self.slots[slot].phase != TouchPhase::None {
                self.end(slot);
            }
        }
        self.commit(at_ms)
    }
}
