//! Tick-driven one-shot delay timer.
//!
//! A [`OneShotTimer`] is armed by a rising edge of the raw clock and then
//! counts periodic ticks. It asserts its output once more than `rise_mark`
//! ticks have elapsed and releases it once more than `fall_mark` ticks have
//! elapsed, after which it stops until re-armed.
//!
//! `rise_mark` is latched from the configured duration when the timer is
//! armed, so a duration change only affects the next arming. `fall_mark` is
//! latched on the falling edge as `rise_mark` plus the ticks measured since
//! arming, which makes the output pulse as wide as the input's high phase.
//!
//! Re-arming a running timer restarts the count but leaves the output alone:
//! an output that is already on stays on until the new cycle releases it.

use core::fmt;

/// Longest configurable duration in ticks (four oversampled 10-bit steps).
pub const MAX_DURATION: u16 = 4 * 1023;

/// Pending fall mark while no falling edge has been seen since arming.
const FALL_PENDING: u16 = u16::MAX;

/// Latest latched fall mark. Kept below the saturated position so a timer
/// whose input was held for the whole counter range still stops.
const FALL_LIMIT: u16 = FALL_PENDING - 1;

/// Retriggerable one-shot timer clocked by the periodic tick.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OneShotTimer {
    /// Ticks after arming before the output goes on
    rise_mark: u16,
    /// Ticks after arming before the output goes off
    fall_mark: u16,
    /// Duration latched into `rise_mark` by the next arming
    value: u16,
    /// Ticks since arming, saturating
    position: u16,
    running: bool,
    output: bool,
}

impl OneShotTimer {
    /// Creates a stopped timer.
    ///
    /// # Arguments
    ///
    /// * `value` - Delay in ticks used by the next arming
    pub const fn new(value: u16) -> Self {
        Self {
            rise_mark: 0,
            fall_mark: 0,
            value,
            position: 0,
            running: false,
            output: false,
        }
    }

    /// Arms the timer.
    ///
    /// The output is not touched here; it changes on later ticks.
    pub fn rise(&mut self) {
        self.rise_mark = self.value;
        self.fall_mark = FALL_PENDING;
        self.position = 0;
        self.running = true;
    }

    /// Latches the fall mark from the high time measured since arming.
    pub fn fall(&mut self) {
        self.fall_mark = self.rise_mark.saturating_add(self.position).min(FALL_LIMIT);
    }

    /// Advances one tick.
    ///
    /// Returns the level asserted by this tick, or `None` when the timer is
    /// stopped or still waiting for its rise mark.
    pub fn clock(&mut self) -> Option<bool> {
        if !self.running {
            return None;
        }
        self.position = self.position.saturating_add(1);

        let mut level = None;
        if self.position > self.rise_mark {
            self.output = true;
            level = Some(true);
        }
        if self.position > self.fall_mark {
            self.output = false;
            self.running = false;
            level = Some(false);
        }
        level
    }

    pub fn reset(&mut self) {
        self.rise_mark = 0;
        self.fall_mark = 0;
        self.position = 0;
        self.running = false;
        self.output = false;
    }

    /// Sets the duration used by the next arming.
    pub fn set_value(&mut self, value: u16) {
        self.value = value.min(MAX_DURATION);
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    pub fn position(&self) -> u16 {
        self.position
    }

    pub fn rise_mark(&self) -> u16 {
        self.rise_mark
    }

    pub fn fall_mark(&self) -> u16 {
        self.fall_mark
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_on(&self) -> bool {
        self.output
    }
}

impl fmt::Display for OneShotTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rise {}, fall {}, pos {}, value {}, running {}",
            self.rise_mark, self.fall_mark, self.position, self.value, self.running
        )
    }
}
