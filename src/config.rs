//! Engine and control-panel configuration.
//!
//! All values are compile-time constants on the reference hardware. They are
//! gathered in [`ClockConfig`] so the firmware and the host tests share one
//! definition, and validated once at boot.
//!
//! # Tick rate
//!
//! Delay and swing durations are counted in ticks, so a duration of `n`
//! lasts `n / tick_hz` seconds. The default 1024 Hz tick divides the
//! 32.768 kHz time base evenly.

use crate::analog::MAX_OVERSAMPLING;
use crate::counter::Shape;
use crate::mode::Mode;
use crate::timer::MAX_DURATION;

/// Largest modulus a discrete knob may select.
pub const MAX_RANGE: u8 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Tick rate must be non-zero.
    ZeroTickRate,
    /// Divide or count range outside `1..=MAX_RANGE`.
    RangeOutOfBounds,
    /// Delay ceiling outside `1..=MAX_DURATION` ticks.
    DelayOutOfBounds,
    /// Hysteresis must be finite and non-negative.
    InvalidDelta,
    /// Oversampling must be in `1..=MAX_OVERSAMPLING` sweeps.
    InvalidOversampling,
    /// The latch mode must be reachable from the mode switch.
    UnreachableLatch,
}

/// Build-time settings for the engine and the control panel.
///
/// Start from [`ClockConfig::DEFAULT`] and call [`ClockConfig::validate`]
/// before handing it to [`ClockEngine::new`](crate::engine::ClockEngine::new).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    /// Periodic tick rate in Hz
    pub tick_hz: u32,
    /// Number of steps on the divide knob
    pub divide_range: u8,
    /// Number of steps on the count knob
    pub count_range: u8,
    /// Longest delay/swing duration in ticks
    pub delay_max_ticks: u16,
    /// Hysteresis of the delay knob as a fraction of full scale
    pub control_delta: f32,
    /// Waveform of the divide output
    pub divider_shape: Shape,
    /// Mode whose entry forces a reset and holds the foreground loop
    pub latch_mode: Option<Mode>,
    /// Mirror analog readings (`full_scale - 1 - x`)
    pub invert_analog: bool,
    /// ADC sweeps summed into one published reading
    pub oversampling: u8,
}

impl ClockConfig {
    pub const DEFAULT: Self = Self {
        tick_hz: 1024,
        divide_range: MAX_RANGE,
        count_range: MAX_RANGE,
        delay_max_ticks: 1024,
        control_delta: 0.001,
        divider_shape: Shape::Pulse,
        latch_mode: None,
        invert_analog: true,
        oversampling: 4,
    };

    /// Checks every field, returning the configuration unchanged if valid.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.tick_hz == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        for range in [self.divide_range, self.count_range] {
            if !(1..=MAX_RANGE).contains(&range) {
                return Err(ConfigError::RangeOutOfBounds);
            }
        }
        if !(1..=MAX_DURATION).contains(&self.delay_max_ticks) {
            return Err(ConfigError::DelayOutOfBounds);
        }
        if !self.control_delta.is_finite() || self.control_delta < 0.0 {
            return Err(ConfigError::InvalidDelta);
        }
        if !(1..=MAX_OVERSAMPLING).contains(&self.oversampling) {
            return Err(ConfigError::InvalidOversampling);
        }
        if self.latch_mode == Some(Mode::Disabled) {
            return Err(ConfigError::UnreachableLatch);
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("config accepted: {}", self);
        Ok(self)
    }

    /// Converts a tick count into milliseconds at this tick rate.
    pub fn ticks_to_millis(&self, ticks: u16) -> u32 {
        if self.tick_hz == 0 {
            return 0;
        }
        u32::from(ticks) * 1000 / self.tick_hz
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
