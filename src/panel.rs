//! Foreground control panel: mode switch and knobs.
//!
//! [`ControlPanel::poll`] is the body of the foreground loop. It runs once
//! per polling cycle, samples the mode switch and pushes changed knob values
//! into the shared engine. Each poll touches the engine inside a single
//! critical section, so handlers never observe a half-applied update.
//!
//! When the selector reports its latch mode the panel resets the engine and
//! then returns straight away on every poll until the switch moves on. The
//! edge and tick handlers are unaffected.

use core::convert::Infallible;

use embedded_hal::digital::v2::OutputPin;

use crate::analog::{AnalogChannel, AnalogSource};
use crate::config::ClockConfig;
use crate::control::{ContinuousControl, DelayScale, DiscreteControl};
use crate::mode::{Mode, ModeSelector, ModeSwitches, ModeUpdate};
use crate::shared::SharedEngine;

/// Result of one panel poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelStatus {
    /// Mode and knobs applied
    Running(Mode),
    /// Latch mode active; nothing was applied
    Latched(Mode),
    /// No engine installed yet
    Idle,
}

/// Foreground side of the module: mode switch and knob bindings.
///
/// Holds the last applied reading of every control so that only changes
/// reach the engine.
pub struct ControlPanel {
    /// Mode switch decoder and latch
    selector: ModeSelector,
    /// Divide knob to divider modulus
    divide: DiscreteControl,
    /// Delay/count knob to counter modulus
    count: DiscreteControl,
    /// Delay/count knob as a fraction of full scale
    delay: ContinuousControl,
    /// Fraction to delay ticks
    delay_scale: DelayScale,
}

impl ControlPanel {
    /// Creates a panel with no readings applied yet.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration; supplies ranges, hysteresis,
    ///   delay ceiling and latch mode
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            selector: ModeSelector::new(config.latch_mode),
            divide: DiscreteControl::new(config.divide_range),
            count: DiscreteControl::new(config.count_range),
            delay: ContinuousControl::new(config.control_delta),
            delay_scale: DelayScale {
                max_ticks: config.delay_max_ticks,
            },
        }
    }

    /// Runs one foreground polling cycle.
    ///
    /// # Arguments
    ///
    /// * `switches` - Logical mode switch levels sampled this cycle
    /// * `analog` - Latest knob readings
    /// * `engine` - Engine shared with the edge and tick handlers
    pub fn poll<P, A>(
        &mut self,
        switches: ModeSwitches,
        analog: &A,
        engine: &SharedEngine<P>,
    ) -> PanelStatus
    where
        P: OutputPin<Error = Infallible>,
        A: AnalogSource,
    {
        if !engine.is_initialized() {
            return PanelStatus::Idle;
        }

        let update = self.selector.update(switches);
        match update {
            ModeUpdate::Latched(mode) => {
                engine.with(|e| {
                    e.set_mode(mode);
                    e.reset();
                });
                return PanelStatus::Latched(mode);
            }
            ModeUpdate::Holding(mode) => return PanelStatus::Latched(mode),
            ModeUpdate::Unchanged(_) | ModeUpdate::Changed(_) => {}
        }

        let full_scale = analog.full_scale();
        let divide = self
            .divide
            .update(analog.read(AnalogChannel::Divide), full_scale);
        let delay_reading = analog.read(AnalogChannel::Delay);
        let count = self.count.update(delay_reading, full_scale);
        let delay = self
            .delay
            .update(delay_reading, full_scale)
            .map(|fraction| self.delay_scale.ticks(fraction));

        let mode = update.mode();
        engine.with(|e| {
            e.set_mode(mode);
            if let Some(value) = divide {
                e.set_divide(value);
            }
            if let Some(value) = count {
                e.set_count(value);
            }
            if let Some(ticks) = delay {
                e.set_delay(ticks);
            }
        });
        PanelStatus::Running(mode)
    }

    pub fn mode(&self) -> Mode {
        self.selector.mode()
    }
}
