//! Clock engine: routes edges and ticks to the counters and timers.
//!
//! # Edge handling
//!
//! Every rising edge first advances the divider, then dispatches on the
//! active [`Mode`]:
//!
//! - **Swing** - when the divider just wrapped the swing timer is armed,
//!   otherwise the raw clock is passed straight to the combined output.
//! - **DivideAndCount** - the counter advances and the combined output is the
//!   logical AND of the divider and counter outputs.
//! - **DivideAndDelay** - the delay timer is armed, and so is the swing timer
//!   if the divider output is on.
//! - **Disabled** - nothing beyond the divider.
//!
//! The falling edge advances the divider and then mirrors whatever the
//! preceding rising edge set in motion, so a mode change between the two
//! edges never strands an armed timer without its fall mark.
//!
//! # Ticks
//!
//! Each periodic tick clocks both timers. Stopped timers ignore ticks.
//!
//! # Reset
//!
//! Asserting the reset line restores every component to its power-on state,
//! idles all outputs and suspends edge and tick handling until the line is
//! released.

use core::convert::Infallible;
use core::fmt;

use embedded_hal::digital::v2::OutputPin;

use crate::config::ClockConfig;
use crate::counter::{EdgeCounter, Shape};
use crate::mode::Mode;
use crate::output::{Outputs, Sink};
use crate::timer::OneShotTimer;

/// Capacity of the rendered diagnostic dump.
pub const DUMP_CAPACITY: usize = 256;

/// Direction of a transition on the external clock input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Rising,
    Falling,
}

impl Edge {
    /// Edge implied by the clock level observed right after a transition.
    pub fn from_level(high: bool) -> Self {
        if high { Edge::Rising } else { Edge::Falling }
    }
}

/// What the last rising edge started, replayed by the following falling edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Armed {
    /// Delay timer armed
    delay: bool,
    /// Swing timer armed
    swing: bool,
    /// Count counter advanced
    counter: bool,
    /// Raw clock passed to the combined jack
    pass_through: bool,
}

/// Divide / delay / count / swing engine driven by clock edges and ticks.
///
/// Owns both counters, both timers and the output lines. All mutation goes
/// through `&mut self`, so sharing it with interrupt-driven handlers is left
/// to [`SharedEngine`](crate::shared::SharedEngine).
pub struct ClockEngine<P> {
    /// Active operating mode
    mode: Mode,
    /// Divider feeding the divide jack
    divider: EdgeCounter,
    /// Second counter used in count mode
    counter: EdgeCounter,
    /// Delay timer for the delay/count jack
    delay: OneShotTimer,
    /// Swing timer for the combined jack
    swing: OneShotTimer,
    outputs: Outputs<P>,
    /// Record of the last rising edge
    armed: Armed,
    /// Reset line asserted
    held: bool,
}

impl<P> ClockEngine<P>
where
    P: OutputPin<Error = Infallible>,
{
    /// Creates an engine in [`Mode::Disabled`] with pass-through moduli and
    /// one-tick delays. The control panel overwrites these on its first poll.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration; supplies the divider shape
    /// * `outputs` - Output lines, already idle
    pub fn new(config: &ClockConfig, outputs: Outputs<P>) -> Self {
        Self {
            mode: Mode::Disabled,
            divider: EdgeCounter::new(1, config.divider_shape),
            counter: EdgeCounter::new(1, Shape::Pulse),
            delay: OneShotTimer::new(1),
            swing: OneShotTimer::new(1),
            outputs,
            armed: Armed::default(),
            held: false,
        }
    }

    /// Handles one transition of the external clock.
    pub fn on_edge(&mut self, edge: Edge) {
        if self.held {
            return;
        }
        match edge {
            Edge::Rising => self.rise(),
            Edge::Falling => self.fall(),
        }
    }

    fn rise(&mut self) {
        self.outputs.indicate(true);
        let divided = self.divider.rise();
        self.outputs.drive(Sink::Divide, divided);

        let mut armed = Armed::default();
        match self.mode {
            Mode::Disabled => {}
            Mode::Swing => {
                if self.divider.wrapped() {
                    self.swing.rise();
                    armed.swing = true;
                } else {
                    self.outputs.drive(Sink::Combined, true);
                    armed.pass_through = true;
                }
            }
            Mode::DivideAndCount => {
                let counted = self.counter.rise();
                armed.counter = true;
                self.outputs.drive(Sink::Delay, counted);
                self.outputs.drive(Sink::Combined, divided && counted);
            }
            Mode::DivideAndDelay => {
                self.delay.rise();
                armed.delay = true;
                if divided {
                    self.swing.rise();
                    armed.swing = true;
                }
            }
        }
        self.armed = armed;
    }

    /// Completes what the preceding rise armed. This deliberately ignores the
    /// mode current at the falling edge: a timer armed before a mode change
    /// still gets its fall mark, and a newly selected mode only dispatches
    /// from its first rising edge.
    fn fall(&mut self) {
        self.outputs.indicate(false);
        let divided = self.divider.fall();
        self.outputs.drive(Sink::Divide, divided);

        let armed = core::mem::take(&mut self.armed);
        if armed.delay {
            self.delay.fall();
        }
        if armed.swing {
            self.swing.fall();
        }
        if armed.counter {
            let counted = self.counter.fall();
            self.outputs.drive(Sink::Delay, counted);
            self.outputs.drive(Sink::Combined, divided && counted);
        }
        if armed.pass_through {
            self.outputs.drive(Sink::Combined, false);
        }
    }

    /// Handles one periodic tick.
    pub fn tick(&mut self) {
        if self.held {
            return;
        }
        if let Some(on) = self.delay.clock() {
            self.outputs.drive(Sink::Delay, on);
        }
        if let Some(on) = self.swing.clock() {
            self.outputs.drive(Sink::Swing, on);
        }
    }

    /// Restores every component to its power-on state and idles all outputs.
    ///
    /// Configured moduli, durations and the mode are kept.
    pub fn reset(&mut self) {
        self.divider.reset();
        self.counter.reset();
        self.delay.reset();
        self.swing.reset();
        self.armed = Armed::default();
        self.outputs.idle();
    }

    /// Follows the reset input. Edges and ticks are ignored while asserted.
    pub fn set_reset(&mut self, asserted: bool) {
        if asserted {
            self.reset();
        }
        if asserted != self.held {
            #[cfg(feature = "defmt")]
            defmt::debug!("reset line {}", if asserted { "asserted" } else { "released" });
        }
        self.held = asserted;
    }

    /// Selects the dispatch used from the next edge on.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn set_divide(&mut self, value: u8) {
        self.divider.set_value(value);
    }

    pub fn set_count(&mut self, value: u8) {
        self.counter.set_value(value);
    }

    /// Sets the delay and swing duration in ticks.
    pub fn set_delay(&mut self, ticks: u16) {
        self.delay.set_value(ticks);
        self.swing.set_value(ticks);
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn divider(&self) -> &EdgeCounter {
        &self.divider
    }

    pub fn counter(&self) -> &EdgeCounter {
        &self.counter
    }

    pub fn delay(&self) -> &OneShotTimer {
        &self.delay
    }

    pub fn swing(&self) -> &OneShotTimer {
        &self.swing
    }

    pub fn outputs(&self) -> &Outputs<P> {
        &self.outputs
    }

    pub fn is_asserted(&self, sink: Sink) -> bool {
        self.outputs.is_asserted(sink)
    }

    /// Writes the internal counters of every component to `out`.
    pub fn dump<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        write!(
            out,
            "divider: [{}] counter: [{}] delay: [{}] swing: [{}] mode {}",
            self.divider,
            self.counter,
            self.delay,
            self.swing,
            self.mode.name()
        )?;
        if self.held {
            out.write_str(" held")?;
        }
        Ok(())
    }

    /// Renders [`dump`](Self::dump) into a fixed-capacity string, truncating
    /// on overflow.
    pub fn dump_string(&self) -> heapless::String<DUMP_CAPACITY> {
        let mut text = heapless::String::new();
        let _ = self.dump(&mut text);
        text
    }
}
