//! Output jacks and the sinks that drive them.
//!
//! The module has three output jacks and one status LED, all wired
//! active-low on the reference board:
//!
//! - **Divide** - divided clock
//! - **Delay** - delayed clock in delay mode, counter gate in count mode
//! - **Combined** - multiplexed between pass-through, counter gate and the
//!   swing pulse depending on the active mode
//! - **Indicator** - mirrors the raw clock input (cosmetic)
//!
//! Components never touch pins directly. They report levels and the engine
//! routes each level to a [`Sink`].

use core::convert::Infallible;

use embedded_hal::digital::v2::OutputPin;

/// Electrical polarity of an output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Asserted drives the pin high
    ActiveHigh,
    /// Asserted drives the pin low
    #[default]
    ActiveLow,
}

/// Logical destination of a component's on/off level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sink {
    /// Divider output jack
    Divide,
    /// Delay/count output jack
    Delay,
    /// Combined output jack, driven directly (pass-through or counter gate)
    Combined,
    /// Combined output jack, driven by the swing timer
    Swing,
}

/// A single logical output line over a GPIO pin.
///
/// Tracks the asserted state so it can be read back without touching the
/// pin, which on some ports is write-only.
pub struct OutputLine<P> {
    pin: P,
    polarity: Polarity,
    asserted: bool,
}

impl<P> OutputLine<P>
where
    P: OutputPin<Error = Infallible>,
{
    /// Wraps `pin` and drives it to its idle level.
    pub fn new(pin: P, polarity: Polarity) -> Self {
        let mut line = Self {
            pin,
            polarity,
            asserted: true,
        };
        line.assert_low();
        line
    }

    /// Asserts the line (logical on).
    pub fn assert_high(&mut self) {
        self.set(true);
    }

    /// Releases the line (logical off).
    pub fn assert_low(&mut self) {
        self.set(false);
    }

    pub fn set(&mut self, on: bool) {
        self.asserted = on;
        let drive_high = match self.polarity {
            Polarity::ActiveHigh => on,
            Polarity::ActiveLow => !on,
        };
        let _ = if drive_high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
    }

    pub fn is_asserted(&self) -> bool {
        self.asserted
    }

    /// Borrows the underlying pin.
    pub fn pin(&self) -> &P {
        &self.pin
    }
}

/// All lines owned by the clock engine.
pub struct Outputs<P> {
    divide: OutputLine<P>,
    delay: OutputLine<P>,
    combined: OutputLine<P>,
    indicator: OutputLine<P>,
    /// Level last written by the swing timer onto the combined line
    swing_asserted: bool,
}

impl<P> Outputs<P>
where
    P: OutputPin<Error = Infallible>,
{
    /// Creates the output set from four pins sharing one polarity.
    ///
    /// # Arguments
    ///
    /// * `divide` - Divider output jack
    /// * `delay` - Delay/count output jack
    /// * `combined` - Combined output jack
    /// * `indicator` - Clock-in status LED
    /// * `polarity` - Electrical polarity of every line
    pub fn new(divide: P, delay: P, combined: P, indicator: P, polarity: Polarity) -> Self {
        Self {
            divide: OutputLine::new(divide, polarity),
            delay: OutputLine::new(delay, polarity),
            combined: OutputLine::new(combined, polarity),
            indicator: OutputLine::new(indicator, polarity),
            swing_asserted: false,
        }
    }

    /// Writes `on` to the line behind `sink`.
    pub fn drive(&mut self, sink: Sink, on: bool) {
        match sink {
            Sink::Divide => self.divide.set(on),
            Sink::Delay => self.delay.set(on),
            Sink::Combined => self.combined.set(on),
            Sink::Swing => {
                self.swing_asserted = on;
                self.combined.set(on);
            }
        }
    }

    pub fn is_asserted(&self, sink: Sink) -> bool {
        match sink {
            Sink::Divide => self.divide.is_asserted(),
            Sink::Delay => self.delay.is_asserted(),
            Sink::Combined => self.combined.is_asserted(),
            Sink::Swing => self.swing_asserted,
        }
    }

    /// Borrows the line behind `sink`. [`Sink::Swing`] shares the combined line.
    pub fn line(&self, sink: Sink) -> &OutputLine<P> {
        match sink {
            Sink::Divide => &self.divide,
            Sink::Delay => &self.delay,
            Sink::Combined | Sink::Swing => &self.combined,
        }
    }

    /// Mirrors the raw clock level on the status LED.
    pub fn indicate(&mut self, clock_high: bool) {
        self.indicator.set(clock_high);
    }

    pub fn indicator(&self) -> &OutputLine<P> {
        &self.indicator
    }

    /// Forces every line to its idle level.
    pub fn idle(&mut self) {
        self.divide.assert_low();
        self.delay.assert_low();
        self.combined.assert_low();
        self.indicator.assert_low();
        self.swing_asserted = false;
    }
}
