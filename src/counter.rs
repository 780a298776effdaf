//! Edge-driven modulo counters.
//!
//! One [`EdgeCounter`] type covers both counter flavours used by the module:
//!
//! - [`Shape::Pulse`] - the output goes on at the rising edge that completes
//!   the modulus and off at the very next falling edge, giving a pulse one
//!   input high-phase wide every N input cycles.
//! - [`Shape::Square`] - rising edges are only counted while the output is
//!   off and falling edges only while it is on, giving a symmetric divided
//!   square wave.
//!
//! A modulus of zero is treated like a modulus of one: every counted edge
//! completes the modulus and the position never advances.

use core::fmt;

/// Output waveform produced by an [`EdgeCounter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Shape {
    /// One high-phase wide pulse every N rising edges
    #[default]
    Pulse,
    /// Symmetric square wave
    Square,
}

/// Modulo counter over clock edges that owns an on/off output level.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeCounter {
    /// Counted edges since the last wrap
    position: u8,
    /// Modulus
    value: u8,
    /// Output level owned by this counter
    output: bool,
    shape: Shape,
    /// Set when the most recent rising edge completed the modulus
    wrapped: bool,
}

impl EdgeCounter {
    /// Creates a counter at rest with its output off.
    ///
    /// # Arguments
    ///
    /// * `value` - Modulus (0 behaves like 1)
    /// * `shape` - Output waveform
    pub const fn new(value: u8, shape: Shape) -> Self {
        Self {
            position: Self::rest_position(value, shape),
            value,
            output: false,
            shape,
            wrapped: false,
        }
    }

    /// Square counters rest at the boundary so the first counted edge wraps.
    const fn rest_position(value: u8, shape: Shape) -> u8 {
        match shape {
            Shape::Pulse => 0,
            Shape::Square => value,
        }
    }

    /// Steps the position, returning `true` when the modulus completes.
    fn next(&mut self) -> bool {
        if self.value == 0 {
            self.position = 0;
            return true;
        }
        self.position = self.position.saturating_add(1);
        if self.position >= self.value {
            self.position = 0;
            true
        } else {
            false
        }
    }

    /// Handles a rising edge and returns the output level afterwards.
    pub fn rise(&mut self) -> bool {
        self.wrapped = false;
        match self.shape {
            Shape::Pulse => {
                self.wrapped = self.next();
                self.output = self.wrapped;
            }
            Shape::Square => {
                if !self.output && self.next() {
                    self.wrapped = true;
                    self.output = true;
                }
            }
        }
        self.output
    }

    /// Handles a falling edge and returns the output level afterwards.
    pub fn fall(&mut self) -> bool {
        match self.shape {
            Shape::Pulse => self.output = false,
            Shape::Square => {
                if self.output && self.next() {
                    self.output = false;
                }
            }
        }
        self.output
    }

    pub fn reset(&mut self) {
        self.position = Self::rest_position(self.value, self.shape);
        self.output = false;
        self.wrapped = false;
    }

    /// Sets the modulus. Takes effect from the next counted edge.
    pub fn set_value(&mut self, value: u8) {
        self.value = value;
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn is_on(&self) -> bool {
        self.output
    }

    /// Returns `true` if the last rising edge completed the modulus.
    pub fn wrapped(&self) -> bool {
        self.wrapped
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }
}

impl fmt::Display for EdgeCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pos {}, value {}", self.position, self.value)
    }
}
