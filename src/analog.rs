//! Oversampled knob readings.
//!
//! The panel pots are read as 10-bit ADC samples. [`Oversampler`] sums a
//! fixed number of sweeps per channel before publishing, which both smooths
//! the reading and widens its range to `0..1024 * oversampling`. The engine
//! side only ever sees the latest published value through [`AnalogSource`].

/// Resolution of one ADC sample.
pub const ADC_BITS: u32 = 10;

/// Number of distinct values in one ADC sample.
pub const ADC_STEPS: u16 = 1 << ADC_BITS;

/// Upper bound on sweeps per reading, keeping the sum inside `u16`.
pub const MAX_OVERSAMPLING: u8 = 32;

/// Panel knob feeding an analog channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogChannel {
    /// Divide amount
    Divide = 0,
    /// Delay or count amount
    Delay = 1,
}

/// Number of sampled channels.
pub const CHANNELS: usize = 2;

/// Source of normalized knob readings.
pub trait AnalogSource {
    /// Latest reading of `channel` in `0..full_scale()`.
    fn read(&self, channel: AnalogChannel) -> u16;

    /// Exclusive upper bound of [`read`](Self::read).
    fn full_scale(&self) -> u16;
}

/// Sums `oversampling` sweeps of every channel before publishing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Oversampler {
    buffer: [u16; CHANNELS],
    values: [u16; CHANNELS],
    sweeps: u8,
    oversampling: u8,
    invert: bool,
}

impl Oversampler {
    /// # Arguments
    ///
    /// * `oversampling` - Sweeps per published reading, clamped to
    ///   `1..=MAX_OVERSAMPLING`
    /// * `invert` - Publish `full_scale - 1 - sum` for reverse-wired pots
    pub fn new(oversampling: u8, invert: bool) -> Self {
        let oversampling = oversampling.clamp(1, MAX_OVERSAMPLING);
        let idle = if invert {
            u16::from(oversampling) * ADC_STEPS - 1
        } else {
            0
        };
        Self {
            buffer: [0; CHANNELS],
            values: [idle; CHANNELS],
            sweeps: 0,
            oversampling,
            invert,
        }
    }

    /// Adds one sample per channel, indexed by [`AnalogChannel`].
    ///
    /// Samples above the ADC range are clipped. Returns `true` when this
    /// sweep published a new set of readings.
    pub fn accumulate(&mut self, sweep: [u16; CHANNELS]) -> bool {
        for (sum, sample) in self.buffer.iter_mut().zip(sweep) {
            *sum += sample.min(ADC_STEPS - 1);
        }
        self.sweeps += 1;
        if self.sweeps < self.oversampling {
            return false;
        }

        let top = self.full_scale() - 1;
        for (value, sum) in self.values.iter_mut().zip(self.buffer.iter_mut()) {
            *value = if self.invert { top - *sum } else { *sum };
            *sum = 0;
        }
        self.sweeps = 0;
        true
    }
}

impl AnalogSource for Oversampler {
    fn read(&self, channel: AnalogChannel) -> u16 {
        self.values[channel as usize]
    }

    fn full_scale(&self) -> u16 {
        u16::from(self.oversampling) * ADC_STEPS
    }
}
