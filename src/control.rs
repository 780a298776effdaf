//! Knob bindings: map normalized analog readings onto engine parameters.
//!
//! Both bindings report a new value only when it is worth propagating:
//! [`DiscreteControl`] when the quantized integer changes, and
//! [`ContinuousControl`] when the reading moves further than its hysteresis
//! from the last reported value. The very first reading is always reported.
//!
//! Readings are integers in `0..full_scale`, where `full_scale` is the
//! analog source's [`full_scale`](crate::analog::AnalogSource::full_scale).

/// Binding from a reading to an integer in `1..=range`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DiscreteControl {
    /// Last reported value
    value: Option<u8>,
    range: u8,
}

impl DiscreteControl {
    /// Creates a binding with no reading yet.
    ///
    /// # Arguments
    ///
    /// * `range` - Highest value reported
    pub const fn new(range: u8) -> Self {
        Self { value: None, range }
    }

    /// Quantizes `reading`, clamped to `1..=range`.
    ///
    /// The scale is split into `range + 1` steps so that half scale lands on
    /// `range / 2` and full scale reaches `range`.
    pub fn map(&self, reading: u16, full_scale: u16) -> u8 {
        if full_scale == 0 || self.range == 0 {
            return 1;
        }
        let reading = u32::from(reading.min(full_scale - 1));
        let step = reading * (u32::from(self.range) + 1) / u32::from(full_scale);
        (step as u8).clamp(1, self.range)
    }

    /// Returns the new value if the quantized reading changed.
    pub fn update(&mut self, reading: u16, full_scale: u16) -> Option<u8> {
        let mapped = self.map(reading, full_scale);
        if self.value == Some(mapped) {
            return None;
        }
        self.value = Some(mapped);
        Some(mapped)
    }

    pub fn value(&self) -> Option<u8> {
        self.value
    }
}

/// Binding from a reading to a fraction in `0.0..1.0` with hysteresis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ContinuousControl {
    /// Last reported fraction
    value: Option<f32>,
    delta: f32,
}

impl ContinuousControl {
    /// Creates a binding whose first reading is always reported.
    ///
    /// # Arguments
    ///
    /// * `delta` - Smallest change, as a fraction, that is reported
    pub const fn new(delta: f32) -> Self {
        Self { value: None, delta }
    }

    /// Returns the new fraction if it moved more than `delta`.
    pub fn update(&mut self, reading: u16, full_scale: u16) -> Option<f32> {
        if full_scale == 0 {
            return None;
        }
        let v = f32::from(reading.min(full_scale - 1)) / f32::from(full_scale);
        if let Some(last) = self.value {
            let moved = if v > last { v - last } else { last - v };
            if moved <= self.delta {
                return None;
            }
        }
        self.value = Some(v);
        Some(v)
    }

    pub fn value(&self) -> Option<f32> {
        self.value
    }
}

/// Linear mapping from a fraction onto a tick duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DelayScale {
    pub max_ticks: u16,
}

impl DelayScale {
    /// Maps `fraction` onto `1..=max_ticks`.
    pub fn ticks(&self, fraction: f32) -> u16 {
        let span = self.max_ticks.saturating_sub(1);
        let fraction = fraction.clamp(0.0, 1.0);
        1 + (fraction * f32::from(span)) as u16
    }
}
