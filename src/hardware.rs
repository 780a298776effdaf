//! Hardware abstraction and peripheral initialization.
//!
//! This module defines the pin mappings and peripheral initialization
//! for the clock module board.
//!
//! # Pin Assignments
//!
//! ## Clock Inputs (active-low, pulled up)
//! - **PA8**: CLOCK_IN_N - External clock, EXTI8 on both edges
//! - **PB1**: RESET_IN_N - Reset, EXTI1 on both edges
//!
//! ## Mode Switch (active-low, pulled up)
//! - **PB4**: MODE_A_N - Delay mode
//! - **PB5**: MODE_B_N - Count mode
//!
//! ## Knobs
//! - **PA0**: ADC_IN0 - Divide amount
//! - **PA1**: ADC_IN1 - Delay/count amount
//!
//! ## Outputs (active-low)
//! - **PB6**: DIVIDE_OUT_N - Divided clock jack
//! - **PB7**: DELAY_OUT_N - Delay/count jack
//! - **PA4**: COMBINED_OUT_N - Combined jack
//! - **PA5**: CLOCK_LED_N - Clock-in indicator
//!
//! ## Debug (SWD)
//! - **PA13**: SWDIO
//! - **PA14**: SWCLK

use embassy_stm32::{
    adc::{Adc, AnyAdcChannel, Resolution},
    exti::ExtiInput,
    gpio::{Input, Level, Output, Pull, Speed},
    peripherals::ADC1,
};

use clockdelay::{ModeSwitches, Outputs, Polarity};

use crate::Irqs;

/// Interval between foreground polls in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 1;

/// Mode switch inputs, sampled once per polling cycle.
pub struct ModeSwitch {
    /// Active-low delay-mode contact (PB4)
    a_n: Input<'static>,
    /// Active-low count-mode contact (PB5)
    b_n: Input<'static>,
}

impl ModeSwitch {
    /// Returns the logical switch levels.
    pub fn sample(&self) -> ModeSwitches {
        ModeSwitches {
            a: self.a_n.is_low(),
            b: self.b_n.is_low(),
        }
    }
}

/// Panel knobs on the ADC.
pub struct Knobs {
    pub adc: Adc<'static, ADC1>,
    /// Divide amount (PA0)
    pub divide: AnyAdcChannel<ADC1>,
    /// Delay/count amount (PA1)
    pub delay: AnyAdcChannel<ADC1>,
}

impl Knobs {
    /// Reads one sample per channel, ordered by `AnalogChannel`.
    pub async fn sweep(&mut self) -> [u16; clockdelay::analog::CHANNELS] {
        let divide = self.adc.read(&mut self.divide).await;
        let delay = self.adc.read(&mut self.delay).await;
        [divide, delay]
    }
}

/// Top-level peripheral container for the clock module.
pub struct Peripherals {
    /// External clock input
    pub clock_in: ExtiInput<'static>,
    /// Reset input
    pub reset_in: ExtiInput<'static>,
    pub mode_switch: ModeSwitch,
    pub knobs: Knobs,
    /// Output jacks and indicator, idle
    pub outputs: Outputs<Output<'static>>,
}

impl Peripherals {
    /// Initializes all peripherals from STM32 peripheral singleton.
    ///
    /// Inputs are pulled up since every contact switches to ground. Outputs
    /// start high, which is idle for the active-low jacks.
    ///
    /// # Arguments
    ///
    /// * `p` - STM32 peripheral singleton from embassy_stm32::init()
    pub fn new(p: embassy_stm32::Peripherals) -> Self {
        use embassy_stm32::adc::AdcChannel;

        let mut adc = Adc::new(p.ADC1, Irqs);
        adc.set_resolution(Resolution::BITS10);

        Self {
            clock_in: ExtiInput::new(p.PA8, p.EXTI8, Pull::Up),
            reset_in: ExtiInput::new(p.PB1, p.EXTI1, Pull::Up),
            mode_switch: ModeSwitch {
                a_n: Input::new(p.PB4, Pull::Up),
                b_n: Input::new(p.PB5, Pull::Up),
            },
            knobs: Knobs {
                adc,
                divide: p.PA0.degrade_adc(),
                delay: p.PA1.degrade_adc(),
            },
            outputs: Outputs::new(
                Output::new(p.PB6, Level::High, Speed::Low),
                Output::new(p.PB7, Level::High, Speed::Low),
                Output::new(p.PA4, Level::High, Speed::Low),
                Output::new(p.PA5, Level::High, Speed::Low),
                Polarity::ActiveLow,
            ),
        }
    }
}
