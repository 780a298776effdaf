//! Firmware for a divide / delay / count / swing clock-processing module.
//!
//! # Overview
//!
//! This firmware turns one external clock into divided, delayed, counted or
//! swung derivative clocks:
//! - Divide output: every N-th pulse of the input
//! - Delay/count output: input pulses delayed by a knob-set time, or gated
//!   by a second counter
//! - Combined output: pass-through, counter gate or swing pulse per mode
//!
//! # Hardware
//!
//! - **MCU**: STM32L031G6U6 (Cortex-M0+)
//! - **Inputs**: clock and reset jacks on EXTI, two-position mode switch
//! - **Knobs**: two pots on the ADC (divide, delay/count)
//! - **Outputs**: three active-low jacks and a clock-in LED
//!
//! # Timing
//!
//! - HSI16 system clock for fast edge response
//! - 32.768 kHz embassy time base; the engine tick runs at 1024 Hz, so one
//!   delay tick is just under a millisecond
//! - Edges are handled as soon as the EXTI task is woken
//!
//! # Module Organization
//!
//! - [`hardware`] - Pin mappings and peripheral initialization
//! - [`tasks`] - Edge, reset and tick handlers

#![no_std]
#![no_main]

mod hardware;
mod tasks;

use embassy_executor::Spawner;
use embassy_stm32::{Config, adc, bind_interrupts, peripherals, rcc::LsConfig};
use embassy_time::Timer;
use {defmt_rtt as _, panic_probe as _};

use clockdelay::{ClockConfig, ClockEngine, ControlPanel, analog::Oversampler};
use hardware::{POLL_INTERVAL_MS, Peripherals};
use tasks::{ENGINE, clock_input_task, reset_input_task, tick_task};

bind_interrupts!(pub struct Irqs {
    ADC1_COMP => adc::InterruptHandler<peripherals::ADC1>;
});

/// Polls between diagnostic dumps in debug mode (about one second).
#[cfg(feature = "debug-mode")]
const DUMP_INTERVAL_POLLS: u32 = 1000;

/// Creates the clock configuration for STM32L031.
///
/// # Clock Settings
///
/// - **HSI**: 16 MHz, used directly as system clock (no PLL)
/// - **MSI**: off
/// - **LSE/LSI**: off, the time driver runs from TIM2
/// - **Voltage scale**: Range 1, required for 16 MHz operation
///
/// # Returns
///
/// Configured RCC settings for embassy-stm32 initialization
fn create_clock_config() -> embassy_stm32::rcc::Config {
    embassy_stm32::rcc::Config {
        msi: None,
        hsi: true,
        hse: None,
        pll: None,
        sys: embassy_stm32::rcc::Sysclk::HSI,
        ahb_pre: embassy_stm32::rcc::AHBPrescaler::DIV1,
        apb1_pre: embassy_stm32::rcc::APBPrescaler::DIV1,
        apb2_pre: embassy_stm32::rcc::APBPrescaler::DIV1,
        ls: LsConfig::off(),
        voltage_scale: embassy_stm32::rcc::VoltageScale::RANGE1,
        mux: embassy_stm32::rcc::mux::ClockMux::default(),
    }
}

/// Main entry point for the clock module firmware.
///
/// # Initialization Sequence
///
/// 1. Validate the engine configuration
/// 2. Configure clocks and initialize STM32 peripherals
/// 3. Install the clock engine with idle outputs
/// 4. Spawn the edge, reset and tick tasks
/// 5. Enter the foreground polling loop
///
/// # Main Loop
///
/// Each cycle samples both knobs, feeds the oversampler and hands the mode
/// switch and knob readings to the control panel, which updates the engine
/// in a single critical section. The loop then sleeps for
/// [`POLL_INTERVAL_MS`].
///
/// # Spawned Tasks
///
/// - **clock_input_task**: External clock edges
/// - **reset_input_task**: Reset line
/// - **tick_task**: Periodic tick for the delay and swing timers
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let config = ClockConfig::DEFAULT.validate().unwrap();

    let mut stm32_config = Config::default();
    stm32_config.rcc = create_clock_config();

    let p = embassy_stm32::init(stm32_config);

    #[cfg(feature = "debug-mode")]
    defmt::info!("Clock module firmware starting...");

    let Peripherals {
        clock_in,
        reset_in,
        mode_switch,
        mut knobs,
        outputs,
    } = Peripherals::new(p);

    #[cfg(feature = "debug-mode")]
    defmt::info!("Installing clock engine...");

    ENGINE.init(ClockEngine::new(&config, outputs));

    #[cfg(feature = "debug-mode")]
    defmt::info!("Spawning edge and tick tasks...");

    spawner.spawn(reset_input_task(reset_in)).unwrap();
    spawner.spawn(clock_input_task(clock_in)).unwrap();
    spawner.spawn(tick_task(config.tick_hz)).unwrap();

    let mut analog = Oversampler::new(config.oversampling, config.invert_analog);
    let mut panel = ControlPanel::new(&config);

    #[cfg(feature = "debug-mode")]
    let mut polls: u32 = 0;

    #[cfg(feature = "debug-mode")]
    defmt::info!("Entering polling loop...");

    loop {
        analog.accumulate(knobs.sweep().await);
        let _status = panel.poll(mode_switch.sample(), &analog, &ENGINE);

        #[cfg(feature = "debug-mode")]
        {
            polls = polls.wrapping_add(1);
            if polls % DUMP_INTERVAL_POLLS == 0 {
                let ticks = tasks::TICKS.load(portable_atomic::Ordering::Relaxed);
                if let Some(dump) = ENGINE.with(|engine| engine.dump_string()) {
                    defmt::info!("[{}] {} {}", ticks, _status, dump.as_str());
                }
            }
        }

        Timer::after_millis(POLL_INTERVAL_MS).await;
    }
}
