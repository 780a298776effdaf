//! Edge, reset and tick handlers.
//!
//! Each handler is an embassy task woken by its hardware source: EXTI for
//! the clock and reset lines, the time driver's compare interrupt for the
//! periodic tick. They all reach the engine through [`ENGINE`], whose
//! critical section keeps them mutually exclusive with each other and with
//! the foreground loop.

use embassy_stm32::{exti::ExtiInput, gpio::Output};
use embassy_time::{Duration, Ticker};
use portable_atomic::{AtomicU32, Ordering};

use clockdelay::{Edge, SharedEngine};

/// Engine shared by every handler and the foreground loop.
pub static ENGINE: SharedEngine<Output<'static>> = SharedEngine::new();

/// Ticks since boot, for diagnostics.
pub static TICKS: AtomicU32 = AtomicU32::new(0);

/// Forwards every transition of the external clock to the engine.
///
/// The input is active-low: a low pin is a high clock.
#[embassy_executor::task]
pub async fn clock_input_task(mut clock_in: ExtiInput<'static>) {
    loop {
        clock_in.wait_for_any_edge().await;
        let edge = Edge::from_level(clock_in.is_low());
        ENGINE.on_edge(edge);
    }
}

/// Follows the reset line. While it is held the engine ignores edges and ticks.
#[embassy_executor::task]
pub async fn reset_input_task(mut reset_in: ExtiInput<'static>) {
    ENGINE.set_reset(reset_in.is_low());
    loop {
        reset_in.wait_for_any_edge().await;
        ENGINE.set_reset(reset_in.is_low());
    }
}

/// Clocks the delay and swing timers at `tick_hz`.
#[embassy_executor::task]
pub async fn tick_task(tick_hz: u32) {
    let mut ticker = Ticker::every(Duration::from_hz(u64::from(tick_hz)));
    loop {
        ticker.next().await;
        TICKS.fetch_add(1, Ordering::Relaxed);
        ENGINE.tick();
    }
}
