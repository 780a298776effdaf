//! Clock engine for a divide / delay / count / swing clock-processing module.
//!
//! # Overview
//!
//! The module receives an external clock and derives up to three output
//! clocks from it, depending on the operating mode:
//! - **Divide & delay** - divided clock plus a delayed copy of every pulse
//! - **Divide & count** - divided clock gated by a second counter
//! - **Swing** - every N-th pulse is delayed, the others pass straight through
//!
//! # Execution Model
//!
//! Three contexts drive the engine:
//! - an edge handler for the external clock (and one for the reset line)
//! - a periodic tick at a fixed rate, which clocks the delay timers
//! - a foreground polling loop that reads the mode switch and knobs
//!
//! The engine itself is plain data behind [`shared::SharedEngine`], which
//! serializes the three contexts with a critical section.
//!
//! # Module Organization
//!
//! - [`counter`] - Edge-driven modulo counters (divider and counter)
//! - [`timer`] - Tick-driven one-shot timers (delay and swing)
//! - [`output`] - Output lines and the sinks components drive
//! - [`engine`] - Edge/tick dispatch per mode
//! - [`mode`] - Operating modes and the mode switch
//! - [`control`] - Knob-to-parameter bindings
//! - [`analog`] - Oversampled analog readings
//! - [`panel`] - Foreground polling cycle
//! - [`shared`] - Critical-section wrapper around the engine
//! - [`config`] - Configuration and validation

#![cfg_attr(not(test), no_std)]

pub mod analog;
pub mod config;
pub mod control;
pub mod counter;
pub mod engine;
pub mod mode;
pub mod output;
pub mod panel;
pub mod shared;
pub mod timer;

pub use config::{ClockConfig, ConfigError};
pub use engine::{ClockEngine, Edge};
pub use mode::{Mode, ModeSwitches};
pub use output::{Outputs, Polarity, Sink};
pub use panel::{ControlPanel, PanelStatus};
pub use shared::SharedEngine;
