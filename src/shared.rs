//! Engine shared between the edge, tick and foreground contexts.
//!
//! The engine lives in a static so that handlers can reach it. Every access
//! goes through a critical section, which gives the handlers mutual
//! exclusion from each other and keeps the foreground's multi-field updates
//! (mode plus parameters) atomic with respect to them.

use core::cell::RefCell;
use core::convert::Infallible;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal::digital::v2::OutputPin;

use crate::engine::{ClockEngine, Edge};

/// Critical-section guarded slot holding the [`ClockEngine`].
///
/// Starts empty so it can be a `static`; the firmware installs the engine
/// once peripherals exist.
pub struct SharedEngine<P> {
    /// Engine, `None` until [`SharedEngine::init`]
    inner: Mutex<CriticalSectionRawMutex, RefCell<Option<ClockEngine<P>>>>,
}

impl<P> SharedEngine<P> {
    /// Creates an empty slot, suitable for a `static`.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Installs the engine. Handlers are no-ops until this is called.
    pub fn init(&self, engine: ClockEngine<P>) {
        self.inner.lock(|cell| {
            cell.replace(Some(engine));
        });
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.lock(|cell| cell.borrow().is_some())
    }

    /// Runs `f` on the engine inside a critical section.
    ///
    /// Returns `None` if no engine has been installed yet.
    pub fn with<R>(&self, f: impl FnOnce(&mut ClockEngine<P>) -> R) -> Option<R> {
        self.inner.lock(|cell| cell.borrow_mut().as_mut().map(f))
    }
}

impl<P> SharedEngine<P>
where
    P: OutputPin<Error = Infallible>,
{
    /// Edge handler entry point.
    pub fn on_edge(&self, edge: Edge) {
        self.with(|engine| engine.on_edge(edge));
    }

    /// Tick handler entry point.
    pub fn tick(&self) {
        self.with(|engine| engine.tick());
    }

    /// Reset-line handler entry point.
    pub fn set_reset(&self, asserted: bool) {
        self.with(|engine| engine.set_reset(asserted));
    }
}

impl<P> Default for SharedEngine<P> {
    fn default() -> Self {
        Self::new()
    }
}
