//! Operating modes and the two-position mode switch.
//!
//! The switch exposes two active-high logical inputs, A and B, sampled once
//! per polling cycle:
//!
//! ```text
//! B active              → DivideAndCount
//! A active, B inactive  → DivideAndDelay
//! neither active        → Swing
//! ```
//!
//! [`Mode::Disabled`] is never selected by the switch. It is the power-on
//! mode, so edges arriving before the first poll only advance the divider.
//!
//! A selector may be given a latch mode. Entering it forces a full engine
//! reset and then holds off ordinary foreground processing until the switch
//! leaves that mode again. Edge and tick handling carry on meanwhile.

/// Top-level operating mode of the clock engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    #[default]
    Disabled,
    DivideAndDelay,
    DivideAndCount,
    Swing,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Disabled => "disabled",
            Mode::DivideAndDelay => "delay",
            Mode::DivideAndCount => "count",
            Mode::Swing => "swing",
        }
    }
}

/// Logical (active-high) levels of the two mode switch inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeSwitches {
    pub a: bool,
    pub b: bool,
}

impl ModeSwitches {
    pub fn mode(&self) -> Mode {
        if self.b {
            Mode::DivideAndCount
        } else if self.a {
            Mode::DivideAndDelay
        } else {
            Mode::Swing
        }
    }
}

/// Outcome of one selector poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeUpdate {
    /// Same mode as the previous poll
    Unchanged(Mode),
    /// Switched to a new, non-latching mode
    Changed(Mode),
    /// Just entered the latch mode; the caller must reset the engine
    Latched(Mode),
    /// Still in the latch mode; ordinary processing stays suspended
    Holding(Mode),
}

impl ModeUpdate {
    pub fn mode(&self) -> Mode {
        match *self {
            ModeUpdate::Unchanged(m)
            | ModeUpdate::Changed(m)
            | ModeUpdate::Latched(m)
            | ModeUpdate::Holding(m) => m,
        }
    }

    /// Returns `true` while foreground processing must be held off.
    pub fn is_blocking(&self) -> bool {
        matches!(self, ModeUpdate::Latched(_) | ModeUpdate::Holding(_))
    }
}

/// Tracks the decoded mode across polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeSelector {
    /// Mode decoded on the last poll
    mode: Mode,
    /// Mode that holds off foreground processing, if any
    latch: Option<Mode>,
}

impl ModeSelector {
    /// Creates a selector in [`Mode::Disabled`].
    ///
    /// # Arguments
    ///
    /// * `latch` - Mode that resets the engine on entry and then blocks
    pub const fn new(latch: Option<Mode>) -> Self {
        Self {
            mode: Mode::Disabled,
            latch,
        }
    }

    /// Samples the switch and reports how the mode moved.
    pub fn update(&mut self, switches: ModeSwitches) -> ModeUpdate {
        let next = switches.mode();
        let previous = self.mode;
        self.mode = next;

        let latched = self.latch == Some(next);
        match (next == previous, latched) {
            (true, true) => ModeUpdate::Holding(next),
            (true, false) => ModeUpdate::Unchanged(next),
            (false, true) => {
                #[cfg(feature = "defmt")]
                defmt::info!("mode latch entered: {}", next);
                ModeUpdate::Latched(next)
            }
            (false, false) => {
                #[cfg(feature = "defmt")]
                defmt::info!("mode changed: {} -> {}", previous, next);
                ModeUpdate::Changed(next)
            }
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn switches(a: bool, b: bool) -> ModeSwitches {
        ModeSwitches { a, b }
    }

    #[test]
    fn switch_decoding() {
        assert_eq!(switches(false, false).mode(), Mode::Swing);
        assert_eq!(switches(true, false).mode(), Mode::DivideAndDelay);
        assert_eq!(switches(false, true).mode(), Mode::DivideAndCount);
        assert_eq!(switches(true, true).mode(), Mode::DivideAndCount);
    }

    #[test]
    fn starts_disabled() {
        assert_eq!(ModeSelector::new(None).mode(), Mode::Disabled);
    }

    #[test]
    fn reports_changes_once() {
        let mut selector = ModeSelector::new(None);
        assert_eq!(selector.update(switches(true, false)), ModeUpdate::Changed(Mode::DivideAndDelay));
        assert_eq!(selector.update(switches(true, false)), ModeUpdate::Unchanged(Mode::DivideAndDelay));
        assert_eq!(selector.update(switches(false, true)), ModeUpdate::Changed(Mode::DivideAndCount));
        assert_eq!(selector.update(switches(false, false)), ModeUpdate::Changed(Mode::Swing));
    }

    #[test]
    fn latch_mode_blocks_until_left() {
        let mut selector = ModeSelector::new(Some(Mode::DivideAndCount));
        assert!(!selector.update(switches(false, false)).is_blocking());

        let entered = selector.update(switches(false, true));
        assert_eq!(entered, ModeUpdate::Latched(Mode::DivideAndCount));
        assert!(entered.is_blocking());

        for _ in 0..3 {
            assert_eq!(selector.update(switches(true, true)), ModeUpdate::Holding(Mode::DivideAndCount));
        }

        let left = selector.update(switches(true, false));
        assert_eq!(left, ModeUpdate::Changed(Mode::DivideAndDelay));
        assert!(!left.is_blocking());
    }

    #[test]
    fn update_mode_accessor() {
        assert_eq!(ModeUpdate::Holding(Mode::Swing).mode(), Mode::Swing);
        assert_eq!(Mode::DivideAndDelay.name(), "delay");
    }
}
