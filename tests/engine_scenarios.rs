//! End-to-end scenarios: an engine driven by a simulated clock and tick,
//! with knob values applied through the control panel.

use core::convert::Infallible;

use clockdelay::analog::{AnalogChannel, AnalogSource};
use clockdelay::counter::Shape;
use clockdelay::{
    ClockConfig, ClockEngine, ControlPanel, Edge, Mode, ModeSwitches, Outputs, Polarity,
    SharedEngine, Sink,
};
use embedded_hal::digital::v2::OutputPin;

/// Pin that counts writes so idle ticks can be shown to leave outputs alone.
#[derive(Debug, Default)]
struct CountingPin {
    high: bool,
    writes: u32,
}

impl OutputPin for CountingPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        self.writes += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        self.writes += 1;
        Ok(())
    }
}

struct Knobs {
    divide: u16,
    delay: u16,
}

impl AnalogSource for Knobs {
    fn read(&self, channel: AnalogChannel) -> u16 {
        match channel {
            AnalogChannel::Divide => self.divide,
            AnalogChannel::Delay => self.delay,
        }
    }

    fn full_scale(&self) -> u16 {
        4096
    }
}

fn outputs() -> Outputs<CountingPin> {
    Outputs::new(
        CountingPin::default(),
        CountingPin::default(),
        CountingPin::default(),
        CountingPin::default(),
        Polarity::ActiveLow,
    )
}

fn engine(mode: Mode) -> ClockEngine<CountingPin> {
    let mut engine = ClockEngine::new(&ClockConfig::default(), outputs());
    engine.set_mode(mode);
    engine
}

/// Ticks `n` times, returning the level of `sink` after each tick.
fn ticks(engine: &mut ClockEngine<CountingPin>, sink: Sink, n: usize) -> Vec<bool> {
    (0..n)
        .map(|_| {
            engine.tick();
            engine.is_asserted(sink)
        })
        .collect()
}

/// Collapses a level trace into `(level, run length)` pairs.
fn runs(trace: &[bool]) -> Vec<(bool, usize)> {
    let mut runs: Vec<(bool, usize)> = Vec::new();
    for level in trace {
        match runs.last_mut() {
            Some((l, n)) if l == level => *n += 1,
            _ => runs.push((*level, 1)),
        }
    }
    runs
}

// ── Delay timing ─────────────────────────────────────────────────────

#[test]
fn delayed_pulse_is_shifted_copy_of_input() {
    let mut engine = engine(Mode::DivideAndDelay);
    engine.set_delay(205);

    engine.on_edge(Edge::Rising);
    let mut trace = ticks(&mut engine, Sink::Delay, 80);
    engine.on_edge(Edge::Falling);
    trace.extend(ticks(&mut engine, Sink::Delay, 300));

    // Tick numbers are 1-based: on at 206, off at 286.
    let first_on = trace.iter().position(|on| *on).unwrap() + 1;
    let first_off = trace.iter().skip(first_on).position(|on| !*on).unwrap() + first_on + 1;
    assert_eq!(first_on, 206);
    assert_eq!(first_off, 286);
    assert!(!engine.delay().is_running());
}

#[test]
fn idle_ticks_do_not_touch_outputs() {
    let mut engine = engine(Mode::DivideAndDelay);
    let before = engine.outputs().line(Sink::Delay).pin().writes;
    let combined = engine.outputs().line(Sink::Combined).pin().writes;
    ticks(&mut engine, Sink::Delay, 500);
    assert_eq!(engine.outputs().line(Sink::Delay).pin().writes, before);
    assert_eq!(engine.outputs().line(Sink::Combined).pin().writes, combined);
}

// ── Divider ──────────────────────────────────────────────────────────

#[test]
fn divide_jack_pulses_once_every_n_cycles() {
    for n in 1..=16u8 {
        let mut engine = engine(Mode::Swing);
        engine.set_divide(n);
        let mut on_cycles = Vec::new();
        for cycle in 0..(n as usize * 4) {
            engine.on_edge(Edge::Rising);
            if engine.is_asserted(Sink::Divide) {
                on_cycles.push(cycle);
            }
            engine.on_edge(Edge::Falling);
            assert!(!engine.is_asserted(Sink::Divide));
        }
        let n = n as usize;
        assert_eq!(on_cycles, [n - 1, 2 * n - 1, 3 * n - 1, 4 * n - 1], "modulus {}", n);
    }
}

// ── Swing ────────────────────────────────────────────────────────────

#[test]
fn swing_delays_every_second_pulse() {
    let mut engine = engine(Mode::Swing);
    engine.set_divide(2);
    engine.set_delay(10);

    let mut trace = Vec::new();
    for _ in 0..4 {
        engine.on_edge(Edge::Rising);
        trace.push(engine.is_asserted(Sink::Combined));
        trace.extend(ticks(&mut engine, Sink::Combined, 20));
        engine.on_edge(Edge::Falling);
        trace.push(engine.is_asserted(Sink::Combined));
        trace.extend(ticks(&mut engine, Sink::Combined, 20));
    }

    // Samples per pulse: the edge itself plus 20 ticks per phase. The first
    // pulse passes through; the second starts 10 ticks late and keeps the
    // input's width, ending 10 ticks before the third pulse passes through.
    let pattern = runs(&trace);
    assert_eq!(pattern[0], (true, 21));
    assert_eq!(pattern[1], (false, 21 + 1 + 10));
    assert_eq!(pattern[2], (true, 21));
    assert_eq!(pattern[3], (false, 10));
    assert_eq!(pattern[4], (true, 21));
    assert_eq!(pattern[5], (false, 32));
}

#[test]
fn swing_follows_square_divider_wraps() {
    let config = ClockConfig {
        divider_shape: Shape::Square,
        ..ClockConfig::default()
    };
    let mut engine = ClockEngine::new(&config, outputs());
    engine.set_mode(Mode::Swing);
    engine.set_divide(2);
    engine.set_delay(10);

    let mut swung = Vec::new();
    let mut divide_high = Vec::new();
    for cycle in 0..12 {
        engine.on_edge(Edge::Rising);
        if engine.is_asserted(Sink::Divide) {
            divide_high.push(cycle);
        }
        if engine.swing().is_running() {
            assert!(engine.divider().wrapped());
            assert!(!engine.is_asserted(Sink::Combined));
            swung.push(cycle);
        } else {
            assert!(engine.is_asserted(Sink::Combined));
        }
        ticks(&mut engine, Sink::Combined, 20);
        engine.on_edge(Edge::Falling);
        ticks(&mut engine, Sink::Combined, 20);
        assert!(!engine.swing().is_running());
    }

    // Two counted edges high, two low: the square output spans three cycles.
    assert_eq!(swung, [0, 3, 6, 9]);
    assert_eq!(divide_high, [0, 1, 3, 4, 6, 7, 9, 10]);
}

/// Divide at half scale (M = 8) and delay at one tenth (103 ticks), in
/// delay mode with a 60-tick high phase. The combined jack first asserts
/// from the swing timer armed at the 15th clock transition, stays low for
/// 103 - 60 = 43 ticks after the high phase ends, then stays high for 60.
#[test]
fn divided_swing_pulse_worked_example() {
    let config = ClockConfig::default();
    let shared = SharedEngine::new();
    shared.init(ClockEngine::new(&config, outputs()));
    let mut panel = ControlPanel::new(&config);
    let knobs = Knobs { divide: 2048, delay: 410 };
    panel.poll(ModeSwitches { a: true, b: false }, &knobs, &shared);

    shared.with(|engine| {
        assert_eq!(engine.divider().value(), 8);
        assert_eq!(engine.delay().value(), 103);

        let mut transitions = 0;
        let mut armed_at = None;
        for _ in 0..8 {
            engine.on_edge(Edge::Rising);
            transitions += 1;
            if engine.swing().is_running() {
                armed_at = Some(transitions);
                break;
            }
            assert!(ticks(engine, Sink::Combined, 60).iter().all(|on| !*on));
            engine.on_edge(Edge::Falling);
            transitions += 1;
            assert!(ticks(engine, Sink::Combined, 60).iter().all(|on| !*on));
        }
        assert_eq!(armed_at, Some(15));

        let high_phase = ticks(engine, Sink::Combined, 60);
        assert!(high_phase.iter().all(|on| !*on));
        engine.on_edge(Edge::Falling);
        let after = ticks(engine, Sink::Combined, 200);
        let pattern = runs(&after);
        assert_eq!(pattern[0], (false, 43));
        assert_eq!(pattern[1], (true, 60));
        assert!(!engine.swing().is_running());
    });
}

// ── Count ────────────────────────────────────────────────────────────

#[test]
fn count_mode_gate_period() {
    let mut engine = engine(Mode::DivideAndCount);
    engine.set_divide(4);
    engine.set_count(2);

    let mut asserted = Vec::new();
    for cycle in 0..16 {
        engine.on_edge(Edge::Rising);
        if engine.is_asserted(Sink::Combined) {
            asserted.push(cycle);
        }
        engine.on_edge(Edge::Falling);
    }
    assert_eq!(asserted, [3, 7, 11, 15]);
}

// ── Reset ────────────────────────────────────────────────────────────

#[test]
fn reset_matches_fresh_engine() {
    let mut busy = engine(Mode::DivideAndDelay);
    let mut fresh = engine(Mode::DivideAndDelay);
    for e in [&mut busy, &mut fresh] {
        e.set_divide(3);
        e.set_count(5);
        e.set_delay(40);
    }

    for _ in 0..7 {
        busy.on_edge(Edge::Rising);
        ticks(&mut busy, Sink::Delay, 25);
        busy.on_edge(Edge::Falling);
        ticks(&mut busy, Sink::Delay, 5);
    }
    busy.set_reset(true);
    busy.set_reset(false);

    assert_eq!(busy.dump_string(), fresh.dump_string());
    for sink in [Sink::Divide, Sink::Delay, Sink::Combined, Sink::Swing] {
        assert!(!busy.is_asserted(sink));
    }
}

// ── Mode changes ─────────────────────────────────────────────────────

#[test]
fn mode_switch_mid_cycle_keeps_armed_timer() {
    let mut engine = engine(Mode::DivideAndDelay);
    engine.set_delay(30);
    engine.on_edge(Edge::Rising);
    ticks(&mut engine, Sink::Delay, 10);

    engine.set_mode(Mode::DivideAndCount);
    engine.set_delay(500);
    engine.on_edge(Edge::Falling);

    let trace = ticks(&mut engine, Sink::Delay, 100);
    let pattern = runs(&trace);
    // 10 ticks already elapsed: low until tick 30, high for the 10-tick width.
    assert_eq!(pattern[0], (false, 20));
    assert_eq!(pattern[1], (true, 10));
    assert_eq!(engine.delay().rise_mark(), 30);
}

/// Known sharp edge: a retrigger while the delayed pulse is still high keeps
/// the output high straight into the next delayed pulse.
#[test]
fn fast_retrigger_merges_delayed_pulses() {
    let mut engine = engine(Mode::DivideAndDelay);
    engine.set_delay(20);

    let mut trace = Vec::new();
    for _ in 0..3 {
        engine.on_edge(Edge::Rising);
        trace.extend(ticks(&mut engine, Sink::Delay, 12));
        engine.on_edge(Edge::Falling);
        trace.extend(ticks(&mut engine, Sink::Delay, 12));
    }
    trace.extend(ticks(&mut engine, Sink::Delay, 40));

    let pattern = runs(&trace);
    // One long merged pulse instead of three separate ones.
    assert_eq!(pattern.iter().filter(|(level, _)| *level).count(), 1);
}
