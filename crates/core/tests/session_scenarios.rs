//! End-to-end session scenarios driven through the `DiveSimulation` facade
//!
//! Time is stepped by hand: every test passes explicit timestamps to the
//! commands and to `pump`, one pump per simulated second.

mod common;

use approx::assert_abs_diff_eq;
use dive_sim_core::alerts::{LEAK_MESSAGE, LOW_CYLINDER_MESSAGE, LOW_UMBILICAL_MESSAGE};
use dive_sim_core::{
    AlertKind, Diver, DiveSimulation, Gauge, ManualInput, Mode, SimulationConfig, Timestamp,
    UmbilicalModel,
};

fn t(ms: u64) -> Timestamp {
    Timestamp::from_millis(ms)
}

/// Auto mode, running from t=0
fn running_session(config: SimulationConfig) -> DiveSimulation {
    let mut sim = DiveSimulation::new(config).expect("valid config");
    sim.set_mode(Mode::Auto, t(0));
    sim.start(t(0));
    sim
}

/// Pump once per second from `from` to `to` inclusive
fn pump_seconds(sim: &mut DiveSimulation, from: u64, to: u64) {
    for s in from..=to {
        sim.pump(t(s * 1_000));
    }
}

#[test]
fn test_leak_scenario() {
    let mut sim = DiveSimulation::default();
    assert_eq!(sim.state().gauge(Gauge::UmbilicalPressure), 10.0);
    assert_eq!(sim.state().gauge(Gauge::Diver1Pressure), 180.0);

    sim.trigger_leak(t(0));
    sim.trigger_leak(t(10));

    assert_eq!(sim.state().gauge(Gauge::UmbilicalPressure), 5.0);
    assert_eq!(sim.state().gauge(Gauge::Diver1Pressure), 170.0);
    let leaks: Vec<_> = sim.alerts().iter().filter(|a| a.message == LEAK_MESSAGE).collect();
    assert_eq!(leaks.len(), 1);
    assert_eq!(leaks[0].kind, AlertKind::Critical);
}

#[test]
fn test_pause_freezes_profile_and_excludes_paused_time() {
    let mut sim = running_session(SimulationConfig::default());

    pump_seconds(&mut sim, 1, 15);
    assert_eq!(sim.scheduler().ticks(), 15);
    assert_eq!(sim.state().gauge(Gauge::Depth), 10.0);

    sim.pause(t(15_000));
    let frozen = *sim.state().gauges();
    let history_len = sim.state().history().len();

    pump_seconds(&mut sim, 16, 25);
    assert_eq!(sim.scheduler().ticks(), 15);
    assert_eq!(*sim.state().gauges(), frozen);
    assert_eq!(sim.state().history().len(), history_len);
    assert_eq!(sim.state().elapsed(t(25_000)).as_secs(), 15);

    sim.start(t(25_000));
    pump_seconds(&mut sim, 26, 30);
    // 20 s of active time, not 30 s: stage 2 of the profile
    assert_eq!(sim.state().elapsed(t(30_000)).as_secs(), 20);
    assert_eq!(sim.state().gauge(Gauge::Depth), 20.0);
    assert_eq!(sim.state().session_start_time(), Some(t(0)));
}

#[test]
fn test_scripted_profile_round_trip_dive() {
    let mut sim = running_session(SimulationConfig::default());
    let mut depths = Vec::new();
    for s in 1..=95 {
        sim.pump(t(s * 1_000));
        if s % 10 == 5 {
            depths.push(sim.state().gauge(Gauge::Depth));
        }
    }
    assert_eq!(depths, [0.0, 10.0, 20.0, 30.0, 40.0, 30.0, 20.0, 10.0, 0.0, 0.0]);
    assert_eq!(
        sim.state().gauge(Gauge::Diver1Depth),
        sim.state().gauge(Gauge::Diver2Depth)
    );
    let p1 = sim.state().gauge(Gauge::Cylinder1Pressure);
    assert!(p1 < 200.0 && p1 > 0.0);
    assert_abs_diff_eq!(sim.state().gauge(Gauge::Cylinder1Volume), p1 / 2.0, epsilon = 0.01);
}

#[test]
fn test_history_is_bounded_and_fifo() {
    let mut sim = running_session(SimulationConfig::default());
    pump_seconds(&mut sim, 1, 75);
    let history = sim.state().history();
    assert_eq!(history.len(), 60);
    assert_eq!(history.timestamps().next(), Some(t(16_000)));
    assert_eq!(history.timestamps().last(), Some(t(75_000)));
}

#[test]
fn test_derived_consistent_after_every_tick() {
    let mut sim = running_session(SimulationConfig::default());
    for s in 1..=50 {
        sim.pump(t(s * 1_000));
        let depth = sim.state().gauge(Gauge::Depth);
        let ambient = *sim.state().derived().ambient_pressure;
        assert_abs_diff_eq!(ambient, 1.0 + depth / 10.0, epsilon = 1e-9);
    }
}

#[test]
fn test_low_cylinder_warning_raised_and_auto_dismissed() {
    let mut sim = DiveSimulation::default();
    sim.set_manual_number(Gauge::Cylinder1Pressure, 40.0, t(0));
    sim.set_manual_number(Gauge::Cylinder1Volume, 20.0, t(0));
    sim.set_manual_number(Gauge::UmbilicalPressure, 15.0, t(0));
    sim.set_realistic_profile(false, t(0));
    sim.set_mode(Mode::Auto, t(0));
    sim.start(t(0));

    sim.pump(t(1_000));
    let warning = sim
        .alerts()
        .iter()
        .find(|a| a.message == LOW_CYLINDER_MESSAGE)
        .expect("low cylinder warning")
        .clone();
    assert_eq!(warning.kind, AlertKind::Warning);
    assert_eq!(warning.created_at, t(1_000));
    // Linear supply at 20 m is 12 bar
    assert!(!sim.alerts().iter().any(|a| a.message == LOW_UMBILICAL_MESSAGE));

    sim.pause(t(1_500));
    sim.pump(t(10_999));
    assert!(sim.alerts().iter().any(|a| a.id == warning.id));
    sim.pump(t(11_001));
    assert!(sim.alerts().iter().all(|a| a.id != warning.id));
}

#[test]
fn test_switch_to_manual_stops_ticks_and_unlocks_input() {
    let mut sim = running_session(SimulationConfig::default());
    assert_eq!(
        sim.set_manual_value(Gauge::Depth, "12", t(100)),
        ManualInput::Ignored(dive_sim_core::IgnoreReason::AutoModeActive)
    );

    sim.pump(t(1_000));
    sim.set_mode(Mode::Manual, t(1_200));
    assert!(!sim.state().is_running());

    pump_seconds(&mut sim, 2, 5);
    assert_eq!(sim.scheduler().ticks(), 1);

    assert_eq!(sim.set_manual_value(Gauge::Depth, " 12 ", t(6_000)), ManualInput::Applied(12.0));
    assert_abs_diff_eq!(*sim.state().derived().ambient_pressure, 2.2, epsilon = 1e-9);
}

#[test]
fn test_simple_strategy_with_decay_supply() {
    let config = SimulationConfig {
        umbilical: UmbilicalModel::decay(),
        ..Default::default()
    };
    let mut sim = DiveSimulation::new(config).expect("valid config");
    sim.change_diver_depth(Diver::One, 10.0, t(0));
    sim.set_realistic_profile(false, t(0));
    sim.set_mode(Mode::Auto, t(0));
    sim.start(t(0));
    sim.pump(t(1_000));

    // Site depth 20 m: 25 - 20 × 0.2
    assert_abs_diff_eq!(sim.state().gauge(Gauge::UmbilicalPressure), 21.0, epsilon = 1e-9);
    assert_abs_diff_eq!(sim.state().gauge(Gauge::Diver1Pressure), 16.0, epsilon = 1e-9);
    assert_abs_diff_eq!(sim.state().gauge(Gauge::Diver2Pressure), 21.0, epsilon = 1e-9);
    assert_eq!(sim.state().gauge(Gauge::Depth), 20.0);
}

#[test]
fn test_reset_simulation_restores_everything_but_mode() {
    let mut sim = running_session(SimulationConfig::default());
    pump_seconds(&mut sim, 1, 12);
    sim.trigger_leak(t(12_500));
    sim.set_realistic_profile(false, t(12_600));

    sim.reset_simulation(t(13_000));
    let state = sim.state();
    assert_eq!(state.mode(), Mode::Auto);
    assert!(!state.is_running());
    assert!(state.use_realistic_profile());
    assert!(state.alerts().is_empty());
    assert_eq!(state.alerts().pending_timers(), 0);
    assert!(state.history().is_empty());
    assert_eq!(state.session_start_time(), None);
    for gauge in Gauge::ALL {
        assert_eq!(state.gauge(gauge), gauge.initial(), "{gauge:?}");
    }
    assert!(!sim.scheduler().is_ticking());
}

#[test]
fn test_snapshot_wire_shape() {
    let mut sim = running_session(SimulationConfig::default());
    sim.pump(t(1_000));
    sim.trigger_leak(t(1_100));

    let json = serde_json::to_value(sim.snapshot(t(1_200))).expect("serializable");
    assert_eq!(json["mode"], "auto");
    assert_eq!(json["is_running"], true);
    assert_eq!(json["selected_cylinder"], "both");
    assert_eq!(json["elapsed_ms"], 1_200);
    assert_eq!(json["gauges"]["umbilical_pressure"], 5.0);
    assert_eq!(json["zones"]["umbilical_pressure"], "red");
    let kinds: Vec<_> = json["alerts"]
        .as_array()
        .expect("alert list")
        .iter()
        .map(|a| a["kind"].as_str().unwrap_or_default().to_owned())
        .collect();
    assert!(kinds.contains(&"critical".to_owned()));
    assert_eq!(json["history"]["depth"].as_array().map(Vec::len), Some(1));
}
