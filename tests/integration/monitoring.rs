//! End-to-end monitoring runs
//!
//! Real workloads, a running clock, and assertions over the recorded
//! timeline, exercising every layer through the facade crate.

use std::sync::Arc;
use std::time::{Duration, Instant};

use loupe::engine::{Engine, EngineConfig};
use loupe::workloads::{BusyCounter, RandSource};

/// Longest any polling loop is allowed to run before the test fails.
const DEADLINE: Duration = Duration::from_secs(30);

fn fast_config() -> EngineConfig {
    EngineConfig::new().with_base_period(Duration::from_millis(10))
}

// =============================================================================
// Busy Counter
// =============================================================================

#[test]
fn busy_counter_laps_reach_the_timeline() {
    let engine = Engine::new(fast_config());
    let counter = Arc::new(
        BusyCounter::new("worker")
            .with_spins_per_lap(100_000)
            .with_sleep(Duration::from_millis(20)),
    );
    let (id, sender) = engine.add_unit(counter.clone()).unwrap();
    counter.launch(sender);
    engine.start();

    // Wait until some tick carries a completed-lap report
    let start = Instant::now();
    loop {
        let timeline = engine.timeline();
        let lap_seen = timeline.iter().any(|tick| {
            tick.unit(id).is_some_and(|unit| {
                unit.messages.iter().any(|m| m.contains("lap 1 complete"))
            })
        });
        if lap_seen {
            break;
        }
        assert!(start.elapsed() < DEADLINE, "no lap report recorded");
        std::thread::sleep(Duration::from_millis(5));
    }

    engine.stop();
    counter.halt();
    counter.join();
}

#[test]
fn sleep_phase_is_visible_as_a_suspended_sample() {
    let engine = Engine::new(EngineConfig::new().with_base_period(Duration::from_millis(5)));
    let counter = Arc::new(
        BusyCounter::new("napper")
            .with_spins_per_lap(30_000_000)
            .with_sleep(Duration::from_millis(200)),
    );
    let (id, sender) = engine.add_unit(counter.clone()).unwrap();
    counter.launch(sender);
    engine.start();

    // Both phases span several 5ms ticks: a 30M-spin lap takes tens of
    // milliseconds, so samples catch the counter awake during it, and the
    // 200ms sleep is sampled as suspended
    let start = Instant::now();
    let (mut saw_awake, mut saw_asleep) = (false, false);
    while !(saw_awake && saw_asleep) {
        let timeline = engine.timeline();
        for tick in timeline.iter() {
            if let Some(unit) = tick.unit(id) {
                if unit.awake {
                    saw_awake = true;
                } else {
                    saw_asleep = true;
                }
            }
        }
        assert!(start.elapsed() < DEADLINE, "never saw both run-states");
        std::thread::sleep(Duration::from_millis(5));
    }

    engine.stop();
    counter.halt();
    counter.join();
}

// =============================================================================
// Random Record
// =============================================================================

#[test]
fn rand_source_snapshots_respect_the_field_key() {
    let engine = Engine::new(fast_config());
    let record = Arc::new(
        RandSource::new("record", 0b0011).with_update_period(Duration::from_millis(5)),
    );
    let id = engine.add_entity(record.clone()).unwrap();
    record.launch();
    engine.start();

    let start = Instant::now();
    loop {
        let timeline = engine.timeline();
        if let Some(tick) = timeline.latest() {
            let entity = tick.entity(id).unwrap();
            let names: Vec<_> = entity.fields.iter().map(|f| f.name.as_str()).collect();
            assert_eq!(names, vec!["int_field", "long_field"]);
            break;
        }
        assert!(start.elapsed() < DEADLINE, "no tick recorded");
        std::thread::sleep(Duration::from_millis(5));
    }

    engine.stop();
    record.halt();
    record.join();
}

#[test]
fn rand_source_values_change_between_ticks() {
    let engine = Engine::new(fast_config());
    let record = Arc::new(
        RandSource::new("record", 0b1111).with_update_period(Duration::from_millis(5)),
    );
    let id = engine.add_entity(record.clone()).unwrap();
    record.launch();
    engine.start();

    // Two ticks 100ms apart straddle many 5ms update cycles; some field
    // must differ between them
    let start = Instant::now();
    loop {
        let timeline = engine.timeline();
        if timeline.len() >= 12 {
            let early = timeline.get(0).unwrap().entity(id).unwrap().fields.clone();
            let late = timeline.latest().unwrap().entity(id).unwrap().fields.clone();
            assert!(
                early
                    .iter()
                    .zip(&late)
                    .any(|(a, b)| a.value != b.value),
                "field values never changed across the run"
            );
            break;
        }
        assert!(start.elapsed() < DEADLINE, "too few ticks recorded");
        std::thread::sleep(Duration::from_millis(5));
    }

    engine.stop();
    record.halt();
    record.join();
}

// =============================================================================
// Mixed Run
// =============================================================================

#[test]
fn mixed_workloads_share_one_timeline() {
    let engine = Engine::new(fast_config());

    let counter = Arc::new(
        BusyCounter::new("worker")
            .with_spins_per_lap(100_000)
            .with_sleep(Duration::from_millis(20)),
    );
    let record = Arc::new(
        RandSource::new("record", 0b1111).with_update_period(Duration::from_millis(10)),
    );

    let (unit_id, sender) = engine.add_unit(counter.clone()).unwrap();
    let entity_id = engine.add_entity(record.clone()).unwrap();
    counter.launch(sender);
    record.launch();
    engine.start();

    let start = Instant::now();
    loop {
        let timeline = engine.timeline();
        if timeline.len() >= 5 {
            for tick in timeline.iter() {
                assert!(tick.unit(unit_id).is_some());
                assert_eq!(tick.entity(entity_id).unwrap().fields.len(), 4);
            }
            break;
        }
        assert!(start.elapsed() < DEADLINE, "too few ticks recorded");
        std::thread::sleep(Duration::from_millis(5));
    }

    engine.stop();
    counter.halt();
    counter.join();
    record.halt();
    record.join();
}
