//! Contention tests for the concurrency contract
//!
//! Multiple panels and a renderer hammer one engine; the registries and
//! timeline must stay consistent throughout.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use loupe::engine::{Engine, EngineConfig};
use loupe::foundation::{Error, MonitoredUnit};

/// Inert unit for registration traffic.
struct Placeholder {
    name: String,
}

impl Placeholder {
    fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self { name: name.into() })
    }
}

impl MonitoredUnit for Placeholder {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_suspended(&self) -> bool {
        false
    }
}

// =============================================================================
// Capacity Races
// =============================================================================

#[test]
fn one_free_slot_admits_exactly_one_of_many_racers() {
    let engine = Arc::new(Engine::new(EngineConfig::new().with_max_units(4)));
    for i in 0..3 {
        engine.add_unit(Placeholder::new(format!("seed-{i}"))).unwrap();
    }

    let racers: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.add_unit(Placeholder::new(format!("racer-{i}"))))
        })
        .collect();

    let mut wins = 0;
    for racer in racers {
        match racer.join().unwrap() {
            Ok(_) => wins += 1,
            Err(err) => assert_eq!(err, Error::capacity_exceeded(4)),
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(engine.unit_count(), 4);
}

#[test]
fn concurrent_removal_of_one_unit_has_one_winner() {
    let engine = Arc::new(Engine::new(EngineConfig::default()));
    let (id, _sender) = engine.add_unit(Placeholder::new("contested")).unwrap();

    let racers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.remove_unit(id))
        })
        .collect();

    let mut wins = 0;
    for racer in racers {
        match racer.join().unwrap() {
            Ok(_) => wins += 1,
            Err(err) => assert_eq!(err, Error::stale_handle(id.handle())),
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(engine.unit_count(), 0);
}

// =============================================================================
// Renderer Under Load
// =============================================================================

#[test]
fn renderer_sees_consistent_snapshots_during_churn() {
    let engine = Arc::new(Engine::new(
        EngineConfig::new()
            .with_max_units(6)
            .with_base_period(Duration::from_millis(2))
            .with_timeline_capacity(40),
    ));
    engine.start();

    let done = Arc::new(AtomicBool::new(false));

    // Renderer: every snapshot it takes must be internally coherent even
    // though ticks, churn, and auto-resets continue underneath it
    let renderer = {
        let engine = Arc::clone(&engine);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            while !done.load(Ordering::Acquire) {
                let timeline = engine.timeline();
                assert!(timeline.len() <= timeline.capacity());
                let seqs: Vec<_> = timeline.iter().map(|tick| tick.seq).collect();
                for window in seqs.windows(2) {
                    assert_eq!(window[1], window[0] + 1, "gap in {seqs:?}");
                }
                thread::sleep(Duration::from_millis(1));
            }
        })
    };

    // Panel: register and remove units the whole time
    let panel = {
        let engine = Arc::clone(&engine);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut round = 0;
            while !done.load(Ordering::Acquire) {
                if let Ok((id, _)) = engine.add_unit(Placeholder::new(format!("churn-{round}"))) {
                    thread::sleep(Duration::from_millis(3));
                    let _ = engine.remove_unit(id);
                }
                round += 1;
            }
        })
    };

    thread::sleep(Duration::from_secs(3));
    done.store(true, Ordering::Release);
    renderer.join().unwrap();
    panel.join().unwrap();

    engine.stop();
}

// =============================================================================
// Reset Under Load
// =============================================================================

#[test]
fn hard_reset_is_atomic_for_readers() {
    let engine = Arc::new(Engine::new(
        EngineConfig::new().with_base_period(Duration::from_millis(2)),
    ));
    engine.start();

    let done = Arc::new(AtomicBool::new(false));
    let reader = {
        let engine = Arc::clone(&engine);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            while !done.load(Ordering::Acquire) {
                // Either the pre-reset run or the post-reset one, never a
                // splice: every snapshot starts at zero and has no gaps
                let timeline = engine.timeline();
                if let Some(first) = timeline.get(0) {
                    assert_eq!(first.seq, 0);
                }
                let seqs: Vec<_> = timeline.iter().map(|tick| tick.seq).collect();
                for window in seqs.windows(2) {
                    assert_eq!(window[1], window[0] + 1);
                }
            }
        })
    };

    let deadline = Instant::now() + Duration::from_secs(3);
    while Instant::now() < deadline {
        thread::sleep(Duration::from_millis(20));
        engine.restart();
    }
    done.store(true, Ordering::Release);
    reader.join().unwrap();
}
