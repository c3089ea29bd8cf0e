//! Headless demonstration run: two counters and a random record,
//! sampled for a few seconds, timeline printed to stdout.
//!
//! Run with `RUST_LOG=debug` to watch the engine's own logging.

use std::sync::Arc;
use std::time::Duration;

use loupe_engine::{Engine, EngineConfig};
use loupe_workloads::{BusyCounter, RandSource};

fn main() {
    env_logger::init();

    let engine = Engine::new(
        EngineConfig::new()
            .with_base_period(Duration::from_millis(500))
            .with_timeline_capacity(50),
    );

    let steady = Arc::new(
        BusyCounter::new("steady")
            .with_spins_per_lap(50_000_000)
            .with_sleep(Duration::from_millis(800)),
    );
    let napper = Arc::new(
        BusyCounter::new("napper")
            .with_spins_per_lap(50_000_000)
            .with_sleep(Duration::from_millis(800))
            .with_start_asleep(true),
    );
    let record = Arc::new(RandSource::new("record", 0b1111));

    for counter in [&steady, &napper] {
        let (_, sender) = engine.add_unit(counter.clone()).expect("register counter");
        counter.launch(sender);
    }
    engine
        .add_entity(record.clone())
        .expect("register record");
    record.launch();

    engine.start();
    std::thread::sleep(Duration::from_secs(5));
    engine.stop();

    let timeline = engine.timeline();
    println!("captured {} ticks:", timeline.len());
    for tick in timeline.iter() {
        println!("tick {}", tick.seq);
        for unit in &tick.units {
            let state = if unit.awake { "awake" } else { "asleep" };
            println!("  {} [{state}]", unit.name);
            for message in &unit.messages {
                println!("    > {message}");
            }
        }
        for entity in &tick.entities {
            println!("  {}", entity.label);
            for field in &entity.fields {
                println!("    {field}");
            }
        }
    }

    for counter in [&steady, &napper] {
        counter.halt();
        counter.join();
    }
    record.halt();
    record.join();
}
