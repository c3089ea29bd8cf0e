//! The orchestrating engine.
//!
//! [`Engine`] wires the registries, the message drains, the clock, and the
//! timeline together, and is the single object external code drives: the
//! control panel calls its lifecycle and registration methods, workloads
//! write through the message senders it hands out, and the renderer polls
//! [`Engine::timeline`].
//!
//! # Locking discipline
//!
//! Three locks, always taken in this order: clock, registries, timeline.
//! The background thread holds the clock lock for the whole of one
//! sampling step (and releases it while waiting out the tick period), so
//! a lifecycle call observed by the thread is observed *between* steps:
//! stop and hard-reset take effect before the next tick fires, never in
//! the middle of one. Registration calls take only the registries lock
//! and never wait on sampling. Every critical section is bounded; no
//! public operation blocks its caller indefinitely.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use parking_lot::{Condvar, Mutex, RwLock};

use loupe_foundation::{EntityId, MonitoredUnit, Result, SnapshotProvider, UnitId};
use loupe_registry::{MessageDrain, MessageSender, Registry};

use crate::clock::{Clock, ClockState};
use crate::config::EngineConfig;
use crate::tick::{EntitySample, Tick, UnitSample};
use crate::timeline::Timeline;

/// One registered unit: the capability surface plus its message queue.
struct UnitEntry {
    /// The monitored unit itself.
    unit: Arc<dyn MonitoredUnit>,
    /// Consuming side of the unit's message channel. Dropped with the
    /// entry, which disconnects any senders still held by the workload.
    drain: MessageDrain,
}

/// One registered entity: its snapshot provider.
struct EntityEntry {
    /// Captures the entity's fields once per tick.
    provider: Arc<dyn SnapshotProvider>,
}

/// Both registries, guarded by one lock so a tick never mixes pre- and
/// post-mutation views of them.
struct Registries {
    /// Monitored units in insertion order.
    units: Registry<UnitEntry>,
    /// Monitored entities in insertion order.
    entities: Registry<EntityEntry>,
}

/// State shared between the engine facade and its clock thread.
struct Inner {
    /// Immutable configuration.
    config: EngineConfig,
    /// The lifecycle state machine.
    clock: Mutex<Clock>,
    /// Wakes the clock thread on lifecycle and speed changes.
    wake: Condvar,
    /// The unit and entity registries.
    registries: Mutex<Registries>,
    /// The recorded timeline.
    timeline: RwLock<Timeline>,
    /// Set once, on engine drop.
    shutdown: AtomicBool,
}

/// The sampling and timeline-recording engine.
///
/// Owns a background clock thread for the lifetime of the engine; the
/// thread is joined on drop. All methods are safe to call from any thread
/// at any time, including while sampling is in progress.
pub struct Engine {
    inner: Arc<Inner>,
    clock_thread: Option<JoinHandle<()>>,
}

impl Engine {
    /// Creates an engine and spawns its clock thread.
    ///
    /// Capacities in `config` are fixed for the engine's lifetime; speed
    /// and auto-reset stay adjustable.
    ///
    /// # Panics
    /// Panics if the clock thread cannot be spawned.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let inner = Arc::new(Inner {
            clock: Mutex::new(Clock::new(&config)),
            wake: Condvar::new(),
            registries: Mutex::new(Registries {
                units: Registry::new(config.max_units),
                entities: Registry::new(config.max_entities),
            }),
            timeline: RwLock::new(Timeline::new(config.timeline_capacity)),
            shutdown: AtomicBool::new(false),
            config,
        });

        let thread_inner = Arc::clone(&inner);
        let clock_thread = std::thread::Builder::new()
            .name("loupe-clock".to_string())
            .spawn(move || run_clock(&thread_inner))
            .expect("spawn clock thread");

        Self {
            inner,
            clock_thread: Some(clock_thread),
        }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Registers a unit for monitoring.
    ///
    /// Returns the unit's handle and the sender its workload writes
    /// messages through. Once the unit is removed the sender disconnects
    /// and further pushes are discarded.
    ///
    /// # Errors
    /// Returns [`CapacityExceeded`](loupe_foundation::Error::CapacityExceeded)
    /// if the unit registry is full.
    pub fn add_unit(&self, unit: Arc<dyn MonitoredUnit>) -> Result<(UnitId, MessageSender)> {
        let drain = MessageDrain::new(self.inner.config.message_capacity);
        let sender = drain.sender();

        let mut registries = self.inner.registries.lock();
        let handle = registries.units.add(UnitEntry { unit, drain })?;
        log::debug!("unit {handle} registered");
        Ok((UnitId(handle), sender))
    }

    /// Removes a unit, returning it so the caller can release the
    /// underlying workload. The core only stops sampling the unit; it
    /// never terminates the workload itself.
    ///
    /// # Errors
    /// Returns [`StaleHandle`](loupe_foundation::Error::StaleHandle) if
    /// the unit was already removed.
    pub fn remove_unit(&self, id: UnitId) -> Result<Arc<dyn MonitoredUnit>> {
        let mut registries = self.inner.registries.lock();
        let entry = registries.units.remove(id.handle())?;
        log::debug!("unit {} removed", id.handle());
        Ok(entry.unit)
    }

    /// Removes the unit at an ordered-view position.
    ///
    /// # Errors
    /// Returns [`IndexOutOfRange`](loupe_foundation::Error::IndexOutOfRange)
    /// if `position` is not a live position.
    pub fn remove_unit_at(&self, position: usize) -> Result<Arc<dyn MonitoredUnit>> {
        let mut registries = self.inner.registries.lock();
        let (handle, entry) = registries.units.remove_at(position)?;
        log::debug!("unit {handle} removed (position {position})");
        Ok(entry.unit)
    }

    /// Removes every unit, returning them in registration order.
    pub fn remove_all_units(&self) -> Vec<Arc<dyn MonitoredUnit>> {
        let mut registries = self.inner.registries.lock();
        let removed = registries.units.remove_all();
        log::debug!("all {} units removed", removed.len());
        removed.into_iter().map(|entry| entry.unit).collect()
    }

    /// Registers an entity for field snapshotting.
    ///
    /// # Errors
    /// Returns [`CapacityExceeded`](loupe_foundation::Error::CapacityExceeded)
    /// if the entity registry is full.
    pub fn add_entity(&self, provider: Arc<dyn SnapshotProvider>) -> Result<EntityId> {
        let mut registries = self.inner.registries.lock();
        let handle = registries.entities.add(EntityEntry { provider })?;
        log::debug!("entity {handle} registered");
        Ok(EntityId(handle))
    }

    /// Removes an entity, returning its provider.
    ///
    /// # Errors
    /// Returns [`StaleHandle`](loupe_foundation::Error::StaleHandle) if
    /// the entity was already removed.
    pub fn remove_entity(&self, id: EntityId) -> Result<Arc<dyn SnapshotProvider>> {
        let mut registries = self.inner.registries.lock();
        let entry = registries.entities.remove(id.handle())?;
        log::debug!("entity {} removed", id.handle());
        Ok(entry.provider)
    }

    /// Removes the entity at an ordered-view position.
    ///
    /// # Errors
    /// Returns [`IndexOutOfRange`](loupe_foundation::Error::IndexOutOfRange)
    /// if `position` is not a live position.
    pub fn remove_entity_at(&self, position: usize) -> Result<Arc<dyn SnapshotProvider>> {
        let mut registries = self.inner.registries.lock();
        let (handle, entry) = registries.entities.remove_at(position)?;
        log::debug!("entity {handle} removed (position {position})");
        Ok(entry.provider)
    }

    /// Removes every entity, returning the providers in registration
    /// order.
    pub fn remove_all_entities(&self) -> Vec<Arc<dyn SnapshotProvider>> {
        let mut registries = self.inner.registries.lock();
        let removed = registries.entities.remove_all();
        log::debug!("all {} entities removed", removed.len());
        removed.into_iter().map(|entry| entry.provider).collect()
    }

    /// Returns the live units as `(id, name)` in insertion order.
    #[must_use]
    pub fn units(&self) -> Vec<(UnitId, String)> {
        let registries = self.inner.registries.lock();
        registries
            .units
            .iter()
            .map(|(handle, entry)| (UnitId(handle), entry.unit.name().to_string()))
            .collect()
    }

    /// Returns the live entities as `(id, label)` in insertion order.
    #[must_use]
    pub fn entities(&self) -> Vec<(EntityId, String)> {
        let registries = self.inner.registries.lock();
        registries
            .entities
            .iter()
            .map(|(handle, entry)| (EntityId(handle), entry.provider.label()))
            .collect()
    }

    /// Returns the number of live units.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.inner.registries.lock().units.len()
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.inner.registries.lock().entities.len()
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Starts or resumes sampling. A no-op while already running.
    pub fn start(&self) {
        let mut clock = self.inner.clock.lock();
        if clock.start() {
            self.inner.wake.notify_all();
        }
    }

    /// Pauses sampling. A no-op while idle.
    pub fn stop(&self) {
        let mut clock = self.inner.clock.lock();
        clock.stop();
    }

    /// Discards the timeline, clears the elapsed tick count, and returns
    /// the clock to idle. Atomic with respect to readers: a concurrent
    /// [`timeline`](Self::timeline) call sees the timeline before or
    /// after the reset, never a mixture.
    pub fn hard_reset(&self) {
        let mut clock = self.inner.clock.lock();
        clock.hard_reset();
        self.inner.timeline.write().clear();
    }

    /// Hard reset immediately followed by start.
    pub fn restart(&self) {
        let mut clock = self.inner.clock.lock();
        clock.hard_reset();
        self.inner.timeline.write().clear();
        clock.start();
        self.inner.wake.notify_all();
    }

    /// Sets the sampling speed; takes effect from the next tick.
    ///
    /// # Errors
    /// Returns [`InvalidSpeed`](loupe_foundation::Error::InvalidSpeed) if
    /// `speed` is outside the configured range; the prior speed is
    /// retained.
    pub fn set_speed(&self, speed: u32) -> Result<()> {
        let mut clock = self.inner.clock.lock();
        clock.set_speed(speed)?;
        self.inner.wake.notify_all();
        Ok(())
    }

    /// Returns the current sampling speed.
    #[must_use]
    pub fn speed(&self) -> u32 {
        self.inner.clock.lock().speed()
    }

    /// Sets whether the timeline starts over automatically at capacity.
    pub fn set_auto_reset(&self, enabled: bool) {
        self.inner.clock.lock().set_auto_reset(enabled);
    }

    /// Returns the auto-reset flag.
    #[must_use]
    pub fn auto_reset(&self) -> bool {
        self.inner.clock.lock().auto_reset()
    }

    /// Returns the clock's lifecycle state.
    #[must_use]
    pub fn clock_state(&self) -> ClockState {
        self.inner.clock.lock().state()
    }

    /// Returns the number of ticks taken since the last hard reset.
    #[must_use]
    pub fn elapsed_ticks(&self) -> u64 {
        self.inner.clock.lock().elapsed_ticks()
    }

    // -------------------------------------------------------------------------
    // Renderer surface
    // -------------------------------------------------------------------------

    /// Returns a read-only snapshot of the accumulated timeline.
    ///
    /// O(1): the returned value shares structure with the live timeline
    /// but is unaffected by ticks appended or resets performed after this
    /// call.
    #[must_use]
    pub fn timeline(&self) -> Timeline {
        self.inner.timeline.read().clone()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.inner.shutdown.store(true, Ordering::Release);
        self.inner.wake.notify_all();
        if let Some(thread) = self.clock_thread.take() {
            let _ = thread.join();
        }
    }
}

/// Body of the clock thread.
///
/// Holds the clock lock except while waiting, so one sampling step is a
/// single critical section: lifecycle calls land between steps.
fn run_clock(inner: &Inner) {
    let mut clock = inner.clock.lock();
    loop {
        if inner.shutdown.load(Ordering::Acquire) {
            return;
        }

        if clock.state() != ClockState::Running {
            inner.wake.wait(&mut clock);
            continue;
        }

        let period = clock.tick_period();
        let timed_out = inner.wake.wait_for(&mut clock, period).timed_out();
        if !timed_out {
            // Lifecycle or speed change: re-evaluate before sampling
            continue;
        }
        if inner.shutdown.load(Ordering::Acquire) {
            return;
        }
        if clock.state() != ClockState::Running {
            continue;
        }

        if inner.timeline.read().is_full() {
            if clock.auto_reset() {
                // Start the loop over without ever pausing sampling
                clock.rewind();
                inner.timeline.write().clear();
                log::debug!("timeline reached capacity: automatic restart");
            } else {
                // Running is retained, but nothing further is appended
                // until an explicit reset
                continue;
            }
        }

        let seq = clock.next_seq();
        let tick = sample(inner, seq);
        log::trace!(
            "tick {seq}: {} units, {} entities, {} messages",
            tick.units.len(),
            tick.entities.len(),
            tick.message_count()
        );
        inner.timeline.write().push(tick);
    }
}

/// Takes one consistent sample of both registries.
///
/// The registries lock is held across the whole assembly, so the tick
/// reflects their contents at a single instant: a racing add or remove
/// lands entirely before or entirely after this tick.
fn sample(inner: &Inner, seq: u64) -> Tick {
    let registries = inner.registries.lock();

    let units = registries
        .units
        .iter()
        .map(|(handle, entry)| UnitSample {
            id: UnitId(handle),
            name: entry.unit.name().to_string(),
            awake: !entry.unit.is_suspended(),
            messages: entry.drain.drain(),
        })
        .collect();

    let entities = registries
        .entities
        .iter()
        .map(|(handle, entry)| EntitySample {
            id: EntityId(handle),
            label: entry.provider.label(),
            fields: entry.provider.capture(),
        })
        .collect();

    Tick::new(seq, units, entities)
}
