//! A workload that alternates between busy counting and sleeping.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use loupe_foundation::MonitoredUnit;
use loupe_registry::MessageSender;

/// Spins per lap when none is configured.
pub const DEFAULT_SPINS: u64 = 100_000_000;

/// Sleep between laps when none is configured.
pub const DEFAULT_SLEEP: Duration = Duration::from_millis(2000);

/// Longest accepted sleep between laps; larger requests are brought down
/// to this.
pub const MAX_SLEEP: Duration = Duration::from_millis(30_000);

/// How often the counting loop checks for a stop request.
const HALT_CHECK_INTERVAL: u64 = 1 << 20;

/// A unit that counts to a target, reports the lap, sleeps, and repeats.
///
/// The point of this workload is the visible alternation: while counting
/// it reports awake, while sleeping it reports suspended, so successive
/// ticks on the timeline show the run-state flipping. Each completed lap
/// pushes one message through the engine; message output can be silenced
/// with [`with_messages`](Self::with_messages), and a lap budget set with
/// [`with_laps`](Self::with_laps) makes the worker exit on its own.
///
/// The worker thread is owned here, not by the engine: call
/// [`launch`](Self::launch) after registering, and [`halt`](Self::halt)
/// plus [`join`](Self::join) when done with it.
pub struct BusyCounter {
    name: String,
    spins_per_lap: u64,
    sleep: Duration,
    laps: u64,
    messages_enabled: bool,
    start_asleep: bool,
    asleep: AtomicBool,
    stopping: Mutex<bool>,
    wake: Condvar,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl BusyCounter {
    /// Creates a counter with the default spin target and sleep, running
    /// until halted and reporting every lap.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spins_per_lap: DEFAULT_SPINS,
            sleep: DEFAULT_SLEEP,
            laps: 0,
            messages_enabled: true,
            start_asleep: false,
            asleep: AtomicBool::new(false),
            stopping: Mutex::new(false),
            wake: Condvar::new(),
            worker: Mutex::new(None),
        }
    }

    /// Sets the spin target for one lap.
    #[must_use]
    pub fn with_spins_per_lap(mut self, spins: u64) -> Self {
        self.spins_per_lap = spins;
        self
    }

    /// Sets the lap budget. Zero means run until halted; otherwise the
    /// worker exits on its own after this many laps.
    #[must_use]
    pub fn with_laps(mut self, laps: u64) -> Self {
        self.laps = laps;
        self
    }

    /// Enables or disables message output. A silent counter still flips
    /// its run-state, so it stays visible on the timeline.
    #[must_use]
    pub fn with_messages(mut self, enabled: bool) -> Self {
        self.messages_enabled = enabled;
        self
    }

    /// Sets the sleep between laps, bounded by [`MAX_SLEEP`].
    #[must_use]
    pub fn with_sleep(mut self, sleep: Duration) -> Self {
        self.sleep = sleep.min(MAX_SLEEP);
        self
    }

    /// Makes the worker begin with its sleep phase instead of a lap.
    ///
    /// Handy for staggering several counters so they do not all flip
    /// state on the same tick.
    #[must_use]
    pub fn with_start_asleep(mut self, start_asleep: bool) -> Self {
        self.start_asleep = start_asleep;
        self
    }

    /// Spawns the worker thread. Messages about lap progress go through
    /// `sender`, so launch after registering with the engine.
    ///
    /// # Panics
    /// Panics if called twice, or if the thread cannot be spawned.
    pub fn launch(self: &Arc<Self>, sender: MessageSender) {
        let mut worker = self.worker.lock();
        assert!(worker.is_none(), "BusyCounter already launched");

        let counter = Arc::clone(self);
        let handle = std::thread::Builder::new()
            .name(format!("busy-{}", self.name))
            .spawn(move || counter.run(&sender))
            .expect("spawn busy counter thread");
        *worker = Some(handle);
    }

    /// Asks the worker to finish its current phase and exit.
    pub fn halt(&self) {
        *self.stopping.lock() = true;
        self.wake.notify_all();
    }

    /// Waits for the worker to exit. A no-op if never launched.
    pub fn join(&self) {
        if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }
    }

    fn run(&self, sender: &MessageSender) {
        log::info!("{}: running", self.name);
        self.say(sender, format!("{}: started", self.name));

        let mut lap: u64 = 0;
        let mut sleeping = self.start_asleep;
        loop {
            if sleeping {
                self.asleep.store(true, Ordering::Release);
                let mut stopping = self.stopping.lock();
                if !*stopping {
                    let _ = self.wake.wait_for(&mut stopping, self.sleep);
                }
                let stop = *stopping;
                drop(stopping);
                self.asleep.store(false, Ordering::Release);
                if stop {
                    break;
                }
            } else {
                if !self.spin() {
                    break;
                }
                lap += 1;
                self.say(sender, format!("{}: lap {lap} complete", self.name));
                if self.laps != 0 && lap >= self.laps {
                    break;
                }
            }
            sleeping = !sleeping;
        }

        self.say(sender, format!("{}: stopped after {lap} laps", self.name));
        log::info!("{}: stopped", self.name);
    }

    fn say(&self, sender: &MessageSender, line: String) {
        if self.messages_enabled {
            sender.push(line);
        }
    }

    /// One counting lap. Returns false if a stop request arrived mid-lap.
    fn spin(&self) -> bool {
        let mut n: u64 = 0;
        while n < self.spins_per_lap {
            n += 1;
            std::hint::black_box(n);
            if n % HALT_CHECK_INTERVAL == 0 && *self.stopping.lock() {
                return false;
            }
        }
        !*self.stopping.lock()
    }
}

impl MonitoredUnit for BusyCounter {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_suspended(&self) -> bool {
        self.asleep.load(Ordering::Acquire)
    }
}

impl Drop for BusyCounter {
    fn drop(&mut self) {
        // The worker holds an Arc to self, so by the time drop runs the
        // thread has already exited; take the handle to avoid leaking it
        if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }
    }
}
