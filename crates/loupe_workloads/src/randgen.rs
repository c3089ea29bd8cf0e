//! An entity whose fields are rewritten by a background thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, AtomicI64, AtomicU32, AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use loupe_foundation::{FieldSample, SnapshotProvider};

/// How often the updater rewrites the record when none is configured.
pub const DEFAULT_UPDATE_PERIOD: Duration = Duration::from_millis(100);

/// Field mask selecting every field.
pub const KEY_ALL: u8 = 0b1111;

/// A four-field record of random numbers, rewritten periodically.
///
/// The record holds one `i32`, one `i64`, one `f32`, and one `f64`. A
/// `key` in `0..=15` selects which of the four appear in snapshots, one
/// bit per field in that order; any other key selects all four.
///
/// Captures and updates are deliberately unsynchronized at the record
/// level: each field is a separate atomic, the updater rewrites them one
/// at a time, and [`capture`](SnapshotProvider::capture) loads them one
/// at a time. A capture racing an update can therefore return a record
/// that mixes two update cycles. Observing such torn whole-record reads
/// on the timeline is the behavior this workload exists to demonstrate.
pub struct RandSource {
    label: String,
    key: u8,
    update_period: Duration,
    int_field: AtomicI32,
    long_field: AtomicI64,
    float_bits: AtomicU32,
    double_bits: AtomicU64,
    stopping: Mutex<bool>,
    wake: Condvar,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl RandSource {
    /// Creates a source showing the fields `key` selects.
    #[must_use]
    pub fn new(label: impl Into<String>, key: u8) -> Self {
        Self {
            label: label.into(),
            key: if key <= KEY_ALL { key } else { KEY_ALL },
            update_period: DEFAULT_UPDATE_PERIOD,
            int_field: AtomicI32::new(0),
            long_field: AtomicI64::new(0),
            float_bits: AtomicU32::new(0f32.to_bits()),
            double_bits: AtomicU64::new(0f64.to_bits()),
            stopping: Mutex::new(false),
            wake: Condvar::new(),
            worker: Mutex::new(None),
        }
    }

    /// Sets the interval between record rewrites.
    #[must_use]
    pub fn with_update_period(mut self, period: Duration) -> Self {
        self.update_period = period;
        self
    }

    /// Returns the field-selection key.
    #[must_use]
    pub const fn key(&self) -> u8 {
        self.key
    }

    /// Spawns the updater thread.
    ///
    /// # Panics
    /// Panics if called twice, or if the thread cannot be spawned.
    pub fn launch(self: &Arc<Self>) {
        let mut worker = self.worker.lock();
        assert!(worker.is_none(), "RandSource already launched");

        let source = Arc::clone(self);
        let handle = std::thread::Builder::new()
            .name(format!("rand-{}", self.label))
            .spawn(move || source.run())
            .expect("spawn rand source thread");
        *worker = Some(handle);
    }

    /// Asks the updater to exit.
    pub fn halt(&self) {
        *self.stopping.lock() = true;
        self.wake.notify_all();
    }

    /// Waits for the updater to exit. A no-op if never launched.
    pub fn join(&self) {
        if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }
    }

    fn run(&self) {
        log::info!("{}: updating every {:?}", self.label, self.update_period);
        loop {
            // One store per field, no record-level lock
            self.int_field.store(rand::random(), Ordering::Relaxed);
            self.long_field.store(rand::random(), Ordering::Relaxed);
            self.float_bits
                .store(rand::random::<f32>().to_bits(), Ordering::Relaxed);
            self.double_bits
                .store(rand::random::<f64>().to_bits(), Ordering::Relaxed);

            let mut stopping = self.stopping.lock();
            if *stopping {
                return;
            }
            let _ = self.wake.wait_for(&mut stopping, self.update_period);
            if *stopping {
                return;
            }
        }
    }
}

impl SnapshotProvider for RandSource {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn capture(&self) -> Vec<FieldSample> {
        let mut fields = Vec::new();
        if self.key & 0b0001 != 0 {
            fields.push(FieldSample::new(
                "int_field",
                "i32",
                self.int_field.load(Ordering::Relaxed).to_string(),
            ));
        }
        if self.key & 0b0010 != 0 {
            fields.push(FieldSample::new(
                "long_field",
                "i64",
                self.long_field.load(Ordering::Relaxed).to_string(),
            ));
        }
        if self.key & 0b0100 != 0 {
            fields.push(FieldSample::new(
                "float_field",
                "f32",
                f32::from_bits(self.float_bits.load(Ordering::Relaxed)).to_string(),
            ));
        }
        if self.key & 0b1000 != 0 {
            fields.push(FieldSample::new(
                "double_field",
                "f64",
                f64::from_bits(self.double_bits.load(Ordering::Relaxed)).to_string(),
            ));
        }
        fields
    }
}

impl Drop for RandSource {
    fn drop(&mut self) {
        if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }
    }
}
