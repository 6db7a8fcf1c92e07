//! Patient state store and merger
//!
//! The single mutation authority for patient state. Every accepted sample,
//! whether generated locally or delivered by the stream, passes through
//! [`PatientStore::merge_sample`]: validation first, then merge onto the
//! prior latest sample, window append with eviction, alert recomputation,
//! and one change notification.
//!
//! All mutations go through one internal lock, so concurrent producers
//! (generator tick task, stream task) are serialized into a single total
//! order per patient. Critical sections only touch in-memory state; no I/O
//! or await happens under the lock.

use crate::core::alert;
use crate::domain::{
    PatientId, PatientRecord, PatientSeed, PulsegridError, Result, VitalsUpdate, VitalsWindow,
    DEFAULT_WINDOW_CAPACITY,
};
use chrono::Utc;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::broadcast;

/// Buffered change notifications per subscriber before lagging starts
/// dropping the oldest; consumers only need the latest state anyway.
const UPDATE_CHANNEL_CAPACITY: usize = 256;

/// Change notification fired once per successful merge
#[derive(Debug, Clone)]
pub struct StoreUpdate {
    /// Patient whose record changed
    pub patient_id: PatientId,
    /// Alert flag after the merge
    pub alert: bool,
    /// Timestamp of the appended sample, epoch milliseconds
    pub timestamp_ms: i64,
}

struct StoreInner {
    records: HashMap<PatientId, PatientRecord>,
    /// First-observed order, kept stable for display iteration
    order: Vec<PatientId>,
}

/// Owned, lifetime-scoped patient state store
///
/// Created by the session, shared with producers via `Arc`, dropped at
/// teardown. Consumers read immutable record clones and subscribe to change
/// notifications; they never hold references into the store.
pub struct PatientStore {
    window_capacity: usize,
    inner: Mutex<StoreInner>,
    updates: broadcast::Sender<StoreUpdate>,
}

impl PatientStore {
    /// Creates an empty store with the given per-patient window capacity
    pub fn new(window_capacity: usize) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            window_capacity: window_capacity.max(1),
            inner: Mutex::new(StoreInner {
                records: HashMap::new(),
                order: Vec::new(),
            }),
            updates,
        }
    }

    /// Applies one partial update and returns the updated record snapshot
    ///
    /// Looks up or lazily creates the patient record, materializes the merged
    /// sample (present fields override, the rest inherit from the prior
    /// latest), appends it to the window, recomputes the alert flag, and
    /// fires one [`StoreUpdate`].
    ///
    /// # Errors
    ///
    /// Returns [`PulsegridError::Validation`] for out-of-range data; the
    /// store is left untouched in that case.
    pub fn merge_sample(&self, update: VitalsUpdate) -> Result<PatientRecord> {
        update.validate()?;
        let now_ms = Utc::now().timestamp_millis();

        let snapshot = {
            let mut inner = self.inner.lock().expect("patient store lock poisoned");
            let StoreInner { records, order } = &mut *inner;
            let record = match records.entry(update.patient_id.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    order.push(update.patient_id.clone());
                    entry.insert(PatientRecord::new(
                        update.patient_id.clone(),
                        self.window_capacity,
                    ))
                }
            };

            let merged = update.merged_onto(record.latest(), now_ms);
            record.window_mut().push(merged);
            record.alert = alert::evaluate(&merged);
            record.clone()
        };

        tracing::trace!(
            patient_id = %snapshot.id(),
            alert = snapshot.alert,
            window_len = snapshot.window().len(),
            "Merged sample"
        );

        // Nobody listening is fine; notification delivery is best-effort
        let _ = self.updates.send(StoreUpdate {
            patient_id: snapshot.id().clone(),
            alert: snapshot.alert,
            timestamp_ms: snapshot.latest().map_or(now_ms, |s| s.timestamp_ms),
        });

        Ok(snapshot)
    }

    /// Bulk-initializes the store from an authoritative snapshot
    ///
    /// Each seed replaces any existing record for the same patient rather
    /// than merging, since the snapshot is authoritative. First-observed
    /// iteration order is preserved for patients already known; new patients
    /// are appended in seed order. No per-record notifications are fired.
    pub fn merge_snapshot(&self, seeds: Vec<PatientSeed>) {
        let count = seeds.len();
        let mut inner = self.inner.lock().expect("patient store lock poisoned");
        for seed in seeds {
            let mut record = PatientRecord::new(seed.id.clone(), self.window_capacity);
            record.display_name = seed.display_name;
            record.age = seed.age;
            let mut window = VitalsWindow::with_capacity(self.window_capacity);
            for sample in &seed.history {
                window.push(*sample);
            }
            record.alert = window.latest().map_or(false, alert::evaluate);
            *record.window_mut() = window;

            if !inner.records.contains_key(&seed.id) {
                inner.order.push(seed.id.clone());
            }
            inner.records.insert(seed.id, record);
        }
        tracing::info!(patients = count, "Store initialized from snapshot");
    }

    /// Returns an immutable snapshot of one patient's record
    ///
    /// # Errors
    ///
    /// Returns [`PulsegridError::NotFound`] for an unknown identifier.
    pub fn get_patient(&self, id: &PatientId) -> Result<PatientRecord> {
        let inner = self.inner.lock().expect("patient store lock poisoned");
        inner
            .records
            .get(id)
            .cloned()
            .ok_or_else(|| PulsegridError::NotFound(id.to_string()))
    }

    /// Lists all records in first-observed order
    pub fn list_patients(&self) -> Vec<PatientRecord> {
        let inner = self.inner.lock().expect("patient store lock poisoned");
        inner
            .order
            .iter()
            .filter_map(|id| inner.records.get(id).cloned())
            .collect()
    }

    /// Subscribes to change notifications, one per successful merge
    pub fn subscribe(&self) -> broadcast::Receiver<StoreUpdate> {
        self.updates.subscribe()
    }

    /// Number of patients currently tracked
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .expect("patient store lock poisoned")
            .records
            .len()
    }

    /// True if no patient has been observed yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PatientStore {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }
}
