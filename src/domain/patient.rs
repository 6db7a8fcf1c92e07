//! Patient record and snapshot seed types

use crate::domain::ids::PatientId;
use crate::domain::sample::Sample;
use crate::domain::window::VitalsWindow;
use serde::Serialize;

/// Per-patient monitoring state
///
/// Holds the identity, the bounded sample window, and the derived alert
/// flag. Records are handed to consumers as clones; the store is the only
/// component that mutates them, so a returned record is an immutable
/// snapshot of the state at merge time.
#[derive(Debug, Clone, Serialize)]
pub struct PatientRecord {
    id: PatientId,

    /// Display name; masking for non-privileged viewers is a presentation
    /// concern and happens outside the engine
    pub display_name: Option<String>,

    /// Patient age in years
    pub age: Option<u8>,

    window: VitalsWindow,

    /// Threshold breach on the latest sample
    pub alert: bool,
}

impl PatientRecord {
    /// Creates an empty record for a newly observed patient
    pub fn new(id: PatientId, window_capacity: usize) -> Self {
        Self {
            id,
            display_name: None,
            age: None,
            window: VitalsWindow::with_capacity(window_capacity),
            alert: false,
        }
    }

    /// Patient identifier
    pub fn id(&self) -> &PatientId {
        &self.id
    }

    /// The bounded sample window, oldest-first
    pub fn window(&self) -> &VitalsWindow {
        &self.window
    }

    /// The most recently appended sample
    pub fn latest(&self) -> Option<&Sample> {
        self.window.latest()
    }

    pub(crate) fn window_mut(&mut self) -> &mut VitalsWindow {
        &mut self.window
    }
}

/// Authoritative initial state for one patient
///
/// Produced by the snapshot endpoint at session start, or synthesized by the
/// demo feed. `history` is applied oldest-first; entries beyond the window
/// capacity are evicted like any other append.
#[derive(Debug, Clone)]
pub struct PatientSeed {
    /// Patient identifier
    pub id: PatientId,

    /// Display name as delivered by the collaborator
    pub display_name: Option<String>,

    /// Patient age in years
    pub age: Option<u8>,

    /// Initial samples, oldest-first
    pub history: Vec<Sample>,
}
