//! Domain identifier types with validation
//!
//! Newtype wrapper for patient identifiers. Keeping the identifier a distinct
//! type prevents mixing it up with display names or other plain strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Patient identifier newtype wrapper
///
/// A stable, immutable identifier for a monitored patient, e.g. `PAC001`.
/// Records are keyed by this identifier for the lifetime of a session.
///
/// # Examples
///
/// ```
/// use pulsegrid::domain::ids::PatientId;
/// use std::str::FromStr;
///
/// let id = PatientId::from_str("PAC001").unwrap();
/// assert_eq!(id.as_str(), "PAC001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new PatientId from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is empty or whitespace-only
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Patient ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the patient ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
