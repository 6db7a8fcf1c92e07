//! Domain models and types for Pulsegrid.
//!
//! This module contains the core domain models and business rules of the
//! vitals engine: strongly-typed identifiers, the sample and window types,
//! patient records, and the error hierarchy.
//!
//! # Type Safety
//!
//! Pulsegrid uses the newtype pattern for identifiers to prevent mixing
//! plain strings with patient identity:
//!
//! ```rust
//! use pulsegrid::domain::PatientId;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let id = PatientId::new("PAC001")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, PulsegridError>`]:
//!
//! ```rust
//! use pulsegrid::domain::{PulsegridError, Result};
//!
//! fn example() -> Result<()> {
//!     let id = pulsegrid::domain::PatientId::new("PAC001")
//!         .map_err(PulsegridError::Validation)?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod patient;
pub mod result;
pub mod sample;
pub mod window;

// Re-export commonly used types for convenience
pub use errors::{PulsegridError, SnapshotError, StreamError};
pub use ids::PatientId;
pub use patient::{PatientRecord, PatientSeed};
pub use result::Result;
pub use sample::{Sample, VitalsUpdate};
pub use window::{VitalsWindow, DEFAULT_WINDOW_CAPACITY};
