//! Result type alias for Pulsegrid operations

use crate::domain::errors::PulsegridError;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, PulsegridError>;
