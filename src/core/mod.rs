//! Core engine logic
//!
//! The functional heart of Pulsegrid: alert evaluation, synthetic sample
//! generation, the patient state store, and the session shell that drives
//! them. Nothing in here performs I/O except [`session`], which owns the
//! producer loops.

pub mod alert;
pub mod generator;
pub mod session;
pub mod store;

pub use session::MonitorSession;
pub use store::{PatientStore, StoreUpdate};
