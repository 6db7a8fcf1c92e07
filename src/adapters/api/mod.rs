//! Snapshot REST adapter

pub mod client;
pub mod models;

pub use client::{HttpSnapshotClient, SnapshotSource};
pub use models::SnapshotRow;
