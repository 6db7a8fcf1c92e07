//! Server-push stream adapter
//!
//! Everything needed to keep an authenticated SSE connection alive and turn
//! its events into store merges: wire decoding ([`decoder`]), event mapping
//! ([`event`]), the backoff schedule ([`backoff`]) and the reconnecting
//! client itself ([`client`]).

pub mod backoff;
pub mod client;
pub mod decoder;
pub mod event;

pub use backoff::ReconnectPolicy;
pub use client::{StreamClient, StreamState};
pub use decoder::{SseDecoder, SseFrame};
pub use event::{parse_event, StreamEvent};
