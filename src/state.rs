//! Relay state types: the playback mirror and its session context.
//!
//! The engine is the authoritative source of playback state; everything in
//! here is a mirror kept in step by the relay so OS surfaces can be updated
//! without waiting for an engine round-trip.

mod model;

pub use model::*;
