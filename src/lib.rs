//! nbridge relays playback control between a native audio engine and the
//! desktop's media surfaces: an MPRIS session, a now-playing notification,
//! file and directory choosers, and the permission prompts guarding them.
//!
//! The engine sits behind the [`engine::Engine`] trait and the platform
//! behind [`host::Host`]; everything in between is plain channel plumbing
//! dispatched on one thread by [`runtime::run`].

pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod notify;
pub mod permissions;
pub mod picker;
pub mod poller;
pub mod relay;
pub mod runtime;
pub mod session;
pub mod state;
