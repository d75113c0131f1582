//! Deterministic in-memory stand-ins for the viewport pair and its host
//! event loop, for driving the synchronizer without a browser or rendering
//! toolkit.

pub mod script;
pub mod viewport;
