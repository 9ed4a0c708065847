//! Local storage contracts and adapters.

pub mod local;
