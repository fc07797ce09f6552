//! Persisted storage contracts.

pub mod slot;
