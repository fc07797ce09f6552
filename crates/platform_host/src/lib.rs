//! Typed host-domain contracts used by the desktop shell runtime.
//!
//! This crate is the API-first boundary for platform services: the persisted state slot, the
//! port that delivers messages into embedded window content, and the global busy indicator.
//! Concrete browser adapters live in `platform_host_web`; the in-memory and no-op adapters here
//! back tests and headless hosts.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod busy;
pub mod frame;
pub mod host;
pub mod storage;

pub use busy::{BusyIndicator, MemoryBusyIndicator, NoopBusyIndicator};
pub use frame::{FramePort, MemoryFramePort, NoopFramePort};
pub use host::{HostServices, HostStrategy};
pub use storage::slot::{
    load_slot_with, save_slot_with, MemorySlotStore, NoopSlotStore, StateSlotStore, StorageError,
};
