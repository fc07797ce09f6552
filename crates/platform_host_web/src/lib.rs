//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! - `storage::local_slot`: `window.localStorage` slot store
//! - `frame_port`: iframe `postMessage` delivery and the inbound `message` listener
//! - `busy`: wait cursor on `document.body`
//!
//! Every adapter degrades to a no-op on native targets so the runtime can be exercised headless.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Host service bundle assembly for the browser.
pub mod adapters;
pub mod busy;
pub mod frame_port;
pub mod storage;

pub use adapters::build_host_services;
pub use busy::WebBusyIndicator;
pub use frame_port::{frame_element_id, install_frame_listener, FrameListener, WebFramePort};
pub use storage::local_slot::WebSlotStore;
