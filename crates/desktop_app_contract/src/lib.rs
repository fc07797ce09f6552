//! Shared contract types between the desktop shell runtime and content embedded in its windows.
//!
//! The shell and embedded mini-apps talk over two typed surfaces:
//! - [`frame`]: the cross-boundary message protocol (one handshake per load, arbitrary window
//!   commands afterwards) and the channel/capability types that carry it.
//! - [`dialog`]: the message box taxonomy (button sets, icons, results) that apps use when they
//!   ask the shell for a user decision.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod dialog;
pub mod frame;

pub use dialog::{
    ButtonSpec, FontSelection, MessageBoxIcon, MessageBoxResponse, MessageBoxResult,
    MessageBoxType,
};
pub use frame::{
    frame_channel, frame_element_id, ChannelError, FrameMessage, FrameReceiver, FrameSender, HostMessage,
    WindowContext, WindowRuntimeId,
};
