//! Delivery of shell messages into content embedded in managed windows.

use std::{cell::RefCell, rc::Rc};

use desktop_app_contract::{HostMessage, WindowRuntimeId};

/// Host service that posts [`HostMessage`] values to the content of one window.
pub trait FramePort {
    /// Posts `message` to the embedded content of `window_id`.
    ///
    /// # Errors
    ///
    /// Returns an error when the window has no reachable embedded content.
    fn post(&self, window_id: WindowRuntimeId, message: &HostMessage) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Frame port that drops every message.
pub struct NoopFramePort;

impl FramePort for NoopFramePort {
    fn post(&self, _window_id: WindowRuntimeId, _message: &HostMessage) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
/// Frame port that records posted messages; clones share the log.
pub struct MemoryFramePort {
    posted: Rc<RefCell<Vec<(WindowRuntimeId, HostMessage)>>>,
}

impl MemoryFramePort {
    /// Returns every message posted so far, in post order.
    pub fn posted(&self) -> Vec<(WindowRuntimeId, HostMessage)> {
        self.posted.borrow().clone()
    }

    /// Returns the messages posted to one window.
    pub fn posted_to(&self, window_id: WindowRuntimeId) -> Vec<HostMessage> {
        self.posted
            .borrow()
            .iter()
            .filter(|(target, _)| *target == window_id)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl FramePort for MemoryFramePort {
    fn post(&self, window_id: WindowRuntimeId, message: &HostMessage) -> Result<(), String> {
        self.posted.borrow_mut().push((window_id, message.clone()));
        Ok(())
    }
}
