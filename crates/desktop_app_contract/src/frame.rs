//! Cross-boundary protocol between the shell and content embedded in managed windows.
//!
//! The wire shape mirrors what embedded documents exchange with their host page:
//! `{type: "window-info", windowId, appName}` flows host → frame once per successful load, and
//! `{type: "window-command", windowId, command, data}` flows frame → host any number of times.

use futures::channel::mpsc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Stable identifier for a runtime-managed window.
pub type WindowRuntimeId = u64;

/// DOM id of the iframe that hosts the content of `window_id`.
pub fn frame_element_id(window_id: WindowRuntimeId) -> String {
    format!("win-{window_id}-frame")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
/// Messages posted by the shell into embedded window content.
pub enum HostMessage {
    /// Handshake sent once after the embedded content finished loading.
    #[serde(rename_all = "camelCase")]
    WindowInfo {
        /// Window hosting the content.
        window_id: WindowRuntimeId,
        /// Normalized application identity of the window.
        app_name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
/// Messages posted by embedded content to the shell.
pub enum FrameMessage {
    /// Command addressed to the window that hosts the sender.
    #[serde(rename_all = "camelCase")]
    WindowCommand {
        /// Window the command originates from.
        window_id: WindowRuntimeId,
        /// Free-form command name.
        command: String,
        /// Command payload.
        #[serde(default)]
        data: Value,
    },
}

impl FrameMessage {
    /// Creates a window command message.
    pub fn window_command(
        window_id: WindowRuntimeId,
        command: impl Into<String>,
        data: Value,
    ) -> Self {
        Self::WindowCommand {
            window_id,
            command: command.into(),
            data,
        }
    }

    /// Decodes an untyped inbound payload.
    ///
    /// Anything that is not a well-formed window command (other `type` tags, missing fields,
    /// non-object payloads) yields `None`; foreign traffic on the same channel is expected.
    pub fn from_json(raw: &Value) -> Option<Self> {
        serde_json::from_value(raw.clone()).ok()
    }

    /// Returns the window the message originates from.
    pub fn window_id(&self) -> WindowRuntimeId {
        match self {
            Self::WindowCommand { window_id, .. } => *window_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
/// Errors reported by the typed frame channel.
pub enum ChannelError {
    /// The shell side of the channel has been dropped.
    #[error("frame channel closed")]
    Closed,
}

/// Creates the typed channel that carries [`FrameMessage`] values into the shell.
pub fn frame_channel() -> (FrameSender, FrameReceiver) {
    let (tx, rx) = mpsc::unbounded();
    (FrameSender { inner: tx }, FrameReceiver { inner: rx })
}

#[derive(Debug, Clone)]
/// Sending half of the frame channel, cloned into every window capability.
pub struct FrameSender {
    inner: mpsc::UnboundedSender<FrameMessage>,
}

impl FrameSender {
    /// Queues a message for the shell.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Closed`] once the shell dropped its receiver.
    pub fn send(&self, message: FrameMessage) -> Result<(), ChannelError> {
        self.inner
            .unbounded_send(message)
            .map_err(|_| ChannelError::Closed)
    }
}

#[derive(Debug)]
/// Receiving half of the frame channel, owned by the shell runtime.
pub struct FrameReceiver {
    inner: mpsc::UnboundedReceiver<FrameMessage>,
}

impl FrameReceiver {
    /// Returns every message queued so far, in send order, without waiting.
    pub fn drain(&mut self) -> Vec<FrameMessage> {
        let mut drained = Vec::new();
        while let Ok(message) = self.inner.try_recv() {
            drained.push(message);
        }
        drained
    }
}

#[derive(Debug, Clone)]
/// Capability handle handed to embedded content after the handshake.
///
/// Holding a context is the only way for content to address its hosting window; there is no
/// global lookup.
pub struct WindowContext {
    window_id: WindowRuntimeId,
    app_name: String,
    sender: FrameSender,
}

impl WindowContext {
    /// Builds the capability described by a handshake message.
    pub fn from_handshake(message: &HostMessage, sender: FrameSender) -> Self {
        match message {
            HostMessage::WindowInfo {
                window_id,
                app_name,
            } => Self {
                window_id: *window_id,
                app_name: app_name.clone(),
                sender,
            },
        }
    }

    /// Window hosting this content.
    pub fn window_id(&self) -> WindowRuntimeId {
        self.window_id
    }

    /// Application identity of the hosting window.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Sends a window command tagged with this window's id.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Closed`] once the shell is gone.
    pub fn send_command(&self, command: impl Into<String>, data: Value) -> Result<(), ChannelError> {
        self.sender
            .send(FrameMessage::window_command(self.window_id, command, data))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn handshake_uses_kebab_type_tag_and_camel_case_fields() {
        let message = HostMessage::WindowInfo {
            window_id: 7,
            app_name: "Notepad".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&message).expect("serialize"),
            json!({ "type": "window-info", "windowId": 7, "appName": "Notepad" })
        );
    }

    #[test]
    fn window_command_decodes_with_missing_data_as_null() {
        let decoded = FrameMessage::from_json(&json!({
            "type": "window-command",
            "windowId": 3,
            "command": "set-title",
        }));
        assert_eq!(
            decoded,
            Some(FrameMessage::window_command(3, "set-title", Value::Null))
        );
    }

    #[test]
    fn foreign_payloads_are_ignored() {
        assert_eq!(FrameMessage::from_json(&json!({ "type": "window-info" })), None);
        assert_eq!(FrameMessage::from_json(&json!("ping")), None);
        assert_eq!(
            FrameMessage::from_json(&json!({ "type": "window-command", "command": "x" })),
            None
        );
    }

    #[test]
    fn context_commands_arrive_in_send_order() {
        let (sender, mut receiver) = frame_channel();
        let handshake = HostMessage::WindowInfo {
            window_id: 11,
            app_name: "This Pc".to_string(),
        };
        let context = WindowContext::from_handshake(&handshake, sender);
        assert_eq!(context.window_id(), 11);
        assert_eq!(context.app_name(), "This Pc");

        context.send_command("first", json!(1)).expect("send");
        context.send_command("second", json!(2)).expect("send");

        let drained = receiver.drain();
        assert_eq!(
            drained,
            vec![
                FrameMessage::window_command(11, "first", json!(1)),
                FrameMessage::window_command(11, "second", json!(2)),
            ]
        );
        assert!(receiver.drain().is_empty());
    }

    #[test]
    fn sending_after_receiver_dropped_reports_closed() {
        let (sender, receiver) = frame_channel();
        drop(receiver);
        assert_eq!(
            sender.send(FrameMessage::window_command(1, "noop", Value::Null)),
            Err(ChannelError::Closed)
        );
    }

    #[test]
    fn drain_returns_queued_messages_after_senders_are_gone() {
        let (sender, mut receiver) = frame_channel();
        sender
            .send(FrameMessage::window_command(4, "last", Value::Null))
            .expect("send");
        drop(sender);

        assert_eq!(
            receiver.drain(),
            vec![FrameMessage::window_command(4, "last", Value::Null)]
        );
        assert!(receiver.drain().is_empty());
    }
}
