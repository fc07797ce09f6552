//! iframe `postMessage` bridge between the shell page and embedded window content.

#[cfg(target_arch = "wasm32")]
use desktop_app_contract::FrameMessage;
pub use desktop_app_contract::frame_element_id;
use desktop_app_contract::{FrameSender, HostMessage, WindowRuntimeId};
use platform_host::FramePort;
#[cfg(target_arch = "wasm32")]
use serde::Serialize;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

#[cfg(target_arch = "wasm32")]
fn content_window(window_id: WindowRuntimeId) -> Result<web_sys::Window, String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "document unavailable".to_string())?;
    let element = document
        .get_element_by_id(&frame_element_id(window_id))
        .ok_or_else(|| format!("no frame element for window {window_id}"))?;
    let frame = element
        .dyn_into::<web_sys::HtmlIFrameElement>()
        .map_err(|_| format!("frame element for window {window_id} is not an iframe"))?;
    frame
        .content_window()
        .ok_or_else(|| format!("frame for window {window_id} has no content window"))
}

#[derive(Debug, Clone, Copy, Default)]
/// Frame port that posts JSON-compatible messages into the window's iframe.
pub struct WebFramePort;

impl FramePort for WebFramePort {
    fn post(&self, window_id: WindowRuntimeId, message: &HostMessage) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            let target = content_window(window_id)?;
            let payload = message
                .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
                .map_err(|e| e.to_string())?;
            target
                .post_message(&payload, "*")
                .map_err(|e| format!("postMessage failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (window_id, message);
            Ok(())
        }
    }
}

/// Registered `message` listener; dropping it unregisters the listener.
pub struct FrameListener {
    #[cfg(target_arch = "wasm32")]
    closure: Closure<dyn FnMut(web_sys::MessageEvent)>,
}

impl Drop for FrameListener {
    fn drop(&mut self) {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.remove_event_listener_with_callback(
                    "message",
                    self.closure.as_ref().unchecked_ref(),
                );
            }
        }
    }
}

/// Forwards window commands posted to the shell page into the typed frame channel.
///
/// Non-command traffic is ignored. Returns `None` outside the browser.
pub fn install_frame_listener(sender: FrameSender) -> Option<FrameListener> {
    #[cfg(target_arch = "wasm32")]
    {
        let window = web_sys::window()?;
        let closure = Closure::<dyn FnMut(web_sys::MessageEvent)>::new(
            move |event: web_sys::MessageEvent| {
                let Ok(raw) = serde_wasm_bindgen::from_value::<serde_json::Value>(event.data())
                else {
                    return;
                };
                if let Some(message) = FrameMessage::from_json(&raw) {
                    let _ = sender.send(message);
                }
            },
        );
        window
            .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            .ok()?;
        Some(FrameListener { closure })
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = sender;
        None
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::frame_channel;

    use super::*;

    #[test]
    fn frame_ids_are_scoped_by_window() {
        assert_eq!(frame_element_id(4), "win-4-frame");
    }

    #[test]
    fn native_targets_post_nowhere_and_install_no_listener() {
        let message = HostMessage::WindowInfo {
            window_id: 1,
            app_name: "Notepad".to_string(),
        };
        assert_eq!(WebFramePort.post(1, &message), Ok(()));

        let (sender, _receiver) = frame_channel();
        assert!(install_frame_listener(sender).is_none());
    }
}
