//! Wait-cursor busy indicator.

use platform_host::BusyIndicator;

#[derive(Debug, Clone, Copy, Default)]
/// Busy indicator that switches the `document.body` cursor between `wait` and `default`.
pub struct WebBusyIndicator;

impl BusyIndicator for WebBusyIndicator {
    fn set_busy(&self, busy: bool) {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(body) = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.body())
            else {
                return;
            };
            let cursor = if busy { "wait" } else { "default" };
            let _ = body.style().set_property("cursor", cursor);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = busy;
        }
    }
}
