//! Runtime configuration for the window and message box managers.

use serde::{Deserialize, Serialize};

use crate::model::{
    WindowRect, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH, TASKBAR_HEIGHT_PX,
};

/// Slot key of the persisted window snapshot.
pub const WINDOW_STATE_KEY: &str = "windowState";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Tunables shared by the managers of one desktop.
///
/// Every field has a default, so a partial JSON object is a valid configuration.
pub struct RuntimeConfig {
    /// Full browser viewport.
    pub viewport: WindowRect,
    /// Height of the taskbar strip subtracted from maximized windows.
    pub taskbar_height: i32,
    /// Geometry of new windows and of windows restored from maximized without a saved rect.
    pub default_window_rect: WindowRect,
    pub min_window_width: i32,
    pub min_window_height: i32,
    /// Slot holding the persisted window snapshot.
    pub window_state_key: String,
    /// Size assumed for message boxes whose dimensions are `auto`.
    pub dialog_width: i32,
    pub dialog_height: i32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            viewport: WindowRect {
                x: 0,
                y: 0,
                w: 1280,
                h: 800,
            },
            taskbar_height: TASKBAR_HEIGHT_PX,
            default_window_rect: WindowRect::default(),
            min_window_width: MIN_WINDOW_WIDTH,
            min_window_height: MIN_WINDOW_HEIGHT,
            window_state_key: WINDOW_STATE_KEY.to_string(),
            dialog_width: 360,
            dialog_height: 160,
        }
    }
}

impl RuntimeConfig {
    /// Parses a configuration object, filling absent fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns the decoder error for malformed JSON or mistyped fields.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Area above the taskbar; the geometry of a maximized window.
    pub fn desktop_viewport(&self) -> WindowRect {
        WindowRect {
            x: 0,
            y: 0,
            w: self.viewport.w,
            h: self.viewport.h.saturating_sub(self.taskbar_height).max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config = RuntimeConfig::from_json_str(
            r#"{ "viewport": { "x": 0, "y": 0, "w": 1024, "h": 768 }, "windowStateKey": "layout" }"#,
        )
        .expect("parse config");
        assert_eq!(config.window_state_key, "layout");
        assert_eq!(config.taskbar_height, TASKBAR_HEIGHT_PX);
        assert_eq!(config.default_window_rect, WindowRect::default());
    }

    #[test]
    fn desktop_viewport_excludes_taskbar() {
        let config = RuntimeConfig::default();
        assert_eq!(
            config.desktop_viewport(),
            WindowRect {
                x: 0,
                y: 0,
                w: 1280,
                h: 760
            }
        );
    }

    #[test]
    fn mistyped_fields_are_rejected() {
        assert!(RuntimeConfig::from_json_str(r#"{ "taskbarHeight": "tall" }"#).is_err());
    }
}
