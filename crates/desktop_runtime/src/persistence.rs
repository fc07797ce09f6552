//! Window geometry snapshot stored in a named state slot.

use platform_host::{load_slot_with, save_slot_with, StateSlotStore, StorageError};
use serde::{Deserialize, Serialize};

use crate::model::{
    AppIdentity, CreateWindowSpec, DesktopState, DisplayState, WindowContent, WindowRecord,
    WindowRect,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedPosition {
    pub left: f64,
    pub top: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One persisted window; the slot holds a JSON array of these in stacking-list order.
pub struct WindowStateRecord {
    pub id: String,
    pub app_name: String,
    pub title: String,
    pub position: SavedPosition,
    pub size: SavedSize,
    pub is_maximized: bool,
    pub is_minimized: bool,
    /// Document the window was showing; older snapshots omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl WindowStateRecord {
    pub fn from_window(window: &WindowRecord) -> Self {
        Self {
            id: window.id.to_string(),
            app_name: window.app.to_string(),
            title: window.title.clone(),
            position: SavedPosition {
                left: f64::from(window.rect.x),
                top: f64::from(window.rect.y),
            },
            size: SavedSize {
                width: f64::from(window.rect.w),
                height: f64::from(window.rect.h),
            },
            is_maximized: window.display.is_maximized()
                || matches!(
                    window.display,
                    DisplayState::Minimized {
                        restore_maximized: true
                    }
                ),
            is_minimized: window.display.is_minimized(),
            url: window.url().map(str::to_string),
        }
    }

    pub fn rect(&self) -> WindowRect {
        WindowRect {
            x: self.position.left.round() as i32,
            y: self.position.top.round() as i32,
            w: self.size.width.round() as i32,
            h: self.size.height.round() as i32,
        }
    }

    /// Creation input that recreates this window with its saved geometry.
    pub fn create_spec(&self) -> CreateWindowSpec {
        let app = AppIdentity::new(self.app_name.clone());
        CreateWindowSpec {
            title: self.title.clone(),
            icon: app.default_icon_path(),
            content: match &self.url {
                Some(url) if !url.is_empty() => WindowContent::Url(url.clone()),
                _ => WindowContent::Markup(String::new()),
            },
            rect: self.rect(),
            app,
        }
    }
}

pub fn snapshot_windows(state: &DesktopState) -> Vec<WindowStateRecord> {
    state
        .windows
        .iter()
        .map(WindowStateRecord::from_window)
        .collect()
}

/// Writes the snapshot of every live window under `key`.
///
/// # Errors
///
/// Returns an error when encoding or the slot write fails.
pub fn persist_window_state<S: StateSlotStore + ?Sized>(
    store: &S,
    key: &str,
    state: &DesktopState,
) -> Result<(), StorageError> {
    save_slot_with(store, key, &snapshot_windows(state))
}

/// Reads and fully decodes the snapshot under `key`; an absent slot is an empty snapshot.
///
/// # Errors
///
/// Returns [`StorageError::Decode`] when any part of the snapshot is malformed, so callers can
/// refuse to apply a partial restore.
pub fn load_window_state<S: StateSlotStore + ?Sized>(
    store: &S,
    key: &str,
) -> Result<Vec<WindowStateRecord>, StorageError> {
    Ok(load_slot_with::<S, Vec<WindowStateRecord>>(store, key)?.unwrap_or_default())
}
