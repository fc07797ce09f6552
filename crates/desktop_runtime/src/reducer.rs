//! Reducer actions, side-effect intents, and transition logic for managed windows.

use desktop_app_contract::{HostMessage, MessageBoxResult};
use thiserror::Error;

use crate::{
    config::RuntimeConfig,
    model::{
        AppIdentity, CreateWindowSpec, DesktopState, DisplayState, DragSession, InteractionState,
        MessageBoxId, PointerPosition, ResizeEdge, ResizeSession, WindowContent, WindowId,
        WindowRecord, WindowRect,
    },
    surfaces::{SurfaceKind, SurfaceRegistry, TaskbarDescriptor, TaskbarKey},
};

/// Inline notice that replaces window content whose document failed to load.
pub const LOAD_ERROR_MARKUP: &str = "<div class=\"win-window-load-error\" \
     style=\"padding: 20px; text-align: center; color: red;\">\
     Failed to load: unable to open the application</div>";

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Create a window from a resolved spec.
    CreateWindow(CreateWindowSpec),
    /// Raise a window above every other surface.
    FocusWindow {
        /// Window to raise.
        window_id: WindowId,
    },
    /// Close a window by id.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Hide a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Un-minimize a window, or bring a maximized window back to its restore geometry.
    RestoreWindow {
        /// Window to restore.
        window_id: WindowId,
    },
    /// Minimize button: minimize, or restore when already minimized.
    ToggleMinimize {
        /// Window whose button was pressed.
        window_id: WindowId,
    },
    /// Maximize a window to the provided viewport.
    MaximizeWindow {
        /// Window to maximize.
        window_id: WindowId,
        /// Area above the taskbar.
        viewport: WindowRect,
    },
    /// Maximize button: maximize, or restore when already maximized.
    ToggleMaximize {
        /// Window whose button was pressed.
        window_id: WindowId,
        /// Area above the taskbar.
        viewport: WindowRect,
    },
    /// Taskbar app-entry click.
    ToggleTaskbarApp {
        /// Identity of the clicked entry.
        app: AppIdentity,
    },
    /// Un-minimize and raise every window of an app.
    RefocusApp {
        /// Identity being reopened.
        app: AppIdentity,
    },
    /// The window's embedded document finished loading.
    ContentLoaded {
        /// Window whose content loaded.
        window_id: WindowId,
    },
    /// The window's embedded document failed to load.
    ContentFailed {
        /// Window whose content failed.
        window_id: WindowId,
    },
    /// Reapply persisted display flags to a freshly created window.
    ApplySavedDisplay {
        /// Recreated window.
        window_id: WindowId,
        /// Saved maximized flag.
        maximized: bool,
        /// Saved minimized flag.
        minimized: bool,
    },
    /// Begin dragging a window by its titlebar.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window drag.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window drag.
    EndMove,
    /// Begin resizing a window.
    BeginResize {
        /// Window being resized.
        window_id: WindowId,
        /// Edge or corner being dragged.
        edge: ResizeEdge,
        /// Pointer position at resize start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window resize.
    UpdateResize {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window resize.
    EndResize,
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents for the host and the renderer.
pub enum RuntimeEffect {
    /// Show or clear the desktop-wide busy cursor.
    SetBusy(bool),
    /// Make a hidden window visible (fade-in).
    RevealWindow(WindowId),
    /// Tear down the window's DOM and frame.
    DiscardWindow(WindowId),
    /// Deliver a message into the window's embedded content.
    PostToFrame {
        /// Target window.
        window_id: WindowId,
        /// Message to post.
        message: HostMessage,
    },
    /// Tear down a message box's DOM (fade-out).
    DiscardDialog(MessageBoxId),
    /// Briefly flash a message box to draw attention.
    FlashDialog(MessageBoxId),
    /// Move keyboard focus to one of a message box's buttons.
    FocusDialogButton {
        /// Message box owning the button.
        dialog_id: MessageBoxId,
        /// Result of the focused button.
        result: MessageBoxResult,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions (for example, referencing a missing window).
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window {0} not found")]
    WindowNotFound(WindowId),
    /// No window carries the given app identity.
    #[error("no windows open for app `{0}`")]
    AppNotFound(AppIdentity),
}

/// Applies a [`DesktopAction`] to the window state and collects resulting side effects.
///
/// Z-order values and taskbar entries live in the shared `surfaces` registry. After every
/// successful action the window-kind taskbar activation is recomputed: only the entry of the
/// front visible window is active.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when an action references a window that is not present
/// and [`ReducerError::AppNotFound`] when an app-level action finds no window of that app.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    surfaces: &mut SurfaceRegistry,
    config: &RuntimeConfig,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::CreateWindow(spec) => {
            let window_id = next_window_id(state);
            let rect = spec
                .rect
                .clamped_min(config.min_window_width, config.min_window_height);
            let loading = matches!(spec.content, WindowContent::Url(_));
            surfaces.register_entry(
                TaskbarKey::App(spec.app.clone()),
                TaskbarDescriptor {
                    title: spec.app.to_string(),
                    icon: spec.icon.clone(),
                },
            );
            state.windows.push(WindowRecord {
                id: window_id,
                app: spec.app,
                title: spec.title,
                icon: spec.icon,
                content: spec.content,
                rect,
                restore_rect: rect,
                display: DisplayState::Normal,
                z_order: surfaces.allocate_front(),
                loading,
                revealed: !loading,
            });
            if loading {
                effects.push(RuntimeEffect::SetBusy(true));
            } else {
                effects.push(RuntimeEffect::RevealWindow(window_id));
            }
        }
        DesktopAction::FocusWindow { window_id } => {
            raise_window(state, surfaces, window_id)?;
        }
        DesktopAction::CloseWindow { window_id } => {
            let index = state
                .windows
                .iter()
                .position(|w| w.id == window_id)
                .ok_or(ReducerError::WindowNotFound(window_id))?;
            let record = state.windows.remove(index);
            surfaces.release_entry(&TaskbarKey::App(record.app));
            if matches!(&interaction.dragging, Some(session) if session.window_id == window_id) {
                interaction.dragging = None;
            }
            if matches!(&interaction.resizing, Some(session) if session.window_id == window_id) {
                interaction.resizing = None;
            }
            effects.push(RuntimeEffect::DiscardWindow(window_id));
            if record.loading && !state.any_loading() {
                effects.push(RuntimeEffect::SetBusy(false));
            }
        }
        DesktopAction::MinimizeWindow { window_id } => {
            minimize(find_window_mut(state, window_id)?);
        }
        DesktopAction::RestoreWindow { window_id } => {
            let window = find_window_mut(state, window_id)?;
            let display = window.display;
            match display {
                DisplayState::Minimized { .. } => unminimize(window),
                DisplayState::Maximized => {
                    window.rect = window.restore_rect;
                    window.display = DisplayState::Normal;
                }
                DisplayState::Normal => {}
            }
            raise_window(state, surfaces, window_id)?;
        }
        DesktopAction::ToggleMinimize { window_id } => {
            let action = if find_window_mut(state, window_id)?.display.is_minimized() {
                DesktopAction::RestoreWindow { window_id }
            } else {
                DesktopAction::MinimizeWindow { window_id }
            };
            effects.extend(reduce_desktop(state, interaction, surfaces, config, action)?);
        }
        DesktopAction::MaximizeWindow {
            window_id,
            viewport,
        } => {
            let window = find_window_mut(state, window_id)?;
            if matches!(
                window.display,
                DisplayState::Normal
                    | DisplayState::Minimized {
                        restore_maximized: false
                    }
            ) {
                window.restore_rect = window.rect;
            }
            window.rect = viewport;
            window.display = DisplayState::Maximized;
            raise_window(state, surfaces, window_id)?;
        }
        DesktopAction::ToggleMaximize {
            window_id,
            viewport,
        } => {
            let window = find_window_mut(state, window_id)?;
            if window.display.is_maximized() {
                window.rect = window.restore_rect;
                window.display = DisplayState::Normal;
                raise_window(state, surfaces, window_id)?;
            } else {
                effects.extend(reduce_desktop(
                    state,
                    interaction,
                    surfaces,
                    config,
                    DesktopAction::MaximizeWindow {
                        window_id,
                        viewport,
                    },
                )?);
            }
        }
        DesktopAction::ToggleTaskbarApp { app } => {
            let (first_id, first_minimized) = state
                .windows_for(&app)
                .next()
                .map(|w| (w.id, w.display.is_minimized()))
                .ok_or_else(|| ReducerError::AppNotFound(app.clone()))?;
            if first_minimized {
                unminimize(find_window_mut(state, first_id)?);
                raise_window(state, surfaces, first_id)?;
            } else {
                for window in state.windows.iter_mut().filter(|w| w.app == app) {
                    minimize(window);
                }
            }
        }
        DesktopAction::RefocusApp { app } => {
            let ids: Vec<WindowId> = state.windows_for(&app).map(|w| w.id).collect();
            if ids.is_empty() {
                return Err(ReducerError::AppNotFound(app));
            }
            for window_id in ids {
                unminimize(find_window_mut(state, window_id)?);
                raise_window(state, surfaces, window_id)?;
            }
        }
        DesktopAction::ContentLoaded { window_id } => {
            let window = find_window_mut(state, window_id)?;
            if window.loading {
                window.loading = false;
                window.revealed = true;
                let message = HostMessage::WindowInfo {
                    window_id: window_id.0,
                    app_name: window.app.to_string(),
                };
                effects.push(RuntimeEffect::RevealWindow(window_id));
                effects.push(RuntimeEffect::PostToFrame { window_id, message });
                if !state.any_loading() {
                    effects.push(RuntimeEffect::SetBusy(false));
                }
            }
        }
        DesktopAction::ContentFailed { window_id } => {
            let window = find_window_mut(state, window_id)?;
            if window.loading {
                window.content = WindowContent::Markup(LOAD_ERROR_MARKUP.to_string());
                window.loading = false;
                window.revealed = true;
                effects.push(RuntimeEffect::RevealWindow(window_id));
                if !state.any_loading() {
                    effects.push(RuntimeEffect::SetBusy(false));
                }
            }
        }
        DesktopAction::ApplySavedDisplay {
            window_id,
            maximized,
            minimized,
        } => {
            let window = find_window_mut(state, window_id)?;
            if maximized {
                window.restore_rect = config.default_window_rect;
                window.rect = config.desktop_viewport();
                window.display = DisplayState::Maximized;
            }
            if minimized {
                minimize(window);
            }
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            let rect_start = find_window_mut(state, window_id)?.rect;
            raise_window(state, surfaces, window_id)?;
            interaction.dragging = Some(DragSession {
                window_id,
                pointer_start: pointer,
                rect_start,
            });
        }
        DesktopAction::UpdateMove { pointer } => {
            if let Some(session) = interaction.dragging.as_ref() {
                let dx = pointer.x.saturating_sub(session.pointer_start.x);
                let dy = pointer.y.saturating_sub(session.pointer_start.y);
                let window = find_window_mut(state, session.window_id)?;
                if !window.display.is_maximized() {
                    window.rect = session.rect_start.offset(dx, dy);
                }
            }
        }
        DesktopAction::EndMove => {
            if let Some(session) = interaction.dragging.take() {
                commit_geometry(state, session.window_id);
            }
        }
        DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        } => {
            let rect_start = find_window_mut(state, window_id)?.rect;
            raise_window(state, surfaces, window_id)?;
            interaction.resizing = Some(ResizeSession {
                window_id,
                edge,
                pointer_start: pointer,
                rect_start,
            });
        }
        DesktopAction::UpdateResize { pointer } => {
            if let Some(session) = interaction.resizing.as_ref() {
                let dx = pointer.x.saturating_sub(session.pointer_start.x);
                let dy = pointer.y.saturating_sub(session.pointer_start.y);
                let window = find_window_mut(state, session.window_id)?;
                if !window.display.is_maximized() {
                    window.rect = resize_rect(
                        session.rect_start,
                        session.edge,
                        dx,
                        dy,
                        config.min_window_width,
                        config.min_window_height,
                    );
                }
            }
        }
        DesktopAction::EndResize => {
            if let Some(session) = interaction.resizing.take() {
                commit_geometry(state, session.window_id);
            }
        }
    }

    sync_window_activation(state, surfaces);
    Ok(effects)
}

fn next_window_id(state: &mut DesktopState) -> WindowId {
    let id = WindowId(state.next_window_id);
    state.next_window_id = state.next_window_id.saturating_add(1);
    id
}

fn find_window_mut(
    state: &mut DesktopState,
    window_id: WindowId,
) -> Result<&mut WindowRecord, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| w.id == window_id)
        .ok_or(ReducerError::WindowNotFound(window_id))
}

fn raise_window(
    state: &mut DesktopState,
    surfaces: &mut SurfaceRegistry,
    window_id: WindowId,
) -> Result<(), ReducerError> {
    let window = find_window_mut(state, window_id)?;
    window.z_order = surfaces.allocate_front();
    Ok(())
}

fn minimize(window: &mut WindowRecord) {
    if !window.display.is_minimized() {
        window.display = DisplayState::Minimized {
            restore_maximized: window.display.is_maximized(),
        };
    }
}

fn unminimize(window: &mut WindowRecord) {
    if let DisplayState::Minimized { restore_maximized } = window.display {
        window.display = if restore_maximized {
            DisplayState::Maximized
        } else {
            DisplayState::Normal
        };
    }
}

fn commit_geometry(state: &mut DesktopState, window_id: WindowId) {
    if let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) {
        if window.display == DisplayState::Normal {
            window.restore_rect = window.rect;
        }
    }
}

fn sync_window_activation(state: &DesktopState, surfaces: &mut SurfaceRegistry) {
    match state.front_window() {
        Some(front) => surfaces.set_active(&TaskbarKey::App(front.app.clone())),
        None => surfaces.clear_active(SurfaceKind::Window),
    }
}

/// Applies resize deltas for an edge/corner drag, keeping the opposite edge fixed at the minimum.
fn resize_rect(
    start: WindowRect,
    edge: ResizeEdge,
    dx: i32,
    dy: i32,
    min_w: i32,
    min_h: i32,
) -> WindowRect {
    let (west, east, north, south) = match edge {
        ResizeEdge::North => (false, false, true, false),
        ResizeEdge::South => (false, false, false, true),
        ResizeEdge::East => (false, true, false, false),
        ResizeEdge::West => (true, false, false, false),
        ResizeEdge::NorthEast => (false, true, true, false),
        ResizeEdge::NorthWest => (true, false, true, false),
        ResizeEdge::SouthEast => (false, true, false, true),
        ResizeEdge::SouthWest => (true, false, false, true),
    };

    let mut rect = start;
    if east {
        rect.w = start.w.saturating_add(dx).max(min_w);
    }
    if west {
        rect.w = start.w.saturating_sub(dx).max(min_w);
        rect.x = start.x.saturating_add(start.w).saturating_sub(rect.w);
    }
    if south {
        rect.h = start.h.saturating_add(dy).max(min_h);
    }
    if north {
        rect.h = start.h.saturating_sub(dy).max(min_h);
        rect.y = start.y.saturating_add(start.h).saturating_sub(rect.h);
    }
    rect
}
