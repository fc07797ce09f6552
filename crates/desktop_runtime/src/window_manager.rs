//! Stateful window manager: owns the window store and runs reducer effects against host services.

use desktop_app_contract::FrameMessage;
use platform_host::HostServices;
use serde_json::Value;

use crate::{
    command_bus::{CommandBus, ListenerId, WindowCommandEvent},
    config::RuntimeConfig,
    model::{
        AppIdentity, CreateWindowSpec, DesktopState, InteractionState, OpenAppRequest,
        ParentWindow, PointerPosition, ResizeEdge, WindowId, WindowRecord, WindowRect,
    },
    persistence::{load_window_state, persist_window_state},
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect},
    surfaces::{SharedSurfaces, TaskbarEntry},
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// What [`WindowManager::open_app`] did.
pub enum OpenAppOutcome {
    /// No window carried the identity; a new one was created.
    Created(WindowId),
    /// Existing windows of the identity were un-minimized and raised, in this order.
    Refocused(Vec<WindowId>),
}

/// Window lifecycle, stacking, geometry and cross-frame relay for one desktop.
///
/// Reducer errors (unknown window ids, apps without windows) are logged and swallowed; every
/// operation on an unknown id is a no-op. Busy-indicator and frame-post effects run immediately
/// against [`HostServices`]; render effects queue until [`WindowManager::take_effects`].
pub struct WindowManager {
    config: RuntimeConfig,
    state: DesktopState,
    interaction: InteractionState,
    surfaces: SharedSurfaces,
    host: HostServices,
    effects: Vec<RuntimeEffect>,
    commands: CommandBus,
}

impl WindowManager {
    pub fn new(config: RuntimeConfig, host: HostServices, surfaces: SharedSurfaces) -> Self {
        Self {
            config,
            state: DesktopState::default(),
            interaction: InteractionState::default(),
            surfaces,
            host,
            effects: Vec::new(),
            commands: CommandBus::default(),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.state.window(window_id)
    }

    pub fn surfaces(&self) -> &SharedSurfaces {
        &self.surfaces
    }

    /// Taskbar entries of both kinds, in taskbar order.
    pub fn taskbar_entries(&self) -> Vec<TaskbarEntry> {
        self.surfaces.borrow().entries().to_vec()
    }

    pub fn set_viewport(&mut self, viewport: WindowRect) {
        self.config.viewport = viewport;
    }

    /// Runs `action` through the reducer. Returns `false` when the reducer rejected it.
    pub fn dispatch(&mut self, action: DesktopAction) -> bool {
        let result = {
            let mut surfaces = self.surfaces.borrow_mut();
            reduce_desktop(
                &mut self.state,
                &mut self.interaction,
                &mut surfaces,
                &self.config,
                action,
            )
        };
        match result {
            Ok(effects) => {
                for effect in effects {
                    self.run_effect(effect);
                }
                true
            }
            Err(err) => {
                leptos::logging::warn!("desktop reducer error: {err}");
                false
            }
        }
    }

    fn run_effect(&mut self, effect: RuntimeEffect) {
        match effect {
            RuntimeEffect::SetBusy(busy) => self.host.busy.set_busy(busy),
            RuntimeEffect::PostToFrame { window_id, message } => {
                if let Err(err) = self.host.frames.post(window_id.0, &message) {
                    leptos::logging::warn!("posting to {window_id} failed: {err}");
                }
            }
            other => self.effects.push(other),
        }
    }

    /// Drains queued render effects in emission order.
    pub fn take_effects(&mut self) -> Vec<RuntimeEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Opens an app, or refocuses every window already carrying its identity.
    pub fn open_app(&mut self, request: impl Into<OpenAppRequest>) -> OpenAppOutcome {
        let request = request.into();
        let app = request.identity();
        let existing: Vec<WindowId> = self.state.windows_for(&app).map(|w| w.id).collect();
        if !existing.is_empty() {
            self.dispatch(DesktopAction::RefocusApp { app });
            return OpenAppOutcome::Refocused(existing);
        }
        OpenAppOutcome::Created(self.create_window(CreateWindowSpec::from_request(&request)))
    }

    pub fn create_window(&mut self, spec: CreateWindowSpec) -> WindowId {
        let window_id = WindowId(self.state.next_window_id);
        self.dispatch(DesktopAction::CreateWindow(spec));
        window_id
    }

    pub fn content_loaded(&mut self, window_id: WindowId) {
        self.dispatch(DesktopAction::ContentLoaded { window_id });
    }

    pub fn content_failed(&mut self, window_id: WindowId) {
        self.dispatch(DesktopAction::ContentFailed { window_id });
    }

    pub fn bring_to_front(&mut self, window_id: WindowId) {
        self.dispatch(DesktopAction::FocusWindow { window_id });
    }

    pub fn close(&mut self, window_id: WindowId) {
        self.dispatch(DesktopAction::CloseWindow { window_id });
    }

    pub fn minimize(&mut self, window_id: WindowId) {
        self.dispatch(DesktopAction::MinimizeWindow { window_id });
    }

    pub fn restore(&mut self, window_id: WindowId) {
        self.dispatch(DesktopAction::RestoreWindow { window_id });
    }

    pub fn toggle_minimize(&mut self, window_id: WindowId) {
        self.dispatch(DesktopAction::ToggleMinimize { window_id });
    }

    pub fn maximize(&mut self, window_id: WindowId) {
        let viewport = self.config.desktop_viewport();
        self.dispatch(DesktopAction::MaximizeWindow {
            window_id,
            viewport,
        });
    }

    pub fn toggle_maximize(&mut self, window_id: WindowId) {
        let viewport = self.config.desktop_viewport();
        self.dispatch(DesktopAction::ToggleMaximize {
            window_id,
            viewport,
        });
    }

    pub fn toggle_taskbar_app(&mut self, app: &AppIdentity) {
        self.dispatch(DesktopAction::ToggleTaskbarApp { app: app.clone() });
    }

    pub fn begin_move(&mut self, window_id: WindowId, pointer: PointerPosition) {
        self.dispatch(DesktopAction::BeginMove { window_id, pointer });
    }

    pub fn update_move(&mut self, pointer: PointerPosition) {
        self.dispatch(DesktopAction::UpdateMove { pointer });
    }

    pub fn end_move(&mut self) {
        self.dispatch(DesktopAction::EndMove);
    }

    pub fn begin_resize(&mut self, window_id: WindowId, edge: ResizeEdge, pointer: PointerPosition) {
        self.dispatch(DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        });
    }

    pub fn update_resize(&mut self, pointer: PointerPosition) {
        self.dispatch(DesktopAction::UpdateResize { pointer });
    }

    pub fn end_resize(&mut self) {
        self.dispatch(DesktopAction::EndResize);
    }

    /// Geometry handle for placing a dialog over `window_id`.
    pub fn parent_window(&self, window_id: WindowId) -> Option<ParentWindow> {
        self.state.window(window_id).map(|window| ParentWindow {
            window_id,
            rect: window.rect,
        })
    }

    /// Subscribers of relayed window commands.
    pub fn commands(&self) -> &CommandBus {
        &self.commands
    }

    pub fn on_window_command(
        &self,
        listener: impl Fn(&WindowCommandEvent) + 'static,
    ) -> ListenerId {
        self.commands.subscribe(listener)
    }

    pub fn off_window_command(&self, id: ListenerId) -> bool {
        self.commands.unsubscribe(id)
    }

    /// Resolves an inbound command against the window store; unknown windows yield `None`.
    pub fn resolve_frame_message(&self, message: &FrameMessage) -> Option<WindowCommandEvent> {
        match message {
            FrameMessage::WindowCommand {
                window_id,
                command,
                data,
            } => {
                let window = self.state.window(WindowId(*window_id))?.clone();
                Some(WindowCommandEvent {
                    window,
                    command: command.clone(),
                    data: data.clone(),
                })
            }
        }
    }

    /// Relays a command to every subscriber. Returns `false` when it was dropped.
    ///
    /// Listeners run while `self` is borrowed; a manager shared behind a `RefCell` should resolve
    /// first and publish on a cloned [`CommandBus`] after releasing the borrow.
    pub fn handle_frame_message(&self, message: &FrameMessage) -> bool {
        match self.resolve_frame_message(message) {
            Some(event) => {
                self.commands.publish(&event);
                true
            }
            None => false,
        }
    }

    /// Like [`WindowManager::handle_frame_message`] for untyped payloads; foreign traffic is ignored.
    pub fn handle_raw_frame_message(&self, raw: &Value) -> bool {
        FrameMessage::from_json(raw)
            .map(|message| self.handle_frame_message(&message))
            .unwrap_or(false)
    }

    /// Writes the geometry snapshot to the configured slot. Returns `false` on failure.
    pub fn save_window_state(&self) -> bool {
        match persist_window_state(
            self.host.slots.as_ref(),
            &self.config.window_state_key,
            &self.state,
        ) {
            Ok(()) => true,
            Err(err) => {
                leptos::logging::warn!("failed to save window state: {err}");
                false
            }
        }
    }

    /// Recreates windows from the configured slot.
    ///
    /// The snapshot is decoded in full before anything is created; a malformed snapshot is logged
    /// and nothing is applied.
    pub fn restore_window_state(&mut self) -> Vec<WindowId> {
        let records =
            match load_window_state(self.host.slots.as_ref(), &self.config.window_state_key) {
                Ok(records) => records,
                Err(err) => {
                    leptos::logging::warn!("failed to restore window state: {err}");
                    return Vec::new();
                }
            };

        let mut restored = Vec::with_capacity(records.len());
        let bounds = self.config.desktop_viewport();
        for record in records {
            let mut spec = record.create_spec();
            spec.rect = spec
                .rect
                .clamped_min(self.config.min_window_width, self.config.min_window_height)
                .clamped_within(bounds);
            let window_id = self.create_window(spec);
            if record.is_maximized || record.is_minimized {
                self.dispatch(DesktopAction::ApplySavedDisplay {
                    window_id,
                    maximized: record.is_maximized,
                    minimized: record.is_minimized,
                });
            }
            restored.push(window_id);
        }
        if !restored.is_empty() {
            leptos::logging::log!("restored {} windows", restored.len());
        }
        restored
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use desktop_app_contract::HostMessage;
    use platform_host::{
        MemoryBusyIndicator, MemoryFramePort, MemorySlotStore, StateSlotStore,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{
        model::{DesktopIcon, DisplayState, WindowContent},
        surfaces::{shared_surfaces, SurfaceKind, TaskbarKey},
    };

    struct Fixture {
        manager: WindowManager,
        slots: MemorySlotStore,
        frames: MemoryFramePort,
        busy: MemoryBusyIndicator,
    }

    fn fixture() -> Fixture {
        let slots = MemorySlotStore::default();
        let frames = MemoryFramePort::default();
        let busy = MemoryBusyIndicator::default();
        let host = HostServices::memory(slots.clone(), frames.clone(), busy.clone());
        Fixture {
            manager: WindowManager::new(RuntimeConfig::default(), host, shared_surfaces()),
            slots,
            frames,
            busy,
        }
    }

    fn notepad() -> OpenAppRequest {
        OpenAppRequest::new("Notepad").with_url("Apps/Notepad/index.html")
    }

    fn created(outcome: OpenAppOutcome) -> WindowId {
        match outcome {
            OpenAppOutcome::Created(window_id) => window_id,
            OpenAppOutcome::Refocused(ids) => panic!("expected creation, refocused {ids:?}"),
        }
    }

    #[test]
    fn load_cycle_drives_busy_indicator_and_handshake() {
        let mut fx = fixture();
        let win = created(fx.manager.open_app(notepad()));
        assert!(fx.busy.is_busy());

        fx.manager.content_loaded(win);
        assert!(!fx.busy.is_busy());
        assert_eq!(
            fx.frames.posted(),
            vec![(
                win.0,
                HostMessage::WindowInfo {
                    window_id: win.0,
                    app_name: "Notepad".to_string(),
                }
            )]
        );
        assert_eq!(fx.manager.take_effects(), vec![RuntimeEffect::RevealWindow(win)]);

        fx.manager.content_loaded(win);
        assert_eq!(fx.frames.posted().len(), 1);
    }

    #[test]
    fn reopening_an_app_refocuses_instead_of_creating() {
        let mut fx = fixture();
        let icon = DesktopIcon {
            label: "Notepad".to_string(),
            name: Some("notepad".to_string()),
            app_url: Some("Apps/Notepad/index.html".to_string()),
            icon: None,
            image_src: None,
        };
        let win = created(fx.manager.open_app(&icon));
        fx.manager.minimize(win);
        let z_before = fx.manager.window(win).map(|w| w.z_order);

        assert_eq!(
            fx.manager.open_app(&icon),
            OpenAppOutcome::Refocused(vec![win])
        );
        assert_eq!(fx.manager.state().windows.len(), 1);
        let window = fx.manager.window(win).expect("window");
        assert_eq!(window.display, DisplayState::Normal);
        assert!(Some(window.z_order) > z_before);
    }

    #[test]
    fn unknown_ids_are_silent_no_ops() {
        let mut fx = fixture();
        fx.manager.bring_to_front(WindowId(99));
        fx.manager.close(WindowId(99));
        fx.manager.toggle_taskbar_app(&AppIdentity::new("Paint"));
        assert!(fx.manager.state().windows.is_empty());
        assert!(fx.manager.take_effects().is_empty());
    }

    #[test]
    fn closing_a_loading_window_clears_busy() {
        let mut fx = fixture();
        let win = created(fx.manager.open_app(notepad()));
        fx.manager.close(win);
        assert!(!fx.busy.is_busy());
        assert_eq!(fx.busy.toggles(), 2);
        assert_eq!(fx.manager.take_effects(), vec![RuntimeEffect::DiscardWindow(win)]);
        assert!(fx.manager.taskbar_entries().is_empty());
    }

    #[test]
    fn frame_commands_reach_subscribers_for_known_windows_only() {
        let mut fx = fixture();
        let win = created(fx.manager.open_app(OpenAppRequest::new("Notepad").with_markup("")));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let listener = fx.manager.on_window_command(move |event| {
            sink.borrow_mut()
                .push((event.window.id, event.command.clone(), event.data.clone()));
        });

        assert!(fx.manager.handle_raw_frame_message(&json!({
            "type": "window-command",
            "windowId": win.0,
            "command": "set-title",
            "data": { "title": "notes.txt" },
        })));
        assert!(!fx
            .manager
            .handle_frame_message(&FrameMessage::window_command(77, "noop", Value::Null)));
        assert!(!fx
            .manager
            .handle_raw_frame_message(&json!({ "type": "window-info", "windowId": win.0 })));

        assert!(fx.manager.off_window_command(listener));
        fx.manager
            .handle_frame_message(&FrameMessage::window_command(win.0, "late", Value::Null));

        assert_eq!(
            *seen.borrow(),
            vec![(win, "set-title".to_string(), json!({ "title": "notes.txt" }))]
        );
    }

    #[test]
    fn save_then_restore_reproduces_windows() {
        let mut fx = fixture();
        let first = created(fx.manager.open_app(
            OpenAppRequest::new("Notepad")
                .with_url("Apps/Notepad/index.html")
                .with_rect(WindowRect {
                    x: 30,
                    y: 40,
                    w: 500,
                    h: 400,
                }),
        ));
        let second = created(fx.manager.open_app(OpenAppRequest::new("This Pc").with_markup("")));
        fx.manager.maximize(second);
        fx.manager.content_loaded(first);
        assert!(fx.manager.save_window_state());

        let host = HostServices::memory(
            fx.slots.clone(),
            MemoryFramePort::default(),
            MemoryBusyIndicator::default(),
        );
        let mut restored_manager =
            WindowManager::new(RuntimeConfig::default(), host, shared_surfaces());
        let restored = restored_manager.restore_window_state();
        assert_eq!(restored.len(), 2);

        let summary = |manager: &WindowManager| {
            manager
                .state()
                .windows
                .iter()
                .map(|w| (w.app.to_string(), w.rect, w.display.is_maximized()))
                .collect::<Vec<_>>()
        };
        assert_eq!(summary(&restored_manager), summary(&fx.manager));
        assert_eq!(
            restored_manager.window(restored[0]).map(|w| w.content.clone()),
            Some(WindowContent::Url("Apps/Notepad/index.html".to_string()))
        );
    }

    #[test]
    fn malformed_snapshot_applies_nothing() {
        let mut fx = fixture();
        fx.slots
            .write_slot(
                "windowState",
                r#"[{"id":"win-1","appName":"Notepad","title":"Notepad",
                    "position":{"left":1,"top":2},"size":{"width":300,"height":200},
                    "isMaximized":false,"isMinimized":false},
                   {"id":"win-2","appName":"This Pc"}]"#,
            )
            .expect("write");

        assert!(fx.manager.restore_window_state().is_empty());
        assert!(fx.manager.state().windows.is_empty());
        assert!(fx.manager.taskbar_entries().is_empty());
    }

    #[test]
    fn restored_far_off_window_is_pulled_into_view_and_stays_draggable() {
        let mut fx = fixture();
        fx.slots
            .write_slot(
                "windowState",
                r#"[{"id":"win-1","appName":"Notepad","title":"Notepad",
                    "position":{"left":3e9,"top":-3e9},"size":{"width":300,"height":200},
                    "isMaximized":false,"isMinimized":false}]"#,
            )
            .expect("write");

        let restored = fx.manager.restore_window_state();
        let win = restored[0];
        let viewport = RuntimeConfig::default().desktop_viewport();
        assert_eq!(
            fx.manager.window(win).map(|w| w.rect),
            Some(WindowRect {
                x: viewport.w - 300,
                y: 0,
                w: 300,
                h: 200
            })
        );

        fx.manager.begin_move(win, PointerPosition { x: 0, y: 0 });
        fx.manager.update_move(PointerPosition { x: 10, y: 0 });
        fx.manager.end_move();
        assert_eq!(
            fx.manager.window(win).map(|w| w.rect.x),
            Some(viewport.w - 290)
        );
    }

    #[test]
    fn taskbar_entry_tracks_front_visible_window() {
        let mut fx = fixture();
        let notes = created(fx.manager.open_app(OpenAppRequest::new("Notepad").with_markup("")));
        let pc = created(fx.manager.open_app(OpenAppRequest::new("This Pc").with_markup("")));
        let active = |manager: &WindowManager| {
            manager
                .surfaces()
                .borrow()
                .active_entry(SurfaceKind::Window)
                .map(|entry| entry.key.clone())
        };
        assert_eq!(
            active(&fx.manager),
            Some(TaskbarKey::App(AppIdentity::new("This Pc")))
        );

        fx.manager.minimize(pc);
        assert_eq!(
            active(&fx.manager),
            Some(TaskbarKey::App(AppIdentity::new("Notepad")))
        );

        fx.manager.toggle_minimize(notes);
        assert_eq!(active(&fx.manager), None);
    }
}
