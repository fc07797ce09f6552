//! Runtime wiring for one desktop: both managers, the shared surface registry and the frame
//! channel, plus the Leptos provider that exposes them to the shell components.
//!
//! Embedded apps never reach the managers through globals. The shell hands each of them an
//! [`AppContext`] built from its window's handshake.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
    time::Duration,
};

use desktop_app_contract::{
    frame_channel, ChannelError, FrameReceiver, FrameSender, HostMessage, WindowContext,
};
use leptos::*;
use platform_host::HostServices;
use serde_json::Value;

use crate::{
    config::RuntimeConfig,
    effect_executor,
    message_box::{FontPreview, MessageBoxFuture, MessageBoxManager, MessageBoxRecord},
    model::{
        InteractionState, MessageBoxId, OpenAppRequest, ParentWindow, WindowId, WindowRecord,
        WindowRect,
    },
    reducer::RuntimeEffect,
    surfaces::{shared_surfaces, SharedSurfaces, TaskbarEntry},
    window_manager::{OpenAppOutcome, WindowManager},
};

const FRAME_PUMP_INTERVAL: Duration = Duration::from_millis(50);

/// Long-lived container of a desktop's window manager and message box manager.
pub struct DesktopRuntime {
    windows: Rc<RefCell<WindowManager>>,
    dialogs: MessageBoxManager,
    surfaces: SharedSurfaces,
    sender: FrameSender,
    receiver: RefCell<FrameReceiver>,
}

impl DesktopRuntime {
    pub fn new(config: RuntimeConfig, host: HostServices) -> Self {
        let surfaces = shared_surfaces();
        let dialogs = MessageBoxManager::new(&config, Rc::clone(&surfaces));
        let windows = WindowManager::new(config, host, Rc::clone(&surfaces));
        let (sender, receiver) = frame_channel();
        Self {
            windows: Rc::new(RefCell::new(windows)),
            dialogs,
            surfaces,
            sender,
            receiver: RefCell::new(receiver),
        }
    }

    pub fn windows(&self) -> &Rc<RefCell<WindowManager>> {
        &self.windows
    }

    pub fn dialogs(&self) -> &MessageBoxManager {
        &self.dialogs
    }

    pub fn surfaces(&self) -> &SharedSurfaces {
        &self.surfaces
    }

    /// Sender feeding the frame channel; browser listeners push decoded messages here.
    pub fn frame_sender(&self) -> FrameSender {
        self.sender.clone()
    }

    pub fn open_app(&self, request: impl Into<OpenAppRequest>) -> OpenAppOutcome {
        self.windows.borrow_mut().open_app(request)
    }

    /// Capability for the app hosted in `window_id`; `None` for unknown windows.
    pub fn app_context(&self, window_id: WindowId) -> Option<AppContext> {
        let handshake = {
            let windows = self.windows.borrow();
            let window = windows.window(window_id)?;
            HostMessage::WindowInfo {
                window_id: window_id.0,
                app_name: window.app.to_string(),
            }
        };
        Some(AppContext {
            window: WindowContext::from_handshake(&handshake, self.sender.clone()),
            dialogs: self.dialogs.clone(),
            windows: Rc::downgrade(&self.windows),
        })
    }

    /// Relays every queued frame message to command subscribers and returns how many were relayed.
    ///
    /// Subscribers run with the window manager released, so they may operate on it.
    pub fn pump_frame_messages(&self) -> usize {
        let mut relayed = 0;
        let queued = self.receiver.borrow_mut().drain();
        for message in queued {
            let (event, bus) = {
                let windows = self.windows.borrow();
                (
                    windows.resolve_frame_message(&message),
                    windows.commands().clone(),
                )
            };
            match event {
                Some(event) => {
                    bus.publish(&event);
                    relayed += 1;
                }
                None => leptos::logging::warn!(
                    "dropping command for unknown window {}",
                    message.window_id()
                ),
            }
        }
        relayed
    }

    /// Queues an untyped inbound payload; anything but a window command is ignored.
    pub fn accept_raw_frame_message(&self, raw: &Value) -> bool {
        desktop_app_contract::FrameMessage::from_json(raw)
            .is_some_and(|message| self.sender.send(message).is_ok())
    }

    /// Drains render effects of both managers, windows first.
    pub fn take_effects(&self) -> Vec<RuntimeEffect> {
        let mut effects = self.windows.borrow_mut().take_effects();
        effects.extend(self.dialogs.take_effects());
        effects
    }

    pub fn set_viewport(&self, viewport: WindowRect) {
        self.windows.borrow_mut().set_viewport(viewport);
        self.dialogs.set_viewport(viewport);
    }
}

#[derive(Debug, Clone)]
/// What an embedded app may do: address its own window and ask the user questions.
pub struct AppContext {
    window: WindowContext,
    dialogs: MessageBoxManager,
    windows: Weak<RefCell<WindowManager>>,
}

impl AppContext {
    pub fn window(&self) -> &WindowContext {
        &self.window
    }

    pub fn window_id(&self) -> WindowId {
        WindowId(self.window.window_id())
    }

    pub fn dialogs(&self) -> &MessageBoxManager {
        &self.dialogs
    }

    /// Geometry of the hosting window for dialog placement.
    ///
    /// `None` once the window or the runtime is gone, or while the window manager is busy.
    pub fn parent_window(&self) -> Option<ParentWindow> {
        let windows = self.windows.upgrade()?;
        let manager = windows.try_borrow().ok()?;
        manager.parent_window(self.window_id())
    }

    /// # Errors
    ///
    /// Returns [`ChannelError::Closed`] once the runtime is dropped.
    pub fn send_command(&self, command: impl Into<String>, data: Value) -> Result<(), ChannelError> {
        self.window.send_command(command, data)
    }

    /// Tells the user a required input is missing.
    pub fn notify_missing_input(&self, message: &str) -> MessageBoxFuture {
        self.dialogs.info(message, None, None, self.parent_window())
    }
}

#[derive(Clone, Copy)]
/// Leptos context for reading desktop state and running manager operations.
///
/// The managers own their state; `revision` is bumped after every operation so views re-read it.
pub struct DesktopRuntimeContext {
    pub runtime: StoredValue<Rc<DesktopRuntime>>,
    pub revision: RwSignal<u64>,
    /// Render effects awaiting the executor.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Message box currently flashing for attention.
    pub flashing: RwSignal<Option<MessageBoxId>>,
}

impl DesktopRuntimeContext {
    /// Wraps `runtime` in signals owned by the current reactive scope.
    pub fn new(runtime: DesktopRuntime) -> Self {
        Self {
            runtime: store_value(Rc::new(runtime)),
            revision: create_rw_signal(0),
            effects: create_rw_signal(Vec::new()),
            flashing: create_rw_signal(None),
        }
    }

    pub fn runtime(&self) -> Rc<DesktopRuntime> {
        self.runtime.get_value()
    }

    /// Runs `operation`, queues the render effects it produced and notifies views.
    pub fn apply<T>(&self, operation: impl FnOnce(&DesktopRuntime) -> T) -> T {
        let runtime = self.runtime();
        let output = operation(&runtime);
        self.publish(runtime.take_effects());
        output
    }

    pub fn with_windows<T>(&self, operation: impl FnOnce(&mut WindowManager) -> T) -> T {
        self.apply(|runtime| operation(&mut runtime.windows().borrow_mut()))
    }

    pub fn with_dialogs<T>(&self, operation: impl FnOnce(&MessageBoxManager) -> T) -> T {
        self.apply(|runtime| operation(runtime.dialogs()))
    }

    /// Relays queued frame commands; views are notified only when something happened.
    pub fn pump_frames(&self) -> usize {
        let runtime = self.runtime();
        let relayed = runtime.pump_frame_messages();
        let effects = runtime.take_effects();
        if relayed > 0 || !effects.is_empty() {
            self.publish(effects);
        }
        relayed
    }

    fn publish(&self, effects: Vec<RuntimeEffect>) {
        if !effects.is_empty() {
            self.effects.update(|queue| queue.extend(effects));
        }
        self.revision.update(|revision| *revision = revision.wrapping_add(1));
    }

    pub fn windows(&self) -> Vec<WindowRecord> {
        self.revision
            .with(|_| self.runtime().windows().borrow().state().windows.clone())
    }

    pub fn window(&self, window_id: WindowId) -> Option<WindowRecord> {
        self.revision
            .with(|_| self.runtime().windows().borrow().window(window_id).cloned())
    }

    /// Front visible window, the one drawn as focused.
    pub fn front_window_id(&self) -> Option<WindowId> {
        self.revision.with(|_| {
            self.runtime()
                .windows()
                .borrow()
                .state()
                .front_window()
                .map(|w| w.id)
        })
    }

    pub fn dialogs(&self) -> Vec<MessageBoxRecord> {
        self.revision.with(|_| self.runtime().dialogs().records())
    }

    pub fn dialog(&self, dialog_id: MessageBoxId) -> Option<MessageBoxRecord> {
        self.revision
            .with(|_| self.runtime().dialogs().record(dialog_id))
    }

    pub fn font_preview(&self, dialog_id: MessageBoxId) -> Option<FontPreview> {
        self.revision
            .with(|_| self.runtime().dialogs().font_preview(dialog_id))
    }

    pub fn taskbar_entries(&self) -> Vec<TaskbarEntry> {
        self.revision
            .with(|_| self.runtime().surfaces().borrow().entries().to_vec())
    }

    /// Window drag and resize sessions, read without tracking.
    pub fn interaction(&self) -> InteractionState {
        self.runtime().windows().borrow().interaction().clone()
    }
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components and restores the saved layout.
pub fn DesktopProvider(
    /// Host service bundle assembled by the entry layer.
    host_services: HostServices,
    #[prop(optional)] config: Option<RuntimeConfig>,
    children: Children,
) -> impl IntoView {
    let runtime = DesktopRuntimeContext::new(DesktopRuntime::new(
        config.unwrap_or_default(),
        host_services,
    ));
    provide_context(runtime);

    effect_executor::install(runtime);
    runtime.with_windows(|windows| windows.restore_window_state());

    if let Ok(interval) = set_interval_with_handle(
        move || {
            runtime.pump_frames();
        },
        FRAME_PUMP_INTERVAL,
    ) {
        on_cleanup(move || interval.clear());
    }

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
