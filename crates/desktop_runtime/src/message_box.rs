//! Message boxes: placement, button sets, custom content, drag, stacking and result resolution.
//!
//! Dialogs share the z-order counter and the taskbar registry with windows through
//! [`SharedSurfaces`], but never touch window records; a parent window is passed in as a
//! [`ParentWindow`] geometry value.

mod font_dialog;
mod resolution;

use std::{cell::RefCell, collections::BTreeMap, fmt, rc::Rc};

use desktop_app_contract::{
    FontSelection, MessageBoxIcon, MessageBoxResponse, MessageBoxResult, MessageBoxType,
};
use serde_json::{Map, Value};

pub use font_dialog::{
    font_dialog_rows, initial_form, preview_from_form, selection_from_form, selection_payload,
    FontChoice, FontDialogOptions, FontDialogRow, FontPreview, FontStyleOption, FAMILY_SELECT_ID,
    PREVIEW_ID, PREVIEW_SAMPLE, SIZE_SELECT_ID, STYLE_SELECT_ID,
};
pub use resolution::{MessageBoxFuture, ResultCallback};

use crate::{
    config::RuntimeConfig,
    model::{DisplayState, MessageBoxId, ParentWindow, PointerPosition, WindowRect},
    reducer::RuntimeEffect,
    surfaces::{
        front_surface, SharedSurfaces, Surface, SurfaceKind, TaskbarDescriptor, TaskbarKey,
    },
};
use resolution::ResultListeners;

const DEFAULT_TITLE: &str = "Windows";
const FONT_DIALOG_TITLE: &str = "Font";
const FONT_DIALOG_WIDTH: i32 = 450;
const FONT_DIALOG_HEIGHT: i32 = 400;

/// Hook receiving the id of the message box it was registered on.
pub type LifecycleHook = Box<dyn FnOnce(MessageBoxId)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dimension {
    /// Sized by content; placement assumes the configured dialog size.
    #[default]
    Auto,
    Px(i32),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Body rendered instead of icon + message.
pub enum CustomContent {
    #[default]
    None,
    /// Caller-supplied markup; its form fields are harvested as a JSON object.
    Markup(String),
    /// The built-in font-selection template with default options.
    DefaultTemplate,
    FontDialog(FontDialogOptions),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageBoxKind {
    Plain,
    Custom,
    FontDialog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What the content area of a box shows.
pub enum MessageBoxBody {
    /// Icon and message text.
    Plain,
    /// Caller-supplied markup, injected as-is.
    Markup(String),
    FontDialog(FontDialogOptions),
}

impl MessageBoxBody {
    pub fn kind(&self) -> MessageBoxKind {
        match self {
            Self::Plain => MessageBoxKind::Plain,
            Self::Markup(_) => MessageBoxKind::Custom,
            Self::FontDialog(_) => MessageBoxKind::FontDialog,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageBoxPhase {
    Created,
    Shown,
    Minimized,
}

#[derive(Debug, Clone, PartialEq)]
/// One live message box.
pub struct MessageBoxRecord {
    pub id: MessageBoxId,
    pub title: String,
    pub message: String,
    pub box_type: MessageBoxType,
    pub icon: MessageBoxIcon,
    pub modal: bool,
    pub draggable: bool,
    pub in_taskbar: bool,
    /// Placement; `w`/`h` are the assumed size when the CSS dimension is `auto`.
    pub rect: WindowRect,
    pub width: Dimension,
    pub height: Dimension,
    pub phase: MessageBoxPhase,
    pub z_order: u32,
    pub focused_button: MessageBoxResult,
    pub body: MessageBoxBody,
    /// Custom-content form state, field id to value.
    pub form: BTreeMap<String, String>,
}

impl MessageBoxRecord {
    pub fn surface(&self) -> Surface {
        Surface {
            kind: SurfaceKind::Dialog,
            geometry: self.rect,
            display: match self.phase {
                MessageBoxPhase::Minimized => DisplayState::Minimized {
                    restore_maximized: false,
                },
                MessageBoxPhase::Created | MessageBoxPhase::Shown => DisplayState::Normal,
            },
            z_order: self.z_order,
        }
    }

    pub fn is_minimized(&self) -> bool {
        self.phase == MessageBoxPhase::Minimized
    }

    pub fn kind(&self) -> MessageBoxKind {
        self.body.kind()
    }

    fn harvest(&self) -> Option<Value> {
        match self.kind() {
            MessageBoxKind::Plain => None,
            MessageBoxKind::Custom => Some(Value::Object(
                self.form
                    .iter()
                    .map(|(field, value)| (field.clone(), Value::String(value.clone())))
                    .collect::<Map<String, Value>>(),
            )),
            MessageBoxKind::FontDialog => selection_payload(&self.form),
        }
    }
}

/// Options of [`MessageBoxManager::show`].
pub struct MessageBoxConfig {
    pub title: String,
    pub message: String,
    /// Button set; `None` means OK for [`MessageBoxManager::show`] and OK/Cancel for
    /// [`MessageBoxManager::show_custom`].
    pub box_type: Option<MessageBoxType>,
    pub icon: MessageBoxIcon,
    pub modal: bool,
    pub parent_window: Option<ParentWindow>,
    pub show_in_taskbar: bool,
    pub custom_content: CustomContent,
    pub width: Dimension,
    pub height: Dimension,
    pub draggable: bool,
    pub default_button: Option<MessageBoxResult>,
    pub on_show: Option<LifecycleHook>,
    pub on_close: Option<LifecycleHook>,
    pub callback: Option<ResultCallback>,
}

impl Default for MessageBoxConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            message: String::new(),
            box_type: None,
            icon: MessageBoxIcon::None,
            modal: false,
            parent_window: None,
            show_in_taskbar: true,
            custom_content: CustomContent::None,
            width: Dimension::Auto,
            height: Dimension::Auto,
            draggable: true,
            default_button: None,
            on_show: None,
            on_close: None,
            callback: None,
        }
    }
}

impl fmt::Debug for MessageBoxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBoxConfig")
            .field("title", &self.title)
            .field("message", &self.message)
            .field("box_type", &self.box_type)
            .field("icon", &self.icon)
            .field("modal", &self.modal)
            .field("parent_window", &self.parent_window)
            .field("custom_content", &self.custom_content)
            .finish_non_exhaustive()
    }
}

impl MessageBoxConfig {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_type(mut self, box_type: MessageBoxType) -> Self {
        self.box_type = Some(box_type);
        self
    }

    pub fn with_icon(mut self, icon: MessageBoxIcon) -> Self {
        self.icon = icon;
        self
    }

    /// Centres the box on `parent` instead of the screen.
    pub fn modal_to(mut self, parent: ParentWindow) -> Self {
        self.modal = true;
        self.parent_window = Some(parent);
        self
    }

    pub fn with_parent(mut self, parent: Option<ParentWindow>) -> Self {
        self.parent_window = parent;
        self
    }

    pub fn with_taskbar(mut self, show_in_taskbar: bool) -> Self {
        self.show_in_taskbar = show_in_taskbar;
        self
    }

    pub fn with_custom_content(mut self, content: CustomContent) -> Self {
        self.custom_content = content;
        self
    }

    pub fn with_size(mut self, width: Dimension, height: Dimension) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn with_default_button(mut self, result: MessageBoxResult) -> Self {
        self.default_button = Some(result);
        self
    }

    pub fn on_show(mut self, hook: impl FnOnce(MessageBoxId) + 'static) -> Self {
        self.on_show = Some(Box::new(hook));
        self
    }

    pub fn on_close(mut self, hook: impl FnOnce(MessageBoxId) + 'static) -> Self {
        self.on_close = Some(Box::new(hook));
        self
    }

    pub fn with_callback(mut self, callback: impl FnOnce(&MessageBoxResponse) + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }
}

/// Options of [`MessageBoxManager::show_font_dialog`].
pub struct FontDialogConfig {
    pub options: FontDialogOptions,
    pub title: String,
    pub parent_window: Option<ParentWindow>,
    pub width: Dimension,
    pub height: Dimension,
    /// Receives the selection; only called when the dialog is confirmed with OK.
    pub callback: Option<Box<dyn FnOnce(FontSelection)>>,
}

impl Default for FontDialogConfig {
    fn default() -> Self {
        Self {
            options: FontDialogOptions::default(),
            title: FONT_DIALOG_TITLE.to_string(),
            parent_window: None,
            width: Dimension::Px(FONT_DIALOG_WIDTH),
            height: Dimension::Px(FONT_DIALOG_HEIGHT),
            callback: None,
        }
    }
}

impl FontDialogConfig {
    pub fn with_callback(mut self, callback: impl FnOnce(FontSelection) + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }
}

struct LiveBox {
    record: MessageBoxRecord,
    listeners: ResultListeners,
    on_close: Option<LifecycleHook>,
}

#[derive(Debug, Clone, Copy)]
struct DialogDrag {
    dialog_id: MessageBoxId,
    pointer_start: PointerPosition,
    rect_start: WindowRect,
}

struct MessageBoxState {
    viewport: WindowRect,
    dialog_width: i32,
    dialog_height: i32,
    next_id: u64,
    boxes: Vec<LiveBox>,
    drag: Option<DialogDrag>,
    effects: Vec<RuntimeEffect>,
}

impl MessageBoxState {
    fn live(&self, dialog_id: MessageBoxId) -> Option<&LiveBox> {
        self.boxes.iter().find(|b| b.record.id == dialog_id)
    }

    fn record_mut(&mut self, dialog_id: MessageBoxId) -> Option<&mut MessageBoxRecord> {
        self.boxes
            .iter_mut()
            .map(|b| &mut b.record)
            .find(|r| r.id == dialog_id)
    }

    fn resolve_dimension(dimension: Dimension, fallback: i32) -> i32 {
        match dimension {
            Dimension::Auto => fallback,
            Dimension::Px(px) => px,
        }
    }
}

#[derive(Clone)]
/// Handle to the message boxes of one desktop; clones share the same boxes.
///
/// Callbacks and hooks always run after internal state is released, so they may call back into
/// the manager (for example to show a follow-up dialog).
pub struct MessageBoxManager {
    state: Rc<RefCell<MessageBoxState>>,
    surfaces: SharedSurfaces,
}

impl fmt::Debug for MessageBoxManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBoxManager")
            .field("open", &self.open_count())
            .finish_non_exhaustive()
    }
}

impl MessageBoxManager {
    pub fn new(config: &RuntimeConfig, surfaces: SharedSurfaces) -> Self {
        Self {
            state: Rc::new(RefCell::new(MessageBoxState {
                viewport: config.viewport,
                dialog_width: config.dialog_width,
                dialog_height: config.dialog_height,
                next_id: 1,
                boxes: Vec::new(),
                drag: None,
                effects: Vec::new(),
            })),
            surfaces,
        }
    }

    pub fn set_viewport(&self, viewport: WindowRect) {
        self.state.borrow_mut().viewport = viewport;
    }

    pub fn open_count(&self) -> usize {
        self.state.borrow().boxes.len()
    }

    /// Live records in creation order.
    pub fn records(&self) -> Vec<MessageBoxRecord> {
        self.state
            .borrow()
            .boxes
            .iter()
            .map(|b| b.record.clone())
            .collect()
    }

    pub fn record(&self, dialog_id: MessageBoxId) -> Option<MessageBoxRecord> {
        self.state
            .borrow()
            .live(dialog_id)
            .map(|b| b.record.clone())
    }

    /// Drains queued render effects in emission order.
    pub fn take_effects(&self) -> Vec<RuntimeEffect> {
        std::mem::take(&mut self.state.borrow_mut().effects)
    }

    /// Shows a message box and returns the awaitable answer.
    ///
    /// The optional callback and the returned future observe the same terminal answer.
    pub fn show(&self, config: MessageBoxConfig) -> MessageBoxFuture {
        let MessageBoxConfig {
            title,
            message,
            box_type,
            icon,
            modal,
            parent_window,
            show_in_taskbar,
            custom_content,
            width,
            height,
            draggable,
            default_button,
            on_show,
            on_close,
            callback,
        } = config;

        let (body, form) = match custom_content {
            CustomContent::None => (MessageBoxBody::Plain, BTreeMap::new()),
            CustomContent::Markup(markup) => (MessageBoxBody::Markup(markup), BTreeMap::new()),
            CustomContent::DefaultTemplate => {
                let options = FontDialogOptions::default();
                let form = initial_form(&options);
                (MessageBoxBody::FontDialog(options), form)
            }
            CustomContent::FontDialog(options) => {
                let form = initial_form(&options);
                (MessageBoxBody::FontDialog(options), form)
            }
        };

        let z_order = self.surfaces.borrow_mut().allocate_front();
        let mut listeners = ResultListeners::default();
        if let Some(callback) = callback {
            listeners.push(callback);
        }
        let future = listeners.awaitable();
        let box_type = box_type.unwrap_or(MessageBoxType::Ok);
        let focused_button = default_button
            .filter(|result| box_type.offers(*result))
            .unwrap_or_else(|| box_type.primary());

        let dialog_id = {
            let mut state = self.state.borrow_mut();
            let dialog_id = MessageBoxId(state.next_id);
            state.next_id += 1;

            let w = MessageBoxState::resolve_dimension(width, state.dialog_width);
            let h = MessageBoxState::resolve_dimension(height, state.dialog_height);
            let rect = match parent_window {
                Some(parent) if modal => parent.rect.centered(w, h),
                _ => state.viewport.centered(w, h),
            };

            state.boxes.push(LiveBox {
                record: MessageBoxRecord {
                    id: dialog_id,
                    title: title.clone(),
                    message,
                    box_type,
                    icon,
                    modal,
                    draggable,
                    in_taskbar: show_in_taskbar,
                    rect,
                    width,
                    height,
                    phase: MessageBoxPhase::Created,
                    z_order,
                    focused_button,
                    body,
                    form,
                },
                listeners,
                on_close,
            });
            state.effects.push(RuntimeEffect::FocusDialogButton {
                dialog_id,
                result: focused_button,
            });
            dialog_id
        };

        if show_in_taskbar {
            self.surfaces.borrow_mut().register_entry(
                TaskbarKey::Dialog(dialog_id),
                TaskbarDescriptor {
                    title,
                    icon: icon.taskbar_asset_path().to_string(),
                },
            );
        }
        if let Some(record) = self.state.borrow_mut().record_mut(dialog_id) {
            record.phase = MessageBoxPhase::Shown;
        }
        self.sync_dialog_activation();

        if let Some(on_show) = on_show {
            on_show(dialog_id);
        }
        future
    }

    fn show_preset(
        &self,
        message: &str,
        title: &str,
        box_type: MessageBoxType,
        icon: MessageBoxIcon,
        callback: Option<ResultCallback>,
        parent: Option<ParentWindow>,
    ) -> MessageBoxFuture {
        let mut config = MessageBoxConfig::new(message)
            .with_title(title)
            .with_type(box_type)
            .with_icon(icon)
            .with_parent(parent);
        config.callback = callback;
        self.show(config)
    }

    pub fn info(
        &self,
        message: &str,
        title: Option<&str>,
        callback: Option<ResultCallback>,
        parent: Option<ParentWindow>,
    ) -> MessageBoxFuture {
        self.show_preset(
            message,
            title.unwrap_or("Information"),
            MessageBoxType::Ok,
            MessageBoxIcon::Info,
            callback,
            parent,
        )
    }

    pub fn warning(
        &self,
        message: &str,
        title: Option<&str>,
        callback: Option<ResultCallback>,
        parent: Option<ParentWindow>,
    ) -> MessageBoxFuture {
        self.show_preset(
            message,
            title.unwrap_or("Warning"),
            MessageBoxType::Ok,
            MessageBoxIcon::Warning,
            callback,
            parent,
        )
    }

    pub fn error(
        &self,
        message: &str,
        title: Option<&str>,
        callback: Option<ResultCallback>,
        parent: Option<ParentWindow>,
    ) -> MessageBoxFuture {
        self.show_preset(
            message,
            title.unwrap_or("Error"),
            MessageBoxType::Ok,
            MessageBoxIcon::Error,
            callback,
            parent,
        )
    }

    pub fn success(
        &self,
        message: &str,
        title: Option<&str>,
        callback: Option<ResultCallback>,
        parent: Option<ParentWindow>,
    ) -> MessageBoxFuture {
        self.show_preset(
            message,
            title.unwrap_or("Success"),
            MessageBoxType::Ok,
            MessageBoxIcon::Success,
            callback,
            parent,
        )
    }

    /// Yes / No question.
    pub fn confirm(
        &self,
        message: &str,
        title: Option<&str>,
        callback: Option<ResultCallback>,
        parent: Option<ParentWindow>,
    ) -> MessageBoxFuture {
        self.show_preset(
            message,
            title.unwrap_or("Confirm"),
            MessageBoxType::YesNo,
            MessageBoxIcon::Question,
            callback,
            parent,
        )
    }

    /// OK / Cancel question.
    pub fn confirm_cancel(
        &self,
        message: &str,
        title: Option<&str>,
        callback: Option<ResultCallback>,
        parent: Option<ParentWindow>,
    ) -> MessageBoxFuture {
        self.show_preset(
            message,
            title.unwrap_or("Confirm"),
            MessageBoxType::OkCancel,
            MessageBoxIcon::Question,
            callback,
            parent,
        )
    }

    /// Shows custom content; an OK/Cancel set unless the caller picked another type.
    ///
    /// Without custom content the built-in font template is used.
    pub fn show_custom(&self, mut config: MessageBoxConfig) -> MessageBoxFuture {
        config.box_type.get_or_insert(MessageBoxType::OkCancel);
        if config.custom_content == CustomContent::None {
            config.custom_content = CustomContent::DefaultTemplate;
        }
        self.show(config)
    }

    pub fn show_font_dialog(&self, config: FontDialogConfig) -> MessageBoxFuture {
        let FontDialogConfig {
            options,
            title,
            parent_window,
            width,
            height,
            callback,
        } = config;
        let mut custom = MessageBoxConfig::new(String::new())
            .with_title(title)
            .with_parent(parent_window)
            .with_size(width, height)
            .with_custom_content(CustomContent::FontDialog(options));
        if let Some(callback) = callback {
            custom = custom.with_callback(move |response: &MessageBoxResponse| {
                if let Some(selection) = FontSelection::from_response(response) {
                    callback(selection);
                }
            });
        }
        self.show_custom(custom)
    }

    /// Resolves the box with a button's result. Results outside the box's button set are ignored.
    pub fn click_button(&self, dialog_id: MessageBoxId, result: MessageBoxResult) -> bool {
        let data = {
            let state = self.state.borrow();
            let Some(live) = state.live(dialog_id) else {
                return false;
            };
            if !live.record.box_type.offers(result) {
                leptos::logging::warn!(
                    "{dialog_id} has no `{}` button; click ignored",
                    result.token()
                );
                return false;
            }
            live.record.harvest()
        };
        self.finish(dialog_id, MessageBoxResponse::with_data(result, data))
    }

    /// Title bar ✕: resolves with `Cancel` and no data, whatever the button set.
    pub fn click_close(&self, dialog_id: MessageBoxId) -> bool {
        self.finish(dialog_id, MessageBoxResponse::new(MessageBoxResult::Cancel))
    }

    /// Tears down every live box, resolving each pending answer as dismissed.
    pub fn close_all(&self) -> usize {
        let ids: Vec<MessageBoxId> = self
            .state
            .borrow()
            .boxes
            .iter()
            .map(|b| b.record.id)
            .collect();
        let closed = ids
            .into_iter()
            .filter(|id| self.finish(*id, MessageBoxResponse::dismissed()))
            .count();
        if closed > 0 {
            leptos::logging::log!("dismissed {closed} message box(es)");
        }
        closed
    }

    fn finish(&self, dialog_id: MessageBoxId, response: MessageBoxResponse) -> bool {
        let live = {
            let mut state = self.state.borrow_mut();
            let Some(index) = state.boxes.iter().position(|b| b.record.id == dialog_id) else {
                return false;
            };
            let live = state.boxes.remove(index);
            if state.drag.is_some_and(|drag| drag.dialog_id == dialog_id) {
                state.drag = None;
            }
            state.effects.push(RuntimeEffect::DiscardDialog(dialog_id));
            live
        };
        self.surfaces
            .borrow_mut()
            .remove_entry(&TaskbarKey::Dialog(dialog_id));
        self.sync_dialog_activation();

        let LiveBox {
            listeners,
            on_close,
            ..
        } = live;
        listeners.fire(&response);
        if let Some(on_close) = on_close {
            on_close(dialog_id);
        }
        true
    }

    fn raise(&self, dialog_id: MessageBoxId) -> bool {
        let z_order = self.surfaces.borrow_mut().allocate_front();
        let mut state = self.state.borrow_mut();
        let Some(record) = state.record_mut(dialog_id) else {
            return false;
        };
        record.z_order = z_order;
        record.phase = MessageBoxPhase::Shown;
        true
    }

    /// Click inside a box: un-minimizes and raises it.
    pub fn focus(&self, dialog_id: MessageBoxId) {
        if self.raise(dialog_id) {
            self.sync_dialog_activation();
        }
    }

    /// Title bar double-click: minimizes, or restores and raises, without resolving.
    pub fn toggle_minimized(&self, dialog_id: MessageBoxId) {
        let minimized = {
            let mut state = self.state.borrow_mut();
            let Some(record) = state.record_mut(dialog_id) else {
                return;
            };
            if record.is_minimized() {
                false
            } else {
                record.phase = MessageBoxPhase::Minimized;
                true
            }
        };
        if !minimized {
            self.raise(dialog_id);
        }
        self.sync_dialog_activation();
    }

    /// Taskbar entry click: restores if needed, raises and flashes the box.
    pub fn click_taskbar_entry(&self, dialog_id: MessageBoxId) {
        if !self.raise(dialog_id) {
            return;
        }
        self.state
            .borrow_mut()
            .effects
            .push(RuntimeEffect::FlashDialog(dialog_id));
        self.sync_dialog_activation();
    }

    /// Records a form field change of custom content.
    pub fn set_form_field(
        &self,
        dialog_id: MessageBoxId,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(record) = state.record_mut(dialog_id) else {
            return false;
        };
        record.form.insert(field.into(), value.into());
        true
    }

    /// Preview styling of a font dialog's current selection.
    pub fn font_preview(&self, dialog_id: MessageBoxId) -> Option<FontPreview> {
        let state = self.state.borrow();
        let record = &state.live(dialog_id)?.record;
        match record.kind() {
            MessageBoxKind::FontDialog => preview_from_form(&record.form),
            MessageBoxKind::Plain | MessageBoxKind::Custom => None,
        }
    }

    /// Starts a title bar drag; ignored for non-draggable boxes.
    pub fn begin_drag(&self, dialog_id: MessageBoxId, pointer: PointerPosition) {
        let draggable = self
            .state
            .borrow()
            .live(dialog_id)
            .is_some_and(|b| b.record.draggable);
        if !draggable || !self.raise(dialog_id) {
            return;
        }
        {
            let mut state = self.state.borrow_mut();
            let rect_start = match state.live(dialog_id) {
                Some(live) => live.record.rect,
                None => return,
            };
            state.drag = Some(DialogDrag {
                dialog_id,
                pointer_start: pointer,
                rect_start,
            });
        }
        self.sync_dialog_activation();
    }

    /// Moves the dragged box, keeping it inside the viewport.
    pub fn update_drag(&self, pointer: PointerPosition) {
        let mut state = self.state.borrow_mut();
        let Some(drag) = state.drag else {
            return;
        };
        let viewport = state.viewport;
        if let Some(record) = state.record_mut(drag.dialog_id) {
            record.rect = drag
                .rect_start
                .offset(
                    pointer.x.saturating_sub(drag.pointer_start.x),
                    pointer.y.saturating_sub(drag.pointer_start.y),
                )
                .clamped_within(viewport);
        }
    }

    pub fn end_drag(&self) {
        self.state.borrow_mut().drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().drag.is_some()
    }

    /// Activates the front visible box's taskbar entry; clears dialog activation when that box
    /// has no entry or every box is minimized.
    fn sync_dialog_activation(&self) {
        let front = {
            let state = self.state.borrow();
            let front = front_surface(state.boxes.iter().map(|b| b.record.surface()));
            front.and_then(|surface| {
                state
                    .boxes
                    .iter()
                    .find(|b| b.record.z_order == surface.z_order)
                    .map(|b| (b.record.id, b.record.in_taskbar))
            })
        };
        let mut surfaces = self.surfaces.borrow_mut();
        match front {
            Some((dialog_id, true)) => surfaces.set_active(&TaskbarKey::Dialog(dialog_id)),
            _ => surfaces.clear_active(SurfaceKind::Dialog),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{model::WindowId, surfaces::shared_surfaces};

    fn manager() -> MessageBoxManager {
        MessageBoxManager::new(&RuntimeConfig::default(), shared_surfaces())
    }

    fn only_id(manager: &MessageBoxManager) -> MessageBoxId {
        manager.records()[0].id
    }

    fn entry_active(manager: &MessageBoxManager, dialog_id: MessageBoxId) -> Option<bool> {
        manager
            .surfaces
            .borrow()
            .entry(&TaskbarKey::Dialog(dialog_id))
            .map(|e| e.active)
    }

    #[test]
    fn show_centres_on_screen_focuses_primary_and_activates_entry() {
        let manager = manager();
        let mut future = manager.show(
            MessageBoxConfig::new("Replace?").with_type(MessageBoxType::AbortRetryIgnore),
        );
        let record = manager.records()[0].clone();

        assert_eq!(record.phase, MessageBoxPhase::Shown);
        assert_eq!(
            record.rect,
            WindowRect {
                x: 460,
                y: 320,
                w: 360,
                h: 160
            }
        );
        assert_eq!(record.focused_button, MessageBoxResult::Retry);
        assert_eq!(entry_active(&manager, record.id), Some(true));
        assert_eq!(
            manager.take_effects(),
            vec![RuntimeEffect::FocusDialogButton {
                dialog_id: record.id,
                result: MessageBoxResult::Retry,
            }]
        );
        assert_eq!(future.try_response(), None);
    }

    #[test]
    fn default_button_outside_the_set_falls_back_to_primary() {
        let manager = manager();
        let _ = manager.show(
            MessageBoxConfig::new("?")
                .with_type(MessageBoxType::YesNo)
                .with_default_button(MessageBoxResult::Cancel),
        );
        assert_eq!(manager.records()[0].focused_button, MessageBoxResult::Yes);

        let _ = manager.show(
            MessageBoxConfig::new("?")
                .with_type(MessageBoxType::YesNoCancel)
                .with_default_button(MessageBoxResult::Cancel),
        );
        assert_eq!(manager.records()[1].focused_button, MessageBoxResult::Cancel);
    }

    #[test]
    fn close_button_resolves_cancel_for_callback_and_future() {
        let manager = manager();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let future = manager.confirm(
            "Save changes?",
            None,
            Some(Box::new(move |response: &MessageBoxResponse| {
                sink.borrow_mut().push(response.clone())
            })),
            None,
        );
        let dialog_id = only_id(&manager);
        assert_eq!(manager.records()[0].title, "Confirm");

        assert!(manager.click_close(dialog_id));
        assert!(!manager.click_close(dialog_id));

        let expected = MessageBoxResponse::new(MessageBoxResult::Cancel);
        assert_eq!(*seen.borrow(), vec![expected.clone()]);
        assert_eq!(block_on(future), expected);
        assert_eq!(manager.open_count(), 0);
        assert!(manager.surfaces.borrow().entries().is_empty());
    }

    #[test]
    fn buttons_outside_the_set_do_not_resolve() {
        let manager = manager();
        let mut future = manager.info("Saved", None, None, None);
        let dialog_id = only_id(&manager);

        assert!(!manager.click_button(dialog_id, MessageBoxResult::Cancel));
        assert_eq!(future.try_response(), None);
        assert!(manager.click_button(dialog_id, MessageBoxResult::Ok));
        assert_eq!(
            future.try_response(),
            Some(MessageBoxResponse::new(MessageBoxResult::Ok))
        );
    }

    #[test]
    fn custom_content_keeps_an_explicit_ok_button_set() {
        let manager = manager();
        let mut future = manager.show_custom(
            MessageBoxConfig::new("")
                .with_type(MessageBoxType::Ok)
                .with_custom_content(CustomContent::Markup("<p>Done</p>".to_string())),
        );
        let dialog_id = only_id(&manager);
        assert_eq!(manager.records()[0].box_type, MessageBoxType::Ok);

        assert!(!manager.click_button(dialog_id, MessageBoxResult::Cancel));
        assert!(manager.click_button(dialog_id, MessageBoxResult::Ok));
        assert_eq!(
            future.try_response().map(|r| r.result),
            Some(MessageBoxResult::Ok)
        );
    }

    #[test]
    fn custom_markup_harvests_form_fields() {
        let manager = manager();
        let future = manager.show_custom(MessageBoxConfig::new("").with_custom_content(
            CustomContent::Markup("<input id=\"find\">".to_string()),
        ));
        let dialog_id = only_id(&manager);
        assert_eq!(manager.records()[0].box_type, MessageBoxType::OkCancel);
        assert_eq!(
            manager.records()[0].body,
            MessageBoxBody::Markup("<input id=\"find\">".to_string())
        );

        manager.set_form_field(dialog_id, "find", "needle");
        manager.click_button(dialog_id, MessageBoxResult::Ok);

        assert_eq!(
            block_on(future).data,
            Some(json!({ "find": "needle" }))
        );
    }

    #[test]
    fn font_dialog_reports_typed_selection_only_on_ok() {
        let manager = manager();
        let picked = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&picked);
        let future = manager.show_font_dialog(
            FontDialogConfig::default().with_callback(move |selection| {
                sink.borrow_mut().push(selection)
            }),
        );
        let dialog_id = only_id(&manager);
        let record = manager.records()[0].clone();
        assert_eq!(record.title, "Font");
        assert_eq!((record.rect.w, record.rect.h), (450, 400));

        manager.set_form_field(dialog_id, STYLE_SELECT_ID, "bold");
        assert_eq!(
            manager.font_preview(dialog_id).map(|p| p.font_weight),
            Some("bold")
        );
        manager.set_form_field(dialog_id, STYLE_SELECT_ID, "regular");
        manager.click_button(dialog_id, MessageBoxResult::Ok);

        assert_eq!(
            block_on(future).data,
            Some(json!({
                "fontFamily": "Consolas",
                "fontSize": 16,
                "fontStyle": "regular",
            }))
        );
        assert_eq!(picked.borrow().len(), 1);

        let _ = manager.show_font_dialog(FontDialogConfig::default().with_callback({
            let sink = Rc::clone(&picked);
            move |selection| sink.borrow_mut().push(selection)
        }));
        manager.click_button(only_id(&manager), MessageBoxResult::Cancel);
        assert_eq!(picked.borrow().len(), 1);
    }

    #[test]
    fn parent_placement_applies_only_to_modal_boxes() {
        let manager = manager();
        let parent = ParentWindow {
            window_id: WindowId(1),
            rect: WindowRect {
                x: 100,
                y: 100,
                w: 800,
                h: 600,
            },
        };
        let _ = manager.warning("Low disk", None, None, Some(parent));
        let _ = manager.show(MessageBoxConfig::new("Modal").modal_to(parent));
        let records = manager.records();

        assert_eq!((records[0].rect.x, records[0].rect.y), (460, 320));
        assert_eq!((records[1].rect.x, records[1].rect.y), (320, 320));
    }

    #[test]
    fn minimizing_moves_activation_and_taskbar_click_restores_with_flash() {
        let manager = manager();
        let _ = manager.info("first", None, None, None);
        let _ = manager.info("second", None, None, None);
        let ids: Vec<MessageBoxId> = manager.records().iter().map(|r| r.id).collect();
        assert_eq!(entry_active(&manager, ids[1]), Some(true));

        manager.toggle_minimized(ids[1]);
        assert_eq!(entry_active(&manager, ids[1]), Some(false));
        assert_eq!(entry_active(&manager, ids[0]), Some(true));
        manager.take_effects();

        manager.click_taskbar_entry(ids[1]);
        let record = manager.record(ids[1]);
        assert_eq!(record.map(|r| r.phase), Some(MessageBoxPhase::Shown));
        assert_eq!(entry_active(&manager, ids[1]), Some(true));
        assert_eq!(
            manager.take_effects(),
            vec![RuntimeEffect::FlashDialog(ids[1])]
        );
    }

    #[test]
    fn dialogs_without_taskbar_entry_clear_dialog_activation_when_in_front() {
        let manager = manager();
        let _ = manager.info("listed", None, None, None);
        let _ = manager.show(MessageBoxConfig::new("unlisted").with_taskbar(false));
        let ids: Vec<MessageBoxId> = manager.records().iter().map(|r| r.id).collect();

        assert_eq!(entry_active(&manager, ids[0]), Some(false));
        manager.focus(ids[0]);
        assert_eq!(entry_active(&manager, ids[0]), Some(true));
    }

    #[test]
    fn drag_is_clamped_to_viewport_and_requires_draggable() {
        let manager = manager();
        let _ = manager.info("drag me", None, None, None);
        let dialog_id = only_id(&manager);

        manager.begin_drag(dialog_id, PointerPosition { x: 500, y: 330 });
        assert!(manager.is_dragging());
        manager.update_drag(PointerPosition { x: -500, y: 5000 });
        manager.end_drag();
        assert!(!manager.is_dragging());
        let rect = manager.records()[0].rect;
        assert_eq!((rect.x, rect.y), (0, 800 - 160));

        let _ = manager.show(MessageBoxConfig::new("pinned").with_draggable(false));
        let pinned = manager.records()[1].id;
        manager.begin_drag(pinned, PointerPosition { x: 0, y: 0 });
        manager.update_drag(PointerPosition { x: 50, y: 50 });
        assert_eq!(manager.record(pinned).map(|r| r.rect.x), Some(460));
    }

    #[test]
    fn close_all_dismisses_pending_answers_and_runs_close_hooks() {
        let manager = manager();
        let closed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&closed);
        let first = manager.show(MessageBoxConfig::new("a").on_close(move |id| {
            sink.borrow_mut().push(id)
        }));
        let second = manager.confirm("b", None, None, None);

        assert_eq!(manager.close_all(), 2);
        assert_eq!(block_on(first), MessageBoxResponse::dismissed());
        assert_eq!(block_on(second), MessageBoxResponse::dismissed());
        assert_eq!(closed.borrow().len(), 1);
        assert_eq!(manager.open_count(), 0);
    }

    #[test]
    fn callbacks_may_show_follow_up_dialogs() {
        let manager = manager();
        let handle = manager.clone();
        let _ = manager.confirm(
            "Delete file?",
            None,
            Some(Box::new(move |response: &MessageBoxResponse| {
                if response.result == MessageBoxResult::Yes {
                    let _ = handle.success("Deleted", None, None, None);
                }
            })),
            None,
        );
        manager.click_button(only_id(&manager), MessageBoxResult::Yes);

        let records = manager.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Success");
        assert_eq!(entry_active(&manager, records[0].id), Some(true));
    }
}
