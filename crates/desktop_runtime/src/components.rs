//! Desktop shell UI composition: window frames, message boxes and the taskbar.

mod message_box;
mod taskbar;
mod window;

use desktop_app_contract::MessageBoxResult;
use leptos::*;

use self::{message_box::MessageBoxView, taskbar::Taskbar, window::DesktopWindow};
use crate::{
    message_box::{Dimension, MessageBoxRecord},
    model::{MessageBoxId, PointerPosition, ResizeEdge, WindowRecord, WindowRect},
    surfaces::TaskbarKey,
};

pub use crate::runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};

const RESIZE_EDGES: [ResizeEdge; 8] = [
    ResizeEdge::North,
    ResizeEdge::South,
    ResizeEdge::East,
    ResizeEdge::West,
    ResizeEdge::NorthEast,
    ResizeEdge::NorthWest,
    ResizeEdge::SouthEast,
    ResizeEdge::SouthWest,
];

/// DOM id of one of a message box's buttons; focus effects target it.
pub(crate) fn dialog_button_dom_id(dialog_id: MessageBoxId, result: MessageBoxResult) -> String {
    format!("{dialog_id}-button-{}", result.token())
}

fn taskbar_entry_dom_id(key: &TaskbarKey) -> String {
    match key {
        TaskbarKey::App(app) => format!("taskbar-app-{}", app.as_str().replace(' ', "-")),
        TaskbarKey::Dialog(dialog_id) => format!("taskbar-{dialog_id}"),
    }
}

fn rect_style(rect: WindowRect, z_order: u32) -> String {
    format!(
        "left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};",
        rect.x, rect.y, rect.w, rect.h, z_order
    )
}

fn window_class(window: &WindowRecord, front: bool) -> String {
    let mut class = String::from("desktop-window");
    if front {
        class.push_str(" focused");
    }
    if !window.revealed {
        class.push_str(" loading");
    }
    if window.display.is_minimized() {
        class.push_str(" minimized");
    }
    if window.display.is_maximized() {
        class.push_str(" maximized");
    }
    class
}

fn css_dimension(dimension: Dimension) -> String {
    match dimension {
        Dimension::Auto => "auto".to_string(),
        Dimension::Px(px) => format!("{px}px"),
    }
}

fn message_box_style(record: &MessageBoxRecord) -> String {
    format!(
        "left:{}px;top:{}px;width:{};height:{};z-index:{};",
        record.rect.x,
        record.rect.y,
        css_dimension(record.width),
        css_dimension(record.height),
        record.z_order
    )
}

fn message_box_class(record: &MessageBoxRecord, flashing: bool) -> String {
    let mut class = String::from("win-message-box acrylic-effect");
    if record.modal {
        class.push_str(" modal");
    }
    if record.is_minimized() {
        class.push_str(" minimized");
    }
    if flashing {
        class.push_str(" flash");
    }
    class
}

fn taskbar_button_class(active: bool) -> &'static str {
    if active {
        "taskbar-app active"
    } else {
        "taskbar-app"
    }
}

/// Lines of a plain message; the view joins them with `<br>`.
fn message_lines(message: &str) -> Vec<String> {
    message.split('\n').map(str::to_string).collect()
}

fn stop_mouse_event(ev: &web_sys::MouseEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

fn pointer_from_pointer_event(ev: &web_sys::PointerEvent) -> PointerPosition {
    PointerPosition {
        x: ev.client_x(),
        y: ev.client_y(),
    }
}

/// Primary button for mice, primary contact for touch and pen.
fn is_primary_pointer(ev: &web_sys::PointerEvent) -> bool {
    if ev.pointer_type() == "mouse" {
        ev.button() == 0
    } else {
        ev.is_primary()
    }
}

fn resize_edge_class(edge: ResizeEdge) -> &'static str {
    match edge {
        ResizeEdge::North => "edge-n",
        ResizeEdge::South => "edge-s",
        ResizeEdge::East => "edge-e",
        ResizeEdge::West => "edge-w",
        ResizeEdge::NorthEast => "edge-ne",
        ResizeEdge::NorthWest => "edge-nw",
        ResizeEdge::SouthEast => "edge-se",
        ResizeEdge::SouthWest => "edge-sw",
    }
}

fn update_active_pointer_interaction(runtime: DesktopRuntimeContext, pointer: PointerPosition) {
    let interaction = runtime.interaction();
    let dialog_drag = runtime.runtime().dialogs().is_dragging();
    if interaction.dragging.is_none() && interaction.resizing.is_none() && !dialog_drag {
        return;
    }
    runtime.apply(|desktop| {
        {
            let mut windows = desktop.windows().borrow_mut();
            if interaction.dragging.is_some() {
                windows.update_move(pointer);
            }
            if interaction.resizing.is_some() {
                windows.update_resize(pointer);
            }
        }
        if dialog_drag {
            desktop.dialogs().update_drag(pointer);
        }
    });
}

fn end_active_pointer_interaction(runtime: DesktopRuntimeContext) {
    let interaction = runtime.interaction();
    let dialog_drag = runtime.runtime().dialogs().is_dragging();
    if interaction.dragging.is_none() && interaction.resizing.is_none() && !dialog_drag {
        return;
    }
    runtime.apply(|desktop| {
        {
            let mut windows = desktop.windows().borrow_mut();
            if interaction.dragging.is_some() {
                windows.end_move();
            }
            if interaction.resizing.is_some() {
                windows.end_resize();
            }
        }
        if dialog_drag {
            desktop.dialogs().end_drag();
        }
    });
}

#[cfg(target_arch = "wasm32")]
fn browser_viewport() -> Option<WindowRect> {
    let window = web_sys::window()?;
    let w = window.inner_width().ok()?.as_f64()?;
    let h = window.inner_height().ok()?.as_f64()?;
    Some(WindowRect {
        x: 0,
        y: 0,
        w: w as i32,
        h: h as i32,
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn browser_viewport() -> Option<WindowRect> {
    None
}

#[component]
/// Renders the desktop shell: the window layer, message boxes and the taskbar.
pub fn DesktopShell() -> impl IntoView {
    let runtime = use_desktop_runtime();

    let sync_viewport = move || {
        if let Some(viewport) = browser_viewport() {
            runtime.apply(|desktop| desktop.set_viewport(viewport));
        }
    };
    sync_viewport();
    let resize_listener = window_event_listener(ev::resize, move |_| sync_viewport());
    on_cleanup(move || resize_listener.remove());

    let unload_listener = window_event_listener(ev::beforeunload, move |_| {
        let _ = runtime.runtime().windows().borrow().save_window_state();
    });
    on_cleanup(move || unload_listener.remove());

    let on_pointer_move = move |ev: web_sys::PointerEvent| {
        update_active_pointer_interaction(runtime, pointer_from_pointer_event(&ev));
    };
    let on_pointer_end = move |_| end_active_pointer_interaction(runtime);

    view! {
        <div
            id="desktop-shell-root"
            class="desktop-shell"
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_end
            on:pointercancel=on_pointer_end
        >
            <div class="desktop-window-layer">
                <For each=move || runtime.windows() key=|win| win.id.0 let:win>
                    <DesktopWindow window_id=win.id />
                </For>
            </div>
            <div class="message-box-layer">
                <For each=move || runtime.dialogs() key=|record| record.id.0 let:record>
                    <MessageBoxView dialog_id=record.id />
                </For>
            </div>
            <Taskbar />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{AppIdentity, CreateWindowSpec, DisplayState, OpenAppRequest, WindowId};

    fn window(display: DisplayState, revealed: bool) -> WindowRecord {
        let spec = CreateWindowSpec::from_request(&OpenAppRequest::new("Notepad"));
        WindowRecord {
            id: WindowId(1),
            app: spec.app,
            title: spec.title,
            icon: spec.icon,
            content: spec.content,
            rect: spec.rect,
            restore_rect: spec.rect,
            display,
            z_order: 1001,
            loading: !revealed,
            revealed,
        }
    }

    #[test]
    fn window_class_reflects_focus_and_display() {
        assert_eq!(
            window_class(&window(DisplayState::Maximized, true), true),
            "desktop-window focused maximized"
        );
        assert_eq!(
            window_class(
                &window(
                    DisplayState::Minimized {
                        restore_maximized: false
                    },
                    false
                ),
                false
            ),
            "desktop-window loading minimized"
        );
    }

    #[test]
    fn geometry_becomes_inline_style() {
        let rect = WindowRect {
            x: 40,
            y: 60,
            w: 640,
            h: 480,
        };
        assert_eq!(
            rect_style(rect, 1004),
            "left:40px;top:60px;width:640px;height:480px;z-index:1004;"
        );
        assert_eq!(css_dimension(Dimension::Auto), "auto");
        assert_eq!(css_dimension(Dimension::Px(450)), "450px");
    }

    #[test]
    fn message_text_is_split_into_literal_lines() {
        assert_eq!(
            message_lines("Save <notes.txt>?\nChanges & all"),
            vec!["Save <notes.txt>?".to_string(), "Changes & all".to_string()]
        );
    }

    #[test]
    fn dom_ids_are_scoped_by_surface() {
        assert_eq!(
            dialog_button_dom_id(MessageBoxId(3), MessageBoxResult::Cancel),
            "msgbox-3-button-cancel"
        );
        assert_eq!(
            taskbar_entry_dom_id(&TaskbarKey::App(AppIdentity::new("This Pc"))),
            "taskbar-app-This-Pc"
        );
        assert_eq!(
            taskbar_entry_dom_id(&TaskbarKey::Dialog(MessageBoxId(3))),
            "taskbar-msgbox-3"
        );
        assert_eq!(taskbar_button_class(true), "taskbar-app active");
        assert_eq!(resize_edge_class(ResizeEdge::SouthWest), "edge-sw");
    }
}
