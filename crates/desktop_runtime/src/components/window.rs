use super::*;
use crate::model::{WindowContent, WindowId};
use desktop_app_contract::frame_element_id;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

#[cfg(target_arch = "wasm32")]
fn try_set_pointer_capture(ev: &web_sys::PointerEvent) {
    if let Some(target) = ev.current_target() {
        if let Ok(element) = target.dyn_into::<web_sys::Element>() {
            let _ = element.set_pointer_capture(ev.pointer_id());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn try_set_pointer_capture(_: &web_sys::PointerEvent) {}

fn stop_pointer_event(ev: &web_sys::PointerEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

#[component]
pub(super) fn DesktopWindow(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();

    let window = create_memo(move |_| runtime.window(window_id));
    let content = create_memo(move |_| window.get().map(|w| w.content));
    let front = create_memo(move |_| runtime.front_window_id() == Some(window_id));
    let maximized = create_memo(move |_| {
        window
            .get()
            .is_some_and(|w| w.display.is_maximized())
    });

    let focus = move |_: web_sys::PointerEvent| {
        if !front.get_untracked() {
            runtime.with_windows(|windows| windows.bring_to_front(window_id));
        }
    };
    let minimize = move || runtime.with_windows(|windows| windows.minimize(window_id));
    let close = move || runtime.with_windows(|windows| windows.close(window_id));
    let toggle_maximize = move || runtime.with_windows(|windows| windows.toggle_maximize(window_id));
    let begin_move = move |ev: web_sys::PointerEvent| {
        if !is_primary_pointer(&ev) {
            return;
        }
        try_set_pointer_capture(&ev);
        stop_pointer_event(&ev);
        let pointer = pointer_from_pointer_event(&ev);
        runtime.with_windows(|windows| windows.begin_move(window_id, pointer));
    };
    let titlebar_double_click = move |ev: web_sys::MouseEvent| {
        stop_mouse_event(&ev);
        toggle_maximize();
    };

    view! {
        <section
            id=window_id.to_string()
            class=move || {
                window
                    .get()
                    .map(|w| window_class(&w, front.get()))
                    .unwrap_or_default()
            }
            style=move || {
                window
                    .get()
                    .map(|w| rect_style(w.rect, w.z_order))
                    .unwrap_or_default()
            }
            on:pointerdown=focus
            role="dialog"
            aria-label=move || window.get().map(|w| w.title).unwrap_or_default()
        >
            <header
                class="titlebar"
                on:pointerdown=begin_move
                on:dblclick=titlebar_double_click
            >
                <div class="titlebar-title">
                    <img
                        class="titlebar-app-icon"
                        src=move || window.get().map(|w| w.icon).unwrap_or_default()
                        alt=""
                        aria-hidden="true"
                    />
                    <span>{move || window.get().map(|w| w.title).unwrap_or_default()}</span>
                </div>
                <div class="titlebar-controls">
                    <button
                        aria-label="Minimize window"
                        on:pointerdown=move |ev| stop_pointer_event(&ev)
                        on:mousedown=move |ev| stop_mouse_event(&ev)
                        on:click=move |ev| {
                            stop_mouse_event(&ev);
                            minimize();
                        }
                    >
                        "─"
                    </button>
                    <button
                        aria-label=move || {
                            if maximized.get() { "Restore window" } else { "Maximize window" }
                        }
                        on:pointerdown=move |ev| stop_pointer_event(&ev)
                        on:mousedown=move |ev| stop_mouse_event(&ev)
                        on:click=move |ev| {
                            stop_mouse_event(&ev);
                            toggle_maximize();
                        }
                    >
                        {move || if maximized.get() { "❐" } else { "□" }}
                    </button>
                    <button
                        aria-label="Close window"
                        on:pointerdown=move |ev| stop_pointer_event(&ev)
                        on:mousedown=move |ev| stop_mouse_event(&ev)
                        on:click=move |ev| {
                            stop_mouse_event(&ev);
                            close();
                        }
                    >
                        "✕"
                    </button>
                </div>
            </header>
            <div class="window-body">
                {move || {
                    content
                        .get()
                        .map(|content| view! { <WindowBody window_id=window_id content=content /> })
                }}
            </div>
            <Show when=move || !maximized.get() fallback=|| ()>
                {RESIZE_EDGES
                    .into_iter()
                    .map(|edge| view! { <WindowResizeHandle window_id=window_id edge=edge /> })
                    .collect_view()}
            </Show>
        </section>
    }
}

#[component]
fn WindowResizeHandle(window_id: WindowId, edge: ResizeEdge) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let class_name = format!("window-resize-handle {}", resize_edge_class(edge));

    let on_pointerdown = move |ev: web_sys::PointerEvent| {
        if !is_primary_pointer(&ev) {
            return;
        }
        try_set_pointer_capture(&ev);
        stop_pointer_event(&ev);
        let pointer = pointer_from_pointer_event(&ev);
        runtime.with_windows(|windows| windows.begin_resize(window_id, edge, pointer));
    };

    view! {
        <div
            class=class_name
            aria-hidden="true"
            on:pointerdown=on_pointerdown
        />
    }
}

#[component]
fn WindowBody(window_id: WindowId, content: WindowContent) -> impl IntoView {
    let runtime = use_desktop_runtime();

    match content {
        WindowContent::Url(url) => view! {
            <iframe
                id=frame_element_id(window_id.0)
                class="window-frame"
                src=url
                on:load=move |_| runtime.with_windows(|windows| windows.content_loaded(window_id))
                on:error=move |_| runtime.with_windows(|windows| windows.content_failed(window_id))
            />
        }
        .into_view(),
        WindowContent::Markup(markup) => view! {
            <div class="window-body-content" inner_html=markup />
        }
        .into_view(),
    }
}
