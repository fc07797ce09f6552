use super::*;
use crate::surfaces::TaskbarEntry;

#[component]
pub(super) fn Taskbar() -> impl IntoView {
    let runtime = use_desktop_runtime();

    view! {
        <footer
            class="taskbar"
            role="toolbar"
            aria-label="Desktop taskbar"
            on:mousedown=move |ev| ev.stop_propagation()
        >
            <div class="taskbar-running" role="group" aria-label="Open windows and dialogs">
                <For
                    each=move || runtime.taskbar_entries()
                    key=|entry| (entry.key.clone(), entry.active, entry.count, entry.title.clone())
                    let:entry
                >
                    <TaskbarButton entry=entry />
                </For>
            </div>
        </footer>
    }
}

#[component]
fn TaskbarButton(entry: TaskbarEntry) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let TaskbarEntry {
        key,
        title,
        icon,
        active,
        count,
    } = entry;
    let dom_id = taskbar_entry_dom_id(&key);
    let label = if count > 1 {
        format!("{title} ({count} windows)")
    } else {
        title.clone()
    };

    let on_click = move |ev: web_sys::MouseEvent| {
        stop_mouse_event(&ev);
        match &key {
            TaskbarKey::App(app) => runtime.with_windows(|windows| windows.toggle_taskbar_app(app)),
            TaskbarKey::Dialog(dialog_id) => {
                runtime.with_dialogs(|dialogs| dialogs.click_taskbar_entry(*dialog_id))
            }
        }
    };

    view! {
        <button
            id=dom_id
            class=taskbar_button_class(active)
            title=label.clone()
            aria-label=label
            aria-pressed=active.to_string()
            on:click=on_click
        >
            <img class="taskbar-app-icon" src=icon alt="" aria-hidden="true" />
            <span class="taskbar-app-title">{title}</span>
        </button>
    }
}
