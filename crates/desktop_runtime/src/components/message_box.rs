use super::*;
use crate::message_box::{
    font_dialog_rows, FontDialogOptions, MessageBoxBody, MessageBoxKind, PREVIEW_ID,
    PREVIEW_SAMPLE,
};
use desktop_app_contract::MessageBoxIcon;
use wasm_bindgen::JsCast;

/// Id of the form control an input or change event came from.
fn event_target_field(ev: &web_sys::Event) -> Option<String> {
    let id = ev.target()?.dyn_into::<web_sys::Element>().ok()?.id();
    (!id.is_empty()).then_some(id)
}

#[component]
pub(super) fn MessageBoxView(dialog_id: MessageBoxId) -> impl IntoView {
    let runtime = use_desktop_runtime();

    let record = create_memo(move |_| runtime.dialog(dialog_id));
    let body = create_memo(move |_| {
        record
            .get()
            .map(|r| (r.body, r.icon, r.message))
    });
    let box_type = create_memo(move |_| record.get().map(|r| r.box_type));

    let focus = move |_: web_sys::PointerEvent| runtime.with_dialogs(|dialogs| dialogs.focus(dialog_id));
    let begin_drag = move |ev: web_sys::PointerEvent| {
        if !is_primary_pointer(&ev) {
            return;
        }
        ev.prevent_default();
        ev.stop_propagation();
        let pointer = pointer_from_pointer_event(&ev);
        runtime.with_dialogs(|dialogs| dialogs.begin_drag(dialog_id, pointer));
    };
    let toggle_minimized = move |ev: web_sys::MouseEvent| {
        stop_mouse_event(&ev);
        runtime.with_dialogs(|dialogs| dialogs.toggle_minimized(dialog_id));
    };
    let close = move |ev: web_sys::MouseEvent| {
        stop_mouse_event(&ev);
        runtime.with_dialogs(|dialogs| {
            dialogs.click_close(dialog_id);
        });
    };

    view! {
        <div
            id=dialog_id.to_string()
            class=move || {
                record
                    .get()
                    .map(|r| message_box_class(&r, runtime.flashing.get() == Some(dialog_id)))
                    .unwrap_or_default()
            }
            style=move || record.get().map(|r| message_box_style(&r)).unwrap_or_default()
            role="alertdialog"
            aria-modal=move || record.get().is_some_and(|r| r.modal).to_string()
            on:pointerdown=focus
        >
            <div
                class="win-message-box-titlebar"
                on:pointerdown=begin_drag
                on:dblclick=toggle_minimized
            >
                <div class="win-message-box-title">
                    <span>{move || record.get().map(|r| r.title).unwrap_or_default()}</span>
                </div>
                <button
                    class="win-message-box-close"
                    aria-label="Close"
                    on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                    on:click=close
                >
                    "✕"
                </button>
            </div>
            {move || {
                body.get()
                    .map(|(body, icon, message)| {
                        view! { <MessageBoxContent dialog_id=dialog_id body=body icon=icon message=message /> }
                    })
            }}
            <div class="win-message-box-buttons">
                {move || {
                    box_type
                        .get()
                        .map(|box_type| {
                            box_type
                                .buttons()
                                .iter()
                                .map(|button| {
                                    let result = button.result;
                                    view! {
                                        <button
                                            id=dialog_button_dom_id(dialog_id, result)
                                            class=if button.primary {
                                                "win-message-box-button primary"
                                            } else {
                                                "win-message-box-button"
                                            }
                                            data-result=result.token()
                                            on:click=move |ev| {
                                                stop_mouse_event(&ev);
                                                runtime.with_dialogs(|dialogs| {
                                                    dialogs.click_button(dialog_id, result);
                                                });
                                            }
                                        >
                                            {button.label}
                                        </button>
                                    }
                                })
                                .collect_view()
                        })
                }}
            </div>
        </div>
    }
}

#[component]
fn MessageBoxContent(
    dialog_id: MessageBoxId,
    body: MessageBoxBody,
    icon: MessageBoxIcon,
    message: String,
) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let content_class = match body.kind() {
        MessageBoxKind::Plain => "win-message-box-content",
        MessageBoxKind::Custom | MessageBoxKind::FontDialog => {
            "win-message-box-content custom-content"
        }
    };
    let record_field = move |ev: &web_sys::Event| {
        if let Some(field) = event_target_field(ev) {
            let value = event_target_value(ev);
            runtime.with_dialogs(|dialogs| {
                dialogs.set_form_field(dialog_id, field, value);
            });
        }
    };

    let inner = match body {
        MessageBoxBody::Plain => view! {
            {(icon != MessageBoxIcon::None).then(|| view! {
                <div class=format!("win-message-box-icon {}", icon.token())>
                    <img src=icon.asset_path() alt=icon.token() />
                </div>
            })}
            <div class="win-message-box-text">
                {message_lines(&message)
                    .into_iter()
                    .enumerate()
                    .map(|(index, line)| view! { {(index > 0).then(|| view! { <br /> })} {line} })
                    .collect_view()}
            </div>
        }
        .into_view(),
        MessageBoxBody::Markup(markup) => view! {
            <div
                class="custom-markup"
                inner_html=markup
                on:input=move |ev| record_field(&ev)
                on:change=move |ev| record_field(&ev)
            />
        }
        .into_view(),
        MessageBoxBody::FontDialog(options) => view! {
            <FontDialogContent dialog_id=dialog_id options=options />
        }
        .into_view(),
    };

    view! { <div class=content_class>{inner}</div> }
}

#[component]
fn FontDialogContent(dialog_id: MessageBoxId, options: FontDialogOptions) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let preview_style = move || {
        runtime
            .font_preview(dialog_id)
            .map(|preview| preview.to_css())
            .unwrap_or_default()
    };

    view! {
        <div class="font-dialog">
            {font_dialog_rows(&options)
                .into_iter()
                .map(|row| {
                    let field = row.select_id;
                    view! {
                        <div class="font-dialog-row">
                            <div class="font-dialog-label">{row.label}</div>
                            <div class="font-dialog-field">
                                <select
                                    id=field
                                    class=field
                                    size=row.visible_rows.to_string()
                                    on:change=move |ev| {
                                        let value = event_target_value(&ev);
                                        runtime.with_dialogs(|dialogs| {
                                            dialogs.set_form_field(dialog_id, field, value);
                                        });
                                    }
                                >
                                    {row
                                        .choices
                                        .into_iter()
                                        .map(|choice| {
                                            view! {
                                                <option value=choice.value selected=choice.selected>
                                                    {choice.label}
                                                </option>
                                            }
                                        })
                                        .collect_view()}
                                </select>
                            </div>
                        </div>
                    }
                })
                .collect_view()}
            <div class="font-dialog-preview">
                <div class="font-dialog-label">"Sample:"</div>
                <div class="font-preview-box" id=PREVIEW_ID style=preview_style>
                    {PREVIEW_SAMPLE}
                </div>
            </div>
        </div>
    }
}
