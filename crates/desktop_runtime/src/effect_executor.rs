//! Runtime effect-queue executor for render effects emitted by manager operations.

use leptos::*;

use crate::{
    components::dialog_button_dom_id, model::MessageBoxId, reducer::RuntimeEffect,
    runtime_context::DesktopRuntimeContext,
};

#[cfg(target_arch = "wasm32")]
const FLASH_DURATION: std::time::Duration = std::time::Duration::from_millis(600);

/// Installs the executor that drains queued render effects in order.
pub fn install(runtime: DesktopRuntimeContext) {
    // Clear the queue before processing so effects emitted while draining land in a fresh batch.
    create_effect(move |_| {
        let queued = runtime.effects.get();
        if queued.is_empty() {
            return;
        }

        runtime.effects.set(Vec::new());

        for effect in queued {
            run_runtime_effect(runtime, effect);
        }
    });
}

pub(crate) fn run_runtime_effect(runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
    match effect {
        // Busy and frame effects already ran on the host; window visibility follows the revision.
        RuntimeEffect::SetBusy(_)
        | RuntimeEffect::PostToFrame { .. }
        | RuntimeEffect::RevealWindow(_)
        | RuntimeEffect::DiscardWindow(_) => {}
        RuntimeEffect::DiscardDialog(dialog_id) => {
            if runtime.flashing.get_untracked() == Some(dialog_id) {
                runtime.flashing.set(None);
            }
        }
        RuntimeEffect::FlashDialog(dialog_id) => {
            runtime.flashing.set(Some(dialog_id));
            clear_flash_later(runtime, dialog_id);
        }
        RuntimeEffect::FocusDialogButton { dialog_id, result } => {
            if !focus_element_by_id(&dialog_button_dom_id(dialog_id, result)) {
                logging::warn!("no button `{}` to focus on {dialog_id}", result.token());
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn clear_flash_later(runtime: DesktopRuntimeContext, dialog_id: MessageBoxId) {
    set_timeout(
        move || {
            if runtime.flashing.get_untracked() == Some(dialog_id) {
                runtime.flashing.set(None);
            }
        },
        FLASH_DURATION,
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn clear_flash_later(_: DesktopRuntimeContext, _: MessageBoxId) {}

#[cfg(target_arch = "wasm32")]
fn focus_element_by_id(id: &str) -> bool {
    use wasm_bindgen::JsCast;

    let Some(element) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(id))
    else {
        return false;
    };
    match element.dyn_into::<web_sys::HtmlElement>() {
        Ok(element) => element.focus().is_ok(),
        Err(_) => false,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn focus_element_by_id(_: &str) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::MessageBoxResult;
    use platform_host::HostServices;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{config::RuntimeConfig, runtime_context::DesktopRuntime};

    #[test]
    fn flash_is_cleared_when_its_dialog_is_discarded() {
        let reactive = create_runtime();
        let runtime = DesktopRuntimeContext::new(DesktopRuntime::new(
            RuntimeConfig::default(),
            HostServices::noop(),
        ));

        run_runtime_effect(runtime, RuntimeEffect::FlashDialog(MessageBoxId(2)));
        assert_eq!(runtime.flashing.get_untracked(), Some(MessageBoxId(2)));

        run_runtime_effect(runtime, RuntimeEffect::DiscardDialog(MessageBoxId(5)));
        assert_eq!(runtime.flashing.get_untracked(), Some(MessageBoxId(2)));

        run_runtime_effect(
            runtime,
            RuntimeEffect::FocusDialogButton {
                dialog_id: MessageBoxId(2),
                result: MessageBoxResult::Ok,
            },
        );
        run_runtime_effect(runtime, RuntimeEffect::DiscardDialog(MessageBoxId(2)));
        assert_eq!(runtime.flashing.get_untracked(), None);

        reactive.dispose();
    }
}
