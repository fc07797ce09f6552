use desktop_runtime::{use_desktop_runtime, DesktopProvider, DesktopShell};
use leptos::*;
use leptos_meta::*;
use platform_host_web::{build_host_services, install_frame_listener};

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Desktop" />
        <Meta name="description" content="A windowed desktop shell running in the browser." />

        <main class="site-root">
            <DesktopEntry />
        </main>
    }
}

#[component]
pub fn DesktopEntry() -> impl IntoView {
    view! {
        <DesktopProvider host_services=build_host_services()>
            <FrameBridge />
            <DesktopShell />
        </DesktopProvider>
    }
}

/// Forwards window commands posted by embedded content into the runtime's frame channel.
#[component]
fn FrameBridge() -> impl IntoView {
    let runtime = use_desktop_runtime();
    match install_frame_listener(runtime.runtime().frame_sender()) {
        Some(listener) => {
            let listener = store_value(Some(listener));
            on_cleanup(move || listener.set_value(None));
        }
        None => logging::warn!("frame listener unavailable; window commands are ignored"),
    }
}
