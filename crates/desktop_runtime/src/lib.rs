pub mod command_bus;
pub mod components;
pub mod config;
mod effect_executor;
pub mod message_box;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod runtime_context;
pub mod surfaces;
pub mod window_manager;

pub use command_bus::{CommandBus, ListenerId, WindowCommandEvent};
pub use components::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext, DesktopShell};
pub use config::{RuntimeConfig, WINDOW_STATE_KEY};
pub use message_box::{
    CustomContent, Dimension, FontDialogConfig, FontDialogOptions, MessageBoxBody,
    MessageBoxConfig, MessageBoxFuture, MessageBoxManager, MessageBoxRecord,
};
pub use model::*;
pub use persistence::{load_window_state, persist_window_state, WindowStateRecord};
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use runtime_context::{AppContext, DesktopRuntime};
pub use surfaces::{SharedSurfaces, SurfaceRegistry, TaskbarEntry, TaskbarKey};
pub use window_manager::{OpenAppOutcome, WindowManager};
