//! Host service bundle injected into the desktop shell runtime.

use std::rc::Rc;

use crate::{
    BusyIndicator, FramePort, MemoryBusyIndicator, MemoryFramePort, MemorySlotStore,
    NoopBusyIndicator, NoopFramePort, NoopSlotStore, StateSlotStore,
};

/// Stable host strategy selected for the current composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// Browser-backed adapters.
    Browser,
    /// In-memory adapters for tests and headless embedding.
    Memory,
    /// No-op adapters.
    Noop,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Memory => "memory",
            Self::Noop => "noop",
        }
    }
}

/// Runtime-selected host service bundle.
///
/// All environment-specific service selection happens before this bundle crosses into
/// `desktop_runtime`, which keeps the runtime decoupled from browser adapter details.
#[derive(Clone)]
pub struct HostServices {
    /// Persisted slot store holding the window snapshot.
    pub slots: Rc<dyn StateSlotStore>,
    /// Port delivering handshakes into embedded window content.
    pub frames: Rc<dyn FramePort>,
    /// Desktop-wide busy indicator.
    pub busy: Rc<dyn BusyIndicator>,
    /// Stable strategy identifier for diagnostics.
    pub host_strategy: HostStrategy,
}

impl HostServices {
    /// Bundle whose services do nothing.
    pub fn noop() -> Self {
        Self {
            slots: Rc::new(NoopSlotStore),
            frames: Rc::new(NoopFramePort),
            busy: Rc::new(NoopBusyIndicator),
            host_strategy: HostStrategy::Noop,
        }
    }

    /// Bundle backed by the given in-memory adapters, which callers keep for inspection.
    pub fn memory(
        slots: MemorySlotStore,
        frames: MemoryFramePort,
        busy: MemoryBusyIndicator,
    ) -> Self {
        Self {
            slots: Rc::new(slots),
            frames: Rc::new(frames),
            busy: Rc::new(busy),
            host_strategy: HostStrategy::Memory,
        }
    }
}

impl Default for HostServices {
    fn default() -> Self {
        Self::noop()
    }
}
