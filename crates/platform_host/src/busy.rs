//! Global "busy" indicator shown while any window content is loading.

use std::{cell::Cell, rc::Rc};

/// Host service toggling the desktop-wide busy indicator (the wait cursor in browsers).
pub trait BusyIndicator {
    /// Shows (`true`) or clears (`false`) the indicator.
    fn set_busy(&self, busy: bool);
}

#[derive(Debug, Clone, Copy, Default)]
/// Busy indicator that renders nothing.
pub struct NoopBusyIndicator;

impl BusyIndicator for NoopBusyIndicator {
    fn set_busy(&self, _busy: bool) {}
}

#[derive(Debug, Clone, Default)]
/// Busy indicator that remembers its state; clones share it.
pub struct MemoryBusyIndicator {
    busy: Rc<Cell<bool>>,
    toggles: Rc<Cell<usize>>,
}

impl MemoryBusyIndicator {
    /// Returns whether the indicator is currently shown.
    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Returns how many times the indicator changed state.
    pub fn toggles(&self) -> usize {
        self.toggles.get()
    }
}

impl BusyIndicator for MemoryBusyIndicator {
    fn set_busy(&self, busy: bool) {
        if self.busy.get() != busy {
            self.toggles.set(self.toggles.get() + 1);
        }
        self.busy.set(busy);
    }
}
