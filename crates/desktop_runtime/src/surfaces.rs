//! Shared stacking counter and taskbar registry for windows and message boxes.
//!
//! Both managers draw z-order values from one [`SurfaceRegistry`], so every live surface has a
//! unique, totally ordered z-order. Taskbar entries are keyed per surface kind; activation is
//! exclusive within a kind and never touches entries of the other kind.

use std::{cell::RefCell, rc::Rc};

use crate::model::{AppIdentity, DisplayState, MessageBoxId, WindowRect};

/// First value of the z-order counter; the first surface raised receives `Z_ORDER_BASE + 1`.
pub const Z_ORDER_BASE: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Window,
    Dialog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Common stacking view of a window or a message box.
pub struct Surface {
    pub kind: SurfaceKind,
    pub geometry: WindowRect,
    pub display: DisplayState,
    pub z_order: u32,
}

/// Returns the non-minimized surface with the greatest z-order.
pub fn front_surface(surfaces: impl IntoIterator<Item = Surface>) -> Option<Surface> {
    surfaces
        .into_iter()
        .filter(|surface| !surface.display.is_minimized())
        .max_by_key(|surface| surface.z_order)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskbarKey {
    /// All windows of one application share an entry.
    App(AppIdentity),
    /// Each message box shown in the taskbar owns an entry.
    Dialog(MessageBoxId),
}

impl TaskbarKey {
    pub fn kind(&self) -> SurfaceKind {
        match self {
            Self::App(_) => SurfaceKind::Window,
            Self::Dialog(_) => SurfaceKind::Dialog,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarDescriptor {
    pub title: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarEntry {
    pub key: TaskbarKey,
    pub title: String,
    pub icon: String,
    pub active: bool,
    /// Number of surfaces sharing the entry; always 1 for dialogs.
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceRegistry {
    z_counter: u32,
    entries: Vec<TaskbarEntry>,
}

impl Default for SurfaceRegistry {
    fn default() -> Self {
        Self {
            z_counter: Z_ORDER_BASE,
            entries: Vec::new(),
        }
    }
}

impl SurfaceRegistry {
    /// Issues the next z-order value, above everything issued before.
    pub fn allocate_front(&mut self) -> u32 {
        self.z_counter = self.z_counter.saturating_add(1);
        self.z_counter
    }

    /// Most recently issued z-order value.
    pub fn current_front(&self) -> u32 {
        self.z_counter
    }

    /// Adds a surface to the entry for `key`, creating the entry (inactive) on first use.
    ///
    /// Returns the entry's count afterwards.
    pub fn register_entry(&mut self, key: TaskbarKey, descriptor: TaskbarDescriptor) -> usize {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            entry.count += 1;
            return entry.count;
        }
        self.entries.push(TaskbarEntry {
            key,
            title: descriptor.title,
            icon: descriptor.icon,
            active: false,
            count: 1,
        });
        1
    }

    /// Removes one surface from the entry for `key`; the entry disappears at zero.
    ///
    /// Returns the remaining count.
    pub fn release_entry(&mut self, key: &TaskbarKey) -> usize {
        let Some(index) = self.entries.iter().position(|e| &e.key == key) else {
            return 0;
        };
        let remaining = self.entries[index].count.saturating_sub(1);
        if remaining == 0 {
            self.entries.remove(index);
        } else {
            self.entries[index].count = remaining;
        }
        remaining
    }

    /// Drops the entry regardless of its count.
    pub fn remove_entry(&mut self, key: &TaskbarKey) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.key != key);
        self.entries.len() != before
    }

    /// Activates `key` and deactivates its siblings of the same kind.
    pub fn set_active(&mut self, key: &TaskbarKey) {
        if self.entry(key).is_none() {
            return;
        }
        let kind = key.kind();
        for entry in self.entries.iter_mut().filter(|e| e.key.kind() == kind) {
            entry.active = &entry.key == key;
        }
    }

    pub fn set_inactive(&mut self, key: &TaskbarKey) {
        if let Some(entry) = self.entries.iter_mut().find(|e| &e.key == key) {
            entry.active = false;
        }
    }

    pub fn clear_active(&mut self, kind: SurfaceKind) {
        for entry in self.entries.iter_mut().filter(|e| e.key.kind() == kind) {
            entry.active = false;
        }
    }

    pub fn entry(&self, key: &TaskbarKey) -> Option<&TaskbarEntry> {
        self.entries.iter().find(|e| &e.key == key)
    }

    /// Entries in taskbar order (first registration first).
    pub fn entries(&self) -> &[TaskbarEntry] {
        &self.entries
    }

    pub fn active_entry(&self, kind: SurfaceKind) -> Option<&TaskbarEntry> {
        self.entries
            .iter()
            .find(|e| e.active && e.key.kind() == kind)
    }
}

/// Registry handle shared by the window manager and the message box manager.
pub type SharedSurfaces = Rc<RefCell<SurfaceRegistry>>;

pub fn shared_surfaces() -> SharedSurfaces {
    Rc::new(RefCell::new(SurfaceRegistry::default()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn descriptor(title: &str) -> TaskbarDescriptor {
        TaskbarDescriptor {
            title: title.to_string(),
            icon: format!("{title}.png"),
        }
    }

    fn app(name: &str) -> TaskbarKey {
        TaskbarKey::App(AppIdentity::new(name))
    }

    #[test]
    fn allocations_are_strictly_increasing_from_base() {
        let mut registry = SurfaceRegistry::default();
        assert_eq!(registry.current_front(), Z_ORDER_BASE);
        let first = registry.allocate_front();
        let second = registry.allocate_front();
        assert_eq!(first, Z_ORDER_BASE + 1);
        assert!(second > first);
        assert_eq!(registry.current_front(), second);
    }

    #[test]
    fn entry_counts_track_registrations() {
        let mut registry = SurfaceRegistry::default();
        assert_eq!(registry.register_entry(app("Notepad"), descriptor("Notepad")), 1);
        assert_eq!(registry.register_entry(app("Notepad"), descriptor("Notepad")), 2);

        assert_eq!(registry.release_entry(&app("Notepad")), 1);
        assert_eq!(registry.entry(&app("Notepad")).map(|e| e.count), Some(1));
        assert_eq!(registry.release_entry(&app("Notepad")), 0);
        assert!(registry.entry(&app("Notepad")).is_none());
        assert_eq!(registry.release_entry(&app("Notepad")), 0);
    }

    #[test]
    fn activation_is_exclusive_within_a_kind_only() {
        let mut registry = SurfaceRegistry::default();
        let dialog = TaskbarKey::Dialog(MessageBoxId(1));
        registry.register_entry(app("Notepad"), descriptor("Notepad"));
        registry.register_entry(app("This Pc"), descriptor("This Pc"));
        registry.register_entry(dialog.clone(), descriptor("Windows"));

        registry.set_active(&dialog);
        registry.set_active(&app("Notepad"));
        registry.set_active(&app("This Pc"));

        assert_eq!(
            registry
                .active_entry(SurfaceKind::Window)
                .map(|e| e.key.clone()),
            Some(app("This Pc"))
        );
        assert!(!registry.entry(&app("Notepad")).map_or(true, |e| e.active));
        assert!(registry.entry(&dialog).map_or(false, |e| e.active));

        registry.clear_active(SurfaceKind::Window);
        assert!(registry.active_entry(SurfaceKind::Window).is_none());
        assert!(registry.active_entry(SurfaceKind::Dialog).is_some());
    }

    #[test]
    fn front_surface_skips_minimized() {
        let surface = |z_order, display| Surface {
            kind: SurfaceKind::Window,
            geometry: WindowRect::default(),
            display,
            z_order,
        };
        let front = front_surface([
            surface(1001, DisplayState::Normal),
            surface(
                1003,
                DisplayState::Minimized {
                    restore_maximized: false,
                },
            ),
            surface(1002, DisplayState::Maximized),
        ]);
        assert_eq!(front.map(|s| s.z_order), Some(1002));
    }
}
