//! Synchronous fan-out of window commands relayed from embedded content.

use std::{cell::RefCell, fmt, rc::Rc};

use serde_json::Value;

use crate::model::WindowRecord;

#[derive(Debug, Clone, PartialEq)]
/// A command posted by embedded content, resolved against its hosting window.
pub struct WindowCommandEvent {
    /// Snapshot of the hosting window at relay time.
    pub window: WindowRecord,
    pub command: String,
    pub data: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn(&WindowCommandEvent)>;

#[derive(Default)]
struct BusState {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

#[derive(Clone, Default)]
/// Subscriber list for [`WindowCommandEvent`]s; clones share the same subscribers.
pub struct CommandBus {
    inner: Rc<RefCell<BusState>>,
}

impl fmt::Debug for CommandBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl CommandBus {
    pub fn subscribe(&self, listener: impl Fn(&WindowCommandEvent) + 'static) -> ListenerId {
        let mut state = self.inner.borrow_mut();
        state.next_id += 1;
        let id = ListenerId(state.next_id);
        state.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut state = self.inner.borrow_mut();
        let before = state.listeners.len();
        state.listeners.retain(|(listener_id, _)| *listener_id != id);
        state.listeners.len() != before
    }

    /// Calls every listener in subscription order and returns how many were called.
    ///
    /// Listeners may subscribe or unsubscribe re-entrantly; changes apply from the next publish.
    pub fn publish(&self, event: &WindowCommandEvent) -> usize {
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::{
        AppIdentity, DisplayState, WindowContent, WindowId, WindowRect,
    };

    fn event(command: &str) -> WindowCommandEvent {
        WindowCommandEvent {
            window: WindowRecord {
                id: WindowId(1),
                app: AppIdentity::new("Notepad"),
                title: "Notepad".to_string(),
                icon: String::new(),
                content: WindowContent::Markup(String::new()),
                rect: WindowRect::default(),
                restore_rect: WindowRect::default(),
                display: DisplayState::Normal,
                z_order: 1001,
                loading: false,
                revealed: true,
            },
            command: command.to_string(),
            data: json!({ "n": 1 }),
        }
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let bus = CommandBus::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second"] {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |event| {
                seen.borrow_mut().push(format!("{tag}:{}", event.command));
            });
        }

        assert_eq!(bus.publish(&event("save")), 2);
        assert_eq!(
            *seen.borrow(),
            vec!["first:save".to_string(), "second:save".to_string()]
        );
    }

    #[test]
    fn unsubscribed_listeners_stop_receiving() {
        let bus = CommandBus::default();
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let id = bus.subscribe(move |_| *counter.borrow_mut() += 1);

        bus.publish(&event("a"));
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.publish(&event("b")), 0);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn listeners_added_during_publish_wait_for_next_event() {
        let bus = CommandBus::default();
        let late_hits = Rc::new(RefCell::new(0));
        let handle = bus.clone();
        let hits = Rc::clone(&late_hits);
        bus.subscribe(move |_| {
            let hits = Rc::clone(&hits);
            handle.subscribe(move |_| *hits.borrow_mut() += 1);
        });

        assert_eq!(bus.publish(&event("a")), 1);
        assert_eq!(*late_hits.borrow(), 0);
        assert_eq!(bus.listener_count(), 2);
    }
}
