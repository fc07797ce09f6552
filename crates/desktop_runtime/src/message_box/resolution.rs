//! Terminal-event fan-out: one message box answer delivered to every result listener.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use desktop_app_contract::MessageBoxResponse;
use futures::channel::oneshot;

/// Callback receiving the `(result, data)` answer of a message box.
pub type ResultCallback = Box<dyn FnOnce(&MessageBoxResponse)>;

#[derive(Default)]
/// Listeners of a single terminal transition; firing consumes them, so each runs at most once.
pub(crate) struct ResultListeners {
    listeners: Vec<ResultCallback>,
}

impl ResultListeners {
    pub(crate) fn push(&mut self, listener: impl FnOnce(&MessageBoxResponse) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Registers the awaitable as the last listener and returns it.
    pub(crate) fn awaitable(&mut self) -> MessageBoxFuture {
        let (sender, receiver) = oneshot::channel();
        self.push(move |response: &MessageBoxResponse| {
            let _ = sender.send(response.clone());
        });
        MessageBoxFuture { receiver }
    }

    pub(crate) fn fire(self, response: &MessageBoxResponse) {
        for listener in self.listeners {
            listener(response);
        }
    }
}

#[must_use = "the answer is only observable by awaiting or polling the future"]
/// Resolves with the message box answer.
///
/// If the manager is dropped with the box still open, the future resolves as dismissed.
pub struct MessageBoxFuture {
    receiver: oneshot::Receiver<MessageBoxResponse>,
}

impl MessageBoxFuture {
    /// Returns the answer if the box has already been resolved.
    pub fn try_response(&mut self) -> Option<MessageBoxResponse> {
        match self.receiver.try_recv() {
            Ok(response) => response,
            Err(oneshot::Canceled) => Some(MessageBoxResponse::dismissed()),
        }
    }
}

impl Future for MessageBoxFuture {
    type Output = MessageBoxResponse;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(response)) => Poll::Ready(response),
            Poll::Ready(Err(oneshot::Canceled)) => {
                Poll::Ready(MessageBoxResponse::dismissed())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use desktop_app_contract::MessageBoxResult;
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_listener_sees_the_same_answer_once() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = ResultListeners::default();
        let sink = Rc::clone(&seen);
        listeners.push(move |response| sink.borrow_mut().push(response.clone()));
        let mut future = listeners.awaitable();
        assert_eq!(future.try_response(), None);

        let answer = MessageBoxResponse::new(MessageBoxResult::Yes);
        listeners.fire(&answer);

        assert_eq!(*seen.borrow(), vec![answer.clone()]);
        assert_eq!(block_on(future), answer);
    }

    #[test]
    fn dropped_listeners_resolve_as_dismissed() {
        let mut listeners = ResultListeners::default();
        let future = listeners.awaitable();
        drop(listeners);
        assert_eq!(block_on(future), MessageBoxResponse::dismissed());
    }
}
