//! Promise and worker-thread utilities.
//!
//! The frame loop hands each captured frame to a worker thread for landmark inference and
//! suspends on the returned [`PromiseHandle`] until the result arrives. Channels are bounded, so
//! a worker processes at most one message at a time and the loop can never race ahead of it.

use std::{
    io,
    panic::resume_unwind,
    thread::{self, JoinHandle},
};

use crossbeam::channel::Sender;

/// Creates a connected pair of [`Promise`] and [`PromiseHandle`].
pub fn promise<T>() -> (Promise<T>, PromiseHandle<T>) {
    // Capacity of 1 means that `Promise::fulfill` will never block.
    let (sender, recv) = crossbeam::channel::bounded(1);
    (Promise { inner: sender }, PromiseHandle { recv })
}

/// An empty slot that can be filled with a `T`, fulfilling the promise.
pub struct Promise<T> {
    inner: crossbeam::channel::Sender<T>,
}

impl<T> Promise<T> {
    /// Fulfills the promise with a value, consuming it.
    ///
    /// If a thread is currently waiting at [`PromiseHandle::block`], it will be woken up. If the
    /// connected [`PromiseHandle`] was dropped, `value` is dropped and nothing happens.
    pub fn fulfill(self, value: T) {
        self.inner.send(value).ok();
    }
}

/// A handle connected to a [`Promise`] that will eventually resolve to a value of type `T`.
pub struct PromiseHandle<T> {
    recv: crossbeam::channel::Receiver<T>,
}

impl<T> PromiseHandle<T> {
    /// Blocks the calling thread until the [`Promise`] is fulfilled.
    ///
    /// If the [`Promise`] was dropped without being fulfilled (typically because the fulfilling
    /// thread panicked), an error is returned instead.
    pub fn block(self) -> Result<T, PromiseDropped> {
        self.recv.recv().map_err(|_| PromiseDropped { _priv: () })
    }

    /// Returns whether the associated [`Promise`] has been fulfilled.
    ///
    /// If this returns `true`, calling [`PromiseHandle::block`] will return immediately.
    pub fn is_fulfilled(&self) -> bool {
        !self.recv.is_empty()
    }
}

/// An error returned by [`PromiseHandle::block`] indicating that the connected [`Promise`] was
/// dropped without being fulfilled.
#[derive(Debug, Clone, Copy)]
pub struct PromiseDropped {
    _priv: (),
}

/// A handle to a worker thread that processes messages of type `I`.
///
/// When dropped, the channel to the thread is closed and the thread is joined. If the thread has
/// panicked, the panic is forwarded to the thread dropping the `Worker`.
pub struct Worker<I: Send + 'static> {
    sender: Option<Sender<I>>,
    handle: Option<JoinHandle<()>>,
}

impl<I: Send + 'static> Worker<I> {
    /// Spawns a named worker thread that uses `handler` to process incoming messages.
    pub fn spawn<N, F>(name: N, mut handler: F) -> io::Result<Self>
    where
        N: Into<String>,
        F: FnMut(I) + Send + 'static,
    {
        let name = name.into();
        let (sender, recv) = crossbeam::channel::bounded::<I>(0);
        let handle = thread::Builder::new().name(name.clone()).spawn(move || {
            log::trace!("worker '{name}' starting");
            for message in recv {
                handler(message);
            }
            log::trace!("worker '{name}' exiting");
        })?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    /// Sends a message to the worker thread, blocking until it accepts the message.
    ///
    /// If the worker has panicked, this will propagate the panic to the calling thread.
    pub fn send(&mut self, msg: I) {
        if let Some(sender) = &self.sender {
            if sender.send(msg).is_err() {
                self.wait_for_exit();
            }
        }
    }

    fn wait_for_exit(&mut self) {
        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok(()) => {}
                Err(payload) => {
                    if !thread::panicking() {
                        resume_unwind(payload);
                    }
                }
            }
        }
    }
}

impl<I: Send + 'static> Drop for Worker<I> {
    fn drop(&mut self) {
        // Close the channel to signal the thread to exit.
        drop(self.sender.take());
        self.wait_for_exit();
    }
}
