//! Bounded multi-producer command queue
//!
//! Backed by a fixed capacity `heapless::Deque` behind a `critical-section`
//! mutex, so senders never allocate and can live in a `static`.

use core::cell::RefCell;
use core::fmt;

use critical_section::Mutex;
use heapless::Deque;

/// The queue was full; the rejected value is handed back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError<T>(pub T);

impl<T> fmt::Display for TrySendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("command queue is full")
    }
}

/// The queue was empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryReceiveError;

/// FIFO queue holding at most `SIZE` values
pub struct CommandQueue<T, const SIZE: usize> {
    inner: Mutex<RefCell<Deque<T, SIZE>>>,
}

impl<T, const SIZE: usize> CommandQueue<T, SIZE> {
    /// Empty queue
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Producer handle; any number may exist at once
    pub const fn sender(&self) -> Sender<'_, T, SIZE> {
        Sender { queue: self }
    }

    /// Consumer handle
    pub const fn receiver(&self) -> Receiver<'_, T, SIZE> {
        Receiver { queue: self }
    }

    /// Enqueue without blocking; fails when full
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).push_back(value).map_err(TrySendError))
    }

    /// Dequeue without blocking; fails when empty
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).pop_front().ok_or(TryReceiveError))
    }

    /// Number of queued values
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow_ref(cs).len())
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of queued values
    pub const fn capacity(&self) -> usize {
        SIZE
    }
}

impl<T, const SIZE: usize> Default for CommandQueue<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer side of a [`CommandQueue`]
#[derive(Clone, Copy)]
pub struct Sender<'a, T, const SIZE: usize> {
    queue: &'a CommandQueue<T, SIZE>,
}

impl<T, const SIZE: usize> Sender<'_, T, SIZE> {
    /// Enqueue without blocking; fails when full
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        self.queue.try_send(value)
    }
}

/// Consumer side of a [`CommandQueue`]
#[derive(Clone, Copy)]
pub struct Receiver<'a, T, const SIZE: usize> {
    queue: &'a CommandQueue<T, SIZE>,
}

impl<T, const SIZE: usize> Receiver<'_, T, SIZE> {
    /// Dequeue without blocking; fails when empty
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        self.queue.try_receive()
    }

    /// Iterate over the values queued right now, removing them
    pub fn drain(&self) -> impl Iterator<Item = T> + '_ {
        core::iter::from_fn(move || self.try_receive().ok())
    }
}
