//! Bounded mailbox for `no_std` environments.
//!
//! Built on `critical-section` and `heapless::Deque`, so posting from an
//! interrupt handler is as safe as posting from the main loop. Nothing here
//! ever waits: a full mailbox hands the value back, an empty one yields
//! `None`.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

/// Returned when the mailbox has no free slot. Carries the rejected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MailboxFull<T>(pub T);

/// A fixed-capacity FIFO shared by reference.
pub struct Mailbox<T, const SIZE: usize> {
    queue: Mutex<RefCell<Deque<T, SIZE>>>,
}

impl<T, const SIZE: usize> Mailbox<T, SIZE> {
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Append `value` to the back of the queue
    pub fn post(&self, value: T) -> Result<(), MailboxFull<T>> {
        critical_section::with(|cs| {
            self.queue
                .borrow(cs)
                .borrow_mut()
                .push_back(value)
                .map_err(MailboxFull)
        })
    }

    /// Take the oldest value, if any
    pub fn take(&self) -> Option<T> {
        critical_section::with(|cs| self.queue.borrow(cs).borrow_mut().pop_front())
    }

    /// Put a value back at the front, e.g. after a failed delivery.
    pub fn requeue(&self, value: T) -> Result<(), MailboxFull<T>> {
        critical_section::with(|cs| {
            self.queue
                .borrow(cs)
                .borrow_mut()
                .push_front(value)
                .map_err(MailboxFull)
        })
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.queue.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        SIZE
    }
}

impl<T, const SIZE: usize> Default for Mailbox<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}
