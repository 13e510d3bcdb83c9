use std::os::fd::{AsRawFd, RawFd};

use log::trace;

use crate::sys::EventFd;
use crate::{Error, Result, Source};

/// An in-process counting event source.
///
/// A `Semaphore` wraps an `eventfd(2)` counter created with
/// `EFD_SEMAPHORE`. [`signal`] increments the counter and never suspends the
/// calling thread; [`receive`] consumes exactly one count, blocking until one
/// arrives ([`blocking`] mode) or failing with [`Error::WouldBlock`]
/// ([`nonblocking`] mode) when the counter is zero.
///
/// Registered with a [`Selector`], the semaphore is ready for
/// [`EventKind::INPUT`] exactly while its counter is positive. `signal` and
/// `receive` take `&self` and the type is `Send + Sync`, so signaling from
/// another thread is the supported way to wake a blocking
/// [`Selector::wait`].
///
/// [`signal`]: Semaphore::signal
/// [`receive`]: Semaphore::receive
/// [`blocking`]: Semaphore::blocking
/// [`nonblocking`]: Semaphore::nonblocking
/// [`Selector`]: crate::Selector
/// [`Selector::wait`]: crate::Selector::wait
/// [`EventKind::INPUT`]: crate::EventKind::INPUT
///
/// # Examples
///
/// ```
/// use evmux::{Error, Semaphore};
///
/// # fn main() -> evmux::Result<()> {
/// let sem = Semaphore::nonblocking()?;
///
/// sem.signal()?;
/// sem.receive()?;
///
/// // The counter is back at zero.
/// assert!(matches!(sem.receive(), Err(Error::WouldBlock)));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Semaphore {
    // `None` once closed, mirroring `Selector`.
    inner: Option<EventFd>,
}

impl Semaphore {
    /// Create a semaphore whose [`receive`](Semaphore::receive) blocks the
    /// calling thread while the counter is zero.
    pub fn blocking() -> Result<Semaphore> {
        Semaphore::new(false)
    }

    /// Create a semaphore whose [`receive`](Semaphore::receive) fails with
    /// [`Error::WouldBlock`] while the counter is zero.
    pub fn nonblocking() -> Result<Semaphore> {
        Semaphore::new(true)
    }

    fn new(nonblocking: bool) -> Result<Semaphore> {
        let inner = EventFd::new(nonblocking).map_err(Error::from_creation)?;
        trace!("created semaphore fd={}", inner.as_raw_fd());
        Ok(Semaphore { inner: Some(inner) })
    }

    /// Increment the counter. Never suspends the calling thread.
    ///
    /// Fails with [`Error::Closed`] after [`close`](Semaphore::close).
    pub fn signal(&self) -> Result<()> {
        let fd = self.inner.as_ref().ok_or(Error::Closed)?;
        fd.add(1)?;
        Ok(())
    }

    /// Consume one count.
    ///
    /// With a positive counter this decrements it and returns immediately.
    /// At zero it blocks until a [`signal`](Semaphore::signal) arrives, or
    /// fails with [`Error::WouldBlock`] in non-blocking mode. Fails with
    /// [`Error::Closed`] after [`close`](Semaphore::close).
    pub fn receive(&self) -> Result<()> {
        let fd = self.inner.as_ref().ok_or(Error::Closed)?;
        fd.take()?;
        Ok(())
    }

    /// Release the descriptor.
    ///
    /// Idempotent: closing twice is fine. Afterwards [`signal`] and
    /// [`receive`] fail with [`Error::Closed`]. Dropping an unclosed
    /// semaphore releases the descriptor as well.
    ///
    /// [`signal`]: Semaphore::signal
    /// [`receive`]: Semaphore::receive
    pub fn close(&mut self) -> Result<()> {
        if let Some(fd) = self.inner.take() {
            trace!("closing semaphore fd={}", fd.as_raw_fd());
            drop(fd);
        }
        Ok(())
    }
}

impl AsRawFd for Semaphore {
    fn as_raw_fd(&self) -> RawFd {
        // A closed semaphore has no descriptor; -1 makes any attempt to
        // register it fail cleanly at the kernel boundary.
        match &self.inner {
            Some(fd) => fd.as_raw_fd(),
            None => -1,
        }
    }
}

impl Source for Semaphore {
    fn raw_handle(&self) -> RawFd {
        self.as_raw_fd()
    }
}
