use std::os::fd::RawFd;

/// An event source that may be registered with a [`Selector`].
///
/// The selector consumes exactly one capability: a stable, non-negative
/// descriptor usable as a kernel poll key. The descriptor must stay valid for
/// as long as the source is registered; the selector never takes ownership of
/// it and never closes it.
///
/// [`Selector`]: crate::Selector
pub trait Source {
    /// The descriptor used as the poll key.
    fn raw_handle(&self) -> RawFd;
}

impl<T: Source + ?Sized> Source for &T {
    fn raw_handle(&self) -> RawFd {
        (**self).raw_handle()
    }
}

/// Adapter for [`RawFd`] providing a [`Source`] implementation.
///
/// `SourceFd` enables registering any descriptor with a [`Selector`], for
/// example the value-file descriptor of an exported GPIO pin. It borrows the
/// descriptor and performs no lifecycle management, so it is usually
/// constructed on the spot for the registration call.
///
/// [`Selector`]: crate::Selector
///
/// # Examples
///
/// ```
/// use evmux::{EventKind, Selector, SourceFd};
///
/// use std::net::TcpListener;
/// use std::os::fd::AsRawFd;
///
/// # fn main() -> evmux::Result<()> {
/// let listener = TcpListener::bind("127.0.0.1:0").map_err(evmux::Error::Io)?;
/// let fd = listener.as_raw_fd();
///
/// let mut selector = Selector::new()?;
/// selector.add(&SourceFd(&fd), EventKind::INPUT)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SourceFd<'a>(pub &'a RawFd);

impl<'a> Source for SourceFd<'a> {
    fn raw_handle(&self) -> RawFd {
        *self.0
    }
}
