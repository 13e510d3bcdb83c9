use std::os::fd::RawFd;
use std::{error, fmt, io};

/// A specialized `Result` type for selector and event source operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by selector and event source operations.
///
/// All errors are reported synchronously by the failing call; nothing is
/// retried internally. A [`Selector::wait`] that times out is not an error,
/// it is the defined "nothing ready" outcome.
///
/// [`Selector::wait`]: crate::Selector::wait
#[derive(Debug)]
pub enum Error {
    /// The selector or semaphore was already closed.
    Closed,
    /// A malformed argument, such as an empty interest set.
    InvalidInput(&'static str),
    /// The handle is not in the selector's registration table.
    NotRegistered(RawFd),
    /// A non-blocking receive found nothing to consume.
    WouldBlock,
    /// The kernel refused to create a new polling or notification object,
    /// typically because a file descriptor limit was hit.
    Exhausted(io::Error),
    /// Any other operating system failure.
    Io(io::Error),
}

impl Error {
    /// Returns true for [`Error::WouldBlock`].
    pub fn is_would_block(&self) -> bool {
        matches!(self, Error::WouldBlock)
    }

    /// Returns true for [`Error::Closed`].
    pub fn is_closed(&self) -> bool {
        matches!(self, Error::Closed)
    }

    /// Classify a kernel object creation failure: descriptor or memory
    /// exhaustion gets its own variant, anything else stays an I/O error.
    pub(crate) fn from_creation(err: io::Error) -> Error {
        match err.raw_os_error() {
            Some(libc::EMFILE) | Some(libc::ENFILE) | Some(libc::ENOMEM) => Error::Exhausted(err),
            _ => Error::Io(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        if err.kind() == io::ErrorKind::WouldBlock {
            Error::WouldBlock
        } else {
            Error::Io(err)
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Closed => write!(f, "resource is closed"),
            Error::InvalidInput(msg) => write!(f, "invalid argument: {}", msg),
            Error::NotRegistered(fd) => write!(f, "handle {} is not registered", fd),
            Error::WouldBlock => write!(f, "operation would block"),
            Error::Exhausted(err) => write!(f, "kernel object creation failed: {}", err),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Exhausted(err) | Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

#[test]
fn test_would_block_conversion() {
    let err = Error::from(io::Error::from(io::ErrorKind::WouldBlock));
    assert!(err.is_would_block());

    let err = Error::from(io::Error::from(io::ErrorKind::NotFound));
    assert!(matches!(err, Error::Io(_)));
}
