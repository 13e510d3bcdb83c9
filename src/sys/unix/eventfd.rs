use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::{AsRawFd, FromRawFd, RawFd};

/// Counting notification object backed by `eventfd`.
///
/// The kernel object is a 64 bit counter. All writes must be of 8 bytes
/// (64 bits) and are converted (native endian) into a 64 bit unsigned
/// integer and added to the count. With `EFD_SEMAPHORE` set, each read
/// consumes exactly one count; a read at zero blocks, or fails with
/// `WouldBlock` when `EFD_NONBLOCK` is set.
#[derive(Debug)]
pub(crate) struct EventFd {
    fd: File,
}

impl EventFd {
    pub(crate) fn new(nonblocking: bool) -> io::Result<EventFd> {
        let mut flags = libc::EFD_CLOEXEC | libc::EFD_SEMAPHORE;
        if nonblocking {
            flags |= libc::EFD_NONBLOCK;
        }

        let fd = syscall!(eventfd(0, flags))?;
        // SAFETY: `eventfd(2)` returned a fresh, valid fd.
        let file = unsafe { File::from_raw_fd(fd) };
        Ok(EventFd { fd: file })
    }

    /// Add `n` to the counter.
    #[allow(clippy::unused_io_amount)] // Eventfd writes are all-or-nothing.
    pub(crate) fn add(&self, n: u64) -> io::Result<()> {
        let buf: [u8; 8] = n.to_ne_bytes();
        (&self.fd).write(&buf).map(|_| ())
    }

    /// Consume one count, returning it.
    #[allow(clippy::unused_io_amount)] // Eventfd reads are all-or-nothing.
    pub(crate) fn take(&self) -> io::Result<u64> {
        let mut buf: [u8; 8] = 0u64.to_ne_bytes();
        (&self.fd).read(&mut buf)?;
        Ok(u64::from_ne_bytes(buf))
    }
}

impl AsRawFd for EventFd {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}
