use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::ptr;
use std::time::Duration;

use crate::EventKind;

/// The epoll instance itself. Registrations are keyed by the registered
/// descriptor, which is carried in the event's user data.
#[derive(Debug)]
pub(crate) struct Selector {
    ep: OwnedFd,
}

impl Selector {
    pub(crate) fn new() -> io::Result<Selector> {
        // SAFETY: `epoll_create1(2)` ensures the fd is valid.
        let ep = unsafe { OwnedFd::from_raw_fd(syscall!(epoll_create1(libc::EPOLL_CLOEXEC))?) };
        Ok(Selector { ep })
    }

    pub(crate) fn select(&self, events: &mut Events, timeout: Option<Duration>) -> io::Result<()> {
        let timeout = timeout
            .map(|to| {
                // `Duration::as_millis` truncates, so round up. This avoids
                // turning sub-millisecond timeouts into a zero timeout,
                // unless the caller explicitly requests that by specifying a
                // zero timeout.
                to.checked_add(Duration::from_nanos(999_999))
                    .unwrap_or(to)
                    .as_millis() as libc::c_int
            })
            .unwrap_or(-1);

        events.clear();
        syscall!(epoll_wait(
            self.ep.as_raw_fd(),
            events.as_mut_ptr(),
            events.capacity() as i32,
            timeout,
        ))
        .map(|n_events| {
            // SAFETY: `epoll_wait` ensures that `n_events` are assigned.
            unsafe { events.set_len(n_events as usize) };
        })
    }

    pub(crate) fn register(&self, fd: RawFd, interest: EventKind) -> io::Result<()> {
        let mut event = libc::epoll_event {
            events: interest_to_epoll(interest),
            u64: fd as u64,
        };

        let ep = self.ep.as_raw_fd();
        syscall!(epoll_ctl(ep, libc::EPOLL_CTL_ADD, fd, &mut event)).map(|_| ())
    }

    pub(crate) fn reregister(&self, fd: RawFd, interest: EventKind) -> io::Result<()> {
        let mut event = libc::epoll_event {
            events: interest_to_epoll(interest),
            u64: fd as u64,
        };

        let ep = self.ep.as_raw_fd();
        syscall!(epoll_ctl(ep, libc::EPOLL_CTL_MOD, fd, &mut event)).map(|_| ())
    }

    pub(crate) fn deregister(&self, fd: RawFd) -> io::Result<()> {
        let ep = self.ep.as_raw_fd();
        syscall!(epoll_ctl(ep, libc::EPOLL_CTL_DEL, fd, ptr::null_mut())).map(|_| ())
    }
}

impl AsRawFd for Selector {
    fn as_raw_fd(&self) -> RawFd {
        self.ep.as_raw_fd()
    }
}

// Level-triggered on purpose: a source that is ready but was not reported, or
// was reported but not drained, must show up again on the next wait.
fn interest_to_epoll(interest: EventKind) -> u32 {
    let mut kind = 0;

    if interest.is_input() {
        kind |= libc::EPOLLIN;
    }

    if interest.is_output() {
        kind |= libc::EPOLLOUT;
    }

    if interest.is_error() {
        kind |= libc::EPOLLERR;
    }

    if interest.is_hangup() {
        kind |= libc::EPOLLHUP;
    }

    if interest.is_priority_input() {
        kind |= libc::EPOLLPRI;
    }

    kind as u32
}

pub(crate) type Event = libc::epoll_event;
pub(crate) type Events = Vec<Event>;

pub(crate) mod event {
    use std::os::fd::RawFd;

    use super::Event;
    use crate::EventKind;

    pub(crate) fn handle(event: &Event) -> RawFd {
        event.u64 as RawFd
    }

    pub(crate) fn kind(event: &Event) -> EventKind {
        let events = event.events as libc::c_int;
        let mut kind = EventKind::empty();

        if events & libc::EPOLLIN != 0 {
            kind.insert(EventKind::INPUT);
        }
        if events & libc::EPOLLOUT != 0 {
            kind.insert(EventKind::OUTPUT);
        }
        if events & libc::EPOLLERR != 0 {
            kind.insert(EventKind::ERROR);
        }
        if events & libc::EPOLLHUP != 0 {
            kind.insert(EventKind::HANGUP);
        }
        if events & libc::EPOLLPRI != 0 {
            kind.insert(EventKind::PRIORITY_INPUT);
        }

        kind
    }
}
