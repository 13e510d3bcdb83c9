use std::collections::HashMap;
use std::fmt;
use std::os::fd::{AsRawFd, RawFd};
use std::time::Duration;

use log::trace;

use crate::{sys, Error, EventKind, Result, Source, Token};

/// Identifier reported for a ready event source.
///
/// Registrations made with [`Selector::add`] are reported as the source
/// itself, named by its registered handle; registrations made with
/// [`Selector::add_with`] are reported as the caller's [`Token`]. Keeping the
/// two cases in separate variants means a numeric token can never be mistaken
/// for a handle, however the caller picks its token values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ident {
    /// The registered source, named by its handle.
    Handle(RawFd),
    /// The token supplied at registration.
    Token(Token),
}

#[derive(Debug)]
struct Registration {
    interest: EventKind,
    ident: Ident,
}

/// The single-slot result of the most recent wait.
#[derive(Debug)]
struct LastReady {
    handle: RawFd,
    ident: Ident,
    revents: EventKind,
}

struct Inner {
    selector: sys::Selector,
    registrations: HashMap<RawFd, Registration>,
    events: sys::Events,
    last: Option<LastReady>,
}

/// Multiplexes readiness over registered event sources.
///
/// A `Selector` owns an epoll instance and a table of registrations. Each
/// call to [`wait`] blocks until at least one registered source becomes ready
/// in one of the event kinds it was registered for, then stores the
/// identifier and observed [`EventKind`] set of exactly one ready source.
/// The stored result is read back with [`ready`], [`readiness`] and the
/// `has_*` predicates, and stays valid until the next [`wait`] (or until a
/// [`remove`] of the handle it names).
///
/// Reporting one source per wait keeps the dispatch loop trivial; when
/// several sources are hot, the ones not reported stay ready in the kernel
/// (registrations are level-triggered) and come back on later waits.
///
/// Registrations are keyed by handle: at most one live registration per
/// handle, and re-adding a registered handle replaces its interest and
/// identifier.
///
/// A `Selector` is single-thread-owned: every state-changing operation takes
/// `&mut self`, so driving one instance from two threads is a compile error
/// rather than a data race. Dropping the selector releases the epoll
/// instance; [`close`] does the same eagerly.
///
/// [`wait`]: Selector::wait
/// [`ready`]: Selector::ready
/// [`readiness`]: Selector::readiness
/// [`remove`]: Selector::remove
/// [`close`]: Selector::close
///
/// # Examples
///
/// A dispatch loop over two semaphores:
///
/// ```
/// use evmux::{EventKind, Ident, Selector, Semaphore, Source};
///
/// # fn main() -> evmux::Result<()> {
/// let a = Semaphore::nonblocking()?;
/// let b = Semaphore::nonblocking()?;
/// let mut selector = Selector::new()?;
///
/// selector.add(&a, EventKind::INPUT)?;
/// selector.add(&b, EventKind::INPUT)?;
///
/// a.signal()?;
/// b.signal()?;
///
/// for _ in 0..2 {
///     selector.wait(None)?;
///     match selector.ready() {
///         Some(Ident::Handle(fd)) if fd == a.raw_handle() => a.receive()?,
///         Some(Ident::Handle(fd)) if fd == b.raw_handle() => b.receive()?,
///         other => unreachable!("unexpected result: {:?}", other),
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct Selector {
    // `None` once closed; `close` is idempotent and `Drop` releases the
    // epoll fd if `close` was never called.
    inner: Option<Inner>,
}

impl Selector {
    /// Create a new, empty selector.
    ///
    /// Fails with [`Error::Exhausted`] when the process or system is out of
    /// file descriptors.
    pub fn new() -> Result<Selector> {
        let selector = sys::Selector::new().map_err(Error::from_creation)?;
        trace!("created selector epfd={}", selector.as_raw_fd());
        Ok(Selector {
            inner: Some(Inner {
                selector,
                registrations: HashMap::new(),
                events: Vec::with_capacity(1),
                last: None,
            }),
        })
    }

    /// Register `source` for the event kinds in `interest`, identified by
    /// the source itself ([`Ident::Handle`]).
    ///
    /// If the source's handle is already registered, the registration is
    /// replaced: interest and identifier are both updated.
    ///
    /// Fails with [`Error::InvalidInput`] if `interest` is empty and with
    /// [`Error::Closed`] after [`close`](Selector::close).
    pub fn add<S: Source + ?Sized>(&mut self, source: &S, interest: EventKind) -> Result<()> {
        let handle = source.raw_handle();
        self.insert(handle, interest, Ident::Handle(handle))
    }

    /// Register `source` like [`add`](Selector::add), but identified by a
    /// caller-supplied token ([`Ident::Token`]).
    pub fn add_with<S: Source + ?Sized>(
        &mut self,
        source: &S,
        interest: EventKind,
        token: Token,
    ) -> Result<()> {
        self.insert(source.raw_handle(), interest, Ident::Token(token))
    }

    fn insert(&mut self, handle: RawFd, interest: EventKind, ident: Ident) -> Result<()> {
        if interest.is_empty() {
            return Err(Error::InvalidInput("interest must name at least one event kind"));
        }

        let inner = self.inner.as_mut().ok_or(Error::Closed)?;
        if inner.registrations.contains_key(&handle) {
            inner.selector.reregister(handle, interest)?;
            if let Some(prev) = inner.registrations.insert(handle, Registration { interest, ident })
            {
                trace!(
                    "replaced registration for handle {}: {:?} -> {:?}",
                    handle,
                    prev.interest,
                    interest
                );
            }
        } else {
            inner.selector.register(handle, interest)?;
            trace!("registered handle {} with interest {:?}", handle, interest);
            inner
                .registrations
                .insert(handle, Registration { interest, ident });
        }
        Ok(())
    }

    /// Deregister `source`.
    ///
    /// Fails with [`Error::NotRegistered`] if the source's handle is not in
    /// the registration table; callers wanting idempotent removal should
    /// check [`is_registered`](Selector::is_registered) first. A stored wait
    /// result naming this handle is invalidated.
    pub fn remove<S: Source + ?Sized>(&mut self, source: &S) -> Result<()> {
        let handle = source.raw_handle();
        let inner = self.inner.as_mut().ok_or(Error::Closed)?;

        if !inner.registrations.contains_key(&handle) {
            return Err(Error::NotRegistered(handle));
        }
        inner.selector.deregister(handle)?;

        if let Some(reg) = inner.registrations.remove(&handle) {
            trace!("deregistered handle {} (interest was {:?})", handle, reg.interest);
        }
        if inner.last.as_ref().map_or(false, |last| last.handle == handle) {
            inner.last = None;
        }
        Ok(())
    }

    /// Returns true while `source`'s handle has a live registration.
    pub fn is_registered<S: Source + ?Sized>(&self, source: &S) -> bool {
        self.inner
            .as_ref()
            .map_or(false, |inner| inner.registrations.contains_key(&source.raw_handle()))
    }

    /// Block until a registered source is ready, or until `timeout` elapses.
    ///
    /// `None` waits indefinitely; a zero duration polls once and returns
    /// immediately. On return the previous result is gone: either exactly
    /// one ready source is stored (the first one the kernel reported, no
    /// further ordering imposed), or nothing is, meaning the timeout
    /// elapsed. Sources that were ready but not reported stay pending and
    /// are reported by later waits.
    ///
    /// Fails with [`Error::Closed`] after [`close`](Selector::close). A
    /// timeout is not an error.
    pub fn wait(&mut self, timeout: Option<Duration>) -> Result<()> {
        let inner = self.inner.as_mut().ok_or(Error::Closed)?;
        inner.last = None;

        inner.selector.select(&mut inner.events, timeout)?;

        if let Some(event) = inner.events.first() {
            let handle = sys::event::handle(event);
            let revents = sys::event::kind(event);
            if let Some(reg) = inner.registrations.get(&handle) {
                trace!("handle {} ready with {:?}", handle, revents);
                inner.last = Some(LastReady {
                    handle,
                    ident: reg.ident,
                    revents,
                });
            }
        }
        Ok(())
    }

    /// The identifier stored by the last [`wait`](Selector::wait), or `None`
    /// if nothing was ready, `wait` has not been called yet, or the result
    /// was invalidated by [`remove`](Selector::remove) or
    /// [`close`](Selector::close).
    pub fn ready(&self) -> Option<Ident> {
        self.last().map(|last| last.ident)
    }

    /// The observed event kinds stored by the last [`wait`](Selector::wait);
    /// empty whenever [`ready`](Selector::ready) is `None`.
    pub fn readiness(&self) -> EventKind {
        self.last().map_or(EventKind::empty(), |last| last.revents)
    }

    /// Whether the stored result includes [`EventKind::INPUT`].
    pub fn has_input(&self) -> bool {
        self.readiness().is_input()
    }

    /// Whether the stored result includes [`EventKind::OUTPUT`].
    pub fn has_output(&self) -> bool {
        self.readiness().is_output()
    }

    /// Whether the stored result includes [`EventKind::ERROR`].
    pub fn has_error(&self) -> bool {
        self.readiness().is_error()
    }

    /// Whether the stored result includes [`EventKind::HANGUP`].
    pub fn has_hangup(&self) -> bool {
        self.readiness().is_hangup()
    }

    /// Whether the stored result includes [`EventKind::PRIORITY_INPUT`].
    pub fn has_priority_input(&self) -> bool {
        self.readiness().is_priority_input()
    }

    /// Release the epoll instance.
    ///
    /// Idempotent: closing twice is fine. Afterwards every state-changing
    /// operation fails with [`Error::Closed`] and the readiness queries
    /// report nothing. Dropping an unclosed selector releases the instance
    /// as well.
    pub fn close(&mut self) -> Result<()> {
        if let Some(inner) = self.inner.take() {
            trace!("closing selector epfd={}", inner.selector.as_raw_fd());
            drop(inner);
        }
        Ok(())
    }

    fn last(&self) -> Option<&LastReady> {
        self.inner.as_ref().and_then(|inner| inner.last.as_ref())
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Some(inner) => f
                .debug_struct("Selector")
                .field("epfd", &inner.selector.as_raw_fd())
                .field("registrations", &inner.registrations)
                .field("last", &inner.last)
                .finish(),
            None => f.debug_struct("Selector").field("closed", &true).finish(),
        }
    }
}
