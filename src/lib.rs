//! Readiness multiplexing over file-descriptor-backed event sources.
//!
//! evmux is built around three pieces:
//!
//! * [`Selector`]: owns an [`epoll`] instance and a table of registrations.
//!   A call to [`Selector::wait`] blocks until one registered source becomes
//!   ready (or a timeout elapses) and stores the identifier and observed
//!   [`EventKind`] set of exactly one ready source for the caller to query.
//! * [`EventKind`]: the set of event kinds a caller is interested in, and the
//!   set observed when a source fires.
//! * [`Semaphore`]: an in-process counting event source backed by
//!   [`eventfd`], usable both as a plain semaphore and as a source registered
//!   with a `Selector`. Signaling it from another thread is also the way to
//!   interrupt a blocking `wait`.
//!
//! Anything else exposing a stable descriptor (a sysfs GPIO value file, a
//! pipe, a socket) registers through the [`Source`] trait, usually via the
//! borrowing [`SourceFd`] adapter.
//!
//! Each `wait` reports a single ready source. Registrations are
//! level-triggered, so sources that were ready but not reported (or reported
//! but not drained) show up again on a later `wait`. The intended dispatch
//! loop is: `wait`, act on [`Selector::ready`], repeat.
//!
//! [`epoll`]: https://man7.org/linux/man-pages/man7/epoll.7.html
//! [`eventfd`]: https://man7.org/linux/man-pages/man2/eventfd.2.html
//!
//! # Examples
//!
//! ```
//! use evmux::{EventKind, Ident, Selector, Semaphore, Source};
//!
//! # fn main() -> evmux::Result<()> {
//! let sem = Semaphore::nonblocking()?;
//! let mut selector = Selector::new()?;
//!
//! selector.add(&sem, EventKind::INPUT)?;
//! sem.signal()?;
//!
//! selector.wait(None)?;
//! assert_eq!(selector.ready(), Some(Ident::Handle(sem.raw_handle())));
//! assert!(selector.has_input());
//! assert!(!selector.has_output());
//!
//! // Route control to the matched source, clearing its readiness.
//! sem.receive()?;
//! # Ok(())
//! # }
//! ```
#![warn(missing_docs, missing_debug_implementations)]

mod error;
mod event_kind;
mod selector;
mod semaphore;
mod source;
mod sys;
mod token;

pub use crate::error::{Error, Result};
pub use crate::event_kind::EventKind;
pub use crate::selector::{Ident, Selector};
pub use crate::semaphore::Semaphore;
pub use crate::source::{Source, SourceFd};
pub use crate::token::Token;
