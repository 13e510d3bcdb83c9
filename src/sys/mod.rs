//! Kernel-facing plumbing. Everything above this module speaks
//! `EventKind` and `RawFd`; everything below speaks `libc`.

#[cfg(any(target_os = "linux", target_os = "android"))]
mod unix;

#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) use self::unix::{event, EventFd, Events, Selector};

#[cfg(not(any(target_os = "linux", target_os = "android")))]
compile_error!("evmux requires epoll(7) and eventfd(2); only linux and android are supported");
