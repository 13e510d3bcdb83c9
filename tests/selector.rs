use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use evmux::{Error, EventKind, Ident, Selector, Semaphore, Source, SourceFd, Token};

mod util;

use util::{assert_send, init_with_selector, nonblocking_semaphore};

const ZERO: Duration = Duration::from_millis(0);

#[test]
fn is_send() {
    assert_send::<Selector>();
}

#[test]
fn single_source_readiness() {
    let mut selector = init_with_selector();
    let sem = nonblocking_semaphore();

    selector.add(&sem, EventKind::INPUT).unwrap();
    sem.signal().unwrap();

    selector.wait(None).unwrap();
    assert_eq!(selector.ready(), Some(Ident::Handle(sem.raw_handle())));
    assert!(selector.has_input());
    assert!(!selector.has_output());
    assert!(!selector.has_error());
    assert!(!selector.has_hangup());
    assert!(!selector.has_priority_input());
    assert_eq!(selector.readiness(), EventKind::INPUT);
}

#[test]
fn zero_timeout_with_nothing_ready() {
    let mut selector = init_with_selector();
    let sem = nonblocking_semaphore();

    selector.add(&sem, EventKind::INPUT).unwrap();

    selector.wait(Some(ZERO)).unwrap();
    assert_eq!(selector.ready(), None);
    assert!(!selector.has_input());
    assert!(selector.readiness().is_empty());
}

#[test]
fn wait_before_any_readiness_query() {
    let selector = init_with_selector();

    // No wait yet: nothing is stored.
    assert_eq!(selector.ready(), None);
    assert!(!selector.has_input());
}

#[test]
fn drains_multiple_sources() {
    let mut selector = init_with_selector();
    let sem1 = nonblocking_semaphore();
    let sem2 = nonblocking_semaphore();

    selector.add(&sem1, EventKind::INPUT).unwrap();
    selector.add(&sem2, EventKind::INPUT).unwrap();

    sem1.signal().unwrap();
    sem2.signal().unwrap();

    selector.wait(None).unwrap();
    let first = selector.ready().expect("expected a ready source");
    receive_by_ident(first, &sem1, &sem2);

    selector.wait(None).unwrap();
    let second = selector.ready().expect("expected a ready source");
    receive_by_ident(second, &sem1, &sem2);

    let expected = [
        Ident::Handle(sem1.raw_handle()),
        Ident::Handle(sem2.raw_handle()),
    ];
    assert!(expected.contains(&first));
    assert!(expected.contains(&second));
    assert_ne!(first, second);
}

fn receive_by_ident(ident: Ident, sem1: &Semaphore, sem2: &Semaphore) {
    match ident {
        Ident::Handle(fd) if fd == sem1.raw_handle() => sem1.receive().unwrap(),
        Ident::Handle(fd) if fd == sem2.raw_handle() => sem2.receive().unwrap(),
        other => panic!("unexpected identifier: {:?}", other),
    }
}

#[test]
fn caller_supplied_token() {
    let mut selector = init_with_selector();
    let sem = nonblocking_semaphore();

    selector
        .add_with(&sem, EventKind::INPUT, Token(999))
        .unwrap();
    sem.signal().unwrap();

    selector.wait(None).unwrap();
    assert_eq!(selector.ready(), Some(Ident::Token(Token(999))));
    assert!(selector.has_input());
}

#[test]
fn re_adding_replaces_interest_and_identifier() {
    let mut selector = init_with_selector();
    let sem = nonblocking_semaphore();

    selector.add_with(&sem, EventKind::INPUT, Token(1)).unwrap();
    selector.add_with(&sem, EventKind::INPUT, Token(2)).unwrap();

    sem.signal().unwrap();
    selector.wait(None).unwrap();
    assert_eq!(selector.ready(), Some(Ident::Token(Token(2))));
}

#[test]
fn removed_source_is_never_reported() {
    let mut selector = init_with_selector();
    let sem = nonblocking_semaphore();

    selector.add(&sem, EventKind::INPUT).unwrap();
    sem.signal().unwrap();

    selector.wait(Some(ZERO)).unwrap();
    assert_eq!(selector.ready(), Some(Ident::Handle(sem.raw_handle())));

    selector.remove(&sem).unwrap();

    // Still signaled and never drained, but no longer registered.
    selector.wait(Some(ZERO)).unwrap();
    assert_eq!(selector.ready(), None);
}

#[test]
fn remove_invalidates_stored_result() {
    let mut selector = init_with_selector();
    let sem = nonblocking_semaphore();

    selector.add(&sem, EventKind::INPUT).unwrap();
    sem.signal().unwrap();

    selector.wait(None).unwrap();
    assert!(selector.ready().is_some());

    selector.remove(&sem).unwrap();
    assert_eq!(selector.ready(), None);
    assert!(!selector.has_input());
}

#[test]
fn remove_unregistered_handle_errors() {
    let mut selector = init_with_selector();
    let sem = nonblocking_semaphore();

    assert!(matches!(
        selector.remove(&sem),
        Err(Error::NotRegistered(_))
    ));
}

#[test]
fn empty_interest_is_rejected() {
    let mut selector = init_with_selector();
    let sem = nonblocking_semaphore();

    assert!(matches!(
        selector.add(&sem, EventKind::empty()),
        Err(Error::InvalidInput(_))
    ));
    assert!(!selector.is_registered(&sem));
}

#[test]
fn membership_query() {
    let mut selector = init_with_selector();
    let sem = nonblocking_semaphore();

    assert!(!selector.is_registered(&sem));
    selector.add(&sem, EventKind::INPUT).unwrap();
    assert!(selector.is_registered(&sem));
    selector.remove(&sem).unwrap();
    assert!(!selector.is_registered(&sem));
}

#[test]
fn operations_fail_after_close() {
    let mut selector = init_with_selector();
    let sem = nonblocking_semaphore();

    selector.close().unwrap();
    // Closing again is fine.
    selector.close().unwrap();

    assert!(matches!(selector.wait(None), Err(Error::Closed)));
    assert!(matches!(
        selector.add(&sem, EventKind::INPUT),
        Err(Error::Closed)
    ));
    assert!(matches!(selector.remove(&sem), Err(Error::Closed)));
    assert_eq!(selector.ready(), None);
    assert!(!selector.is_registered(&sem));
}

#[test]
fn close_invalidates_stored_result() {
    let mut selector = init_with_selector();
    let sem = nonblocking_semaphore();

    selector.add(&sem, EventKind::INPUT).unwrap();
    sem.signal().unwrap();

    selector.wait(None).unwrap();
    assert!(selector.ready().is_some());

    selector.close().unwrap();
    assert_eq!(selector.ready(), None);
    assert!(!selector.has_input());
}

#[test]
fn raw_descriptor_source() {
    let mut selector = init_with_selector();
    let sem = nonblocking_semaphore();
    let fd = sem.raw_handle();

    selector.add(&SourceFd(&fd), EventKind::INPUT).unwrap();
    sem.signal().unwrap();

    selector.wait(None).unwrap();
    assert_eq!(selector.ready(), Some(Ident::Handle(fd)));
}

#[test]
fn timed_wait_expires() {
    let mut selector = init_with_selector();
    let sem = nonblocking_semaphore();

    selector.add(&sem, EventKind::INPUT).unwrap();

    let start = Instant::now();
    selector.wait(Some(Duration::from_millis(50))).unwrap();
    assert!(start.elapsed() >= Duration::from_millis(50));
    assert_eq!(selector.ready(), None);
}

#[test]
fn cross_thread_signal_wakes_wait() {
    let mut selector = init_with_selector();
    let sem = Arc::new(nonblocking_semaphore());

    selector.add(&*sem, EventKind::INPUT).unwrap();

    let sem2 = Arc::clone(&sem);
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        sem2.signal().expect("unable to signal");
    });

    // No timeout: only the signal can end this wait.
    selector.wait(None).unwrap();
    assert_eq!(selector.ready(), Some(Ident::Handle(sem.raw_handle())));
    assert!(selector.has_input());

    handle.join().unwrap();
}

#[test]
fn undrained_source_is_reported_again() {
    let mut selector = init_with_selector();
    let sem = nonblocking_semaphore();

    selector.add(&sem, EventKind::INPUT).unwrap();
    sem.signal().unwrap();

    selector.wait(Some(ZERO)).unwrap();
    assert_eq!(selector.ready(), Some(Ident::Handle(sem.raw_handle())));

    // Not drained, so a second wait reports the same source.
    selector.wait(Some(ZERO)).unwrap();
    assert_eq!(selector.ready(), Some(Ident::Handle(sem.raw_handle())));

    sem.receive().unwrap();
    selector.wait(Some(ZERO)).unwrap();
    assert_eq!(selector.ready(), None);
}
