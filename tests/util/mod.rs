// Not all functions are used by all tests.
#![allow(dead_code)]

use std::sync::Once;

use evmux::{Selector, Semaphore};

pub fn init() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        env_logger::try_init().expect("unable to initialise logger");
    });
}

pub fn init_with_selector() -> Selector {
    init();

    Selector::new().expect("unable to create selector")
}

pub fn nonblocking_semaphore() -> Semaphore {
    Semaphore::nonblocking().expect("unable to create semaphore")
}

pub fn assert_sync<T: Sync>() {}
pub fn assert_send<T: Send>() {}
