//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod mock_helpers;

use chemvis_rs::ChemVisApp;
use std::time::{Duration, Instant};

/// How long to wait for backend responses before failing a test
pub fn test_timeout() -> Duration {
    Duration::from_secs(5)
}

/// Drain backend messages into `app` until `done` holds or the timeout passes
pub fn pump_until(app: &mut ChemVisApp, mut done: impl FnMut(&ChemVisApp) -> bool) -> bool {
    let deadline = Instant::now() + test_timeout();
    while Instant::now() < deadline {
        app.process_backend_messages();
        if done(app) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}
