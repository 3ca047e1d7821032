//! Shared helpers for integration tests

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Once;

static RUSTLS_INIT: Once = Once::new();

/// Install the ring crypto provider once per test binary
///
/// Must run before anything builds a rustls-backed client.
pub fn init_rustls() {
    RUSTLS_INIT.call_once(|| {
        rustls::crypto::ring::default_provider()
            .install_default()
            .expect("Failed to install rustls crypto provider");
    });
}
