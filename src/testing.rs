//! Helpers for pointing clients at a local mock server.

use crate::{Client, Config};

/// API key sent by the test clients.
pub const TEST_API_KEY: &str = "KEY_test";

/// Create a test client configured to use a wiremock server.
pub fn test_client(base_url: &str) -> Client {
    Client::new(Config {
        base_url: Some(base_url.to_string()),
        api_key: Some(TEST_API_KEY.to_string()),
        ..Default::default()
    })
    .expect("client")
}

/// Blocking counterpart of [`test_client`].
#[cfg(feature = "blocking")]
pub fn blocking_test_client(base_url: &str) -> crate::BlockingClient {
    crate::BlockingClient::new(crate::BlockingConfig {
        base_url: Some(base_url.to_string()),
        api_key: Some(TEST_API_KEY.to_string()),
        ..Default::default()
    })
    .expect("blocking client")
}
