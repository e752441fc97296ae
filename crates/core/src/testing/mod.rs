//! Test doubles for external dependencies.
//!
//! Compiled into the library so downstream crates (the server's
//! integration tests) can use them.

mod mock_media_client;

pub use mock_media_client::{MockMediaClient, RecordedCall};
