//! Shared construction of the HTTP client used for LLM traffic. With the
//! `tee_requests` feature enabled every outbound request is mirrored to a
//! capture endpoint so a debugging session can observe the exact prompts
//! going over the wire.

mod tee_client;
#[cfg(feature = "tee_requests")]
pub mod tee_middleware;
pub use tee_client::new_client;
