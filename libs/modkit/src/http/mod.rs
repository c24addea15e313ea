//! HTTP utilities: traced outgoing client and request-id/trace middleware.

pub mod client;
pub mod request_id;
