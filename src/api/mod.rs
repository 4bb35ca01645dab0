//! HTTP surface: routing, validation, response envelopes.

pub mod http;
pub mod responses;
pub mod server;
pub mod validate;

pub use http::{create_router, AppState};
pub use server::Server;
