//! Public entry points: the HTTP surface.

pub mod http;

pub use http::{router, serve, AppState};
