//! HTTP middleware

pub mod auth;

pub use auth::{auth_middleware, Claims, CurrentViewer, Viewer};
