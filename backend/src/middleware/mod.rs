//! Request middleware.
//!
//! Purpose: bind a correlation id to every request and render every failed
//! response as a classified error body.

pub mod error_renderer;
pub mod request_id;

pub use error_renderer::ErrorRenderer;
pub use request_id::RequestId;
