//! HTTP inbound adapter exposing REST endpoints.

pub mod app;
pub mod envelope;
pub mod error;
pub mod health;
pub mod render;
pub mod state;
pub mod users;
pub mod validation;

pub use error::ApiResult;
