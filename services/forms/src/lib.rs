pub mod config;
pub mod cookie;
pub mod cors;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod health;
pub mod infra;
pub mod middleware;
pub mod router;
pub mod secrets;
pub mod serde;
pub mod state;
pub mod tracing;
pub mod usecase;
