//! Board Service
//!
//! Thin HTTP service around board updates: authenticates the caller,
//! gates on workspace membership, applies the change and notifies the
//! people it affects.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use config::Config;
pub use error::AppError;
pub use service::BoardService;
