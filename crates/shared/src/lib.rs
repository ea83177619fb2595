//! Shared types, errors, and configuration for LedgerClose.
//!
//! This crate provides common types used across all other crates:
//! - Typed ledger numbers, batch numbers and codes
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::AppError;
