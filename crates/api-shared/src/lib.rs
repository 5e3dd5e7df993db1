//! # API Shared
//!
//! Shared utilities and definitions for the NAMASTE terminology APIs.
//!
//! Contains:
//! - JSON wire types (`types` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` for common functionality.

pub mod health;
pub mod types;

pub use health::HealthService;
pub use types::*;
