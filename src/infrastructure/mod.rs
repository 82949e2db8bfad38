//! Infrastructure layer module
//!
//! This module contains all infrastructure adapters and external integrations:
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)
//! - GitHub repository listing (reqwest)
//! - Git mirror updates (git CLI)
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod git;
pub mod github;
pub mod logging;
