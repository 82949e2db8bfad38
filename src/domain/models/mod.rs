//! Domain models for the mirror sync system

pub mod config;
pub mod report;
pub mod repository;
pub mod settings;

pub use config::{CloneAuth, Config, LoggingConfig};
pub use report::CycleReport;
pub use repository::{RepositoryDescriptor, RepositoryPage, UpdateOutcome};
pub use settings::{parse_duration, SyncSettings};
