//! GitHub repository listing adapter

pub mod client;
pub mod types;

pub use client::GitHubLister;
