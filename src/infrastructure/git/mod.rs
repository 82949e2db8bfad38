//! Git mirror updater adapter

pub mod updater;

pub use updater::GitCliUpdater;
