//! Configuration module for Fortnight
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::FortnightPaths;
pub use settings::Settings;
