//! # annadata-core
//!
//! Core types, traits, configuration, and error handling shared by the
//! Annadata Connect advisory and localization crates.

pub mod config;
pub mod error;
pub mod generation;
pub mod prompt;
pub mod traits;

pub use config::shellexpand;
