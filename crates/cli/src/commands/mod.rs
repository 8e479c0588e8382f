//! CLI command implementations.

pub mod catalog;
