//! Hearthside Storefront library.
//!
//! This crate provides the storefront service as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod middleware;
pub mod routes;
pub mod state;
