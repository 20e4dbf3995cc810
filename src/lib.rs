//! sitemap-architect - sitemap discovery and site structure analysis
//!
//! This crate provides:
//! - Sitemap discovery via robots.txt and well-known paths
//! - Sitemap and sitemap index fetching with bounded concurrent fan-out
//! - A site tree and ranked theme keywords derived from the URL list
//! - A JSON HTTP API and a CLI over the same pipeline

pub mod analysis;
pub mod commands;
pub mod config;
pub mod crawl;
pub mod error;
pub mod server;

pub use config::Config;
pub use error::{Error, Result};
