// src/main.rs

//! # Certificate Verification Service - Main Entry Point
//!
//! Serves `GET /api/verify`, which checks a claimed holder name and serial code
//! against a certificate collection stored in Framer CMS.
//!
//! ## Architecture Overview
//! 1. **Services Layer**: HTTP routing, CORS policy and certificate lookup
//! 2. **Storage Layer**: read-only Framer CMS collection client
//! 3. **Models**: query and certificate record shapes
//! 4. **Utils**: input normalization and JSON coercion
//!
//! ## Environment Variables
//! - `FRAMER_SITE_ID`: Framer site identifier (required for lookups)
//! - `FRAMER_API_KEY`: Framer API bearer token (required for lookups)
//! - `FRAMER_COLLECTION_ID`: (Optional) collection name (default: certificates)
//! - `ALLOWED_ORIGINS`: (Optional) comma-separated CORS allow-list (default: none)
//! - `FRAMER_API_BASE`: (Optional) API base URL (default: https://api.framer.com)
//! - `BIND_ADDR`: (Optional) listen address (default: 127.0.0.1:3000)
//! - `RUST_LOG`: (Optional) log filter (default: info)

use crate::services::api_server::{ApiServer, VERIFY_PATH};
use crate::settings::Settings;
use anyhow::Context;
use dotenv::dotenv;
use std::net::SocketAddr;

// Module declarations (organized by functional domain)
mod error;         // Error taxonomy and HTTP mapping
mod models;        // Data structures
mod services;      // Business logic and API
mod settings;      // Startup configuration
mod storage;       // Framer CMS client
mod utils;         // Helper functions

/// Main application entry point
///
/// # Initialization Sequence
/// 1. Load environment configuration
/// 2. Initialize logging
/// 3. Build the API server from settings
/// 4. Serve until Ctrl-C
///
/// # Errors
/// - If the environment cannot be read into settings
/// - If `FRAMER_API_BASE` or `BIND_ADDR` is invalid
/// - If the listen address cannot be bound
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load().context("failed to load settings from environment")?;

    let addr: SocketAddr = settings
        .bind_addr()
        .parse()
        .with_context(|| format!("invalid BIND_ADDR {:?}", settings.bind_addr()))?;

    let api_server = ApiServer::from_settings(&settings)?;

    log::info!("Available endpoints:");
    log::info!("- GET     {}", VERIFY_PATH);
    log::info!("- OPTIONS {}", VERIFY_PATH);

    api_server.run(addr).await
}
