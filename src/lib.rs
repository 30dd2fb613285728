// src/lib.rs
//! Heuristic food-quality scoring for donated food photos.
//!
//! The engine quantizes an image into its dominant colors and scores them
//! against a fixed reference palette: a 0-10 quality score, a best-guess
//! food category and a spoilage risk, fused into a donation verdict. The
//! HTTP layer in [`handlers`] exposes it to the donation service.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;

use actix_web::web;
use log::info;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::FreshScanError;
use crate::services::{FoodAnalyzer, ReferencePalette};

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<FoodAnalyzer>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Loads the reference palette and prepares the upload directory.
    pub fn new(config: AppConfig) -> Result<Self, FreshScanError> {
        let palette = match &config.palette_path {
            Some(path) => {
                info!("Loading reference palette from {}", path.display());
                ReferencePalette::from_json_file(path)?
            }
            None => ReferencePalette::builtin(),
        };

        std::fs::create_dir_all(&config.upload_dir).map_err(|e| {
            FreshScanError::Upload(format!(
                "Failed to create upload directory {}: {}",
                config.upload_dir.display(),
                e
            ))
        })?;

        Ok(Self {
            analyzer: Arc::new(FoodAnalyzer::new(Arc::new(palette))),
            config: Arc::new(config),
        })
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/food-quality")
            .route("/assess", web::post().to(handlers::assess_quality))
            .route("/identify", web::post().to(handlers::identify_type))
            .route("/spoilage", web::post().to(handlers::detect_spoilage))
            .route("/analyze", web::post().to(handlers::analyze_food)),
    )
    .route(
        "/api/donations/food-quality",
        web::post().to(handlers::donation_food_quality),
    )
    .route("/health", web::get().to(handlers::health_check));
}
