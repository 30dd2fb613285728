// src/errors.rs
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FreshScanError {
    #[error("Image read error: {0}")]
    ImageRead(String),

    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Analysis task error: {0}")]
    Task(String),

    #[error("Palette error: {0}")]
    Palette(String),
}

impl FreshScanError {
    /// Maps an `image` crate failure onto the read/decode split.
    pub fn from_image(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => FreshScanError::ImageRead(e.to_string()),
            other => FreshScanError::Decode(other.to_string()),
        }
    }
}

impl ResponseError for FreshScanError {
    fn error_response(&self) -> HttpResponse {
        match self {
            FreshScanError::ImageRead(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Image read error",
                    "message": self.to_string()
                }))
            }
            FreshScanError::Decode(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Image processing error",
                "message": self.to_string()
            })),
            FreshScanError::Validation(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Validation error",
                "message": self.to_string()
            })),
            FreshScanError::Upload(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Upload error",
                    "message": self.to_string()
                }))
            }
            FreshScanError::Task(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Analysis error",
                    "message": self.to_string()
                }))
            }
            FreshScanError::Palette(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Configuration error",
                    "message": self.to_string()
                }))
            }
        }
    }
}
