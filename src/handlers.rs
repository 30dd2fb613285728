// src/handlers.rs
use crate::{AppState, errors::FreshScanError};
use actix_multipart::Multipart;
use actix_web::{Error, HttpResponse, web};
use futures_util::TryStreamExt;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const IMAGE_FIELD: &str = "image";
const FOOD_TYPE_FIELD: &str = "foodType";
const MAX_TEXT_FIELD_BYTES: usize = 1024;

/// An image written to the upload directory for the length of one request.
///
/// The file is removed when the guard is dropped, on success and on every
/// error path alike.
#[derive(Debug)]
pub struct StoredUpload {
    path: PathBuf,
}

impl StoredUpload {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoredUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed upload {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove upload {}: {}", self.path.display(), e),
        }
    }
}

/// A parsed analysis upload: the stored image, if any, and the food-type hint.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub image: Option<StoredUpload>,
    pub food_type: Option<String>,
}

impl UploadForm {
    fn image_path(&self) -> Option<&Path> {
        self.image.as_ref().map(StoredUpload::path)
    }

    fn require_image(&self) -> Result<&Path, FreshScanError> {
        self.image_path()
            .ok_or_else(|| FreshScanError::Validation("No image file provided".to_string()))
    }

    /// Form field first, then the query string; blank values count as absent.
    fn food_type_hint<'a>(&'a self, query: &'a HashMap<String, String>) -> Option<&'a str> {
        self.food_type
            .as_deref()
            .or_else(|| query.get(FOOD_TYPE_FIELD).map(String::as_str))
            .map(str::trim)
            .filter(|hint| !hint.is_empty())
    }
}

async fn receive_upload(
    mut payload: Multipart,
    data: &AppState,
) -> Result<UploadForm, FreshScanError> {
    let mut form = UploadForm::default();
    let max_bytes = data.config.max_upload_bytes;

    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let name = field.content_disposition().get_name().unwrap_or("").to_string();

        match name.as_str() {
            IMAGE_FIELD => {
                if form.image.is_some() {
                    return Err(FreshScanError::Validation(
                        "Only one image file is allowed".to_string(),
                    ));
                }

                let is_image = field
                    .content_type()
                    .map(|ct| ct.type_() == "image")
                    .unwrap_or(false);
                if !is_image {
                    return Err(FreshScanError::Validation(
                        "Only image files are allowed".to_string(),
                    ));
                }

                let extension = field
                    .content_disposition()
                    .get_filename()
                    .and_then(|filename| Path::new(filename).extension())
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.to_ascii_lowercase());

                let mut image_data = Vec::new();
                while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
                    if image_data.len() + chunk.len() > max_bytes {
                        return Err(FreshScanError::Validation(format!(
                            "Image exceeds the {} byte upload limit",
                            max_bytes
                        )));
                    }
                    image_data.extend_from_slice(&chunk);
                }

                let filename = match extension {
                    Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
                    None => Uuid::new_v4().to_string(),
                };
                let upload = StoredUpload::new(data.config.upload_dir.join(filename));
                tokio::fs::write(upload.path(), &image_data)
                    .await
                    .map_err(|e| {
                        FreshScanError::Upload(format!(
                            "Failed to store {}: {}",
                            upload.path().display(),
                            e
                        ))
                    })?;

                form.image = Some(upload);
            }
            FOOD_TYPE_FIELD => {
                let mut raw = Vec::new();
                while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
                    if raw.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
                        return Err(FreshScanError::Validation(
                            "foodType field is too long".to_string(),
                        ));
                    }
                    raw.extend_from_slice(&chunk);
                }
                let value = String::from_utf8(raw).map_err(|_| {
                    FreshScanError::Validation("foodType must be UTF-8 text".to_string())
                })?;
                form.food_type = Some(value);
            }
            _ => {
                // Drain fields we do not use.
                while field.try_next().await.map_err(multipart_error)?.is_some() {}
            }
        }
    }

    Ok(form)
}

fn multipart_error(e: actix_multipart::MultipartError) -> FreshScanError {
    FreshScanError::Validation(format!("Malformed multipart body: {}", e))
}

pub async fn assess_quality(
    payload: Multipart,
    data: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, Error> {
    let form = receive_upload(payload, &data).await?;
    let image_path = form.require_image()?;
    let food_type = form.food_type_hint(&query);

    info!(
        "Assessing quality for image: {} (food type: {})",
        image_path.display(),
        food_type.unwrap_or("unknown")
    );

    let assessment = data.analyzer.assess(image_path, food_type).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "assessment": assessment
    })))
}

pub async fn identify_type(
    payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let form = receive_upload(payload, &data).await?;
    let image_path = form.require_image()?;

    info!("Identifying food type for image: {}", image_path.display());

    let identification = data.analyzer.identify(image_path).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "identification": identification
    })))
}

pub async fn detect_spoilage(
    payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let form = receive_upload(payload, &data).await?;
    let image_path = form.require_image()?;

    info!("Detecting spoilage for image: {}", image_path.display());

    let spoilage_detection = data.analyzer.spoilage(image_path).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "spoilageDetection": spoilage_detection
    })))
}

pub async fn analyze_food(
    payload: Multipart,
    data: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, Error> {
    let form = receive_upload(payload, &data).await?;
    let image_path = form.require_image()?;
    let food_type = form.food_type_hint(&query);

    info!(
        "Performing complete food analysis for image: {} (food type: {})",
        image_path.display(),
        food_type.unwrap_or("unknown")
    );

    let analysis = data.analyzer.analyze(image_path, food_type).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "analysis": analysis
    })))
}

/// Quality sub-document for a new donation.
///
/// Quality data is an enhancement: a missing image or a failed analysis
/// still answers 201 with a null `foodQuality`.
pub async fn donation_food_quality(
    payload: Multipart,
    data: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, Error> {
    let form = receive_upload(payload, &data).await?;
    let food_type = form.food_type_hint(&query);

    let snapshot = match form.image_path() {
        Some(path) => data.analyzer.food_quality_snapshot(path, food_type).await,
        None => {
            warn!("Donation submitted without an image, skipping quality assessment");
            None
        }
    };

    let recommendation = snapshot
        .as_ref()
        .map(|s| s.safety_recommendation())
        .unwrap_or("Not assessed");

    Ok(HttpResponse::Created().json(serde_json::json!({
        "foodQuality": snapshot,
        "recommendation": recommendation
    })))
}

pub async fn health_check(data: web::Data<AppState>) -> HttpResponse {
    let palette = data.analyzer.palette();
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "freshscan",
        "version": env!("CARGO_PKG_VERSION"),
        "palette": {
            "spoilageColors": palette.spoilage_colors.len(),
            "categories": palette.fresh_colors.len(),
            "foodTypes": palette.food_types.len()
        }
    }))
}
