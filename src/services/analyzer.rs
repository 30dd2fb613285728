// src/services/analyzer.rs
use crate::errors::FreshScanError;
use crate::models::*;
use crate::services::assessment::combine;
use crate::services::identification::identify_food_type;
use crate::services::palette::ReferencePalette;
use crate::services::quality::assess_quality;
use crate::services::spoilage::detect_spoilage;
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

/// Runs the color analyses off the async workers.
///
/// Every call re-quantizes the image; nothing is cached between calls.
pub struct FoodAnalyzer {
    palette: Arc<ReferencePalette>,
}

impl FoodAnalyzer {
    pub fn new(palette: Arc<ReferencePalette>) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &ReferencePalette {
        &self.palette
    }

    pub async fn assess(
        &self,
        path: &Path,
        food_type: Option<&str>,
    ) -> Result<QualityAssessment, FreshScanError> {
        await_task(self.spawn_quality(path, food_type)).await
    }

    pub async fn identify(&self, path: &Path) -> Result<IdentificationResult, FreshScanError> {
        await_task(self.spawn_identification(path)).await
    }

    pub async fn spoilage(&self, path: &Path) -> Result<SpoilageResult, FreshScanError> {
        await_task(self.spawn_spoilage(path)).await
    }

    /// Runs all three analyses concurrently and combines them.
    ///
    /// Any single failure fails the whole analysis.
    pub async fn analyze(
        &self,
        path: &Path,
        food_type: Option<&str>,
    ) -> Result<FullAnalysis, FreshScanError> {
        let start = Instant::now();

        let (quality, identification, spoilage) = tokio::try_join!(
            await_task(self.spawn_quality(path, food_type)),
            await_task(self.spawn_identification(path)),
            await_task(self.spawn_spoilage(path)),
        )?;

        let overall_assessment = combine(&quality, &spoilage);

        info!(
            "Analyzed {} in {}ms: quality {} ({:?}), spoilage {} ({:?}), type {}",
            path.display(),
            start.elapsed().as_millis(),
            quality.quality_score,
            quality.quality_level,
            spoilage.spoilage_risk,
            spoilage.spoilage_level,
            identification.food_type
        );

        Ok(FullAnalysis {
            quality,
            identification,
            spoilage,
            overall_assessment,
        })
    }

    /// Best-effort projection for a donation record.
    ///
    /// Failures are logged and swallowed so donation creation can go ahead
    /// without quality data.
    pub async fn food_quality_snapshot(
        &self,
        path: &Path,
        food_type: Option<&str>,
    ) -> Option<FoodQualitySnapshot> {
        match self.analyze(path, food_type).await {
            Ok(analysis) => {
                let snapshot = FoodQualitySnapshot::from_analysis(&analysis, chrono::Utc::now());
                debug!("Food quality snapshot for {}: {:?}", path.display(), snapshot);
                Some(snapshot)
            }
            Err(e) => {
                warn!(
                    "Food quality assessment failed for {}, continuing without it: {}",
                    path.display(),
                    e
                );
                None
            }
        }
    }

    fn spawn_quality(
        &self,
        path: &Path,
        food_type: Option<&str>,
    ) -> JoinHandle<Result<QualityAssessment, FreshScanError>> {
        let palette = Arc::clone(&self.palette);
        let path = path.to_path_buf();
        let food_type = food_type.map(str::to_string);
        tokio::task::spawn_blocking(move || assess_quality(&palette, &path, food_type.as_deref()))
    }

    fn spawn_identification(
        &self,
        path: &Path,
    ) -> JoinHandle<Result<IdentificationResult, FreshScanError>> {
        let palette = Arc::clone(&self.palette);
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || identify_food_type(&palette, &path))
    }

    fn spawn_spoilage(&self, path: &Path) -> JoinHandle<Result<SpoilageResult, FreshScanError>> {
        let palette = Arc::clone(&self.palette);
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || detect_spoilage(&palette, &path))
    }
}

async fn await_task<T>(handle: JoinHandle<Result<T, FreshScanError>>) -> Result<T, FreshScanError> {
    handle
        .await
        .map_err(|e| FreshScanError::Task(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb as Pixel, RgbImage};
    use tempfile::tempdir;

    fn analyzer() -> FoodAnalyzer {
        FoodAnalyzer::new(Arc::new(ReferencePalette::builtin()))
    }

    #[tokio::test]
    async fn analyze_combines_all_three_results() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("maroon.png");
        RgbImage::from_pixel(100, 100, Pixel([128, 0, 0]))
            .save(&path)
            .unwrap();

        let analysis = analyzer().analyze(&path, None).await.unwrap();

        assert_eq!(analysis.quality.quality_level, QualityLevel::Poor);
        assert_eq!(analysis.identification.food_type, FoodCategory::Unknown);
        assert_eq!(analysis.spoilage.spoilage_level, SpoilageLevel::High);
        assert!(!analysis.overall_assessment.is_safe_for_donation);
        assert_eq!(analysis.overall_assessment.urgency_score, 10);
    }

    #[tokio::test]
    async fn analyze_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let err = analyzer()
            .analyze(&dir.path().join("missing.png"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, FreshScanError::ImageRead(_)));
    }

    #[tokio::test]
    async fn snapshot_is_none_when_analysis_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(analyzer().food_quality_snapshot(&path, Some("rice")).await.is_none());
    }

    #[tokio::test]
    async fn snapshot_projects_the_analysis() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("green.png");
        RgbImage::from_pixel(100, 100, Pixel([0, 130, 0]))
            .save(&path)
            .unwrap();

        let snapshot = analyzer()
            .food_quality_snapshot(&path, Some("vegetables"))
            .await
            .unwrap();

        assert_eq!(snapshot.quality_score, 10.0);
        assert_eq!(snapshot.quality_level, QualityLevel::Excellent);
        assert!(snapshot.is_safe_for_donation);
        assert_eq!(snapshot.food_type_identified, FoodCategory::Vegetables);
        assert_eq!(snapshot.spoilage_level, SpoilageLevel::Low);
    }
}
