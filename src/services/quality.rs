// src/services/quality.rs
use crate::errors::FreshScanError;
use crate::models::{DominantColor, QualityAssessment, QualityLevel};
use crate::services::classifier::{FRESH_MATCH_DISTANCE, is_spoilage_color, matches_any};
use crate::services::color_quantizer::quantize_dominant_colors;
use crate::services::palette::ReferencePalette;
use std::path::Path;

pub fn assess_quality(
    palette: &ReferencePalette,
    path: &Path,
    food_type: Option<&str>,
) -> Result<QualityAssessment, FreshScanError> {
    let colors = quantize_dominant_colors(path)?;
    Ok(score_quality(palette, colors, food_type))
}

pub fn score_quality(
    palette: &ReferencePalette,
    colors: Vec<DominantColor>,
    food_type: Option<&str>,
) -> QualityAssessment {
    if colors.is_empty() {
        return QualityAssessment {
            quality_score: 5.0,
            quality_level: QualityLevel::Unknown,
            dominant_colors: colors,
            issues: vec!["Could not analyze image colors".to_string()],
            recommendations: vec!["Please upload a clearer image".to_string()],
            confidence: 0,
        };
    }

    let spoilage_count = colors
        .iter()
        .filter(|color| is_spoilage_color(palette, color.rgb))
        .count();
    let spoilage_percentage = spoilage_count as f64 / colors.len() as f64 * 100.0;
    let mut score = 10.0 - spoilage_percentage / 10.0;

    let profile = food_type.and_then(|hint| palette.resolve_food_type(hint));
    if let Some(profile) = profile {
        let expected = palette.fresh_colors_for(profile.category);
        if !expected.is_empty() {
            let match_score: f64 = colors
                .iter()
                .filter(|color| matches_any(color.rgb, expected, FRESH_MATCH_DISTANCE))
                .map(|color| color.percentage)
                .sum();
            score = (score + match_score / 20.0).min(10.0);
        }
    }

    let score = score.clamp(0.0, 10.0);
    let quality_level = QualityLevel::from_score(score);

    let mut issues = Vec::new();
    if spoilage_count > 0 {
        issues.push("Detected colors that may indicate spoilage or contamination".to_string());
    }

    let mut recommendations = Vec::new();
    if score < 6.0 {
        recommendations
            .push("Consider inspecting this food more carefully before donation".to_string());
        recommendations.push("Check for odors, textures, or other signs of spoilage".to_string());
        if let Some(profile) = profile.filter(|p| !p.spoilage_indicators.is_empty()) {
            recommendations.push(format!(
                "Watch for signs typical of {}: {}",
                profile.label,
                profile.spoilage_indicators.join(", ")
            ));
        }
    } else if score >= 8.0 {
        recommendations.push("Food appears to be in excellent condition for donation".to_string());
    }

    QualityAssessment {
        quality_score: round_to_tenth(score),
        quality_level,
        dominant_colors: colors,
        issues,
        recommendations,
        confidence: midpoint_confidence(score),
    }
}

/// Peaks at 100 for a score of 5 and falls linearly to 0 at 0 or 10.
fn midpoint_confidence(score: f64) -> u8 {
    ((1.0 - (5.0 - score).abs() / 5.0) * 100.0)
        .round()
        .clamp(0.0, 100.0) as u8
}

pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
