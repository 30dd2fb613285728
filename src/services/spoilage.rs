// src/services/spoilage.rs
use crate::errors::FreshScanError;
use crate::models::{DominantColor, SpoilageLevel, SpoilageResult};
use crate::services::classifier::{SPOILAGE_DISTANCE, color_distance, is_spoilage_color};
use crate::services::color_quantizer::quantize_dominant_colors;
use crate::services::palette::ReferencePalette;
use crate::services::quality::round_to_tenth;
use std::path::Path;

/// Risk at or above which the recommendation says not to donate.
/// Deliberately not the same as the `high` level cut-off of 15.
pub const DO_NOT_DONATE_RISK: f64 = 10.0;

pub const INSPECT_RISK: f64 = 5.0;

pub fn detect_spoilage(
    palette: &ReferencePalette,
    path: &Path,
) -> Result<SpoilageResult, FreshScanError> {
    let colors = quantize_dominant_colors(path)?;
    Ok(detect_from_colors(palette, &colors))
}

pub fn detect_from_colors(palette: &ReferencePalette, colors: &[DominantColor]) -> SpoilageResult {
    let mut risk = 0.0;
    let mut indicators = Vec::new();

    for color in colors {
        if !is_spoilage_color(palette, color.rgb) {
            continue;
        }
        risk += color.percentage;

        // Each named anchor is checked on its own; one color may raise several.
        for anchor in &palette.spoilage_colors {
            if let Some(marker) = anchor.marker {
                if color_distance(color.rgb, anchor.rgb) < SPOILAGE_DISTANCE {
                    indicators.push(marker.indicator().to_string());
                }
            }
        }
    }

    let risk = risk.clamp(0.0, 100.0);

    SpoilageResult {
        spoilage_risk: round_to_tenth(risk),
        spoilage_level: SpoilageLevel::from_risk(risk),
        indicators,
        recommendation: recommendation_for(risk).to_string(),
    }
}

pub fn recommendation_for(risk: f64) -> &'static str {
    if risk >= DO_NOT_DONATE_RISK {
        "High risk of spoilage or contamination. Do not donate this food."
    } else if risk >= INSPECT_RISK {
        "Moderate risk of spoilage. Inspect carefully before donating."
    } else {
        "Low risk of spoilage. Food appears safe for donation."
    }
}
