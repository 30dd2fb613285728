// src/services/assessment.rs
use crate::models::{OverallAssessment, QualityAssessment, SpoilageLevel, SpoilageResult};

const QUALITY_WEIGHT: f64 = 0.7;
const SPOILAGE_WEIGHT: f64 = 0.3;

pub fn combine(quality: &QualityAssessment, spoilage: &SpoilageResult) -> OverallAssessment {
    let high_risk = spoilage.spoilage_level == SpoilageLevel::High;

    let recommended_action = if high_risk {
        "Do not donate - high spoilage risk"
    } else if quality.quality_score >= 6.0 {
        "Safe for donation"
    } else {
        "Inspect carefully before donation"
    };

    OverallAssessment {
        is_safe_for_donation: !high_risk,
        recommended_action: recommended_action.to_string(),
        urgency_score: urgency_score(quality.quality_score, spoilage.spoilage_risk),
    }
}

/// Higher for poorer quality and higher spoilage risk, always within 1..=10.
pub fn urgency_score(quality_score: f64, spoilage_risk: f64) -> u8 {
    let quality_factor = (10.0 - quality_score) / 10.0;
    let spoilage_factor = spoilage_risk / 100.0;
    let raw = (quality_factor * QUALITY_WEIGHT + spoilage_factor * SPOILAGE_WEIGHT) * 10.0;
    raw.round().clamp(1.0, 10.0) as u8
}
