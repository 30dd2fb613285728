// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An 8-bit RGB triple.
pub type Rgb = (u8, u8, u8);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DominantColor {
    #[serde(alias = "color")]
    pub rgb: Rgb,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Vegetables,
    Fruits,
    Grains,
    Cooked,
    Unknown,
}

impl FoodCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodCategory::Vegetables => "vegetables",
            FoodCategory::Fruits => "fruits",
            FoodCategory::Grains => "grains",
            FoodCategory::Cooked => "cooked",
            FoodCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Excellent,
    Good,
    Fair,
    Poor,
    Unknown,
}

impl QualityLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            QualityLevel::Excellent
        } else if score >= 6.0 {
            QualityLevel::Good
        } else if score >= 4.0 {
            QualityLevel::Fair
        } else {
            QualityLevel::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpoilageLevel {
    Low,
    Medium,
    High,
}

impl SpoilageLevel {
    pub fn from_risk(risk: f64) -> Self {
        if risk >= 15.0 {
            SpoilageLevel::High
        } else if risk >= 5.0 {
            SpoilageLevel::Medium
        } else {
            SpoilageLevel::Low
        }
    }
}

/// Named spoilage anchors that produce a human-readable indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpoilageMarker {
    Discoloration,
    BrownSpots,
    PossibleMold,
}

impl SpoilageMarker {
    pub fn indicator(&self) -> &'static str {
        match self {
            SpoilageMarker::Discoloration => "Gray discoloration detected",
            SpoilageMarker::BrownSpots => "Brown spots detected",
            SpoilageMarker::PossibleMold => "White fuzzy growth detected (possible mold)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityAssessment {
    pub quality_score: f64,
    pub quality_level: QualityLevel,
    pub dominant_colors: Vec<DominantColor>,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    /// Closeness of the score to the midpoint, as a percentage: 100 at a
    /// score of 5 and 0 at either end of the scale. It is not a measure of
    /// how likely the score is to be right.
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationResult {
    pub food_type: FoodCategory,
    pub confidence: u8,
    pub possible_types: Vec<String>,
    pub dominant_colors: Vec<DominantColor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpoilageResult {
    pub spoilage_risk: f64,
    pub spoilage_level: SpoilageLevel,
    pub indicators: Vec<String>,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallAssessment {
    pub is_safe_for_donation: bool,
    pub recommended_action: String,
    /// Image-derived urgency. Unrelated to the expiration-driven urgency a
    /// donation record carries.
    pub urgency_score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullAnalysis {
    pub quality: QualityAssessment,
    pub identification: IdentificationResult,
    pub spoilage: SpoilageResult,
    pub overall_assessment: OverallAssessment,
}

/// The `foodQuality` sub-document attached to a donation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodQualitySnapshot {
    pub quality_score: f64,
    pub quality_level: QualityLevel,
    pub is_safe_for_donation: bool,
    pub food_type_identified: FoodCategory,
    pub spoilage_risk: f64,
    pub spoilage_level: SpoilageLevel,
    pub assessed_at: DateTime<Utc>,
}

impl FoodQualitySnapshot {
    pub fn from_analysis(analysis: &FullAnalysis, assessed_at: DateTime<Utc>) -> Self {
        Self {
            quality_score: analysis.quality.quality_score,
            quality_level: analysis.quality.quality_level,
            is_safe_for_donation: analysis.overall_assessment.is_safe_for_donation,
            food_type_identified: analysis.identification.food_type,
            spoilage_risk: analysis.spoilage.spoilage_risk,
            spoilage_level: analysis.spoilage.spoilage_level,
            assessed_at,
        }
    }

    /// Display-side advice derived from the stored levels only.
    pub fn safety_recommendation(&self) -> &'static str {
        if self.spoilage_level == SpoilageLevel::High {
            return "Do not donate - high spoilage risk";
        }
        match self.quality_level {
            QualityLevel::Poor => "Inspect carefully before donation",
            QualityLevel::Fair => "Suitable for donation with caution",
            _ => "Safe for donation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_level_bands() {
        assert_eq!(QualityLevel::from_score(10.0), QualityLevel::Excellent);
        assert_eq!(QualityLevel::from_score(8.0), QualityLevel::Excellent);
        assert_eq!(QualityLevel::from_score(7.99), QualityLevel::Good);
        assert_eq!(QualityLevel::from_score(6.0), QualityLevel::Good);
        assert_eq!(QualityLevel::from_score(4.0), QualityLevel::Fair);
        assert_eq!(QualityLevel::from_score(3.9), QualityLevel::Poor);
        assert_eq!(QualityLevel::from_score(0.0), QualityLevel::Poor);
    }

    #[test]
    fn spoilage_level_bands() {
        assert_eq!(SpoilageLevel::from_risk(15.0), SpoilageLevel::High);
        assert_eq!(SpoilageLevel::from_risk(14.9), SpoilageLevel::Medium);
        assert_eq!(SpoilageLevel::from_risk(5.0), SpoilageLevel::Medium);
        assert_eq!(SpoilageLevel::from_risk(4.9), SpoilageLevel::Low);
    }

    #[test]
    fn results_serialize_with_camel_case_keys() {
        let result = SpoilageResult {
            spoilage_risk: 12.5,
            spoilage_level: SpoilageLevel::Medium,
            indicators: vec![SpoilageMarker::BrownSpots.indicator().to_string()],
            recommendation: "inspect".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["spoilageRisk"], 12.5);
        assert_eq!(json["spoilageLevel"], "medium");
        assert_eq!(json["indicators"][0], "Brown spots detected");
    }

    #[test]
    fn dominant_color_accepts_legacy_color_key() {
        let color: DominantColor =
            serde_json::from_str(r#"{"color":[120,0,0],"percentage":42.0}"#).unwrap();
        assert_eq!(color.rgb, (120, 0, 0));
    }

    #[test]
    fn snapshot_recommendation_prefers_spoilage_verdict() {
        let mut snapshot = FoodQualitySnapshot {
            quality_score: 9.0,
            quality_level: QualityLevel::Excellent,
            is_safe_for_donation: false,
            food_type_identified: FoodCategory::Fruits,
            spoilage_risk: 40.0,
            spoilage_level: SpoilageLevel::High,
            assessed_at: Utc::now(),
        };
        assert_eq!(
            snapshot.safety_recommendation(),
            "Do not donate - high spoilage risk"
        );

        snapshot.spoilage_level = SpoilageLevel::Low;
        snapshot.quality_level = QualityLevel::Fair;
        assert_eq!(
            snapshot.safety_recommendation(),
            "Suitable for donation with caution"
        );

        snapshot.quality_level = QualityLevel::Good;
        assert_eq!(snapshot.safety_recommendation(), "Safe for donation");
    }
}
