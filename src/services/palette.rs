// src/services/palette.rs
use crate::errors::FreshScanError;
use crate::models::{FoodCategory, Rgb, SpoilageMarker};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpoilageColor {
    pub name: String,
    pub rgb: Rgb,
    #[serde(default)]
    pub marker: Option<SpoilageMarker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreshColorSet {
    pub category: FoodCategory,
    pub colors: Vec<Rgb>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodTypeProfile {
    pub label: String,
    pub category: FoodCategory,
    #[serde(default)]
    pub spoilage_indicators: Vec<String>,
}

/// Reference colors and food-type knowledge used by every analysis.
///
/// Loaded once at startup and shared read-only behind an `Arc`. Order of
/// `fresh_colors` and `food_types` is significant: it decides category
/// tie-breaks and which label a free-text hint resolves to first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencePalette {
    pub spoilage_colors: Vec<SpoilageColor>,
    pub fresh_colors: Vec<FreshColorSet>,
    pub food_types: Vec<FoodTypeProfile>,
}

impl ReferencePalette {
    pub fn builtin() -> Self {
        Self {
            spoilage_colors: vec![
                spoilage("dark brown", (101, 67, 33), None),
                spoilage("saddle brown", (139, 69, 19), None),
                spoilage("sienna", (160, 82, 45), None),
                spoilage("brown", (165, 42, 42), None),
                spoilage("maroon", (128, 0, 0), Some(SpoilageMarker::BrownSpots)),
                spoilage("dim gray", (105, 105, 105), Some(SpoilageMarker::Discoloration)),
                spoilage("gray", (128, 128, 128), None),
                spoilage("silver", (192, 192, 192), Some(SpoilageMarker::PossibleMold)),
            ],
            fresh_colors: vec![
                FreshColorSet {
                    category: FoodCategory::Vegetables,
                    colors: vec![
                        (0, 128, 0),
                        (34, 139, 34),
                        (50, 205, 50),
                        (144, 238, 144),
                        (255, 255, 0),
                        (255, 165, 0),
                    ],
                },
                FreshColorSet {
                    category: FoodCategory::Fruits,
                    colors: vec![
                        (255, 0, 0),
                        (255, 165, 0),
                        (255, 255, 0),
                        (124, 252, 0),
                        (0, 255, 0),
                        (0, 128, 0),
                        (0, 0, 255),
                        (75, 0, 130),
                        (238, 130, 238),
                    ],
                },
                FreshColorSet {
                    category: FoodCategory::Grains,
                    colors: vec![
                        (245, 245, 220),
                        (245, 222, 179),
                        (210, 180, 140),
                        (188, 143, 143),
                    ],
                },
            ],
            food_types: vec![
                food_type("rice", FoodCategory::Grains, &["musty smell", "insects", "clumping"]),
                food_type("bread", FoodCategory::Grains, &["mold", "sour smell", "hard texture"]),
                food_type(
                    "vegetables",
                    FoodCategory::Vegetables,
                    &["soft spots", "discoloration", "wilting"],
                ),
                food_type("fruits", FoodCategory::Fruits, &["soft spots", "mold", "fermentation"]),
                food_type(
                    "cooked food",
                    FoodCategory::Cooked,
                    &["sour smell", "slimy texture", "mold"],
                ),
            ],
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, FreshScanError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            FreshScanError::Palette(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, FreshScanError> {
        let palette: Self = serde_json::from_str(raw)
            .map_err(|e| FreshScanError::Palette(format!("Invalid palette JSON: {}", e)))?;
        palette.validate()?;
        Ok(palette)
    }

    pub fn validate(&self) -> Result<(), FreshScanError> {
        if self.spoilage_colors.is_empty() {
            return Err(FreshScanError::Palette(
                "At least one spoilage color is required".to_string(),
            ));
        }

        for set in &self.fresh_colors {
            if set.category == FoodCategory::Unknown {
                return Err(FreshScanError::Palette(
                    "Fresh colors cannot be keyed by the unknown category".to_string(),
                ));
            }
        }

        for profile in &self.food_types {
            if profile.label.trim().is_empty() {
                return Err(FreshScanError::Palette("Food type label is empty".to_string()));
            }
            if profile.category == FoodCategory::Unknown {
                return Err(FreshScanError::Palette(format!(
                    "Food type '{}' maps to the unknown category",
                    profile.label
                )));
            }
        }

        Ok(())
    }

    /// Fresh reference colors for a category; empty when the category has none.
    pub fn fresh_colors_for(&self, category: FoodCategory) -> &[Rgb] {
        self.fresh_colors
            .iter()
            .find(|set| set.category == category)
            .map(|set| set.colors.as_slice())
            .unwrap_or(&[])
    }

    /// First food type whose label occurs in the hint, case-insensitively.
    pub fn resolve_food_type(&self, hint: &str) -> Option<&FoodTypeProfile> {
        let hint = hint.to_lowercase();
        self.food_types
            .iter()
            .find(|profile| hint.contains(&profile.label.to_lowercase()))
    }

    pub fn labels_for(&self, category: FoodCategory) -> Vec<String> {
        self.food_types
            .iter()
            .filter(|profile| profile.category == category)
            .map(|profile| profile.label.clone())
            .collect()
    }
}

fn spoilage(name: &str, rgb: Rgb, marker: Option<SpoilageMarker>) -> SpoilageColor {
    SpoilageColor {
        name: name.to_string(),
        rgb,
        marker,
    }
}

fn food_type(label: &str, category: FoodCategory, indicators: &[&str]) -> FoodTypeProfile {
    FoodTypeProfile {
        label: label.to_string(),
        category,
        spoilage_indicators: indicators.iter().map(|s| s.to_string()).collect(),
    }
}

impl Default for ReferencePalette {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_palette_is_valid() {
        let palette = ReferencePalette::builtin();
        assert!(palette.validate().is_ok());
        assert_eq!(palette.spoilage_colors.len(), 8);
        assert_eq!(palette.fresh_colors.len(), 3);
    }

    #[test]
    fn hint_resolution_is_case_insensitive_substring() {
        let palette = ReferencePalette::builtin();

        let profile = palette.resolve_food_type("Steamed Basmati RICE").unwrap();
        assert_eq!(profile.label, "rice");
        assert_eq!(profile.category, FoodCategory::Grains);

        assert!(palette.resolve_food_type("unknown").is_none());
        assert!(palette.resolve_food_type("cheese").is_none());
    }

    #[test]
    fn hint_resolution_follows_table_order() {
        let palette = ReferencePalette::builtin();
        let profile = palette.resolve_food_type("rice with vegetables").unwrap();
        assert_eq!(profile.label, "rice");
    }

    #[test]
    fn cooked_food_has_no_fresh_colors() {
        let palette = ReferencePalette::builtin();
        let profile = palette.resolve_food_type("leftover cooked food").unwrap();
        assert_eq!(profile.category, FoodCategory::Cooked);
        assert!(palette.fresh_colors_for(FoodCategory::Cooked).is_empty());
    }

    #[test]
    fn labels_for_grains() {
        let palette = ReferencePalette::builtin();
        assert_eq!(palette.labels_for(FoodCategory::Grains), vec!["rice", "bread"]);
    }

    #[test]
    fn json_palette_roundtrips_through_validation() {
        let raw = r#"{
            "spoilageColors": [
                {"name": "maroon", "rgb": [128, 0, 0], "marker": "brownSpots"}
            ],
            "freshColors": [
                {"category": "fruits", "colors": [[255, 0, 0]]}
            ],
            "foodTypes": [
                {"label": "apples", "category": "fruits"}
            ]
        }"#;

        let palette = ReferencePalette::from_json_str(raw).unwrap();
        assert_eq!(
            palette.spoilage_colors[0].marker,
            Some(SpoilageMarker::BrownSpots)
        );
        assert!(palette.food_types[0].spoilage_indicators.is_empty());
    }

    #[test]
    fn json_palette_without_spoilage_colors_is_rejected() {
        let raw = r#"{"spoilageColors": [], "freshColors": [], "foodTypes": []}"#;
        let err = ReferencePalette::from_json_str(raw).unwrap_err();
        assert!(matches!(err, FreshScanError::Palette(_)));
    }

    #[test]
    fn json_palette_rejects_unknown_food_category() {
        let raw = r#"{
            "spoilageColors": [{"name": "gray", "rgb": [128, 128, 128]}],
            "freshColors": [],
            "foodTypes": [{"label": "soup", "category": "unknown"}]
        }"#;
        assert!(ReferencePalette::from_json_str(raw).is_err());
    }
}
