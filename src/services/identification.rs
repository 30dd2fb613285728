// src/services/identification.rs
use crate::errors::FreshScanError;
use crate::models::{DominantColor, FoodCategory, IdentificationResult};
use crate::services::classifier::{FRESH_MATCH_DISTANCE, color_distance};
use crate::services::color_quantizer::quantize_dominant_colors;
use crate::services::palette::ReferencePalette;
use std::path::Path;

pub fn identify_food_type(
    palette: &ReferencePalette,
    path: &Path,
) -> Result<IdentificationResult, FreshScanError> {
    let colors = quantize_dominant_colors(path)?;
    Ok(identify_from_colors(palette, colors))
}

pub fn identify_from_colors(
    palette: &ReferencePalette,
    colors: Vec<DominantColor>,
) -> IdentificationResult {
    let mut best: Option<(FoodCategory, f64)> = None;
    for set in &palette.fresh_colors {
        let score = category_score(&colors, &set.colors);
        // Strictly greater, so ties keep the earlier category.
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((set.category, score));
        }
    }

    match best {
        Some((category, score)) if score > 0.0 => IdentificationResult {
            food_type: category,
            confidence: score.round().min(100.0) as u8,
            possible_types: palette.labels_for(category),
            dominant_colors: colors,
        },
        _ => IdentificationResult {
            food_type: FoodCategory::Unknown,
            confidence: 0,
            possible_types: Vec::new(),
            dominant_colors: colors,
        },
    }
}

/// Sum of `percentage * (1 - d / 60)` over every color/reference pair closer than 60.
pub fn category_score(colors: &[DominantColor], references: &[(u8, u8, u8)]) -> f64 {
    let mut score = 0.0;
    for color in colors {
        for reference in references {
            let distance = color_distance(color.rgb, *reference);
            if distance < FRESH_MATCH_DISTANCE {
                score += color.percentage * (1.0 - distance / FRESH_MATCH_DISTANCE);
            }
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(rgb: (u8, u8, u8), percentage: f64) -> DominantColor {
        DominantColor { rgb, percentage }
    }

    #[test]
    fn no_colors_is_unknown() {
        let palette = ReferencePalette::builtin();
        let result = identify_from_colors(&palette, Vec::new());

        assert_eq!(result.food_type, FoodCategory::Unknown);
        assert_eq!(result.confidence, 0);
        assert!(result.possible_types.is_empty());
    }

    #[test]
    fn unmatched_colors_are_unknown() {
        let palette = ReferencePalette::builtin();
        let result = identify_from_colors(&palette, vec![color((120, 0, 0), 100.0)]);

        assert_eq!(result.food_type, FoodCategory::Unknown);
        assert_eq!(result.confidence, 0);
        assert_eq!(result.dominant_colors.len(), 1);
    }

    #[test]
    fn solid_green_identifies_vegetables() {
        let palette = ReferencePalette::builtin();
        let result = identify_from_colors(&palette, vec![color((0, 130, 0), 100.0)]);

        assert_eq!(result.food_type, FoodCategory::Vegetables);
        assert_eq!(result.confidence, 100);
        assert_eq!(result.possible_types, vec!["vegetables"]);
    }

    #[test]
    fn wheat_tone_identifies_grains() {
        let palette = ReferencePalette::builtin();
        let result = identify_from_colors(&palette, vec![color((240, 220, 180), 30.0)]);

        assert_eq!(result.food_type, FoodCategory::Grains);
        assert!(result.confidence > 0 && result.confidence <= 100);
        assert_eq!(result.possible_types, vec!["rice", "bread"]);
    }

    #[test]
    fn closer_matches_weigh_more() {
        let near = category_score(&[color((0, 128, 0), 10.0)], &[(0, 128, 0)]);
        let far = category_score(&[color((0, 158, 0), 10.0)], &[(0, 128, 0)]);

        assert_eq!(near, 10.0);
        assert_eq!(far, 5.0);
    }

    #[test]
    fn confidence_is_rounded_score() {
        let palette = ReferencePalette::builtin();
        // Exactly on pure red, which only the fruits set carries.
        let result = identify_from_colors(&palette, vec![color((255, 0, 0), 12.4)]);

        assert_eq!(result.food_type, FoodCategory::Fruits);
        assert_eq!(result.confidence, 12);
        assert_eq!(result.possible_types, vec!["fruits"]);
    }

    #[test]
    fn possible_types_only_contain_winning_category_labels() {
        let palette = ReferencePalette::builtin();
        let result = identify_from_colors(&palette, vec![color((240, 220, 180), 50.0)]);

        let expected: Vec<String> = palette
            .food_types
            .iter()
            .filter(|profile| profile.category == result.food_type)
            .map(|profile| profile.label.clone())
            .collect();
        assert_eq!(result.possible_types, expected);
        for label in &result.possible_types {
            let profile = palette.food_types.iter().find(|p| &p.label == label).unwrap();
            assert_eq!(profile.category, result.food_type);
        }
    }
}
