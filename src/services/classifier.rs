// src/services/classifier.rs
use crate::models::Rgb;
use crate::services::palette::ReferencePalette;

/// A color closer than this to a spoilage reference counts as spoilage-like.
pub const SPOILAGE_DISTANCE: f64 = 50.0;

/// A color closer than this to a fresh reference counts as a category match.
pub const FRESH_MATCH_DISTANCE: f64 = 60.0;

/// Plain Euclidean distance in RGB space.
pub fn color_distance(a: Rgb, b: Rgb) -> f64 {
    let dr = a.0 as f64 - b.0 as f64;
    let dg = a.1 as f64 - b.1 as f64;
    let db = a.2 as f64 - b.2 as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

pub fn is_spoilage_color(palette: &ReferencePalette, color: Rgb) -> bool {
    palette
        .spoilage_colors
        .iter()
        .any(|reference| color_distance(color, reference.rgb) < SPOILAGE_DISTANCE)
}

pub fn matches_any(color: Rgb, references: &[Rgb], threshold: f64) -> bool {
    references
        .iter()
        .any(|reference| color_distance(color, *reference) < threshold)
}
