// src/services/mod.rs
pub mod analyzer;
pub mod assessment;
pub mod classifier;
pub mod color_quantizer;
pub mod identification;
pub mod palette;
pub mod quality;
pub mod spoilage;

pub use analyzer::FoodAnalyzer;
pub use palette::ReferencePalette;
