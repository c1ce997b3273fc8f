use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: cluster key → Color32
// ---------------------------------------------------------------------------

/// Maps each cluster key to a distinct colour.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Build a colour map for the given cluster keys.
    pub fn new<'a>(clusters: impl IntoIterator<Item = &'a String>) -> Self {
        let clusters: Vec<&String> = clusters.into_iter().collect();
        let palette = generate_palette(clusters.len());
        let mapping = clusters
            .into_iter()
            .zip(palette)
            .map(|(k, c)| (k.clone(), c))
            .collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a cluster key.
    pub fn color_for(&self, cluster: &str) -> Color32 {
        self.mapping.get(cluster).copied().unwrap_or(Color32::GRAY)
    }
}
