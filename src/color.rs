use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Fallback when a chart has a single series.
pub const DEFAULT_SERIES_COLOR: Color32 = Color32::LIGHT_BLUE;

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

/// One colour per chart series.
pub fn series_colors(n: usize) -> Vec<Color32> {
    match n {
        0 => Vec::new(),
        1 => vec![DEFAULT_SERIES_COLOR],
        _ => generate_palette(n),
    }
}
