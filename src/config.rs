use crate::error::{InkformError, InkformResult};
use crate::model::Canvas;

/// Visual tuning constants for one controller instance.
///
/// All values are configuration, not computed: the defaults reproduce the
/// reference look (600x600 canvas, dense fine-grained particles).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VisualConfig {
    /// Output dimensions in pixels.
    pub canvas: Canvas,
    /// Glyph height in canvas units.
    pub font_size: f64,
    /// Diameter of one rendered particle.
    pub particle_size: f64,
    /// Spacing between samples when walking contours and strokes.
    pub stroke_density: f64,
    /// Narrowest procedural stroke width.
    pub min_stroke_width: f64,
    /// Widest procedural stroke width.
    pub max_stroke_width: f64,
    /// Spatial frequency applied to noise lookups.
    pub noise_scale: f64,
    /// Peak particle alpha on the 0-255 scale.
    pub base_opacity: f64,
    /// Cell size of the density-field grid.
    pub grid_step: f64,
    /// Spawn radius of the ink spread effect.
    pub ink_radius: f64,
    /// Seed for the coherent noise field.
    pub noise_seed: u32,
    /// Seed for the jitter PRNG. Kept separate from `noise_seed`: jitter
    /// must not share a source with the coherent noise.
    pub jitter_seed: u64,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::square(600),
            font_size: 100.0,
            particle_size: 1.5,
            stroke_density: 2.0,
            min_stroke_width: 3.0,
            max_stroke_width: 12.0,
            noise_scale: 0.03,
            base_opacity: 200.0,
            grid_step: 1.5,
            ink_radius: 3.0,
            noise_seed: 0,
            jitter_seed: 7,
        }
    }
}

impl VisualConfig {
    /// Check the configuration once up front so the steady-state render
    /// loop cannot fail on bad parameters.
    pub fn validate(&self) -> InkformResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(InkformError::validation("canvas dimensions must be > 0"));
        }
        if self.canvas.width > u32::from(u16::MAX) || self.canvas.height > u32::from(u16::MAX) {
            return Err(InkformError::validation(
                "canvas dimensions must fit the raster target (u16)",
            ));
        }
        for (name, value) in [
            ("font_size", self.font_size),
            ("particle_size", self.particle_size),
            ("stroke_density", self.stroke_density),
            ("min_stroke_width", self.min_stroke_width),
            ("max_stroke_width", self.max_stroke_width),
            ("noise_scale", self.noise_scale),
            ("grid_step", self.grid_step),
            ("ink_radius", self.ink_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(InkformError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if self.max_stroke_width < self.min_stroke_width {
            return Err(InkformError::validation(
                "max_stroke_width must be >= min_stroke_width",
            ));
        }
        if !self.base_opacity.is_finite() || !(0.0..=255.0).contains(&self.base_opacity) {
            return Err(InkformError::validation(
                "base_opacity must be within [0, 255]",
            ));
        }
        Ok(())
    }
}
