//! Font-outline extraction.
//!
//! [`FontFace`] is an explicitly owned resource handle: the bytes are read
//! and validated once, then glyph outlines are walked on demand through a
//! [`ttf_parser::OutlineBuilder`] that flattens curve segments into contour
//! polylines in canvas space.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use crate::curve::{flatten_cubic, flatten_quadratic};
use crate::error::{InkformError, InkformResult};
use crate::model::{Contour, Point};

/// Fixed subdivision counts for curve flattening.
const CUBIC_SEGMENTS: usize = 15;
const QUAD_SEGMENTS: usize = 10;

/// Owned font resource, loaded once and cached for the handle's lifetime.
#[derive(Clone)]
pub struct FontFace {
    data: Arc<Vec<u8>>,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl FontFace {
    /// Read and validate a font file.
    pub fn load(path: impl AsRef<Path>) -> InkformResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        Self::from_bytes(data)
    }

    /// Validate raw font bytes.
    pub fn from_bytes(data: Vec<u8>) -> InkformResult<Self> {
        Face::parse(&data, 0).map_err(|e| InkformError::font(format!("parse font face: {e}")))?;
        Ok(Self {
            data: Arc::new(data),
        })
    }

    fn face(&self) -> InkformResult<Face<'_>> {
        Face::parse(&self.data, 0).map_err(|e| InkformError::font(format!("parse font face: {e}")))
    }

    /// Total horizontal advance of `text` at `font_size`, in canvas units.
    ///
    /// Used to center a symbol on the canvas before extraction.
    pub fn advance_width(&self, text: &str, font_size: f64) -> InkformResult<f64> {
        let face = self.face()?;
        let scale = font_size / f64::from(face.units_per_em());
        let mut advance = 0.0;
        for ch in text.chars() {
            if let Some(glyph) = face.glyph_index(ch) {
                advance += f64::from(face.glyph_hor_advance(glyph).unwrap_or(0)) * scale;
            }
        }
        Ok(advance)
    }

    /// Extract the outlines of `text` as closed-or-open contours.
    ///
    /// The baseline sits at `origin.y + font_size` and glyphs advance
    /// rightward from `origin.x`, matching y-down canvas coordinates.
    /// Characters without a glyph in the face are skipped. No empty
    /// contours are ever returned.
    pub fn outlines(&self, text: &str, font_size: f64, origin: Point) -> InkformResult<Vec<Contour>> {
        if text.is_empty() {
            return Err(InkformError::EmptyText);
        }
        let face = self.face()?;
        let scale = font_size / f64::from(face.units_per_em());

        let mut collector = OutlineCollector::new(scale, origin.y + font_size);
        let mut pen_x = origin.x;
        for ch in text.chars() {
            let Some(glyph) = face.glyph_index(ch) else {
                continue;
            };
            collector.pen_x = pen_x;
            outline_glyph(&face, glyph, &mut collector);
            pen_x += f64::from(face.glyph_hor_advance(glyph).unwrap_or(0)) * scale;
        }
        Ok(collector.finish())
    }
}

fn outline_glyph(face: &Face<'_>, glyph: GlyphId, collector: &mut OutlineCollector) {
    // Whitespace and some composite glyphs have no outline; nothing to emit.
    let _ = face.outline_glyph(glyph, collector);
    collector.flush_open();
}

/// Accumulates glyph path commands into contours.
struct OutlineCollector {
    contours: Vec<Contour>,
    current: Vec<Point>,
    pen_x: f64,
    baseline_y: f64,
    scale: f64,
}

impl OutlineCollector {
    fn new(scale: f64, baseline_y: f64) -> Self {
        Self {
            contours: Vec::new(),
            current: Vec::new(),
            pen_x: 0.0,
            baseline_y,
            scale,
        }
    }

    /// Map font units (y-up, glyph-local) to canvas units (y-down).
    fn map(&self, x: f32, y: f32) -> Point {
        Point::new(
            self.pen_x + f64::from(x) * self.scale,
            self.baseline_y - f64::from(y) * self.scale,
        )
    }

    /// Store the contour under construction, dropping it silently when it
    /// has zero points.
    fn flush_open(&mut self) {
        if !self.current.is_empty() {
            self.contours.push(Contour::new(std::mem::take(&mut self.current)));
        }
    }

    fn finish(mut self) -> Vec<Contour> {
        self.flush_open();
        self.contours
    }
}

impl OutlineBuilder for OutlineCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        self.flush_open();
        self.current.push(self.map(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.current.push(self.map(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let ctrl = self.map(x1, y1);
        let to = self.map(x, y);
        let Some(&from) = self.current.last() else {
            // Malformed outline: a curve with no current point. Treat the
            // endpoint as a move.
            self.current.push(to);
            return;
        };
        // The t=0 sample repeats the current tail point; skip it.
        self.current
            .extend(flatten_quadratic(from, ctrl, to, QUAD_SEGMENTS).into_iter().skip(1));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let c1 = self.map(x1, y1);
        let c2 = self.map(x2, y2);
        let to = self.map(x, y);
        let Some(&from) = self.current.last() else {
            self.current.push(to);
            return;
        };
        self.current
            .extend(flatten_cubic(from, c1, c2, to, CUBIC_SEGMENTS).into_iter().skip(1));
    }

    fn close(&mut self) {
        if let Some(&first) = self.current.first() {
            self.current.push(first);
        }
        self.flush_open();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_font() -> FontFace {
        let path = concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/assets/fonts/DejaVuSansMono.ttf"
        );
        FontFace::load(path).expect("bundled test font loads")
    }

    #[test]
    fn invalid_bytes_are_rejected() {
        let err = FontFace::from_bytes(vec![0u8; 16]).unwrap_err();
        assert!(matches!(err, InkformError::Font(_)));
    }

    #[test]
    fn empty_text_is_an_error() {
        let font = test_font();
        let err = font
            .outlines("", 100.0, Point::new(0.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, InkformError::EmptyText));
    }

    #[test]
    fn letter_outline_produces_closed_nonempty_contours() {
        let font = test_font();
        let contours = font
            .outlines("A", 100.0, Point::new(0.0, 0.0))
            .unwrap();
        assert!(!contours.is_empty());
        for contour in &contours {
            assert!(contour.len() >= 3, "degenerate contour: {}", contour.len());
            assert!(contour.is_closed());
        }
    }

    #[test]
    fn outline_points_land_near_the_requested_origin() {
        let font = test_font();
        let origin = Point::new(50.0, 30.0);
        let font_size = 100.0;
        let contours = font.outlines("O", font_size, origin).unwrap();
        for contour in &contours {
            for p in contour.points() {
                assert!(p.x >= origin.x - 1.0, "x before origin: {}", p.x);
                // The glyph box spans roughly [origin.y, origin.y + font_size]
                // plus overshoot.
                assert!(p.y > origin.y - font_size && p.y < origin.y + 2.0 * font_size);
            }
        }
    }

    #[test]
    fn advance_width_grows_with_text_length() {
        let font = test_font();
        let one = font.advance_width("S", 100.0).unwrap();
        let three = font.advance_width("SOL", 100.0).unwrap();
        assert!(one > 0.0);
        // Monospace: three glyphs advance exactly three times one glyph.
        assert!((three - 3.0 * one).abs() < 1e-9);
    }

    #[test]
    fn missing_glyphs_are_skipped() {
        let font = test_font();
        // U+FFFF has no glyph in the bundled face.
        let contours = font
            .outlines("\u{ffff}", 100.0, Point::new(0.0, 0.0))
            .unwrap();
        assert!(contours.is_empty());
    }
}
