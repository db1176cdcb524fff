use crate::error::{InkformError, InkformResult};

pub use kurbo::Point;

/// Fixed output dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Square canvas helper.
    pub fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }
}

/// Which generator produced a particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ParticleKind {
    /// Shape-defining particle (outline sample or density cell).
    Main,
    /// Secondary diffusion particle spawned by the ink effect.
    Ink,
}

/// A renderable particle.
///
/// `width` and `density` are populated by the generator that produced the
/// particle: main particles carry `width` (stroke intensity or coverage
/// density), ink particles carry `density`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Particle {
    pub pos: Point,
    pub width: Option<f64>,
    pub density: Option<f64>,
    pub kind: ParticleKind,
}

impl Particle {
    /// Build a main (shape) particle with the given width intensity.
    pub fn main(pos: Point, width: f64) -> Self {
        Self {
            pos,
            width: Some(width),
            density: None,
            kind: ParticleKind::Main,
        }
    }

    /// Build an ink (diffusion) particle with the given density.
    pub fn ink(pos: Point, density: f64) -> Self {
        Self {
            pos,
            width: None,
            density: Some(density),
            kind: ParticleKind::Ink,
        }
    }
}

/// Ordered sequence of points approximating one glyph outline segment.
///
/// Insertion order is significant: consecutive points form the stroke
/// segments, and a closed contour repeats its first point at the end.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Contour {
    points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the contour repeats its first point at the end.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) => self.points.len() > 2 && a == b,
            _ => false,
        }
    }
}

/// A contour together with its share of the blended visual.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WeightedContour {
    pub contour: Contour,
    pub weight: f64,
}

impl WeightedContour {
    /// Pair a contour with a weight in `[0, 1]`.
    pub fn new(contour: Contour, weight: f64) -> InkformResult<Self> {
        if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
            return Err(InkformError::validation(
                "contour weight must be finite and within [0, 1]",
            ));
        }
        Ok(Self { contour, weight })
    }
}

/// The cached particle sets the renderer reads every tick.
///
/// Owned exclusively by the controller and replaced as a whole on
/// recomputation, never mutated field-by-field.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParticleField {
    pub base: Vec<Particle>,
    pub ink: Vec<Particle>,
}

impl ParticleField {
    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.ink.is_empty()
    }
}

/// Rendering mode, driven by the external display-period flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RenderMode {
    /// Render only the highest-value symbol as a clean particle outline.
    SingleSubject,
    /// Fuse all symbols' outlines into one noise-textured composite.
    Blended,
}

/// External input row: one held asset and its USD value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TokenShare {
    pub symbol: String,
    pub usd_value: f64,
}

impl TokenShare {
    pub fn new(symbol: impl Into<String>, usd_value: f64) -> Self {
        Self {
            symbol: symbol.into(),
            usd_value,
        }
    }
}

/// A symbol's normalized share of the total held value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SymbolWeight {
    pub symbol: String,
    pub weight: f64,
}

/// Normalize token values into blend weights.
///
/// Entries with zero, negative, or non-finite value are excluded before
/// normalization (they never participate with weight 0). The result is
/// sorted by descending share, so index 0 is the dominant symbol, and the
/// weights of a non-empty result sum to 1.0.
pub fn normalized_weights(tokens: &[TokenShare]) -> Vec<SymbolWeight> {
    let mut held: Vec<&TokenShare> = tokens
        .iter()
        .filter(|t| t.usd_value.is_finite() && t.usd_value > 0.0)
        .collect();
    held.sort_by(|a, b| b.usd_value.total_cmp(&a.usd_value));

    let total: f64 = held.iter().map(|t| t.usd_value).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    held.into_iter()
        .map(|t| SymbolWeight {
            symbol: t.symbol.clone(),
            weight: t.usd_value / total,
        })
        .collect()
}
