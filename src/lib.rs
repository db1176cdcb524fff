//! Inkform renders a living visual identity for a set of held assets: a
//! field of particles whose shape derives from short text symbols, each
//! contributing in proportion to its share of total value.
//!
//! # Pipeline overview
//!
//! 1. **Extract**: font glyph paths -> flattened [`Contour`] polylines
//! 2. **Blend** (blended mode): weighted contours -> sparse [`DensityField`]
//! 3. **Generate**: contours or density cells -> [`ParticleField`]
//! 4. **Ink** (blended mode): coherent-noise thresholding spawns
//!    secondary diffusion particles
//! 5. **Draw**: the cached field is painted every tick by the CPU
//!    renderer; upstream stages only re-run when inputs change
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Cache-once-per-change**: geometry recomputes in data-change
//!   handlers, never inside the draw step.
//! - **Owned resources**: the font handle, noise field, and jitter PRNG
//!   are owned by the [`VisualController`], not process-wide state.
//! - **Separate randomness**: coherent noise (stroke width, ink
//!   thresholds) and jitter (placement) never share a source.
#![forbid(unsafe_code)]

mod blend;
mod config;
mod controller;
mod curve;
mod error;
mod font;
mod ink;
mod math;
mod model;
mod particles;
mod render_cpu;

pub use blend::{DensityCell, DensityField, blend, point_in_polygon};
pub use config::VisualConfig;
pub use controller::{VisualController, VisualState};
pub use curve::{flatten_cubic, flatten_quadratic};
pub use error::{InkformError, InkformResult};
pub use font::FontFace;
pub use ink::{INK_THRESHOLD, ink_particles, ink_spread};
pub use math::{Noise2d, lerp, map_range};
pub use model::{
    Canvas, Contour, Particle, ParticleField, ParticleKind, Point, RenderMode, SymbolWeight,
    TokenShare, WeightedContour, normalized_weights,
};
pub use particles::{blended_particles, single_subject_particles, stroke_particles};
pub use render_cpu::{CpuRenderer, FrameRgba};
