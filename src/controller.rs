//! Visual lifecycle: font loading, recomputation, and the tick loop.
//!
//! The controller owns every pipeline resource (font handle, noise field,
//! jitter PRNG, renderer, cached particle field) and recomputes geometry
//! only when its inputs change. The host drives `tick()` at its own frame
//! cadence (~30 fps in the reference setup); ticks never recompute.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::blend::blend;
use crate::config::VisualConfig;
use crate::error::{InkformError, InkformResult};
use crate::font::FontFace;
use crate::ink::ink_particles;
use crate::math::Noise2d;
use crate::model::{
    Contour, ParticleField, Point, RenderMode, TokenShare, WeightedContour, normalized_weights,
};
use crate::particles::{blended_particles, single_subject_particles};
use crate::render_cpu::{CpuRenderer, FrameRgba};

/// Lifecycle state of the visual component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualState {
    /// No font load has started yet.
    Uninitialized,
    /// Waiting for the font resource. A failed load stays here; drawing
    /// is simply skipped.
    Loading,
    /// Font available; geometry recomputes on every input change.
    Ready,
}

/// Owns the pipeline state and drives recomputation and drawing.
///
/// Single-threaded cooperative: recomputation runs synchronously inside
/// the data-change handlers, never concurrently with a draw. The cached
/// [`ParticleField`] is replaced as a whole, so a tick never observes a
/// half-updated field.
pub struct VisualController {
    cfg: VisualConfig,
    state: VisualState,
    font: Option<FontFace>,
    tokens: Vec<TokenShare>,
    display_period: bool,
    mode: RenderMode,
    field: ParticleField,
    renderer: CpuRenderer,
    noise: Noise2d,
    rng: StdRng,
    load_epoch: u64,
}

impl VisualController {
    /// Validate the configuration and build an idle controller.
    pub fn new(cfg: VisualConfig) -> InkformResult<Self> {
        cfg.validate()?;
        let noise = Noise2d::new(cfg.noise_seed);
        let rng = StdRng::seed_from_u64(cfg.jitter_seed);
        Ok(Self {
            cfg,
            state: VisualState::Uninitialized,
            font: None,
            tokens: Vec::new(),
            display_period: false,
            mode: RenderMode::Blended,
            field: ParticleField::default(),
            renderer: CpuRenderer::new(),
            noise,
            rng,
            load_epoch: 0,
        })
    }

    /// Begin a font load and return its epoch token.
    ///
    /// Starting a newer load supersedes any in-flight one: a completion
    /// delivered with a stale token is discarded.
    pub fn begin_font_load(&mut self) -> u64 {
        self.load_epoch += 1;
        if self.state == VisualState::Uninitialized {
            self.state = VisualState::Loading;
        }
        self.load_epoch
    }

    /// Deliver the outcome of the font load started at `epoch`.
    ///
    /// Success moves to `Ready` and recomputes; failure is logged and the
    /// controller stays in `Loading` (blank output, no panic).
    pub fn finish_font_load(&mut self, epoch: u64, result: InkformResult<FontFace>) {
        if epoch != self.load_epoch {
            tracing::debug!(epoch, current = self.load_epoch, "discarding stale font load");
            return;
        }
        match result {
            Ok(face) => {
                self.font = Some(face);
                self.state = VisualState::Ready;
                self.recompute_or_keep_previous();
            }
            Err(err) => {
                tracing::warn!(error = %err, "font load failed; rendering disabled");
            }
        }
    }

    /// Synchronous convenience: load the font from disk in one step.
    pub fn load_font(&mut self, path: impl AsRef<std::path::Path>) {
        let epoch = self.begin_font_load();
        let result = FontFace::load(path);
        self.finish_font_load(epoch, result);
    }

    pub fn state(&self) -> VisualState {
        self.state
    }

    /// Mode currently in effect, derived from the display-period flag.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// The cached particle sets the renderer reads each tick.
    pub fn particle_field(&self) -> &ParticleField {
        &self.field
    }

    /// Replace the token list and recompute when ready.
    pub fn set_tokens(&mut self, tokens: Vec<TokenShare>) {
        self.tokens = tokens;
        if self.state == VisualState::Ready {
            self.recompute_or_keep_previous();
        }
    }

    /// Flip the display-period flag and recompute when ready.
    pub fn set_display_period(&mut self, display_period: bool) {
        self.display_period = display_period;
        if self.state == VisualState::Ready {
            self.recompute_or_keep_previous();
        }
    }

    /// Paint the cached field. Returns `None` while the font is missing.
    ///
    /// Idempotent and side-effect-free on the data model: no geometry is
    /// recomputed here.
    pub fn tick(&mut self) -> InkformResult<Option<FrameRgba>> {
        if self.state != VisualState::Ready {
            return Ok(None);
        }
        let frame = self.renderer.draw(&self.field, self.mode, &self.cfg)?;
        Ok(Some(frame))
    }

    fn recompute_or_keep_previous(&mut self) {
        if let Err(err) = self.recompute() {
            // Stale visual over crash: the previous field stays in place.
            tracing::warn!(error = %err, "recomputation failed; keeping previous field");
        }
    }

    /// Run the full geometry pipeline and swap in the new field whole.
    #[tracing::instrument(skip(self), fields(tokens = self.tokens.len(), display = self.display_period))]
    fn recompute(&mut self) -> InkformResult<()> {
        let font = self.font.as_ref().ok_or(InkformError::FontNotLoaded)?;
        let shares = normalized_weights(&self.tokens);
        self.mode = if self.display_period {
            RenderMode::SingleSubject
        } else {
            RenderMode::Blended
        };

        if shares.is_empty() {
            self.field = ParticleField::default();
            return Ok(());
        }

        let next = match self.mode {
            RenderMode::SingleSubject => {
                // Highest-value symbol only; weights are sorted descending.
                let contours = centered_outlines(font, &self.cfg, &shares[0].symbol)?;
                ParticleField {
                    base: single_subject_particles(&contours, &self.cfg),
                    ink: Vec::new(),
                }
            }
            RenderMode::Blended => {
                let mut weighted = Vec::new();
                for share in &shares {
                    for contour in centered_outlines(font, &self.cfg, &share.symbol)? {
                        weighted.push(WeightedContour::new(contour, share.weight)?);
                    }
                }
                let density = blend(
                    &weighted,
                    self.cfg.grid_step,
                    f64::from(self.cfg.canvas.width),
                    f64::from(self.cfg.canvas.height),
                );
                let base = blended_particles(&density);
                let ink = ink_particles(&base, &self.cfg, &self.noise, &mut self.rng);
                ParticleField { base, ink }
            }
        };

        tracing::debug!(
            base = next.base.len(),
            ink = next.ink.len(),
            "particle field recomputed"
        );
        self.field = next;
        Ok(())
    }
}

/// Extract a symbol's outlines centered on the canvas.
fn centered_outlines(
    font: &FontFace,
    cfg: &VisualConfig,
    symbol: &str,
) -> InkformResult<Vec<Contour>> {
    let advance = font.advance_width(symbol, cfg.font_size)?;
    let origin = Point::new(
        (f64::from(cfg.canvas.width) - advance) / 2.0,
        (f64::from(cfg.canvas.height) - cfg.font_size) / 2.0,
    );
    font.outlines(symbol, cfg.font_size, origin)
}
