//! CPU rasterization of particle fields via `vello_cpu`.

use kurbo::Shape;

use crate::config::VisualConfig;
use crate::error::{InkformError, InkformResult};
use crate::model::{Particle, ParticleField, Point, RenderMode};

/// One rendered frame: RGBA8 bytes, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgba {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Pixel bytes.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// CPU renderer painting particles as filled circles.
///
/// The render context and target pixmap are reused across draws while
/// dimensions are unchanged and released with the renderer (RAII), so
/// repeated mounts do not leak raster resources.
pub struct CpuRenderer {
    ctx: Option<vello_cpu::RenderContext>,
    pixmap: Option<(u16, u16, vello_cpu::Pixmap)>,
}

impl CpuRenderer {
    pub fn new() -> Self {
        Self {
            ctx: None,
            pixmap: None,
        }
    }

    /// Paint the cached particle field onto a white background.
    ///
    /// Reads only `field`; no geometry is recomputed here. Base particles
    /// use `alpha = width * base_opacity`, ink particles
    /// `alpha = density * base_opacity`.
    pub fn draw(
        &mut self,
        field: &ParticleField,
        mode: RenderMode,
        cfg: &VisualConfig,
    ) -> InkformResult<FrameRgba> {
        let width: u16 = cfg
            .canvas
            .width
            .try_into()
            .map_err(|_| InkformError::validation("canvas width exceeds raster target"))?;
        let height: u16 = cfg
            .canvas
            .height
            .try_into()
            .map_err(|_| InkformError::validation("canvas height exceeds raster target"))?;

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();

        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));

        // Single-subject outlines draw slightly larger dots than blended
        // coverage cells.
        let base_diameter = match mode {
            RenderMode::SingleSubject => cfg.particle_size * 1.5,
            RenderMode::Blended => cfg.particle_size,
        };
        for particle in &field.base {
            paint_dot(&mut ctx, particle, particle.width, base_diameter, cfg);
        }
        let ink_diameter = cfg.particle_size * 1.2;
        for particle in &field.ink {
            paint_dot(&mut ctx, particle, particle.density, ink_diameter, cfg);
        }

        ctx.flush();
        let mut pixmap = match self.pixmap.take() {
            Some((w, h, pm)) if w == width && h == height => pm,
            _ => vello_cpu::Pixmap::new(width, height),
        };
        ctx.render_to_pixmap(&mut pixmap);

        let frame = FrameRgba {
            width: cfg.canvas.width,
            height: cfg.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        };
        self.ctx = Some(ctx);
        self.pixmap = Some((width, height, pixmap));
        Ok(frame)
    }
}

impl Default for CpuRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn paint_dot(
    ctx: &mut vello_cpu::RenderContext,
    particle: &Particle,
    intensity: Option<f64>,
    diameter: f64,
    cfg: &VisualConfig,
) {
    let alpha = alpha_u8(intensity.unwrap_or(1.0), cfg.base_opacity);
    if alpha == 0 {
        return;
    }
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, alpha));
    ctx.fill_path(&circle_to_cpu(particle.pos, diameter / 2.0));
}

fn alpha_u8(intensity: f64, base_opacity: f64) -> u8 {
    (intensity * base_opacity).clamp(0.0, 255.0).round() as u8
}

fn circle_to_cpu(center: Point, radius: f64) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let circle = kurbo::Circle::new(center, radius);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in circle.path_elements(0.1) {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Canvas;

    fn small_cfg() -> VisualConfig {
        VisualConfig {
            canvas: Canvas::square(32),
            ..VisualConfig::default()
        }
    }

    fn is_white(px: &[u8]) -> bool {
        px == [255, 255, 255, 255]
    }

    #[test]
    fn empty_field_paints_background_only() {
        let cfg = small_cfg();
        let mut renderer = CpuRenderer::new();
        let frame = renderer
            .draw(&ParticleField::default(), RenderMode::Blended, &cfg)
            .unwrap();
        assert_eq!(frame.data.len(), 32 * 32 * 4);
        assert!(frame.data.chunks_exact(4).all(is_white));
    }

    #[test]
    fn a_particle_darkens_pixels_near_its_position() {
        let cfg = small_cfg();
        let field = ParticleField {
            base: vec![Particle::main(Point::new(16.0, 16.0), 1.0)],
            ink: vec![],
        };
        let mut renderer = CpuRenderer::new();
        let frame = renderer.draw(&field, RenderMode::Blended, &cfg).unwrap();
        assert!(
            frame.data.chunks_exact(4).any(|px| !is_white(px)),
            "frame stayed blank"
        );
    }

    #[test]
    fn zero_intensity_particles_are_skipped() {
        let cfg = small_cfg();
        let field = ParticleField {
            base: vec![Particle::main(Point::new(16.0, 16.0), 0.0)],
            ink: vec![Particle::ink(Point::new(8.0, 8.0), 0.0)],
        };
        let mut renderer = CpuRenderer::new();
        let frame = renderer.draw(&field, RenderMode::Blended, &cfg).unwrap();
        assert!(frame.data.chunks_exact(4).all(is_white));
    }

    #[test]
    fn renderer_reuses_buffers_across_draws() {
        let cfg = small_cfg();
        let mut renderer = CpuRenderer::new();
        let a = renderer
            .draw(&ParticleField::default(), RenderMode::Blended, &cfg)
            .unwrap();
        let b = renderer
            .draw(&ParticleField::default(), RenderMode::SingleSubject, &cfg)
            .unwrap();
        assert_eq!(a, b);
    }
}
