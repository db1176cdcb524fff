//! Particle synthesis: contour sampling, density-cell emission, and the
//! noise-driven stroke path.

use std::f64::consts::FRAC_PI_2;

use rand::Rng;

use crate::blend::DensityField;
use crate::config::VisualConfig;
use crate::math::{lerp, map_range, Noise2d};
use crate::model::{Contour, Particle, Point};

/// Sample the dominant symbol's contours at a fixed stride.
///
/// Every emitted particle has uniform `width = 1.0`; no noise, no
/// blending. Deterministic given the same contours.
pub fn single_subject_particles(contours: &[Contour], cfg: &VisualConfig) -> Vec<Particle> {
    let stride = (cfg.stroke_density.max(1.0)) as usize;
    let mut out = Vec::new();
    for contour in contours {
        for point in contour.points().iter().step_by(stride) {
            out.push(Particle::main(*point, 1.0));
        }
    }
    out
}

/// Emit one particle per non-empty density cell.
///
/// The accumulated weight rides along as `width`: a coverage density the
/// renderer interprets as alpha intensity, not a stroke width.
pub fn blended_particles(field: &DensityField) -> Vec<Particle> {
    field
        .cells()
        .iter()
        .map(|cell| Particle::main(Point::new(cell.x, cell.y), cell.weight))
        .collect()
}

/// Synthesize noise-width ink strokes along raw contours.
///
/// For each segment between consecutive contour points the walk samples a
/// coherent-noise stroke width, then fills the stroke cross-section with
/// jittered particles that fade toward the stroke edge. Contours with
/// fewer than 2 points have no segments and are skipped.
pub fn stroke_particles(
    contours: &[Contour],
    cfg: &VisualConfig,
    noise: &Noise2d,
    rng: &mut impl Rng,
) -> Vec<Particle> {
    let mut out = Vec::new();
    for contour in contours {
        for pair in contour.points().windows(2) {
            stroke_segment(pair[0], pair[1], cfg, noise, rng, &mut out);
        }
    }
    out
}

fn stroke_segment(
    start: Point,
    end: Point,
    cfg: &VisualConfig,
    noise: &Noise2d,
    rng: &mut impl Rng,
    out: &mut Vec<Particle>,
) {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let distance = dx.hypot(dy);
    if distance <= f64::EPSILON {
        return;
    }
    let angle = dy.atan2(dx);
    let normal_x = (angle + FRAC_PI_2).cos();
    let normal_y = (angle + FRAC_PI_2).sin();

    let cross_step = cfg.particle_size * 1.5;
    let mut d = 0.0;
    while d < distance {
        let t = d / distance;
        let x = lerp(start.x, end.x, t);
        let y = lerp(start.y, end.y, t);

        let stroke_width = lerp(
            cfg.min_stroke_width,
            cfg.max_stroke_width,
            noise.sample(x * cfg.noise_scale, y * cfg.noise_scale),
        );

        let half = stroke_width / 2.0;
        let mut w = -half;
        while w <= half {
            let px = x + normal_x * w + rng.gen_range(-0.3..0.3);
            let py = y + normal_y * w + rng.gen_range(-0.3..0.3);
            out.push(Particle::main(
                Point::new(px, py),
                map_range(w.abs(), 0.0, half, 1.0, 0.4),
            ));
            w += cross_step;
        }
        d += cfg.stroke_density;
    }
}
