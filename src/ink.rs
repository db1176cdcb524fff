//! Secondary "ink diffusion" particles.
//!
//! Coherent noise sampled at existing particle positions decides where
//! the composite shape is "wet"; those spots bleed a small cluster of
//! denser-to-fainter spread particles.

use std::f64::consts::TAU;

use rand::Rng;

use crate::config::VisualConfig;
use crate::math::{map_range, Noise2d};
use crate::model::{Particle, Point};

/// Noise level above which a base particle bleeds ink.
pub const INK_THRESHOLD: f64 = 0.7;

/// Derive ink particles from the blended base set.
///
/// Output is unordered and may be empty when no noise sample crosses the
/// threshold. At 3-5 spawns per wet point the result never exceeds
/// `5 * base.len()` particles.
pub fn ink_particles(
    base: &[Particle],
    cfg: &VisualConfig,
    noise: &Noise2d,
    rng: &mut impl Rng,
) -> Vec<Particle> {
    let mut out = Vec::new();
    for particle in base {
        let sample = noise.sample(
            particle.pos.x * cfg.noise_scale,
            particle.pos.y * cfg.noise_scale,
        );
        if sample > INK_THRESHOLD {
            out.extend(ink_spread(particle.pos, cfg.ink_radius, rng));
        }
    }
    out
}

/// Spawn 3-5 spread particles around one wet point.
///
/// Radii fall in `[0.3 * radius, radius)` with jittered angle; density
/// fades from 0.8 near the center to 0.2 at the rim.
pub fn ink_spread(center: Point, radius: f64, rng: &mut impl Rng) -> Vec<Particle> {
    let count = rng.gen_range(3..=5);
    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        let angle = rng.gen_range(0.0..TAU);
        let r = rng.gen_range(radius * 0.3..radius);
        points.push(Particle::ink(
            Point::new(center.x + angle.cos() * r, center.y + angle.sin() * r),
            map_range(r, 0.0, radius, 0.8, 0.2),
        ));
    }
    points
}
