use noise::{NoiseFn, Perlin};

/// Linear interpolation between `start` and `end` at parameter `t`.
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    (1.0 - t) * start + t * end
}

/// Map `value` from `[in_start, in_end]` onto `[out_start, out_end]`.
///
/// A degenerate input range maps everything to `out_start`.
pub fn map_range(value: f64, in_start: f64, in_end: f64, out_start: f64, out_end: f64) -> f64 {
    let span = in_end - in_start;
    if span == 0.0 {
        return out_start;
    }
    out_start + (out_end - out_start) * ((value - in_start) / span)
}

/// Coherent 2-D noise normalized to `[0, 1]`.
///
/// Values at nearby coordinates vary continuously, which is what drives
/// the smooth stroke-width variation and the ink thresholding. Pure
/// pseudo-randomness (jitter) deliberately lives elsewhere.
#[derive(Clone)]
pub struct Noise2d {
    perlin: Perlin,
}

impl std::fmt::Debug for Noise2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Noise2d").finish_non_exhaustive()
    }
}

impl Noise2d {
    /// Seeded, deterministic noise source.
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }

    /// Sample the field at `(x, y)`. Output is clamped to `[0, 1]`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        (self.perlin.get([x, y]) * 0.5 + 0.5).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_output_is_bounded() {
        let noise = Noise2d::new(42);
        for i in 0..200 {
            let x = f64::from(i) * 0.17;
            let y = f64::from(i) * 0.31;
            let n = noise.sample(x, y);
            assert!((0.0..=1.0).contains(&n), "noise out of range at ({x}, {y}): {n}");
        }
    }

    #[test]
    fn lerp_of_noise_stays_within_bounds() {
        let noise = Noise2d::new(7);
        let (min, max) = (3.0, 12.0);
        for i in 0..200 {
            let n = noise.sample(f64::from(i) * 0.13, f64::from(i) * 0.07);
            let w = lerp(min, max, n);
            assert!((min..=max).contains(&w), "lerp escaped bounds: {w}");
        }
    }

    #[test]
    fn noise_is_deterministic_for_a_seed() {
        let a = Noise2d::new(99);
        let b = Noise2d::new(99);
        assert_eq!(a.sample(1.5, 2.3), b.sample(1.5, 2.3));
    }

    #[test]
    fn nearby_samples_vary_continuously() {
        // Coherent noise, not white noise: a tiny step moves the value a
        // tiny amount.
        let noise = Noise2d::new(3);
        let base = noise.sample(4.2, 1.7);
        let step = noise.sample(4.2 + 1e-4, 1.7);
        assert!((base - step).abs() < 1e-2);
    }

    #[test]
    fn map_range_maps_endpoints_and_midpoint() {
        assert_eq!(map_range(0.0, 0.0, 10.0, 1.0, 0.4), 1.0);
        assert_eq!(map_range(10.0, 0.0, 10.0, 1.0, 0.4), 0.4);
        let mid = map_range(5.0, 0.0, 10.0, 1.0, 0.4);
        assert!((mid - 0.7).abs() < 1e-12);
    }

    #[test]
    fn map_range_degenerate_input_maps_to_out_start() {
        assert_eq!(map_range(3.0, 2.0, 2.0, 1.0, 0.4), 1.0);
    }
}
