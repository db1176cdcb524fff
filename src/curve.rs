//! Bézier flattening via direct Bernstein-polynomial evaluation.
//!
//! The subdivision counts are fixed tuning constants, not derived from
//! curve length: glyph-sized curves flatten acceptably at 10-15 segments.

use crate::model::Point;

/// Flatten a cubic Bézier into `n + 1` points sampled at `t = i/n`.
///
/// The first point equals `p0` and the last equals `p3`. Coincident
/// control points simply yield collinear samples.
pub fn flatten_cubic(p0: Point, p1: Point, p2: Point, p3: Point, n: usize) -> Vec<Point> {
    let n = n.max(1);
    let mut points = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let t = i as f64 / n as f64;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;
        let t2 = t * t;
        let t3 = t2 * t;
        points.push(Point::new(
            mt3 * p0.x + 3.0 * mt2 * t * p1.x + 3.0 * mt * t2 * p2.x + t3 * p3.x,
            mt3 * p0.y + 3.0 * mt2 * t * p1.y + 3.0 * mt * t2 * p2.y + t3 * p3.y,
        ));
    }
    points
}

/// Flatten a quadratic Bézier into `n + 1` points sampled at `t = i/n`.
pub fn flatten_quadratic(p0: Point, p1: Point, p2: Point, n: usize) -> Vec<Point> {
    let n = n.max(1);
    let mut points = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let t = i as f64 / n as f64;
        let mt = 1.0 - t;
        points.push(Point::new(
            mt * mt * p0.x + 2.0 * mt * t * p1.x + t * t * p2.x,
            mt * mt * p0.y + 2.0 * mt * t * p1.y + t * t * p2.y,
        ));
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_returns_n_plus_one_points_with_exact_endpoints() {
        let p0 = Point::new(0.0, 0.0);
        let p1 = Point::new(1.0, 2.0);
        let p2 = Point::new(3.0, 2.0);
        let p3 = Point::new(4.0, 0.0);
        let pts = flatten_cubic(p0, p1, p2, p3, 15);
        assert_eq!(pts.len(), 16);
        assert_eq!(pts[0], p0);
        assert_eq!(pts[15], p3);
    }

    #[test]
    fn quadratic_returns_n_plus_one_points_with_exact_endpoints() {
        let p0 = Point::new(0.0, 0.0);
        let p1 = Point::new(2.0, 4.0);
        let p2 = Point::new(4.0, 0.0);
        let pts = flatten_quadratic(p0, p1, p2, 10);
        assert_eq!(pts.len(), 11);
        assert_eq!(pts[0], p0);
        assert_eq!(pts[10], p2);
        // Quadratic midpoint: B(0.5) = (p0 + 2*p1 + p2) / 4.
        let mid = pts[5];
        assert!((mid.x - 2.0).abs() < 1e-12);
        assert!((mid.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn coincident_control_points_yield_collinear_samples() {
        let p0 = Point::new(0.0, 0.0);
        let p3 = Point::new(10.0, 10.0);
        let pts = flatten_cubic(p0, p0, p3, p3, 12);
        for p in &pts {
            assert!((p.x - p.y).abs() < 1e-9, "sample off the diagonal: {p:?}");
        }
    }

    #[test]
    fn zero_subdivisions_clamps_to_endpoints() {
        let p0 = Point::new(1.0, 1.0);
        let p2 = Point::new(5.0, 5.0);
        let pts = flatten_quadratic(p0, Point::new(3.0, 0.0), p2, 0);
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[0], p0);
        assert_eq!(pts[1], p2);
    }
}
