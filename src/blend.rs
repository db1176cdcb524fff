//! Weighted spatial blending of contour sets into a sparse density field.

use crate::model::{Point, WeightedContour};

/// One retained grid cell: its sample point and accumulated weight.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DensityCell {
    pub x: f64,
    pub y: f64,
    pub weight: f64,
}

/// Sparse uniform grid of accumulated coverage weights.
///
/// Built fresh per recomputation and discarded once the particle
/// generator has consumed it; cells with zero weight are never stored.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DensityField {
    grid_step: f64,
    cells: Vec<DensityCell>,
}

impl DensityField {
    pub fn grid_step(&self) -> f64 {
        self.grid_step
    }

    pub fn cells(&self) -> &[DensityCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Accumulate weighted contour coverage over a uniform grid.
///
/// For every cell center, every containing contour adds its weight to the
/// cell. Complexity is O(cells x total edges), which is bounded by
/// configuration. An empty input, all-zero weights, or degenerate
/// dimensions yield an empty field: "nothing to render", not an error.
pub fn blend(weighted: &[WeightedContour], grid_step: f64, width: f64, height: f64) -> DensityField {
    let mut field = DensityField {
        grid_step,
        cells: Vec::new(),
    };
    if weighted.is_empty() || !(grid_step > 0.0) || !(width > 0.0) || !(height > 0.0) {
        return field;
    }

    // Bounding boxes let most cells skip the edge-crossing walk entirely.
    let boxed: Vec<(&WeightedContour, kurbo::Rect)> = weighted
        .iter()
        .filter(|wc| wc.weight > 0.0 && wc.contour.len() >= 3)
        .map(|wc| (wc, bounding_box(wc.contour.points())))
        .collect();
    if boxed.is_empty() {
        return field;
    }

    let cols = (width / grid_step).ceil() as usize;
    let rows = (height / grid_step).ceil() as usize;
    for i in 0..cols {
        let x = (i as f64 + 0.5) * grid_step;
        for j in 0..rows {
            let y = (j as f64 + 0.5) * grid_step;
            let mut total = 0.0;
            for (wc, bbox) in &boxed {
                if bbox.contains(Point::new(x, y))
                    && point_in_polygon(Point::new(x, y), wc.contour.points())
                {
                    total += wc.weight;
                }
            }
            if total > 0.0 {
                field.cells.push(DensityCell { x, y, weight: total });
            }
        }
    }
    field
}

/// Ray-casting containment test over the contour treated as a closed
/// polygon (standard edge-crossing parity).
pub fn point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (polygon[i], polygon[j]);
        let crosses = (pi.y > p.y) != (pj.y > p.y);
        if crosses && p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn bounding_box(points: &[Point]) -> kurbo::Rect {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    kurbo::Rect::new(min_x, min_y, max_x, max_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Contour;

    fn unit_square() -> Contour {
        Contour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ])
    }

    fn square(x0: f64, y0: f64, side: f64) -> Contour {
        Contour::new(vec![
            Point::new(x0, y0),
            Point::new(x0 + side, y0),
            Point::new(x0 + side, y0 + side),
            Point::new(x0, y0 + side),
        ])
    }

    #[test]
    fn unit_square_contains_center_not_outside() {
        let sq = unit_square();
        assert!(point_in_polygon(Point::new(0.5, 0.5), sq.points()));
        assert!(!point_in_polygon(Point::new(2.0, 2.0), sq.points()));
    }

    #[test]
    fn degenerate_polygon_contains_nothing() {
        let line = [Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        assert!(!point_in_polygon(Point::new(0.5, 0.5), &line));
    }

    #[test]
    fn empty_input_yields_empty_field() {
        let field = blend(&[], 1.0, 10.0, 10.0);
        assert!(field.is_empty());
    }

    #[test]
    fn all_zero_weights_yield_empty_field() {
        let wc = WeightedContour::new(square(0.0, 0.0, 8.0), 0.0).unwrap();
        let field = blend(&[wc], 1.0, 10.0, 10.0);
        assert!(field.is_empty());
    }

    #[test]
    fn degenerate_grid_step_yields_empty_field() {
        let wc = WeightedContour::new(square(0.0, 0.0, 8.0), 1.0).unwrap();
        assert!(blend(&[wc], 0.0, 10.0, 10.0).is_empty());
    }

    #[test]
    fn single_full_weight_contour_cells_lie_inside_it() {
        // With one token the blended field must cover exactly the cells
        // inside that token's contour.
        let contour = square(2.0, 2.0, 4.0);
        let wc = WeightedContour::new(contour.clone(), 1.0).unwrap();
        let field = blend(&[wc], 1.0, 10.0, 10.0);
        assert!(!field.is_empty());
        for cell in field.cells() {
            assert!(
                point_in_polygon(Point::new(cell.x, cell.y), contour.points()),
                "cell ({}, {}) escaped the contour",
                cell.x,
                cell.y
            );
            assert!((cell.weight - 1.0).abs() < 1e-12);
        }
        // 4x4 region at grid step 1 holds 16 cell centers.
        assert_eq!(field.len(), 16);
    }

    #[test]
    fn overlapping_contours_accumulate_their_weights() {
        let a = WeightedContour::new(square(0.0, 0.0, 6.0), 0.6).unwrap();
        let b = WeightedContour::new(square(4.0, 4.0, 6.0), 0.4).unwrap();
        let field = blend(&[a, b], 1.0, 10.0, 10.0);

        let weight_at = |x: f64, y: f64| {
            field
                .cells()
                .iter()
                .find(|c| (c.x - x).abs() < 1e-9 && (c.y - y).abs() < 1e-9)
                .map(|c| c.weight)
        };
        // Only in `a`.
        assert!((weight_at(1.5, 1.5).unwrap() - 0.6).abs() < 1e-12);
        // Only in `b`.
        assert!((weight_at(8.5, 8.5).unwrap() - 0.4).abs() < 1e-12);
        // In the overlap.
        assert!((weight_at(5.5, 5.5).unwrap() - 1.0).abs() < 1e-12);
        // Outside both: omitted from the sparse field.
        assert!(weight_at(8.5, 1.5).is_none());
    }
}
