//! Nested-island unification: absorb contours fully contained inside a
//! larger one.
//!
//! Reflections and shadows in a drawing make the tracer emit several
//! concentric borders for one element. A contour whose every point lies
//! inside another contour is absorbed into it (dropped). Candidates are
//! examined largest bounding box first, with a box-containment quick
//! reject before the exact point-in-polygon test. Survivors come back
//! in input order.

use crate::types::{Contour, Point};

/// Ray-casting point-in-polygon test.
///
/// Casts a horizontal ray from `point` and counts edge crossings; an
/// odd count means inside. Points exactly on an edge may land on
/// either side. An empty polygon contains nothing.
#[must_use]
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n == 0 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Drop contours fully contained inside another contour.
///
/// Returns the surviving contours in input order and the number of
/// absorbed contours. Fewer than 2 contours are returned unchanged.
#[must_use = "returns the surviving contours and the absorbed count"]
pub fn unify_nested(contours: &[Contour]) -> (Vec<Contour>, usize) {
    if contours.len() < 2 {
        return (contours.to_vec(), 0);
    }

    let areas: Vec<f64> = contours
        .iter()
        .map(|c| c.bounding_box().map_or(0.0, |b| b.area()))
        .collect();
    let boxes: Vec<_> = contours.iter().map(Contour::bounding_box).collect();

    // Largest box first: only a larger contour can absorb a smaller one.
    let mut order: Vec<usize> = (0..contours.len()).collect();
    order.sort_by(|&a, &b| areas[b].total_cmp(&areas[a]));

    let mut absorbed = vec![false; contours.len()];
    for (rank, &outer) in order.iter().enumerate() {
        if absorbed[outer] {
            continue;
        }
        let Some(outer_box) = boxes[outer] else {
            continue;
        };
        for &inner in &order[rank + 1..] {
            if absorbed[inner] {
                continue;
            }
            let Some(inner_box) = boxes[inner] else {
                continue;
            };
            if inner_box.min_x < outer_box.min_x
                || inner_box.min_y < outer_box.min_y
                || inner_box.max_x > outer_box.max_x
                || inner_box.max_y > outer_box.max_y
            {
                continue;
            }
            let all_inside = contours[inner]
                .points()
                .iter()
                .all(|&p| point_in_polygon(p, contours[outer].points()));
            if all_inside {
                absorbed[inner] = true;
            }
        }
    }

    let count = absorbed.iter().filter(|&&a| a).count();
    let survivors = contours
        .iter()
        .zip(&absorbed)
        .filter(|&(_, &gone)| !gone)
        .map(|(c, _)| c.clone())
        .collect();
    (survivors, count)
}
