use std::collections::BTreeMap;

use imageproc::point::Point;

use crate::models::{point_distance, Contour, ConvexityDefect, Fingertip};

/// Convexity defects of the contour relative to the reduced hull.
///
/// Hull indices are walked in contour order (including the wrap-around
/// pair); every pair with at least one boundary point between its endpoints
/// yields one defect at the point of maximal distance to the chord.
pub fn convexity_defects(contour: &Contour, hull: &[usize]) -> Vec<ConvexityDefect> {
    let n = contour.len();
    let mut hull_sorted: Vec<usize> = hull.iter().copied().filter(|&i| i < n).collect();
    hull_sorted.sort_unstable();
    hull_sorted.dedup();
    if hull_sorted.len() < 2 {
        return Vec::new();
    }

    let mut defects = Vec::new();
    for (i, &start) in hull_sorted.iter().enumerate() {
        let end = hull_sorted[(i + 1) % hull_sorted.len()];
        let mut far: Option<(usize, f64)> = None;

        let mut index = (start + 1) % n;
        while index != end {
            let depth = chord_distance(contour.points[start], contour.points[end], contour.points[index]);
            match far {
                Some((_, best)) if depth <= best => {}
                _ => far = Some((index, depth)),
            }
            index = (index + 1) % n;
        }

        if let Some((far_index, depth)) = far {
            defects.push(ConvexityDefect {
                start,
                end,
                far: far_index,
                depth,
            });
        }
    }
    defects
}

/// Perpendicular distance from `p` to the chord through `a` and `b`.
fn chord_distance(a: Point<i32>, b: Point<i32>, p: Point<i32>) -> f64 {
    let chord = point_distance(a, b);
    if chord == 0.0 {
        return point_distance(a, p);
    }
    let cross = (b.x - a.x) as f64 * (a.y - p.y) as f64 - (a.x - p.x) as f64 * (b.y - a.y) as f64;
    cross.abs() / chord
}

/// Included angle at `pnt` between the rays to `d1` and `d2`, in degrees,
/// via the law of cosines. `None` when a zero-length side degenerates the
/// triangle. The clamp guards float overshoot on near-degenerate input.
pub fn included_angle(pnt: Point<i32>, d1: Point<i32>, d2: Point<i32>) -> Option<f64> {
    let a = point_distance(d1, d2);
    let b = point_distance(pnt, d1);
    let c = point_distance(pnt, d2);
    if b == 0.0 || c == 0.0 {
        return None;
    }
    let term = ((b * b + c * c - a * a) / (2.0 * b * c)).clamp(-1.0, 1.0);
    Some(term.acos().to_degrees())
}

/// Unit vector pointing from `pnt` into the finger interior.
///
/// Rotates `d1` counterclockwise by half the defect angle around `pnt`; when
/// that lands farther from `d2` than `d1` was, the rotation bisected away
/// from the finger, so `d2` is rotated instead.
pub fn correction_vector(
    pnt: Point<i32>,
    d1: Point<i32>,
    d2: Point<i32>,
    angle_degrees: f64,
) -> Option<(f64, f64)> {
    let half = angle_degrees.to_radians() / 2.0;
    let rotate = |target: Point<i32>| -> (f64, f64) {
        let dx = (target.x - pnt.x) as f64;
        let dy = (target.y - pnt.y) as f64;
        (
            pnt.x as f64 + half.cos() * dx - half.sin() * dy,
            pnt.y as f64 + half.sin() * dx + half.cos() * dy,
        )
    };

    let mut q = rotate(d1);
    if distance_to(d2, q) > point_distance(d2, d1) {
        q = rotate(d2);
    }

    let line = (q.0 - pnt.x as f64, q.1 - pnt.y as f64);
    let magnitude = (line.0 * line.0 + line.1 * line.1).sqrt();
    if magnitude == 0.0 {
        return None;
    }
    Some((line.0 / magnitude, line.1 / magnitude))
}

fn distance_to(p: Point<i32>, q: (f64, f64)) -> f64 {
    let dx = p.x as f64 - q.0;
    let dy = p.y as f64 - q.1;
    (dx * dx + dy * dy).sqrt()
}

/// Classify reduced-hull points as fingertips and emit corrected positions.
pub fn detect_fingertips(
    contour: &Contour,
    hull: &[usize],
    correction_scale: f32,
    lower_cut_percentage: f32,
    max_angle_degrees: f32,
) -> Vec<Fingertip> {
    let defects = convexity_defects(contour, hull);
    if defects.is_empty() {
        return Vec::new();
    }

    // Each hull-adjacent contour index maps to the far points of the defects
    // touching it. BTreeMap keeps candidate order deterministic per frame.
    let mut defect_neighbors: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for defect in &defects {
        defect_neighbors.entry(defect.start).or_default().push(defect.far);
        defect_neighbors.entry(defect.end).or_default().push(defect.far);
    }

    let mut top_y = i32::MAX;
    let mut bottom_y = i32::MIN;
    for p in &contour.points {
        top_y = top_y.min(p.y);
        bottom_y = bottom_y.max(p.y);
    }

    // Everything in the lowest fraction of the vertical extent is wrist or
    // palm base, not a fingertip. Height is negative with y growing down.
    let height = top_y - bottom_y;
    let height_threshold = bottom_y + (lower_cut_percentage * height as f32) as i32;

    let mut fingertips = Vec::new();
    for (&pnt_index, far_indices) in &defect_neighbors {
        // Points with more or fewer than two flanking concavities are
        // under-determined; only clean two-sided corners are evaluated.
        if far_indices.len() != 2 {
            continue;
        }

        let pnt = contour.points[pnt_index];
        let d1 = contour.points[far_indices[0]];
        let d2 = contour.points[far_indices[1]];

        if pnt.y > height_threshold {
            continue;
        }

        let Some(angle) = included_angle(pnt, d1, d2) else {
            continue;
        };
        if angle > max_angle_degrees as f64 {
            continue;
        }

        let Some(line) = correction_vector(pnt, d1, d2, angle) else {
            continue;
        };
        fingertips.push(Fingertip {
            x: pnt.x + (line.0 * correction_scale as f64).round() as i32,
            y: pnt.y + (line.1 * correction_scale as f64).round() as i32,
        });
    }
    fingertips
}
