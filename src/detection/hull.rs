use std::collections::HashMap;

use imageproc::geometry::convex_hull;
use imageproc::point::Point;

use crate::disjoint_set::DisjointSet;
use crate::models::{point_distance, Contour};

/// A convex hull collapsed to one representative point per spatial
/// neighborhood, plus the cluster snapshot it was derived from.
#[derive(Debug, Clone)]
pub struct ReducedHull {
    /// Representative contour indices, one per cluster, in cluster order.
    pub indices: Vec<usize>,
    /// The hull labels (positions in the unreduced hull) of each cluster.
    pub clusters: Vec<Vec<usize>>,
}

/// Convex hull of the contour as indices into it, sorted in contour order.
pub fn convex_hull_indices(contour: &Contour) -> Vec<usize> {
    if contour.len() < 3 {
        return (0..contour.len()).collect();
    }

    // Map hull vertices back to their first occurrence along the boundary.
    let mut index_of: HashMap<(i32, i32), usize> = HashMap::new();
    for (i, p) in contour.points.iter().enumerate() {
        index_of.entry((p.x, p.y)).or_insert(i);
    }

    let mut indices: Vec<usize> = convex_hull(contour.points.as_slice())
        .iter()
        .filter_map(|p| index_of.get(&(p.x, p.y)).copied())
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}

/// Group hull points lying within `neighborhood` pixels of one another and
/// keep a single representative per group.
///
/// Raw hulls of noisy contours carry many near-duplicate extreme points
/// around one true corner; the representative is the cluster member closest
/// to the cluster centroid.
pub fn reduce_hull(contour: &Contour, hull: &[usize], neighborhood: f64) -> ReducedHull {
    let mut neighborhoods = DisjointSet::new(0..hull.len());
    for u in 0..hull.len() {
        for v in (u + 1)..hull.len() {
            let pnt_u = contour.points[hull[u]];
            let pnt_v = contour.points[hull[v]];
            if point_distance(pnt_u, pnt_v) <= neighborhood {
                neighborhoods.union(u, v);
            }
        }
    }

    let clusters = neighborhoods.groups();
    let mut indices = Vec::with_capacity(clusters.len());

    for cluster in &clusters {
        let mut center = (0.0_f64, 0.0_f64);
        for &label in cluster {
            let pnt = contour.points[hull[label]];
            center.0 += pnt.x as f64;
            center.1 += pnt.y as f64;
        }
        center.0 /= cluster.len() as f64;
        center.1 /= cluster.len() as f64;

        let mut closest = hull[cluster[0]];
        let mut closest_dist = f64::INFINITY;
        for &label in cluster {
            let pnt = contour.points[hull[label]];
            let dist = centroid_distance(pnt, center);
            if dist < closest_dist {
                closest_dist = dist;
                closest = hull[label];
            }
        }
        indices.push(closest);
    }

    ReducedHull { indices, clusters }
}

fn centroid_distance(p: Point<i32>, center: (f64, f64)) -> f64 {
    let dx = p.x as f64 - center.0;
    let dy = p.y as f64 - center.1;
    (dx * dx + dy * dy).sqrt()
}
