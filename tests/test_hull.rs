use fingertips::DisjointSet;
use fingertips::detection::hull::{convex_hull_indices, reduce_hull};
use fingertips::models::{Contour, point_distance};
use imageproc::point::Point;

#[test]
fn test_disjoint_set_find_and_union() {
    let mut set = DisjointSet::new(0..5);

    assert_eq!(set.find(3), Some(3));
    assert_eq!(set.find(7), None);
    assert_eq!(set.groups().len(), 5);

    // The smaller-indexed group is absorbed into the other
    set.union(0, 1);
    assert_eq!(set.find(0), set.find(1));
    assert_eq!(set.groups().len(), 4);

    // Chained merge relocates the whole group
    set.union(1, 2);
    assert_eq!(set.find(0), set.find(2));
    let groups = set.groups();
    assert_eq!(groups.len(), 3);
    let merged = groups.iter().find(|g| g.len() == 3).expect("merged group");
    let mut members = merged.clone();
    members.sort_unstable();
    assert_eq!(members, vec![0, 1, 2]);
}

#[test]
fn test_disjoint_set_union_is_noop_for_unknown_or_joined() {
    let mut set = DisjointSet::new(0..3);

    set.union(0, 9); // unknown label
    assert_eq!(set.groups().len(), 3);

    set.union(0, 1);
    let before = set.groups();
    set.union(1, 0); // already share a group
    assert_eq!(set.groups(), before);
}

#[test]
fn test_convex_hull_indices_skips_collinear_edge_points() {
    // Square traced with midpoints on every edge; only corners are extreme.
    let contour = Contour::new(vec![
        Point::new(0, 0),
        Point::new(5, 0),
        Point::new(10, 0),
        Point::new(10, 5),
        Point::new(10, 10),
        Point::new(5, 10),
        Point::new(0, 10),
        Point::new(0, 5),
    ]);

    let hull = convex_hull_indices(&contour);
    assert_eq!(hull, vec![0, 2, 4, 6]);
}

#[test]
fn test_reduce_hull_clusters_neighborhoods() {
    // Three well-separated neighborhoods: a triangle of near-duplicates, a
    // pair, and a lone point.
    let contour = Contour::new(vec![
        Point::new(0, 0),
        Point::new(3, 4),
        Point::new(6, 0),
        Point::new(200, 0),
        Point::new(203, 3),
        Point::new(100, 300),
    ]);
    let hull: Vec<usize> = (0..contour.len()).collect();

    let reduced = reduce_hull(&contour, &hull, 50.0);
    assert_eq!(reduced.indices.len(), 3);
    assert_eq!(reduced.clusters.len(), 3);

    // Every cluster member lies within the neighborhood of its representative
    for (cluster, &representative) in reduced.clusters.iter().zip(&reduced.indices) {
        for &label in cluster {
            let dist = point_distance(contour.points[hull[label]], contour.points[representative]);
            assert!(dist <= 50.0, "member {} is {} px from representative", label, dist);
        }
    }
}

#[test]
fn test_reduce_hull_is_idempotent() {
    let contour = Contour::new(vec![
        Point::new(0, 0),
        Point::new(3, 4),
        Point::new(6, 0),
        Point::new(200, 0),
        Point::new(203, 3),
        Point::new(100, 300),
    ]);
    let hull: Vec<usize> = (0..contour.len()).collect();

    let once = reduce_hull(&contour, &hull, 50.0);
    let twice = reduce_hull(&contour, &once.indices, 50.0);

    let mut first: Vec<usize> = once.indices.clone();
    let mut second: Vec<usize> = twice.indices.clone();
    first.sort_unstable();
    second.sort_unstable();
    assert_eq!(first, second);
}
