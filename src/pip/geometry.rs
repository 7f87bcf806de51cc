//! Even-odd point containment for polygons with holes.
//!
//! Polygons are treated as closed sets: a point lying exactly on an edge or
//! vertex of the outer ring is inside, and so is a point exactly on a hole's
//! edge (the hole boundary belongs to the filled region). Edge tests use
//! exact floating point comparisons, no tolerance.

use geo::{Coord, LineString, MultiPolygon, Polygon};

use crate::models::LayerGeometry;

/// Where a point falls relative to a single ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingPosition {
    Inside,
    Boundary,
    Outside,
}

/// Test whether `point` (`x` = lng, `y` = lat) lies in `geometry`.
pub fn contains(point: Coord<f64>, geometry: &LayerGeometry) -> bool {
    match geometry {
        LayerGeometry::Polygon(polygon) => polygon_contains(point, polygon),
        LayerGeometry::MultiPolygon(multi) => multipolygon_contains(point, multi),
    }
}

/// Inside the outer ring and not strictly inside any hole.
pub fn polygon_contains(point: Coord<f64>, polygon: &Polygon<f64>) -> bool {
    match ring_position(point, polygon.exterior()) {
        RingPosition::Outside => false,
        RingPosition::Boundary => true,
        RingPosition::Inside => !polygon
            .interiors()
            .iter()
            .any(|hole| ring_position(point, hole) == RingPosition::Inside),
    }
}

pub fn multipolygon_contains(point: Coord<f64>, multi: &MultiPolygon<f64>) -> bool {
    multi.0.iter().any(|polygon| polygon_contains(point, polygon))
}

/// Classify `point` against one ring by ray casting towards +x.
///
/// The ring does not need to be closed; the edge from the last vertex back
/// to the first is always tested. Rings that enclose no area (fewer than
/// three distinct vertices, or all vertices on one line) are never matched,
/// not even on their edges.
pub fn ring_position(point: Coord<f64>, ring: &LineString<f64>) -> RingPosition {
    let pts = &ring.0;
    if !encloses_area(pts) {
        return RingPosition::Outside;
    }

    let mut inside = false;
    let mut j = pts.len() - 1;
    for i in 0..pts.len() {
        let (a, b) = (pts[i], pts[j]);

        if on_segment(point, a, b) {
            return RingPosition::Boundary;
        }

        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }

    if inside {
        RingPosition::Inside
    } else {
        RingPosition::Outside
    }
}

/// A closing vertex repeating the first one is not counted.
fn encloses_area(pts: &[Coord<f64>]) -> bool {
    let open = match pts {
        [first, .., last] if first == last => &pts[..pts.len() - 1],
        _ => pts,
    };
    if open.len() < 3 {
        return false;
    }

    let origin = open[0];
    let Some(&dir) = open.iter().find(|c| **c != origin) else {
        return false;
    };
    open.iter().any(|&c| cross(origin, dir, c) != 0.0)
}

fn cross(a: Coord<f64>, b: Coord<f64>, p: Coord<f64>) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

fn on_segment(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> bool {
    cross(a, b, p) == 0.0
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}
