//! Convex hull of node positions (Andrew's monotone chain).
//!
//! Points are treated as planar `(lon, lat)` pairs. The result is
//! counter-clockwise, starts at the lexicographically smallest point, and
//! excludes collinear boundary points: a vertex is only kept where the
//! boundary makes a strict left turn.

use itertools::Itertools;
use log::debug;

use super::{
    geo_point::{cross, GeoPoint},
    polygon::HullPolygon,
};

/// Convex hull of `points`.
///
/// Total over finite inputs: fewer than three distinct points give a
/// degenerate hull (empty, a point, or a segment in input order), and an
/// all-collinear input collapses to its two extreme points.
pub fn compute_hull(points: &[GeoPoint]) -> HullPolygon {
    let sorted: Vec<GeoPoint> = points
        .iter()
        .copied()
        .sorted_by_key(GeoPoint::sort_key)
        .dedup_by(|a, b| a.sort_key() == b.sort_key())
        .collect();

    match sorted.len() {
        0 | 1 => return HullPolygon(sorted),
        2 => {
            // Keep the caller's order for a bare segment.
            let segment = points.iter().copied().unique_by(GeoPoint::sort_key).collect();
            return HullPolygon(segment);
        }
        _ => {}
    }

    let mut lower = half_hull(sorted.iter());
    let mut upper = half_hull(sorted.iter().rev());

    // Each chain ends where the other begins.
    lower.pop();
    upper.pop();
    lower.extend(upper);

    debug!("hull: {} input points, {} distinct, {} vertices", points.len(), sorted.len(), lower.len());
    HullPolygon(lower)
}

/// Convex hull of the present, finite coordinates in `points`.
///
/// Position sources report unknown locations as `None`; those, and any NaN or
/// infinite coordinates, are skipped.
pub fn hull_of<I: IntoIterator<Item = Option<GeoPoint>>>(points: I) -> HullPolygon {
    let mut skipped = 0;
    let present: Vec<GeoPoint> = points
        .into_iter()
        .filter_map(|p| match p {
            Some(p) if p.is_finite() => Some(p),
            _ => {
                skipped += 1;
                None
            }
        })
        .collect();
    if skipped > 0 {
        debug!("hull: skipped {} absent or non-finite coordinates", skipped);
    }
    compute_hull(&present)
}

/// One monotone chain: walk `points` in order, dropping the previous vertex
/// whenever it would not make a strict counter-clockwise turn.
fn half_hull<'a, I: Iterator<Item = &'a GeoPoint>>(points: I) -> Vec<GeoPoint> {
    let mut chain: Vec<GeoPoint> = Vec::new();
    for p in points {
        while chain.len() >= 2 && cross(&chain[chain.len() - 2], &chain[chain.len() - 1], p) <= 0. {
            chain.pop();
        }
        chain.push(*p);
    }
    chain
}

#[cfg(test)]
mod tests;
