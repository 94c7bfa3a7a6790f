use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use tsify::Tsify;

use super::{
    bounds::Bounds,
    geo_point::{cross, GeoPoint},
};

/// Distance (in degrees) within which a point counts as lying on an edge.
pub const BOUNDARY_EPSILON: f64 = 1e-9;

/// Ordered convex hull vertices, counter-clockwise, without a repeated
/// closing vertex.
///
/// Fewer than three vertices is a valid, degenerate hull: empty, a single
/// point, or a segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tsify, derive_more::Deref, derive_more::From)]
pub struct HullPolygon(pub Vec<GeoPoint>);

impl HullPolygon {
    pub fn vertices(&self) -> &[GeoPoint] {
        &self.0
    }

    /// Fewer than three vertices: no enclosed area.
    pub fn is_degenerate(&self) -> bool {
        self.0.len() < 3
    }

    /// Edges as `(start, end)` pairs, wrapping from the last vertex back to the
    /// first. A segment hull yields its single edge once.
    pub fn edges(&self) -> Vec<(GeoPoint, GeoPoint)> {
        let n = self.0.len();
        match n {
            0 | 1 => vec![],
            2 => vec![(self.0[0], self.0[1])],
            _ => (0..n).map(|i| (self.0[i], self.0[(i + 1) % n])).collect(),
        }
    }

    /// Vertex list with the first vertex repeated at the end, for surfaces
    /// that want an explicitly closed ring.
    pub fn closed(&self) -> Vec<GeoPoint> {
        let mut ring = self.0.clone();
        if let Some(first) = self.0.first() {
            if self.0.len() > 1 {
                ring.push(*first);
            }
        }
        ring
    }

    /// Whether `p` lies inside the hull or on its boundary.
    pub fn contains(&self, p: &GeoPoint) -> bool {
        match self.0.len() {
            0 => false,
            1 => self.0[0].distance(p) <= BOUNDARY_EPSILON,
            _ => {
                if self.on_boundary(p) {
                    return true;
                }
                if self.is_degenerate() {
                    return false;
                }
                // Convex and counter-clockwise: inside iff left of every edge.
                self.edges().iter().all(|(a, b)| cross(a, b, p) > 0.)
            }
        }
    }

    pub fn on_boundary(&self, p: &GeoPoint) -> bool {
        match self.0.len() {
            0 => false,
            1 => self.0[0].distance(p) <= BOUNDARY_EPSILON,
            _ => self.edges().iter().any(|(a, b)| segment_distance(a, b, p) <= BOUNDARY_EPSILON),
        }
    }

    /// Signed shoelace area in square degrees; positive for counter-clockwise
    /// vertex order, zero for degenerate hulls.
    pub fn area(&self) -> f64 {
        if self.is_degenerate() {
            return 0.;
        }
        let n = self.0.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let a = &self.0[i];
                let b = &self.0[(i + 1) % n];
                a.x() * b.y() - b.x() * a.y()
            })
            .sum();
        twice / 2.
    }

    /// Length of the closed boundary. A segment hull is traversed there and
    /// back.
    pub fn perimeter(&self) -> f64 {
        let n = self.0.len();
        if n < 2 {
            return 0.;
        }
        (0..n).map(|i| self.0[i].distance(&self.0[(i + 1) % n])).sum()
    }

    /// Mean of the vertices.
    pub fn centroid(&self) -> Option<GeoPoint> {
        if self.0.is_empty() {
            return None;
        }
        let n = self.0.len() as f64;
        let lat = self.0.iter().map(|p| p.lat).sum::<f64>() / n;
        let lon = self.0.iter().map(|p| p.lon).sum::<f64>() / n;
        Some(GeoPoint::new(lat, lon))
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of(&self.0)
    }
}

impl Display for HullPolygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, p) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, "]")
    }
}

/// Distance from `p` to the closed segment `a`-`b`.
fn segment_distance(a: &GeoPoint, b: &GeoPoint, p: &GeoPoint) -> f64 {
    let dx = b.x() - a.x();
    let dy = b.y() - a.y();
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0. {
        return a.distance(p);
    }
    let t = (((p.x() - a.x()) * dx + (p.y() - a.y()) * dy) / len_sq).clamp(0., 1.);
    let nearest = GeoPoint::new(a.y() + t * dy, a.x() + t * dx);
    nearest.distance(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn square() -> HullPolygon {
        HullPolygon(vec![
            GeoPoint::new(0., 0.),
            GeoPoint::new(0., 1.),
            GeoPoint::new(1., 1.),
            GeoPoint::new(1., 0.),
        ])
    }

    #[test]
    fn square_area_perimeter() {
        let s = square();
        assert_relative_eq!(s.area(), 1.);
        assert_relative_eq!(s.perimeter(), 4.);
        assert_eq!(s.centroid(), Some(GeoPoint::new(0.5, 0.5)));
    }

    #[test]
    fn triangle_centroid() {
        let t = HullPolygon(vec![GeoPoint::new(0., 0.), GeoPoint::new(0., 1.), GeoPoint::new(1., 0.)]);
        assert_relative_eq!(t.centroid().unwrap(), GeoPoint::new(1. / 3., 1. / 3.));
        assert_relative_eq!(t.area(), 0.5);
    }

    #[test]
    fn square_contains() {
        let s = square();
        assert!(s.contains(&GeoPoint::new(0.5, 0.5)));
        // Vertex and edge points count.
        assert!(s.contains(&GeoPoint::new(0., 0.)));
        assert!(s.contains(&GeoPoint::new(0., 0.5)));
        assert!(s.contains(&GeoPoint::new(1., 0.25)));
        assert!(!s.contains(&GeoPoint::new(1.5, 0.5)));
        assert!(!s.contains(&GeoPoint::new(-0.01, 0.5)));
    }

    #[test]
    fn degenerate() {
        let empty = HullPolygon::default();
        assert!(empty.is_degenerate());
        assert!(!empty.contains(&GeoPoint::new(0., 0.)));
        assert_eq!(empty.area(), 0.);
        assert_eq!(empty.centroid(), None);
        assert!(empty.closed().is_empty());

        let point = HullPolygon(vec![GeoPoint::new(2., 3.)]);
        assert!(point.contains(&GeoPoint::new(2., 3.)));
        assert!(!point.contains(&GeoPoint::new(2., 3.1)));
        assert_eq!(point.closed(), vec![GeoPoint::new(2., 3.)]);

        let segment = HullPolygon(vec![GeoPoint::new(0., 0.), GeoPoint::new(2., 2.)]);
        assert!(segment.contains(&GeoPoint::new(1., 1.)));
        assert!(!segment.contains(&GeoPoint::new(1., 1.5)));
        assert_eq!(segment.area(), 0.);
        assert_relative_eq!(segment.perimeter(), 2. * 8f64.sqrt());
        assert_eq!(segment.edges().len(), 1);
    }

    #[test]
    fn closed_ring() {
        let ring = square().closed();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn display() {
        let h = HullPolygon(vec![GeoPoint::new(0., 0.), GeoPoint::new(1., 1.)]);
        assert_eq!(h.to_string(), "[(0.000000, 0.000000), (1.000000, 1.000000)]");
    }
}
