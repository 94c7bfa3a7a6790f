use std::{fmt::{self, Display, Formatter}, ops::Sub};

use approx::{AbsDiffEq, RelativeEq};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tsify::Tsify;

/// A geographic position in decimal degrees.
///
/// Hull and polygon math treat it as a planar point with `x = lon` and
/// `y = lat`. That is only a good approximation away from the poles and the
/// antimeridian, which is fine for a local mesh but not for global extents.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        GeoPoint { lat, lon }
    }

    /// Planar x coordinate.
    pub fn x(&self) -> f64 {
        self.lon
    }

    /// Planar y coordinate.
    pub fn y(&self) -> f64 {
        self.lat
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Total lexicographic key: longitude first, then latitude.
    pub fn sort_key(&self) -> (OrderedFloat<f64>, OrderedFloat<f64>) {
        (OrderedFloat(self.lon), OrderedFloat(self.lat))
    }

    /// `[lon, lat]`, the GeoJSON position order.
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    pub fn distance(&self, o: &GeoPoint) -> f64 {
        let d = *self - *o;
        d.x().hypot(d.y())
    }
}

impl From<(f64, f64)> for GeoPoint {
    /// `(lat, lon)`
    fn from((lat, lon): (f64, f64)) -> Self {
        GeoPoint { lat, lon }
    }
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

impl Sub for GeoPoint {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        GeoPoint {
            lat: self.lat - rhs.lat,
            lon: self.lon - rhs.lon,
        }
    }
}

/// z-component of `(a - o) × (b - o)` in the `(lon, lat)` plane.
///
/// Positive for a counter-clockwise turn `o → a → b`, negative for clockwise,
/// zero when the three points are collinear.
pub fn cross(o: &GeoPoint, a: &GeoPoint, b: &GeoPoint) -> f64 {
    (a.x() - o.x()) * (b.y() - o.y()) - (a.y() - o.y()) * (b.x() - o.x())
}

impl AbsDiffEq for GeoPoint {
    type Epsilon = f64;
    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }
    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.lat.abs_diff_eq(&other.lat, epsilon) && self.lon.abs_diff_eq(&other.lon, epsilon)
    }
}

impl RelativeEq for GeoPoint {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }
    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.lat.relative_eq(&other.lat, epsilon, max_relative) && self.lon.relative_eq(&other.lon, epsilon, max_relative)
    }
}
