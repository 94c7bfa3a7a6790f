use serde::{Deserialize, Serialize};
use tsify::Tsify;

use super::geo_point::GeoPoint;

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Bounds of the finite points in `points`, or `None` if there are none.
    pub fn of<'a, I: IntoIterator<Item = &'a GeoPoint>>(points: I) -> Option<Bounds> {
        points
            .into_iter()
            .filter(|p| p.is_finite())
            .fold(None, |acc: Option<Bounds>, p| {
                Some(match acc {
                    None => Bounds { min_lat: p.lat, max_lat: p.lat, min_lon: p.lon, max_lon: p.lon },
                    Some(b) => b.include(p),
                })
            })
    }

    pub fn include(self, p: &GeoPoint) -> Bounds {
        Bounds {
            min_lat: self.min_lat.min(p.lat),
            max_lat: self.max_lat.max(p.lat),
            min_lon: self.min_lon.min(p.lon),
            max_lon: self.max_lon.max(p.lon),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new((self.min_lat + self.max_lat) / 2., (self.min_lon + self.max_lon) / 2.)
    }

    /// Grow each side by `fraction` of the corresponding extent. Zero-extent
    /// axes are grown by `min_pad` degrees instead, so a single node still gets
    /// a viewport.
    pub fn padded(&self, fraction: f64, min_pad: f64) -> Bounds {
        let pad_lon = (self.width() * fraction).max(min_pad);
        let pad_lat = (self.height() * fraction).max(min_pad);
        Bounds {
            min_lat: self.min_lat - pad_lat,
            max_lat: self.max_lat + pad_lat,
            min_lon: self.min_lon - pad_lon,
            max_lon: self.max_lon + pad_lon,
        }
    }
}
