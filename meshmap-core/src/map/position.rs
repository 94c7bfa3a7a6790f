use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::{
    geometry::{geo_point::GeoPoint, hull::hull_of, polygon::HullPolygon},
    map::color::Rgb,
};

/// How far back a node's latest position may be and still be plotted.
pub const LOOKBACK_DAYS: i64 = 30;

/// One earlier fix in a node's track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct HistoryPoint {
    pub coordinate: Option<GeoPoint>,
    #[tsify(type = "string")]
    pub time: DateTime<Utc>,
}

/// A node's position fix as handed over by the position store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    pub node_num: u32,
    #[serde(default)]
    pub long_name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    /// `None` when the node reported no usable location.
    pub coordinate: Option<GeoPoint>,
    #[tsify(type = "string")]
    pub time: DateTime<Utc>,
    /// Whether this is the node's most recent fix.
    #[serde(default = "default_latest")]
    pub latest: bool,
    #[serde(default)]
    pub online: bool,
    /// Earlier fixes, oldest first.
    #[serde(default)]
    pub history: Vec<HistoryPoint>,
}

fn default_latest() -> bool {
    true
}

impl PositionRecord {
    pub fn long_label(&self) -> &str {
        self.long_name.as_deref().unwrap_or("?")
    }

    pub fn short_label(&self) -> &str {
        self.short_name.as_deref().unwrap_or("?")
    }

    pub fn color(&self) -> Rgb {
        Rgb::from_node_num(self.node_num)
    }

    /// Finite coordinate, if any.
    pub fn location(&self) -> Option<GeoPoint> {
        self.coordinate.filter(GeoPoint::is_finite)
    }

    /// Finite history coordinates, oldest first.
    pub fn track(&self) -> Vec<GeoPoint> {
        self.history
            .iter()
            .filter_map(|h| h.coordinate.filter(GeoPoint::is_finite))
            .collect()
    }
}

/// The records plotted on the map: each node's latest fix from the lookback
/// window, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tsify, derive_more::Deref)]
pub struct PositionSnapshot(pub Vec<PositionRecord>);

impl PositionSnapshot {
    pub fn select(records: Vec<PositionRecord>, now: DateTime<Utc>) -> PositionSnapshot {
        let cutoff = now - Duration::days(LOOKBACK_DAYS);
        let total = records.len();
        let mut kept: Vec<PositionRecord> = records
            .into_iter()
            .filter(|r| r.latest && r.time >= cutoff)
            .collect();
        kept.sort_by_key(|r| r.time);
        debug!("snapshot: kept {} of {} records (cutoff {})", kept.len(), total, cutoff);
        PositionSnapshot(kept)
    }

    /// Coordinates of the plotted records, skipping nodes without one.
    pub fn line_coords(&self) -> Vec<GeoPoint> {
        self.0.iter().filter_map(PositionRecord::location).collect()
    }

    /// Convex hull around every plotted node.
    pub fn hull(&self) -> HullPolygon {
        hull_of(self.0.iter().map(|r| r.coordinate))
    }
}
