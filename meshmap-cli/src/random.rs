//! Synthetic snapshots, for demos and for exercising the hull on many nodes.

use anyhow::{ensure, Result};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use meshmap_core::{
    map::{
        position::{HistoryPoint, PositionRecord},
        waypoint::Waypoint,
    },
    GeoPoint, MapSettings, MeshSnapshot,
};

/// Share of nodes generated without a position fix.
const NO_FIX_FRACTION: f64 = 0.1;
/// Icons handed out to waypoints (0 falls back to the default pin).
const WAYPOINT_ICONS: [u32; 4] = [0, 0x26FA, 0x1F3E0, 0x1F6A9];
/// Largest accepted spread, in degrees.
pub const MAX_SPREAD: f64 = 90.;

#[derive(Debug, Clone)]
pub struct RandomMesh {
    pub nodes: usize,
    pub center: GeoPoint,
    /// Max offset from `center`, in degrees, on each axis
    pub spread: f64,
    /// History points per node
    pub history: usize,
    pub waypoints: usize,
}

impl RandomMesh {
    fn offset<R: Rng>(&self, rng: &mut R, around: GeoPoint, spread: f64) -> GeoPoint {
        GeoPoint::new(
            around.lat + rng.gen_range(-spread..=spread),
            around.lon + rng.gen_range(-spread..=spread),
        )
    }

    fn record<R: Rng>(&self, rng: &mut R, now: DateTime<Utc>) -> PositionRecord {
        let node_num: u32 = rng.gen();
        let short = format!("{:04x}", node_num & 0xffff);
        let time = now - Duration::minutes(rng.gen_range(0..48 * 60));
        let coordinate = (!rng.gen_bool(NO_FIX_FRACTION)).then(|| self.offset(rng, self.center, self.spread));

        // Walk backwards from the current fix, one step per hour.
        let mut history = Vec::with_capacity(self.history);
        let mut at = coordinate.unwrap_or(self.center);
        for i in 0..self.history {
            at = self.offset(rng, at, self.spread / 20.);
            history.push(HistoryPoint {
                coordinate: Some(at),
                time: time - Duration::hours(i as i64 + 1),
            });
        }
        history.reverse();

        PositionRecord {
            node_num,
            long_name: Some(format!("Node {}", short)),
            short_name: Some(short),
            coordinate,
            time,
            latest: true,
            online: rng.gen_bool(0.5),
            history,
        }
    }

    fn waypoint<R: Rng>(&self, rng: &mut R, id: usize, now: DateTime<Utc>) -> Waypoint {
        Waypoint {
            id: id as u32 + 1,
            name: Some(format!("Waypoint {}", id + 1)),
            coordinate: self.offset(rng, self.center, self.spread),
            icon: WAYPOINT_ICONS[rng.gen_range(0..WAYPOINT_ICONS.len())],
            expire: rng.gen_bool(0.5).then(|| now + Duration::days(rng.gen_range(1..30))),
        }
    }

    fn check(&self) -> Result<()> {
        ensure!(
            self.spread.is_finite() && (0. ..=MAX_SPREAD).contains(&self.spread),
            "spread must be between 0 and {} degrees, got {}",
            MAX_SPREAD,
            self.spread
        );
        ensure!(self.center.is_finite(), "center must be finite, got {}", self.center);
        Ok(())
    }

    /// A snapshot with every overlay switched on.
    pub fn snapshot<R: Rng>(&self, rng: &mut R, now: DateTime<Utc>) -> Result<MeshSnapshot> {
        self.check()?;
        let records = (0..self.nodes).map(|_| self.record(rng, now)).collect();
        let waypoints = (0..self.waypoints).map(|id| self.waypoint(rng, id, now)).collect();
        Ok(MeshSnapshot {
            records,
            waypoints,
            settings: MapSettings {
                show_node_history: self.history > 0,
                show_route_lines: self.history > 0,
                show_convex_hull: true,
                ..MapSettings::default()
            },
            show_waypoints: self.waypoints > 0,
        })
    }
}
