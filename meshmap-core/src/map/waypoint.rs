use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::geometry::geo_point::GeoPoint;

/// Glyph shown when a waypoint's icon code is not a usable character.
pub const DEFAULT_GLYPH: char = '📍';

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct Waypoint {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    pub coordinate: GeoPoint,
    /// Unicode scalar value of the icon; 0 means none.
    #[serde(default)]
    pub icon: u32,
    #[serde(default)]
    #[tsify(type = "string | null")]
    pub expire: Option<DateTime<Utc>>,
}

impl Waypoint {
    /// Never-expiring waypoints are always active; others until their expiry
    /// instant, inclusive.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expire.map_or(true, |expire| expire >= now)
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("?")
    }

    pub fn glyph(&self) -> char {
        match self.icon {
            0 => DEFAULT_GLYPH,
            code => char::from_u32(code).unwrap_or(DEFAULT_GLYPH),
        }
    }
}

/// Active waypoints, sorted by name descending; unnamed ones last.
pub fn active_waypoints(all: &[Waypoint], now: DateTime<Utc>) -> Vec<Waypoint> {
    let mut active: Vec<Waypoint> = all.iter().filter(|w| w.is_active(now)).cloned().collect();
    // `Option` orders `None` first, so reversing puts unnamed waypoints last.
    active.sort_by_key(|w| Reverse(w.name.clone()));
    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn waypoint(id: u32, name: Option<&str>, expire: Option<DateTime<Utc>>) -> Waypoint {
        Waypoint {
            id,
            name: name.map(str::to_string),
            coordinate: GeoPoint::new(0., 0.),
            icon: 0,
            expire,
        }
    }

    #[test]
    fn expiry() {
        assert!(waypoint(1, None, None).is_active(now()));
        assert!(waypoint(1, None, Some(now())).is_active(now()));
        assert!(!waypoint(1, None, Some(now() - Duration::seconds(1))).is_active(now()));
    }

    #[test]
    fn active_sorted_by_name_desc() {
        let all = vec![
            waypoint(1, Some("Alpha"), None),
            waypoint(2, None, None),
            waypoint(3, Some("Charlie"), Some(now() + Duration::hours(1))),
            waypoint(4, Some("Bravo"), Some(now() - Duration::hours(1))),
            waypoint(5, Some("Delta"), None),
        ];
        let ids: Vec<u32> = active_waypoints(&all, now()).iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![5, 3, 1, 2]);
    }

    #[test]
    fn glyph_and_label() {
        let mut w = waypoint(1, None, None);
        assert_eq!(w.label(), "?");
        assert_eq!(w.glyph(), DEFAULT_GLYPH);
        w.icon = 0x1F3D5; // camping
        assert_eq!(w.glyph(), '🏕');
        w.icon = 0xD800; // surrogate, not a scalar value
        assert_eq!(w.glyph(), DEFAULT_GLYPH);
    }
}
