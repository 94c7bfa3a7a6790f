//! Map display preferences and the base-map style they resolve to.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::error::SettingsError;

/// Base map layer picked by the user. Names are matched case-insensitively,
/// from the command line and from settings files alike.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum MapLayer {
    Standard,
    #[default]
    Hybrid,
    Satellite,
    Offline,
}

impl MapLayer {
    pub const ALL: [MapLayer; 4] = [MapLayer::Standard, MapLayer::Hybrid, MapLayer::Satellite, MapLayer::Offline];

    pub fn name(&self) -> &'static str {
        match self {
            MapLayer::Standard => "standard",
            MapLayer::Hybrid => "hybrid",
            MapLayer::Satellite => "satellite",
            MapLayer::Offline => "offline",
        }
    }
}

impl fmt::Display for MapLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MapLayer {
    type Err = SettingsError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MapLayer::ALL
            .into_iter()
            .find(|layer| layer.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SettingsError::UnknownLayer(s.to_string()))
    }
}

impl TryFrom<String> for MapLayer {
    type Error = SettingsError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Persisted map preferences. Field names on the wire are the preference
/// keys, so a settings file written by another client reads back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tsify)]
#[serde(default)]
pub struct MapSettings {
    #[serde(rename = "meshMapShowNodeHistory")]
    pub show_node_history: bool,
    #[serde(rename = "meshMapShowRouteLines")]
    pub show_route_lines: bool,
    #[serde(rename = "enableMapConvexHull")]
    pub show_convex_hull: bool,
    #[serde(rename = "enableMapTraffic")]
    pub show_traffic: bool,
    #[serde(rename = "enableMapPointsOfInterest")]
    pub show_points_of_interest: bool,
    #[serde(rename = "mapLayer")]
    pub map_layer: MapLayer,
}

/// Base-map style handed to the rendering surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MapStyle {
    #[serde(rename_all = "camelCase")]
    Standard { points_of_interest: bool, traffic: bool },
    #[serde(rename_all = "camelCase")]
    Hybrid { points_of_interest: bool, traffic: bool },
    Imagery,
}

/// The initial style for default settings (hybrid, no extras).
impl Default for MapStyle {
    fn default() -> Self {
        MapStyle::initial(&MapSettings::default())
    }
}

impl MapStyle {
    /// Style used when the map first appears. Offline has no style of its
    /// own and shows as hybrid.
    pub fn initial(settings: &MapSettings) -> MapStyle {
        Self::for_layer(settings).unwrap_or_else(|| Self::hybrid(settings))
    }

    /// Style after the user picks a new layer; `None` for offline, which
    /// leaves the current style in place.
    pub fn on_layer_change(settings: &MapSettings) -> Option<MapStyle> {
        Self::for_layer(settings)
    }

    fn for_layer(settings: &MapSettings) -> Option<MapStyle> {
        match settings.map_layer {
            MapLayer::Standard => Some(MapStyle::Standard {
                points_of_interest: settings.show_points_of_interest,
                traffic: settings.show_traffic,
            }),
            MapLayer::Hybrid => Some(Self::hybrid(settings)),
            MapLayer::Satellite => Some(MapStyle::Imagery),
            MapLayer::Offline => None,
        }
    }

    fn hybrid(settings: &MapSettings) -> MapStyle {
        MapStyle::Hybrid {
            points_of_interest: settings.show_points_of_interest,
            traffic: settings.show_traffic,
        }
    }
}
