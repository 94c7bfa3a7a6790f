use std::{fs::File, io::{BufReader, Read}, path::Path};

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::error::InputError;

use super::{
    position::{PositionRecord, PositionSnapshot},
    scene::MapScene,
    settings::MapSettings,
    state::MapViewState,
    waypoint::{active_waypoints, Waypoint},
};

/// Everything needed to draw the map once: raw records from the position
/// store, waypoints, and the user's preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct MeshSnapshot {
    pub records: Vec<PositionRecord>,
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub settings: MapSettings,
    #[serde(default)]
    pub show_waypoints: bool,
}

impl MeshSnapshot {
    pub fn from_reader<R: Read>(reader: R) -> Result<MeshSnapshot, InputError> {
        let snapshot: MeshSnapshot = serde_json::from_reader(reader)?;
        info!("loaded snapshot: {} records, {} waypoints", snapshot.records.len(), snapshot.waypoints.len());
        Ok(snapshot)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<MeshSnapshot, InputError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| InputError::Io { path: path.to_path_buf(), source })?;
        MeshSnapshot::from_reader(BufReader::new(file))
    }

    /// Records plotted at `now`.
    pub fn positions(&self, now: DateTime<Utc>) -> PositionSnapshot {
        PositionSnapshot::select(self.records.clone(), now)
    }

    pub fn view_state(&self) -> MapViewState {
        let mut state = MapViewState::new(self.settings.clone());
        state.show_waypoints = self.show_waypoints;
        state
    }

    pub fn scene(&self, now: DateTime<Utc>) -> MapScene {
        let waypoints = active_waypoints(&self.waypoints, now);
        MapScene::build(&self.positions(now), &waypoints, &self.view_state())
    }
}
