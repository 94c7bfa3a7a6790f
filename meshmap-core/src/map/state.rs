use log::{debug, info};
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use super::settings::{MapLayer, MapSettings, MapStyle};

/// Toolbar buttons the map overlays on its bottom edge.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ToolbarButton {
    Settings { active: bool },
    Waypoints { active: bool },
}

impl ToolbarButton {
    /// Symbol name for the button's icon; filled while active.
    pub fn icon(&self) -> &'static str {
        match self {
            ToolbarButton::Settings { active: true } => "info.circle.fill",
            ToolbarButton::Settings { active: false } => "info.circle",
            ToolbarButton::Waypoints { active: true } => "signpost.right.and.left.fill",
            ToolbarButton::Waypoints { active: false } => "signpost.right.and.left",
        }
    }
}

/// Interactive state of the map screen, independent of the data plotted on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct MapViewState {
    pub settings: MapSettings,
    pub style: MapStyle,
    pub show_waypoints: bool,
    pub editing_settings: bool,
    /// Node number of the selected position, if any.
    pub selected_position: Option<u32>,
    /// Id of the selected waypoint, if any.
    pub selected_waypoint: Option<u32>,
}

impl Default for MapViewState {
    fn default() -> Self {
        MapViewState::new(MapSettings::default())
    }
}

impl MapViewState {
    pub fn new(settings: MapSettings) -> Self {
        let style = MapStyle::initial(&settings);
        MapViewState {
            settings,
            style,
            show_waypoints: false,
            editing_settings: false,
            selected_position: None,
            selected_waypoint: None,
        }
    }

    /// Tapping the selected node again dismisses it; tapping another one
    /// replaces the selection.
    pub fn select_position(&mut self, node_num: u32) -> Option<u32> {
        self.selected_position = toggle(self.selected_position, node_num);
        debug!("selected position: {:?}", self.selected_position);
        self.selected_position
    }

    pub fn select_waypoint(&mut self, id: u32) -> Option<u32> {
        self.selected_waypoint = toggle(self.selected_waypoint, id);
        debug!("selected waypoint: {:?}", self.selected_waypoint);
        self.selected_waypoint
    }

    pub fn toggle_waypoints(&mut self) -> bool {
        self.show_waypoints = !self.show_waypoints;
        self.show_waypoints
    }

    pub fn toggle_settings(&mut self) -> bool {
        self.editing_settings = !self.editing_settings;
        self.editing_settings
    }

    /// Switch base layer. Returns whether the style changed; picking offline
    /// keeps whatever style is showing.
    pub fn set_layer(&mut self, layer: MapLayer) -> bool {
        self.settings.map_layer = layer;
        match MapStyle::on_layer_change(&self.settings) {
            Some(style) => {
                info!("map layer {} -> style {:?}", layer, style);
                let changed = style != self.style;
                self.style = style;
                changed
            }
            None => {
                info!("map layer {}: keeping style {:?}", layer, self.style);
                false
            }
        }
    }

    /// Replace the preferences (e.g. after the settings sheet closes) and
    /// re-resolve the style for the current layer.
    pub fn apply_settings(&mut self, settings: MapSettings) {
        let layer = settings.map_layer;
        self.settings = settings;
        self.set_layer(layer);
    }

    /// Buttons to show: settings always, waypoints only when there are any.
    pub fn toolbar(&self, waypoint_count: usize) -> Vec<ToolbarButton> {
        let mut buttons = vec![ToolbarButton::Settings { active: self.editing_settings }];
        if waypoint_count > 0 {
            buttons.push(ToolbarButton::Waypoints { active: self.show_waypoints });
        }
        buttons
    }
}

fn toggle(current: Option<u32>, id: u32) -> Option<u32> {
    if current == Some(id) { None } else { Some(id) }
}
