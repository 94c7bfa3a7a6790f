pub mod color;
pub mod position;
pub mod scene;
pub mod settings;
pub mod snapshot;
pub mod state;
pub mod waypoint;
