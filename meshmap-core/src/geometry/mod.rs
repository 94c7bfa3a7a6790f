pub mod bounds;
pub mod geo_point;
pub mod hull;
pub mod polygon;
