//! Export of fleet state for map clients

mod to_geojson;

pub use to_geojson::{snapshot_geojson, snapshot_geojson_string};
