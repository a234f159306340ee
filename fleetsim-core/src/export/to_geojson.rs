use geo::{Coord, LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use crate::{Error, FleetState, Route, sim::VehicleSnapshot};

/// Converts the current fleet state to a `GeoJSON` `FeatureCollection`:
/// one `LineString` per route followed by one `Point` per vehicle.
pub fn snapshot_geojson(state: &FleetState) -> Result<FeatureCollection, Error> {
    let mut features = Vec::with_capacity(state.routes().len() + state.len());

    for route in state.routes() {
        features.push(create_route_feature(route)?);
    }
    for vehicle in state.snapshot() {
        features.push(create_vehicle_feature(&vehicle)?);
    }

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

pub fn snapshot_geojson_string(state: &FleetState) -> Result<String, Error> {
    serde_json::to_string(&snapshot_geojson(state)?)
        .map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn create_route_feature(route: &Route) -> Result<Feature, Error> {
    let coords: Vec<Coord<f64>> = route
        .waypoints()
        .iter()
        .map(|point| point.geometry().into())
        .collect();
    let geometry = Geometry::new(GeoJsonValue::from(&LineString::new(coords)));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "feature_type": "route",
            "route_id": route.id,
            "name": route.name,
            "total_distance_km": route.total_distance(),
            "stops": route.waypoints().iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
        }
    });

    serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn create_vehicle_feature(vehicle: &VehicleSnapshot) -> Result<Feature, Error> {
    let geometry = Geometry::new(GeoJsonValue::from(&Point::new(vehicle.lng, vehicle.lat)));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "feature_type": "vehicle",
            "id": vehicle.id,
            "route": vehicle.route_id,
            "status": vehicle.status,
            "eta_minutes": vehicle.eta_minutes,
            "speed_kmh": vehicle.speed,
            "progress": vehicle.progress,
            "next_stop": vehicle.next_stop,
        }
    });

    serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{loading::FleetConfig, sim::initialize};

    #[test]
    fn one_feature_per_route_and_vehicle() {
        let config = FleetConfig::demo();
        let state = initialize(&config.routes, &config.vehicles, config.params).unwrap();
        let collection = snapshot_geojson(&state).unwrap();
        assert_eq!(collection.features.len(), 3 + 5);

        let vehicle = &collection.features[3];
        let properties = vehicle.properties.as_ref().unwrap();
        assert_eq!(properties["id"], "AP39Z1234");
        assert_eq!(properties["feature_type"], "vehicle");
    }

    #[test]
    fn points_are_lng_lat() {
        let config = FleetConfig::demo();
        let state = initialize(&config.routes, &config.vehicles, config.params).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&snapshot_geojson_string(&state).unwrap()).unwrap();

        let first_route = &json["features"][0]["geometry"]["coordinates"][0];
        assert_eq!(first_route[0], 82.2475);
        assert_eq!(first_route[1], 16.9891);

        let vehicle = &json["features"][3];
        assert_eq!(vehicle["geometry"]["type"], "Point");
        let (lat, lng) = state.vehicles()[0].coordinate();
        assert_eq!(vehicle["geometry"]["coordinates"][0], lng);
        assert_eq!(vehicle["geometry"]["coordinates"][1], lat);
    }
}
