use std::path::PathBuf;

use fleetsim_core::loading::roster::{read_routes, read_vehicles};
use fleetsim_core::prelude::*;

const ROUTES_CSV: &str = "\
route_id,route_name,sequence,stop_name,lat,lng,total_distance_km
1A,Central to University,1,Central Station,12.9716,77.5946,14.5
1A,Central to University,2,Medical College,12.9600,77.6100,
1A,Central to University,3,University Gate,12.9500,77.6300,
2B,Mall to Airport,1,City Mall,12.9350,77.6250,
2B,Mall to Airport,2,Tech Park,12.9900,77.7000,
2B,Mall to Airport,3,Airport,13.1986,77.7066,
";

const VEHICLES_CSV: &str = "\
vehicle_id,route_id,distance_traveled,speed
BUS001,1A,3.0,40
BUS002,2B,0,35
BUS003,1A,12.0,50
";

const FLEET_JSON: &str = r#"{
    "routes": [
        {
            "id": "1A",
            "name": "Central to University",
            "total_distance_km": 14.5,
            "waypoints": [
                {"name": "Central Station", "lat": 12.9716, "lng": 77.5946},
                {"name": "Medical College", "lat": 12.9600, "lng": 77.6100},
                {"name": "University Gate", "lat": 12.9500, "lng": 77.6300}
            ]
        },
        {
            "id": "2B",
            "name": "Mall to Airport",
            "waypoints": [
                {"name": "City Mall", "lat": 12.9350, "lng": 77.6250},
                {"name": "Tech Park", "lat": 12.9900, "lng": 77.7000},
                {"name": "Airport", "lat": 13.1986, "lng": 77.7066}
            ]
        }
    ],
    "vehicles": [
        {"id": "BUS001", "route": "1A", "distance_traveled": 3.0, "speed": 40},
        {"id": "BUS002", "route": "2B", "speed": 35},
        {"id": "BUS003", "route": "1A", "distance_traveled": 12.0, "speed": 50}
    ]
}"#;

#[test]
fn csv_and_json_build_the_same_fleet() {
    let from_csv = FleetConfig {
        params: SimulationParams::default(),
        routes: read_routes(ROUTES_CSV.as_bytes()).unwrap(),
        vehicles: read_vehicles(VEHICLES_CSV.as_bytes()).unwrap(),
    };
    let from_json = FleetConfig::from_json_str(FLEET_JSON).unwrap();
    assert_eq!(from_csv, from_json);

    let a = create_fleet(&from_csv).unwrap();
    let b = create_fleet(&from_json).unwrap();
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn polyline_length_is_used_without_override() {
    let config = FleetConfig::from_json_str(FLEET_JSON).unwrap();
    let state = create_fleet(&config).unwrap();

    assert_eq!(state.route("1A").unwrap().total_distance(), 14.5);
    // City Mall -> Tech Park -> Airport is roughly 33 km
    let airport = state.route("2B").unwrap().total_distance();
    assert!(airport > 30.0 && airport < 36.0, "{airport}");
}

#[test]
fn missing_roster_files_fail() {
    let err = load_roster(
        &PathBuf::from("/no/such/routes.csv"),
        &PathBuf::from("/no/such/vehicles.csv"),
        SimulationParams::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::IoError(_)));
}

#[test]
fn dangling_route_reference_is_a_config_error() {
    let mut config = FleetConfig::from_json_str(FLEET_JSON).unwrap();
    config.vehicles[1].route = "9Z".to_string();
    let err = create_fleet(&config).unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::UnknownRoute { ref route, .. }) if route == "9Z"
    ));
}

#[test]
fn demo_roster_is_valid() {
    let state = create_fleet(&FleetConfig::demo()).unwrap();
    assert_eq!(state.len(), 5);
    assert_eq!(state.routes().len(), 3);
    assert_eq!(state.vehicles_on_route("KKD-RJY-01").len(), 2);
}
