use serde::Serialize;

use crate::{FleetState, Km, Kmh, Minutes, RouteId, Vehicle, VehicleId, VehicleStatus};

/// Read-only view of one vehicle, as handed to presentation layers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleSnapshot {
    pub id: VehicleId,
    pub route_id: RouteId,
    pub route_name: String,
    pub lat: f64,
    pub lng: f64,
    pub distance_traveled: Km,
    pub total_distance: Km,
    pub progress: f64,
    pub speed: Kmh,
    pub status: VehicleStatus,
    pub eta_minutes: Minutes,
    pub next_stop: String,
}

impl VehicleSnapshot {
    pub(crate) fn of(state: &FleetState, vehicle: &Vehicle) -> Self {
        let route = state.route_of(vehicle);
        let progress = vehicle.progress();
        Self {
            id: vehicle.id.clone(),
            route_id: vehicle.route_id.clone(),
            route_name: route.name.clone(),
            lat: vehicle.lat,
            lng: vehicle.lng,
            distance_traveled: vehicle.distance_traveled,
            total_distance: vehicle.total_distance,
            progress,
            speed: vehicle.speed,
            status: vehicle.status,
            eta_minutes: vehicle.eta,
            next_stop: route.next_stop(progress).name.clone(),
        }
    }
}

/// Immutable copy of every vehicle in roster order
pub fn snapshot(state: &FleetState) -> Vec<VehicleSnapshot> {
    state
        .vehicles
        .iter()
        .map(|vehicle| VehicleSnapshot::of(state, vehicle))
        .collect()
}

impl FleetState {
    pub fn snapshot(&self) -> Vec<VehicleSnapshot> {
        snapshot(self)
    }

    pub fn vehicle_snapshot(&self, vehicle_id: &str) -> Option<VehicleSnapshot> {
        self.vehicle(vehicle_id)
            .map(|vehicle| VehicleSnapshot::of(self, vehicle))
    }

    /// Snapshot of a vehicle already in hand, e.g. a `search` hit
    pub fn snapshot_of(&self, vehicle: &Vehicle) -> VehicleSnapshot {
        VehicleSnapshot::of(self, vehicle)
    }

    /// Snapshots of every vehicle matching `term`, in roster order
    pub fn search_snapshots(&self, term: &str) -> Vec<VehicleSnapshot> {
        self.search(term)
            .into_iter()
            .map(|vehicle| self.snapshot_of(vehicle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{loading::FleetConfig, sim::initialize};

    #[test]
    fn snapshot_mirrors_roster() {
        let config = FleetConfig::demo();
        let state = initialize(&config.routes, &config.vehicles, config.params).unwrap();
        let snapshot = state.snapshot();

        assert_eq!(snapshot.len(), state.len());
        for (view, vehicle) in snapshot.iter().zip(state.vehicles()) {
            assert_eq!(view.id, vehicle.id());
            assert_eq!((view.lat, view.lng), vehicle.coordinate());
            assert_eq!(view.eta_minutes, vehicle.eta());
        }
    }

    #[test]
    fn next_stop_and_route_name() {
        let config = FleetConfig::demo();
        let state = initialize(&config.routes, &config.vehicles, config.params).unwrap();

        let view = state.vehicle_snapshot("AP39Z1235").unwrap();
        assert_eq!(view.route_name, "Kakinada - Rajahmundry Express");
        // 4 km out of Kakinada, the first stop ahead is Samalkot
        assert_eq!(view.next_stop, "Samalkot Junction");

        assert!(state.vehicle_snapshot("missing").is_none());
    }

    #[test]
    fn search_hits_become_snapshots() {
        let config = FleetConfig::demo();
        let state = initialize(&config.routes, &config.vehicles, config.params).unwrap();

        let hits = state.search_snapshots("rjy-02");
        let ids: Vec<&str> = hits.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["AP39Z5678", "AP39Z5679"]);
        assert_eq!(
            hits[0],
            state.vehicle_snapshot("AP39Z5678").unwrap()
        );
        assert_eq!(state.search_snapshots("").len(), state.len());
        assert!(state.search_snapshots("nowhere").is_empty());
    }

    #[test]
    fn serializes_status_for_the_map() {
        let config = FleetConfig::demo();
        let state = initialize(&config.routes, &config.vehicles, config.params).unwrap();
        let json = serde_json::to_value(state.vehicle_snapshot("AP39Z5678").unwrap()).unwrap();
        assert_eq!(json["status"], "delayed");
        assert_eq!(json["eta_minutes"], 67);
    }
}
