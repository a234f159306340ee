//! Routes and their waypoints

use geo::{Distance, Haversine, Point};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, Km, RouteId, loading::RouteConfig};

/// Named waypoint on a route polyline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl RoutePoint {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lng,
        }
    }

    /// Point geometry in (x = lng, y = lat) order
    pub fn geometry(&self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }

    fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Immutable route reference data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub id: RouteId,
    pub name: String,
    waypoints: Vec<RoutePoint>,
    total_distance: Km,
    /// Share of the polyline length covered when reaching each waypoint
    #[serde(skip)]
    waypoint_fractions: Vec<f64>,
}

impl Route {
    pub(crate) fn from_config(config: &RouteConfig) -> Result<Self, ConfigError> {
        if config.waypoints.len() < 2 {
            return Err(ConfigError::TooFewWaypoints {
                route: config.id.clone(),
                count: config.waypoints.len(),
            });
        }

        if let Some(bad) = config.waypoints.iter().find(|p| !p.is_finite()) {
            return Err(ConfigError::InvalidCoordinate {
                route: config.id.clone(),
                waypoint: bad.name.clone(),
            });
        }

        let polyline = polyline_length(&config.waypoints);
        let total_distance = config.total_distance_km.unwrap_or(polyline);
        if !(total_distance.is_finite() && total_distance > 0.0) {
            return Err(ConfigError::InvalidDistance {
                route: config.id.clone(),
                distance: total_distance,
            });
        }

        Ok(Self {
            id: config.id.clone(),
            name: config.name.clone(),
            waypoint_fractions: cumulative_fractions(&config.waypoints, polyline),
            waypoints: config.waypoints.clone(),
            total_distance,
        })
    }

    pub fn waypoints(&self) -> &[RoutePoint] {
        &self.waypoints
    }

    pub fn total_distance(&self) -> Km {
        self.total_distance
    }

    pub fn start(&self) -> &RoutePoint {
        &self.waypoints[0]
    }

    pub fn end(&self) -> &RoutePoint {
        &self.waypoints[self.waypoints.len() - 1]
    }

    /// Straight-line interpolation between the terminals, returned as (lat, lng).
    ///
    /// Intermediate waypoints are ignored on purpose; they only feed `next_stop`.
    pub fn position_at(&self, progress: f64) -> (f64, f64) {
        let t = progress.clamp(0.0, 1.0);
        let (start, end) = (self.start(), self.end());
        (
            start.lat + (end.lat - start.lat) * t,
            start.lng + (end.lng - start.lng) * t,
        )
    }

    /// First waypoint strictly ahead of `progress`, or the terminal once arrived
    pub fn next_stop(&self, progress: f64) -> &RoutePoint {
        self.waypoint_fractions
            .iter()
            .position(|&fraction| fraction > progress)
            .map_or_else(|| self.end(), |idx| &self.waypoints[idx])
    }

    pub fn matches(&self, term: &str) -> bool {
        self.id.to_lowercase().contains(term) || self.name.to_lowercase().contains(term)
    }
}

/// Haversine length of a waypoint polyline in kilometres
pub fn polyline_length(waypoints: &[RoutePoint]) -> Km {
    waypoints
        .iter()
        .tuple_windows()
        .map(|(a, b)| segment_length(a, b))
        .sum()
}

fn segment_length(a: &RoutePoint, b: &RoutePoint) -> Km {
    Haversine.distance(a.geometry(), b.geometry()) / 1000.0
}

#[allow(clippy::cast_precision_loss)]
fn cumulative_fractions(waypoints: &[RoutePoint], polyline: Km) -> Vec<f64> {
    // Degenerate polylines (all waypoints stacked) fall back to even spacing
    if polyline <= f64::EPSILON {
        let last = (waypoints.len() - 1) as f64;
        return (0..waypoints.len()).map(|idx| idx as f64 / last).collect();
    }

    let mut covered = 0.0;
    let mut fractions = Vec::with_capacity(waypoints.len());
    fractions.push(0.0);
    for (a, b) in waypoints.iter().tuple_windows() {
        covered += segment_length(a, b);
        fractions.push((covered / polyline).min(1.0));
    }
    fractions
}
