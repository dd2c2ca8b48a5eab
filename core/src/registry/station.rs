use crate::prelude::{LatLng, SimError, SimResult};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Station {
    pub id: &'static str,
    pub name: &'static str,
    pub code: &'static str,
    pub position: LatLng,
    pub zone: &'static str,
}

const fn station(code: &'static str, name: &'static str, lat: f64, lng: f64, zone: &'static str) -> Station {
    Station {
        id: code,
        name,
        code,
        position: LatLng::new(lat, lng),
        zone,
    }
}

pub static STATIONS: [Station; 8] = [
    station("NDLS", "New Delhi", 28.6139, 77.209, "NR"),
    station("DLI", "Old Delhi Junction", 28.6617, 77.2286, "NR"),
    station("NZM", "Hazrat Nizamuddin", 28.5894, 77.2507, "NR"),
    station("ANVT", "Anand Vihar Terminal", 28.6508, 77.3152, "NCR"),
    station("GZB", "Ghaziabad Junction", 28.6692, 77.4538, "NCR"),
    station("SSB", "Shakur Basti", 28.6803, 77.1456, "NR"),
    station("DSA", "Delhi Sarai Rohilla", 28.6644, 77.1677, "NR"),
    station("TKJ", "Tilak Bridge", 28.6356, 77.2432, "NR"),
];

pub fn station_by_code(code: &str) -> SimResult<&'static Station> {
    STATIONS
        .iter()
        .find(|s| s.code.eq_ignore_ascii_case(code))
        .ok_or_else(|| SimError::UnknownStation(code.to_string()))
}

/// Straight-line track between two stations split into `segments` pieces.
pub fn route_track_points(from: &Station, to: &Station, segments: usize) -> Vec<LatLng> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| from.position.lerp(&to.position, i as f64 / segments as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(station_by_code("ndls").unwrap().name, "New Delhi");
        assert!(matches!(
            station_by_code("XYZ"),
            Err(SimError::UnknownStation(code)) if code == "XYZ"
        ));
    }

    #[test]
    fn track_points_include_both_endpoints() {
        let from = station_by_code("NDLS").unwrap();
        let to = station_by_code("NZM").unwrap();
        let points = route_track_points(from, to, 20);
        assert_eq!(points.len(), 21);
        assert_eq!(points[0], from.position);
        assert!(points[20].planar_distance(&to.position) < 1e-9);
    }
}
