use crate::prelude::LatLng;
use serde::{Deserialize, Serialize};

/// Physical sensing modality of a trackside node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorKind {
    /// Distributed fiber-acoustic sensing node.
    OfcNode,
    ThermalCam,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorStatus {
    Active,
    Faulty,
    ConfigFailure,
}

/// Static trackside sensor entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorNode {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub kind: SensorKind,
    pub position: LatLng,
    pub status: SensorStatus,
    pub details: &'static str,
    pub track_section: Option<&'static str>,
}

impl SensorNode {
    pub fn is_active(&self) -> bool {
        self.status == SensorStatus::Active
    }

    fn on_route(&self, from: &str, to: &str) -> bool {
        let Some(section) = self.track_section else {
            return false;
        };
        match section.split_once('-') {
            Some((a, b)) => (a == from && b == to) || (a == to && b == from),
            None => false,
        }
    }
}

const fn node(
    id: &'static str,
    kind: SensorKind,
    lat: f64,
    lng: f64,
    status: SensorStatus,
    details: &'static str,
    track_section: &'static str,
) -> SensorNode {
    SensorNode {
        id,
        kind,
        position: LatLng::new(lat, lng),
        status,
        details,
        track_section: Some(track_section),
    }
}

use SensorKind::{OfcNode as Ofc, ThermalCam as Cam};
use SensorStatus::{Active, ConfigFailure, Faulty};

pub static SENSOR_NODES: [SensorNode; 15] = [
    node("SN-001", Ofc, 28.6442, 77.2167, Active, "OFC Node - Delhi Junction North", "NDLS-DLI"),
    node("SN-002", Cam, 28.6505, 77.2210, Active, "Thermal Cam - Sadar Bazaar", "NDLS-DLI"),
    node("SN-003", Ofc, 28.6565, 77.2250, Active, "OFC Node - Chandni Chowk", "NDLS-DLI"),
    node("SN-004", Cam, 28.6617, 77.2286, Active, "Thermal Cam - Old Delhi Junction", "NDLS-DLI"),
    node("SN-005", Ofc, 28.6200, 77.2200, Active, "OFC Node - Connaught Place", "NDLS-NZM"),
    node("SN-006", Cam, 28.6050, 77.2300, Active, "Thermal Cam - India Gate", "NDLS-NZM"),
    node("SN-007", Ofc, 28.5970, 77.2400, Faulty, "OFC Node - Khan Market", "NDLS-NZM"),
    node("SN-008", Cam, 28.5894, 77.2507, Active, "Thermal Cam - Nizamuddin", "NDLS-NZM"),
    node("SN-009", Ofc, 28.6300, 77.2600, Active, "OFC Node - Pragati Maidan", "NDLS-ANVT"),
    node("SN-010", Cam, 28.6400, 77.2900, Active, "Thermal Cam - Yamuna Bank", "NDLS-ANVT"),
    node("SN-011", Ofc, 28.6508, 77.3152, Active, "OFC Node - Anand Vihar", "NDLS-ANVT"),
    node("SN-012", Cam, 28.6750, 77.1600, Active, "Thermal Cam - Shakur Basti", "NDLS-SSB"),
    node("SN-013", Ofc, 28.6700, 77.1800, ConfigFailure, "OFC Node - Patel Nagar", "NDLS-SSB"),
    node("SN-014", Cam, 28.6644, 77.1677, Active, "Thermal Cam - Sarai Rohilla", "NDLS-SSB"),
    node("SN-015", Ofc, 28.6356, 77.2432, Active, "OFC Node - Tilak Bridge", "NDLS-TKJ"),
];

/// Read-only lookup over a fixed set of sensor nodes.
#[derive(Debug, Clone)]
pub struct SensorRegistry {
    nodes: Vec<SensorNode>,
}

impl SensorRegistry {
    pub fn new(nodes: Vec<SensorNode>) -> Self {
        Self { nodes }
    }

    pub fn builtin() -> Self {
        Self::new(SENSOR_NODES.to_vec())
    }

    pub fn nodes(&self) -> &[SensorNode] {
        &self.nodes
    }

    pub fn sensor_by_id(&self, id: &str) -> Option<&SensorNode> {
        self.nodes.iter().find(|s| s.id == id)
    }

    pub fn sensors_of_kind(&self, kind: SensorKind) -> impl Iterator<Item = &SensorNode> {
        self.nodes.iter().filter(move |s| s.kind == kind)
    }

    /// Nearest node to `position`, optionally restricted to one kind.
    /// Ties keep the earlier registry entry.
    pub fn find_nearest(&self, position: LatLng, kind: Option<SensorKind>) -> Option<&SensorNode> {
        let mut nearest: Option<(&SensorNode, f64)> = None;
        for sensor in self.nodes.iter() {
            if kind.is_some_and(|k| sensor.kind != k) {
                continue;
            }
            let dist = position.planar_distance(&sensor.position);
            if nearest.map_or(true, |(_, best)| dist < best) {
                nearest = Some((sensor, dist));
            }
        }
        nearest.map(|(sensor, _)| sensor)
    }

    /// Sensors whose track section joins `from` and `to` in either order.
    pub fn sensors_by_track(&self, from: &str, to: &str) -> Vec<&SensorNode> {
        self.nodes.iter().filter(|s| s.on_route(from, to)).collect()
    }
}

impl Default for SensorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_respects_kind_filter() {
        let registry = SensorRegistry::builtin();
        let at_old_delhi = LatLng::new(28.6617, 77.2286);

        let any = registry.find_nearest(at_old_delhi, None).unwrap();
        assert_eq!(any.id, "SN-004");

        let ofc = registry
            .find_nearest(at_old_delhi, Some(SensorKind::OfcNode))
            .unwrap();
        assert_eq!(ofc.id, "SN-003");
    }

    #[test]
    fn nearest_on_empty_registry_is_none() {
        let registry = SensorRegistry::new(Vec::new());
        assert!(registry.find_nearest(LatLng::new(0.0, 0.0), None).is_none());
    }

    #[test]
    fn track_lookup_matches_both_directions() {
        let registry = SensorRegistry::builtin();
        let forward: Vec<_> = registry
            .sensors_by_track("NDLS", "NZM")
            .iter()
            .map(|s| s.id)
            .collect();
        let reverse: Vec<_> = registry
            .sensors_by_track("NZM", "NDLS")
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(forward, vec!["SN-005", "SN-006", "SN-007", "SN-008"]);
        assert_eq!(forward, reverse);
        assert!(registry.sensors_by_track("GZB", "DSA").is_empty());
    }

    #[test]
    fn sensor_serializes_with_wire_names() {
        let registry = SensorRegistry::builtin();
        let json = serde_json::to_value(registry.sensor_by_id("SN-013").unwrap()).unwrap();
        assert_eq!(json["type"], "OFC_NODE");
        assert_eq!(json["status"], "config_failure");
        assert_eq!(json["trackSection"], "NDLS-SSB");
    }
}
