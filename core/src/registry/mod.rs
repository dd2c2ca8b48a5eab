pub mod sensor;
pub mod station;

pub use sensor::{SensorKind, SensorNode, SensorRegistry, SensorStatus, SENSOR_NODES};
pub use station::{route_track_points, station_by_code, Station, STATIONS};
