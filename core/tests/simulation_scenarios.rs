use drishticore::analysis::{
    generate_readings, risk_score, AnalysisService, MockAnalysisService, RouteSelection,
};
use drishticore::catalog::{AnomalyInputValues, AnomalyKind, InputKey};
use drishticore::model::{Severity, SimulatedAnomaly, SimulationAlert, VibrationPattern};
use drishticore::notify::{NotificationConnector, NotificationStore};
use drishticore::registry::{SensorRegistry, STATIONS};
use drishticore::store::{
    ApplyOutcome, FileStorage, SimulationStore, SnapshotStorage, SyncOutbox, STORAGE_KEY,
};
use drishticore::{LatLng, SimulationConfig};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Arc;
use tempfile::tempdir;

fn service(seed: u64) -> MockAnalysisService {
    let config = SimulationConfig {
        seed: Some(seed),
        ..SimulationConfig::default().without_delay()
    };
    MockAnalysisService::new(&config, SensorRegistry::builtin())
}

fn file_store(dir: &std::path::Path) -> (Arc<FileStorage>, SimulationStore) {
    let storage = Arc::new(FileStorage::new(dir));
    let store = SimulationStore::load(storage.clone(), Arc::new(SyncOutbox::new()));
    (storage, store)
}

async fn place_and_analyze(
    store: &SimulationStore,
    svc: &MockAnalysisService,
    anomaly: SimulatedAnomaly,
    route: Option<&RouteSelection>,
) -> ApplyOutcome {
    let epoch = store.add_anomaly(anomaly.clone());
    let response = svc.analyze(&anomaly, route).await.unwrap();
    let sensors: Vec<_> = response
        .detecting_sensors
        .iter()
        .filter_map(|id| svc.registry().sensor_by_id(id).copied())
        .collect();
    let readings = generate_readings(&anomaly, &sensors);
    store.apply_analysis(epoch, response, readings)
}

#[tokio::test]
async fn tampering_near_single_ofc_track() {
    let dir = tempdir().unwrap();
    let (_, store) = file_store(dir.path());
    let svc = service(1);
    let mut rng = StdRng::seed_from_u64(99);

    let inputs = AnomalyInputValues::default()
        .with(InputKey::Frequency, 142.0)
        .with(InputKey::Amplitude, 8.0);
    // NDLS-TKJ carries exactly one active OFC node (SN-015).
    let anomaly =
        SimulatedAnomaly::place(AnomalyKind::Tampering, LatLng::new(28.6350, 77.2425), inputs, &mut rng)
            .unwrap();
    let intensity = anomaly.intensity;

    let outcome = place_and_analyze(&store, &svc, anomaly, None).await;
    assert_eq!(outcome, ApplyOutcome::Applied { alerts: 1, detections: 1 });

    let alerts = store.alerts();
    let detections = store.detections();
    assert_eq!(alerts[0].sensor_id, "SN-015");
    assert_eq!(detections[0].sensor_id, "SN-015");
    assert_eq!(alerts[0].severity, Severity::from_risk(risk_score(intensity)));

    let readings = store.readings();
    assert_eq!(readings.vibration.len(), 1);
    assert_eq!(readings.vibration[0].pattern, VibrationPattern::Impact);
    assert_eq!(readings.vibration[0].frequency, 142.0);
    assert_eq!(readings.vibration[0].amplitude, 8.0);
}

#[tokio::test]
async fn fan_out_matches_across_kinds_and_positions() {
    let svc = service(2);
    let store = SimulationStore::new(
        Arc::new(drishticore::store::MemoryStorage::new()),
        Arc::new(SyncOutbox::new()),
    );
    let routes = [
        None,
        Some(RouteSelection::new("NDLS", "DLI")),
        Some(RouteSelection::new("SSB", "NDLS")),
        Some(RouteSelection::new("GZB", "DSA")),
    ];

    for station in STATIONS.iter() {
        for kind in AnomalyKind::ALL {
            for route in &routes {
                let anomaly = SimulatedAnomaly::with_intensity(
                    kind,
                    station.position,
                    AnomalyInputValues::default(),
                    0.85,
                );
                let response = svc.analyze(&anomaly, route.as_ref()).await.unwrap();
                let n = response.detecting_sensors.len();
                assert!(n <= 3);
                assert_eq!(response.alerts.len(), n);
                assert_eq!(response.detections.len(), n);
                let applied = store.apply_analysis(store.epoch(), response, Default::default());
                assert_eq!(applied, ApplyOutcome::Applied { alerts: n, detections: n });
            }
        }
    }
}

#[tokio::test]
async fn route_match_beats_nearest_sensor() {
    let svc = service(3);
    // Sitting on SN-011 (Anand Vihar) but routed along NDLS-SSB.
    let anomaly = SimulatedAnomaly::with_intensity(
        AnomalyKind::Tampering,
        LatLng::new(28.6508, 77.3152),
        AnomalyInputValues::default(),
        0.9,
    );
    let route = RouteSelection::new("SSB", "NDLS");
    let response = svc.analyze(&anomaly, Some(&route)).await.unwrap();
    // SN-013 is under configuration and excluded.
    assert_eq!(response.detecting_sensors, vec!["SN-012", "SN-014"]);
}

#[test]
fn clear_all_with_populated_state_removes_file() {
    let dir = tempdir().unwrap();
    let (storage, store) = file_store(dir.path());
    let svc = service(4);

    for i in 0..5 {
        let anomaly = SimulatedAnomaly::with_intensity(
            AnomalyKind::Obstruction,
            LatLng::new(28.62 + i as f64 * 0.001, 77.22),
            AnomalyInputValues::default(),
            0.9,
        );
        store.add_anomaly(anomaly.clone());
        // NDLS-DLI resolves three sensors; the fifth anomaly raises nothing.
        if i < 4 {
            let response = svc.compose(&anomaly, Some(&RouteSelection::new("NDLS", "DLI")));
            for alert in response.alerts {
                store.add_alert(alert);
            }
        }
    }
    assert_eq!(store.anomalies().len(), 5);
    assert_eq!(store.alerts().len(), 12);
    assert!(storage.path_for(STORAGE_KEY).exists());

    store.clear_all();
    assert!(store.anomalies().is_empty());
    assert!(store.alerts().is_empty());
    assert!(store.detections().is_empty());
    assert_eq!(storage.load(STORAGE_KEY).unwrap(), None);

    store.clear_all();
    assert!(!storage.path_for(STORAGE_KEY).exists());
}

#[tokio::test]
async fn refresh_restores_identical_collections() {
    let dir = tempdir().unwrap();
    let svc = service(5);
    let (anomalies, alerts, detections) = {
        let (_, store) = file_store(dir.path());
        for (i, kind) in AnomalyKind::ALL.into_iter().enumerate() {
            let anomaly = SimulatedAnomaly::with_intensity(
                kind,
                STATIONS[i].position,
                kind.definition().default_inputs(),
                0.7 + i as f64 * 0.05,
            );
            place_and_analyze(&store, &svc, anomaly, None).await;
        }
        let first = store.alerts()[0].id.clone();
        store.acknowledge_alert(&first);
        (store.anomalies(), store.alerts(), store.detections())
    };

    let (_, reloaded) = file_store(dir.path());
    assert_eq!(reloaded.anomalies(), anomalies);
    assert_eq!(reloaded.alerts(), alerts);
    assert_eq!(reloaded.detections(), detections);
    assert!(reloaded.alerts()[0].acknowledged);
    assert!(reloaded.readings().is_empty());
}

#[test]
fn reload_preserves_full_precision_random_values() {
    let storage = Arc::new(drishticore::store::MemoryStorage::new());
    let store = SimulationStore::new(storage.clone(), Arc::new(SyncOutbox::new()));
    let svc = service(11);
    let mut rng = StdRng::seed_from_u64(2024);

    for i in 0..500 {
        let kind = AnomalyKind::ALL[i % AnomalyKind::ALL.len()];
        let position = LatLng::new(
            rng.gen_range(28.55..28.70),
            rng.gen_range(77.15..77.30),
        );
        let anomaly =
            SimulatedAnomaly::place(kind, position, kind.definition().default_inputs(), &mut rng)
                .unwrap();
        store.add_anomaly(anomaly.clone());
        if i % 25 == 0 {
            let response = svc.compose(&anomaly, None);
            for detection in response.detections {
                store.add_detection(detection);
            }
        }
    }

    let reloaded = SimulationStore::load(storage, Arc::new(SyncOutbox::new()));
    let (before, after) = (store.anomalies(), reloaded.anomalies());
    assert_eq!(after.len(), 500);
    for (saved, restored) in before.iter().zip(&after) {
        assert_eq!(saved.intensity.to_bits(), restored.intensity.to_bits());
    }
    assert_eq!(after, before);
    assert_eq!(reloaded.detections(), store.detections());
}

#[test]
fn eleven_alerts_keep_ten_notifications() {
    let store = SimulationStore::new(
        Arc::new(drishticore::store::MemoryStorage::new()),
        Arc::new(SyncOutbox::new()),
    );
    let notifications = NotificationStore::new(&SimulationConfig::default());
    NotificationConnector::attach(&store, notifications.clone());

    let svc = service(6);
    let anomaly = SimulatedAnomaly::with_intensity(
        AnomalyKind::Thermal,
        LatLng::new(28.6617, 77.2286),
        AnomalyInputValues::default(),
        0.95,
    );
    let template = svc.compose(&anomaly, None).alerts.remove(0);
    for i in 0..11 {
        store.add_alert(SimulationAlert {
            id: format!("ALT-{}", i),
            ..template.clone()
        });
    }

    let list = notifications.notifications();
    assert_eq!(list.len(), 10);
    assert_eq!(list[0].alert_id.as_deref(), Some("ALT-10"));
    assert_eq!(list[9].alert_id.as_deref(), Some("ALT-1"));
    assert_eq!(store.alerts().len(), 11);
}
