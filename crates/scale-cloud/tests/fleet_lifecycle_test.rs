//! End-to-end registry lifecycle: import, allocate, persist, reload, remove

use chrono::{TimeZone, Utc};
use scale_cloud::{
    AtomicFileStore, Fleet, FleetStore, HostStatus, InfraState, ProvisioningImporter, SlugGenerator,
};
use std::fs;

const EXAMPLE_STATE: &str = r#"{"outputs":{"external_ip":{"value":"10.0.0.1"}},"resources":[{"type":"compute-instance","instances":[{"attributes":{"name":"alpha","created_at":"2024-01-01T00:00:00Z"}}]}]}"#;

fn tfstate(names: &[&str]) -> InfraState {
    let instances: Vec<serde_json::Value> = names
        .iter()
        .map(|name| {
            serde_json::json!({
                "attributes": { "name": name, "created_at": "2024-05-01T10:00:00Z" }
            })
        })
        .collect();
    InfraState::from_value(serde_json::json!({
        "outputs": { "external_ip": { "value": "192.0.2.10" } },
        "resources": [
            { "type": "yandex_compute_instance", "name": "gateway", "instances": [
                { "attributes": { "name": "gateway", "created_at": "2024-05-01T09:00:00Z" } }
            ] },
            { "type": "yandex_compute_instance", "name": "workers", "instances": instances }
        ]
    }))
}

#[test]
fn test_example_snapshot_import() {
    let state = InfraState::from_slice(EXAMPLE_STATE.as_bytes()).unwrap();
    let mut fleet = Fleet::new();

    ProvisioningImporter::new("compute-instance")
        .import(&mut fleet, &state)
        .unwrap();

    let hosts = fleet.snapshot();
    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].name, "alpha");
    assert_eq!(
        hosts[0].created_at,
        Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    );
    assert_eq!(fleet.entrypoint(), Some("10.0.0.1"));
}

#[test]
fn test_imported_early_timestamp_survives_reload() {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = FleetStore::new(temp_dir.path().join("fleet.json"));
    let state = InfraState::from_value(serde_json::json!({
        "outputs": { "external_ip": { "value": "10.0.0.1" } },
        "resources": [{ "type": "compute-instance", "instances": [
            { "attributes": { "name": "alpha", "created_at": "0001-03-01T00:00:00Z" } }
        ] }]
    }));

    let mut fleet = Fleet::new();
    ProvisioningImporter::new("compute-instance")
        .import(&mut fleet, &state)
        .unwrap();
    store.save(&fleet).unwrap();

    let reloaded = store.load().unwrap();
    assert_eq!(
        reloaded.get("alpha").unwrap().created_at,
        Some(Utc.with_ymd_and_hms(1, 3, 1, 0, 0, 0).unwrap())
    );
    assert_eq!(reloaded, fleet);
}

#[test]
fn test_registry_survives_restart() {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = FleetStore::new(temp_dir.path().join("fleet.json"));
    let importer = ProvisioningImporter::default();

    // first run: import provisioned workers and allocate one more locally
    let mut fleet = store.load_or_default().unwrap();
    importer
        .import(&mut fleet, &tfstate(&["worker-a", "worker-b"]))
        .unwrap();
    let allocated = fleet.create(&mut SlugGenerator::new()).unwrap().name.clone();
    fleet
        .get_mut("worker-a")
        .unwrap()
        .transition(HostStatus(2), true, Utc::now());
    store.save(&fleet).unwrap();

    // second run: state is back and a grown snapshot only adds
    let mut reloaded = store.load().unwrap();
    assert_eq!(reloaded, fleet);
    assert!(reloaded.get("gateway").is_none());

    let before = reloaded.get("worker-a").unwrap().clone();
    let report = importer
        .import(&mut reloaded, &tfstate(&["worker-a", "worker-b", "worker-c"]))
        .unwrap();
    assert_eq!(report.added, ["worker-c"]);
    assert_eq!(reloaded.get("worker-a"), Some(&before));
    assert!(reloaded.contains(&allocated));

    // decommission
    reloaded.delete("worker-b");
    store.save(&reloaded).unwrap();

    let names: Vec<String> = store
        .load()
        .unwrap()
        .snapshot()
        .into_iter()
        .map(|h| h.name)
        .collect();
    assert_eq!(names.len(), 3);
    assert!(!names.contains(&"worker-b".to_string()));
}

#[test]
fn test_failed_import_does_not_touch_disk_state() {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = FleetStore::new(temp_dir.path().join("fleet.json"));

    let mut fleet = Fleet::new();
    ProvisioningImporter::default()
        .import(&mut fleet, &tfstate(&["worker-a"]))
        .unwrap();
    store.save(&fleet).unwrap();
    let on_disk = fs::read(store.path()).unwrap();

    let broken = InfraState::from_value(serde_json::json!({ "resources": [] }));
    assert!(
        ProvisioningImporter::default()
            .import(&mut fleet, &broken)
            .is_err()
    );
    store.save(&fleet).unwrap();
    assert_eq!(fs::read(store.path()).unwrap(), on_disk);
}

#[test]
fn test_crash_before_rename_keeps_registry() {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = FleetStore::new(temp_dir.path().join("fleet.json"));

    let mut fleet = Fleet::new();
    fleet.create(&mut SlugGenerator::new()).unwrap();
    store.save(&fleet).unwrap();
    let original = fs::read(store.path()).unwrap();

    fleet.create(&mut SlugGenerator::new()).unwrap();
    let staged = AtomicFileStore::stage(store.path(), &scale_cloud::encode(&fleet).unwrap()).unwrap();
    drop(staged);

    assert_eq!(fs::read(store.path()).unwrap(), original);
    assert_eq!(store.load().unwrap().len(), 1);
}
