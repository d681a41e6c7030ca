use registry_core::db::open_db_in_memory;
use registry_core::{
    Device, DeviceDraft, DeviceService, DeviceStatus, Entity, EntityKind, EntityRepository,
    LookupAttribute, RegistryError, SqliteDeviceRepository, ValidationError,
};

fn lasercutter_draft() -> DeviceDraft {
    DeviceDraft {
        id: " DEV-0010 ".to_string(),
        name: "Lasercutter".to_string(),
        device_type: Some("Schneidgerät".to_string()),
        location: Some(" Werkstatt 2 ".to_string()),
        status: DeviceStatus::Reserved,
        remarks: Some("   ".to_string()),
    }
}

#[test]
fn create_and_find_roundtrip_keeps_all_attributes() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteDeviceRepository::try_new(&mut conn).unwrap();
    let mut service = DeviceService::new(repo);

    let created = service.create_device(&lasercutter_draft()).unwrap();
    assert_eq!(created.inventory_number(), "dev-0010");
    assert_eq!(created.location(), Some("Werkstatt 2"));
    assert_eq!(created.remarks(), None);

    let loaded = service.get_device("DEV-0010").unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.device_type(), Some("Schneidgerät"));
    assert_eq!(loaded.status(), DeviceStatus::Reserved);
}

#[test]
fn create_rejects_case_insensitive_duplicate_inventory_number() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteDeviceRepository::try_new(&mut conn).unwrap();

    repo.create(&Device::new("DEV-1", "3D-Drucker")).unwrap();
    let err = repo.create(&Device::new("dev-1", "Other")).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::DuplicateIdentity {
            kind: EntityKind::Device,
            ref identity,
        } if identity == "dev-1"
    ));
    assert_eq!(repo.find_all().unwrap().len(), 1);
}

#[test]
fn create_rejects_malformed_inventory_number_and_blank_name() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteDeviceRepository::try_new(&mut conn).unwrap();

    let err = repo.create(&Device::new("DEV 10", "Drucker")).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Validation(ValidationError::InvalidFormat { field: "id", .. })
    ));

    let err = repo.create(&Device::new("", "Drucker")).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Validation(ValidationError::Empty { field: "id" })
    ));

    let err = repo.create(&Device::new("dev-2", " ")).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Validation(ValidationError::Empty { field: "name" })
    ));

    assert!(repo.find_all().unwrap().is_empty());
}

#[test]
fn update_replaces_attributes_of_existing_device() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteDeviceRepository::try_new(&mut conn).unwrap();
    let mut service = DeviceService::new(repo);
    service.create_device(&lasercutter_draft()).unwrap();

    let changed = DeviceDraft {
        id: "dev-0010".to_string(),
        name: "Lasercutter XL".to_string(),
        status: DeviceStatus::InMaintenance,
        location: Some("Labor 1".to_string()),
        ..DeviceDraft::default()
    };
    service.update_device(&changed).unwrap();

    let loaded = service.get_device("dev-0010").unwrap().unwrap();
    assert_eq!(loaded.name(), "Lasercutter XL");
    assert_eq!(loaded.status(), DeviceStatus::InMaintenance);
    assert_eq!(loaded.location(), Some("Labor 1"));
    assert_eq!(loaded.device_type(), None);
}

#[test]
fn update_missing_device_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteDeviceRepository::try_new(&mut conn).unwrap();

    let err = repo.update(&Device::new("DEV-404", "Ghost")).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::NotFound {
            kind: EntityKind::Device,
            ref identity,
        } if identity == "dev-404"
    ));
}

#[test]
fn list_orders_devices_by_name_then_identity() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteDeviceRepository::try_new(&mut conn).unwrap();
    repo.create(&Device::new("dev-3", "lasercutter")).unwrap();
    repo.create(&Device::new("dev-2", "3D-Drucker")).unwrap();
    repo.create(&Device::new("dev-1", "Lasercutter")).unwrap();

    let ids: Vec<String> = repo
        .find_all()
        .unwrap()
        .iter()
        .map(|device| device.id().to_string())
        .collect();
    assert_eq!(ids, vec!["dev-2", "dev-1", "dev-3"]);
}

#[test]
fn service_delete_is_idempotent() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteDeviceRepository::try_new(&mut conn).unwrap();
    let mut service = DeviceService::new(repo);
    service.create_device(&lasercutter_draft()).unwrap();

    assert!(service.delete_device("Dev-0010").unwrap());
    assert!(!service.delete_device("dev-0010").unwrap());
    assert!(service.get_device("dev-0010").unwrap().is_none());
}

#[test]
fn find_device_by_name_and_unknown_attribute() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteDeviceRepository::try_new(&mut conn).unwrap();
    let mut service = DeviceService::new(repo);
    service.create_device(&lasercutter_draft()).unwrap();

    let found = service.find_device("name", " Lasercutter ").unwrap().unwrap();
    assert_eq!(found.id(), "dev-0010");

    let err = service.find_device("location", "Werkstatt 2").unwrap_err();
    assert!(matches!(err, RegistryError::InvalidAttribute(_)));
}

#[test]
fn null_status_reads_as_available_and_unknown_status_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO devices (id, name, status) VALUES ('dev-1', 'Drucker', NULL);",
    )
    .unwrap();

    {
        let repo = SqliteDeviceRepository::try_new(&mut conn).unwrap();
        let device = repo.find_by(LookupAttribute::Id, "dev-1").unwrap().unwrap();
        assert_eq!(device.status(), DeviceStatus::Available);
    }

    conn.execute_batch("UPDATE devices SET status = 'lost' WHERE id = 'dev-1';")
        .unwrap();
    let repo = SqliteDeviceRepository::try_new(&mut conn).unwrap();
    let err = repo.find_by(LookupAttribute::Id, "dev-1").unwrap_err();
    assert!(matches!(err, RegistryError::InvalidData(_)));
}

#[test]
fn maintenance_status_is_stored_with_hyphenated_label() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut repo = SqliteDeviceRepository::try_new(&mut conn).unwrap();
        repo.create(&Device::new("dev-7", "Drehbank").with_status(DeviceStatus::InMaintenance))
            .unwrap();
    }

    let stored: String = conn
        .query_row("SELECT status FROM devices WHERE id = 'dev-7';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(stored, "in-maintenance");

    conn.execute_batch("UPDATE devices SET status = 'in_maintenance' WHERE id = 'dev-7';")
        .unwrap();
    let repo = SqliteDeviceRepository::try_new(&mut conn).unwrap();
    let device = repo.find_by(LookupAttribute::Id, "dev-7").unwrap().unwrap();
    assert_eq!(device.status(), DeviceStatus::InMaintenance);
}
