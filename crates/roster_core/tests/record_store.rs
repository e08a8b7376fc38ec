use roster_core::{
    sample_employees, EmployeeRecord, IdCollisionPolicy, KeyValueStore, MemoryKeyValueStore,
    RecordStore, RecordStoreError, Rfc4180Csv, StorageError, StorageResult, StoreOptions,
    DEFAULT_SLOT_KEY,
};

fn empty_store() -> RecordStore<MemoryKeyValueStore> {
    RecordStore::open(MemoryKeyValueStore::new(), StoreOptions::default())
}

fn persisted(store: &RecordStore<MemoryKeyValueStore>) -> Vec<EmployeeRecord> {
    let payload = store
        .storage()
        .get(DEFAULT_SLOT_KEY)
        .unwrap()
        .expect("slot should be written");
    serde_json::from_str(&payload).unwrap()
}

fn lina() -> EmployeeRecord {
    EmployeeRecord::new("1002", "Lina Haddad", "28", "Irbid, Jordan")
}

/// Slot store whose writes can be switched off.
struct FlakyStore {
    inner: MemoryKeyValueStore,
    fail_writes: bool,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.inner.remove(key)
    }
}

#[test]
fn persisted_slot_mirrors_memory_after_each_mutation() {
    let mut store = empty_store();

    store.create(lina()).unwrap();
    assert_eq!(persisted(&store), store.records());

    store
        .create(EmployeeRecord::new("1003", "Omar Qasem", "41", "Aqaba, Jordan"))
        .unwrap();
    assert_eq!(persisted(&store), store.records());

    store
        .update(0, EmployeeRecord::new("1002", "Lina H.", "29", "Irbid"))
        .unwrap();
    assert_eq!(persisted(&store), store.records());
    assert_eq!(store.records()[0].name, "Lina H.");

    store.delete(0).unwrap();
    assert_eq!(persisted(&store), store.records());
    assert_eq!(store.len(), 1);

    store.clear().unwrap();
    assert!(persisted(&store).is_empty());
}

#[test]
fn create_with_existing_id_fails_and_changes_nothing() {
    let mut store = empty_store();
    store.create(lina()).unwrap();

    let err = store
        .create(EmployeeRecord::new("1002", "Someone Else", "50", "Madaba"))
        .unwrap_err();
    assert!(matches!(err, RecordStoreError::DuplicateKey(ref id) if id == "1002"));
    assert_eq!(store.records(), &[lina()]);
    assert_eq!(persisted(&store), vec![lina()]);
}

#[test]
fn create_appends_in_insertion_order() {
    let mut store = empty_store();
    store.create(EmployeeRecord::new("9", "Z", "1", "a")).unwrap();
    store.create(EmployeeRecord::new("1", "A", "1", "a")).unwrap();
    let ids = store.records().iter().map(|r| r.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["9", "1"]);
}

#[test]
fn delete_removes_exactly_one_for_every_valid_index() {
    for index in 0..4 {
        let mut store = empty_store();
        store.seed(sample_employees()).unwrap();

        let removed = store.delete(index).unwrap();
        assert_eq!(removed, sample_employees()[index]);
        assert_eq!(store.len(), 3);
        assert!(store.find(&removed.id).is_none());
    }
}

#[test]
fn invalid_index_signals_error_and_leaves_collection() {
    let mut store = empty_store();
    store.seed(sample_employees()).unwrap();

    let err = store.delete(4).unwrap_err();
    assert!(matches!(
        err,
        RecordStoreError::IndexOutOfRange { index: 4, len: 4 }
    ));
    let err = store.update(7, lina()).unwrap_err();
    assert!(matches!(err, RecordStoreError::IndexOutOfRange { .. }));
    assert_eq!(store.records(), sample_employees().as_slice());
}

#[test]
fn update_allows_id_collision_by_default() {
    let mut store = empty_store();
    store.seed(sample_employees()).unwrap();

    store
        .update(0, EmployeeRecord::new("1002", "Copy", "1", "x"))
        .unwrap();
    let holders = store.records().iter().filter(|r| r.id == "1002").count();
    assert_eq!(holders, 2);
}

#[test]
fn reject_policy_blocks_collisions_but_not_self_updates() {
    let options = StoreOptions {
        id_collision: IdCollisionPolicy::Reject,
        ..StoreOptions::default()
    };
    let mut store = RecordStore::open(MemoryKeyValueStore::new(), options);
    store.seed(sample_employees()).unwrap();

    let err = store
        .update(0, EmployeeRecord::new("1002", "Copy", "1", "x"))
        .unwrap_err();
    assert!(matches!(err, RecordStoreError::DuplicateKey(_)));
    assert_eq!(store.records()[0].id, "1001");

    store
        .update(0, EmployeeRecord::new("1001", "Ahmad S.", "35", "Amman"))
        .unwrap();
    assert_eq!(store.records()[0].name, "Ahmad S.");
}

#[test]
fn by_id_addressing_survives_identical_records() {
    let mut store = empty_store();
    store.seed(sample_employees()).unwrap();
    store
        .update(1, EmployeeRecord::new("1001", "Twin", "1", "x"))
        .unwrap();

    assert_eq!(store.position_of("1001"), Some(0));
    store.delete_by_id("1001").unwrap();
    assert_eq!(store.records()[0].name, "Twin");

    let err = store.delete_by_id("4040").unwrap_err();
    assert!(matches!(err, RecordStoreError::RecordNotFound(ref id) if id == "4040"));

    store
        .update_by_id("1003", EmployeeRecord::new("1003", "Omar Q.", "42", "Aqaba"))
        .unwrap();
    assert_eq!(store.find("1003").unwrap().age, "42");
}

#[test]
fn seed_adds_four_then_zero() {
    let mut store = empty_store();
    assert_eq!(store.seed(sample_employees()).unwrap(), 4);
    assert_eq!(store.seed(sample_employees()).unwrap(), 0);
    assert_eq!(store.len(), 4);
}

#[test]
fn seed_skips_present_ids_and_duplicates_within_samples() {
    let mut store = empty_store();
    store.create(lina()).unwrap();

    let mut samples = sample_employees();
    samples.push(EmployeeRecord::new("1004", "Dup", "1", "x"));
    assert_eq!(store.seed(samples).unwrap(), 3);
    assert_eq!(store.find("1004").unwrap().name, "Zaid Abbas");
}

#[test]
fn seed_without_additions_does_not_write() {
    let storage = MemoryKeyValueStore::new();
    let mut store = RecordStore::open(storage, StoreOptions::default());
    assert_eq!(store.seed(Vec::new()).unwrap(), 0);
    assert_eq!(store.storage().get(DEFAULT_SLOT_KEY).unwrap(), None);
}

#[test]
fn search_matches_address_case_insensitively() {
    let mut store = empty_store();
    store.create(lina()).unwrap();

    let hits = store.search("irbid").collect::<Vec<_>>();
    assert_eq!(hits, vec![&lina()]);
    assert_eq!(store.search("9999").count(), 0);
}

#[test]
fn search_is_restartable_and_reflects_mutations() {
    let mut store = empty_store();
    store.seed(sample_employees()).unwrap();

    let hits = store.search("100");
    assert_eq!(hits.clone().count(), 4);
    assert_eq!(hits.count(), 4);

    store.delete(0).unwrap();
    assert_eq!(store.search("100").count(), 3);
}

#[test]
fn export_single_record_matches_expected_text() {
    let mut store = empty_store();
    store
        .create(EmployeeRecord::new("1001", "Ahmad Suleiman", "34", "Amman, Jordan"))
        .unwrap();

    assert_eq!(
        store.export_csv().unwrap(),
        "ID,Name,Age,Address\n1001,\"Ahmad Suleiman\",34,\"Amman, Jordan\""
    );
}

#[test]
fn export_of_empty_collection_is_an_error() {
    let store = empty_store();
    assert!(matches!(
        store.export_csv().unwrap_err(),
        RecordStoreError::EmptyCollection
    ));
}

#[test]
fn export_dialect_can_be_swapped() {
    let mut store = empty_store().with_dialect(Box::new(Rfc4180Csv));
    store
        .create(EmployeeRecord::new("5", "Sam \"Q\"", "40", "A"))
        .unwrap();
    assert_eq!(
        store.export_csv().unwrap(),
        "ID,Name,Age,Address\n5,\"Sam \"\"Q\"\"\",40,\"A\""
    );
}

#[test]
fn malformed_slot_loads_as_empty() {
    let storage = MemoryKeyValueStore::with_slot(DEFAULT_SLOT_KEY, "{not json");
    let store = RecordStore::open(storage, StoreOptions::default());
    assert!(store.is_empty());
}

#[test]
fn legacy_payload_with_numeric_age_loads() {
    let storage = MemoryKeyValueStore::with_slot(
        DEFAULT_SLOT_KEY,
        r#"[{"id":"1001","name":"Ahmad Suleiman","age":34,"address":"Amman, Jordan"},
            {"id":"77","name":"Rana","age":"30","address":"Salt"}]"#,
    );
    let store = RecordStore::open(storage, StoreOptions::default());
    assert_eq!(store.len(), 2);
    assert_eq!(store.records()[0].age, "34");
    assert_eq!(store.records()[1].age, "30");
}

#[test]
fn load_rereads_the_slot() {
    let payload = serde_json::to_string(&vec![lina()]).unwrap();
    let storage = MemoryKeyValueStore::with_slot(DEFAULT_SLOT_KEY, payload);
    let mut store = RecordStore::open(storage, StoreOptions::default());
    assert_eq!(store.load(), &[lina()]);

    store
        .create(EmployeeRecord::new("1003", "Omar Qasem", "41", "Aqaba"))
        .unwrap();
    assert_eq!(store.load().len(), 2);
}

#[test]
fn failed_write_leaves_memory_unchanged() {
    let mut store = RecordStore::open(
        FlakyStore {
            inner: MemoryKeyValueStore::new(),
            fail_writes: false,
        },
        StoreOptions::default(),
    );
    store.create(lina()).unwrap();

    let mut storage = store.into_storage();
    storage.fail_writes = true;
    let mut store = RecordStore::open(storage, StoreOptions::default());

    let err = store
        .create(EmployeeRecord::new("1003", "Omar Qasem", "41", "Aqaba"))
        .unwrap_err();
    assert!(matches!(err, RecordStoreError::Storage(StorageError::Unavailable(_))));
    assert!(store.delete(0).is_err());
    assert!(store.clear().is_err());
    assert_eq!(store.records(), &[lina()]);
}

#[test]
fn custom_slot_key_is_honored() {
    let options = StoreOptions {
        slot_key: "ltuc_employees".to_string(),
        ..StoreOptions::default()
    };
    let mut store = RecordStore::open(MemoryKeyValueStore::new(), options);
    store.create(lina()).unwrap();

    assert!(store.storage().get("ltuc_employees").unwrap().is_some());
    assert!(store.storage().get(DEFAULT_SLOT_KEY).unwrap().is_none());
}
