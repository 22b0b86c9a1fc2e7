use super::*;
use crate::storage_test_stub::{RamError, RamStorage};

type Rec = Record<20>;

#[test]
fn blank_store_loads_defaults() {
    let mut storage = RamStorage::new(256);
    let record = Rec::load(&mut storage, 0);
    assert_eq!(record, Rec::default());
    assert_eq!(record.bluetooth_id, DEFAULT_BLUETOOTH_ID);
    assert_eq!(Rec::try_load(&mut storage, 0), Ok(None));
}

#[test]
fn save_then_load() {
    let mut storage = RamStorage::new(256);
    let mut record = Rec::default();
    record.bluetooth_id = 7;
    record.count_press(0);
    record.count_press(19);
    record.count_press(19);
    record.count_press(200);

    record.save(&mut storage, 16).unwrap();
    assert_eq!(storage.word(4), MAGIC);
    assert_eq!(storage.word(5), 7);
    assert_eq!(storage.word(8), 1);
    assert_eq!(storage.word(8 + 19), 2);
    assert_eq!(storage.writes, 3);

    assert_eq!(Rec::load(&mut storage, 16), record);
}

#[test]
fn bad_bluetooth_id_is_clamped() {
    let mut storage = RamStorage::new(256);
    Rec::default().save(&mut storage, 0).unwrap();
    storage.set_word(1, 42);

    assert_eq!(Rec::load(&mut storage, 0).bluetooth_id, 0);
}

#[test]
fn save_bluetooth_id_keeps_heatmap() {
    let mut storage = RamStorage::new(256);
    let mut record = Rec::default();
    record.heatmap[3] = 99;
    record.save(&mut storage, 0).unwrap();

    let mut changed = Rec::default();
    changed.bluetooth_id = 4;
    storage.writes = 0;
    changed.save_bluetooth_id(&mut storage, 0).unwrap();
    assert_eq!(storage.writes, 1);

    let loaded = Rec::load(&mut storage, 0);
    assert_eq!(loaded.bluetooth_id, 4);
    assert_eq!(loaded.heatmap[3], 99);
}

#[test]
fn save_bluetooth_id_on_blank_store_writes_everything() {
    let mut storage = RamStorage::new(256);
    let mut record = Rec::default();
    record.bluetooth_id = 2;
    record.save_bluetooth_id(&mut storage, 0).unwrap();

    assert_eq!(Rec::load(&mut storage, 0), record);
    assert_eq!(storage.word(4), 0);
}

#[test]
fn storage_failures() {
    let mut storage = RamStorage::new(256);
    Rec::default().save(&mut storage, 0).unwrap();

    storage.fail_reads = true;
    assert_eq!(
        Rec::try_load(&mut storage, 0),
        Err(StorageError::Backend(RamError))
    );
    assert_eq!(Rec::load(&mut storage, 0), Rec::default());

    storage.fail_writes = true;
    assert_eq!(
        Rec::default().save(&mut storage, 0),
        Err(StorageError::Backend(RamError))
    );

    let mut small = RamStorage::new(64);
    assert_eq!(
        Rec::default().save(&mut small, 0),
        Err(StorageError::Capacity)
    );
    assert_eq!(Rec::try_load(&mut small, 0), Err(StorageError::Capacity));
}

#[test]
fn counters_saturate() {
    let mut record = Rec::default();
    record.heatmap[1] = u32::MAX;
    record.count_press(1);
    assert_eq!(record.heatmap[1], u32::MAX);
}
