// lib/src/storage_engine/hospital_storage.rs

use async_trait::async_trait;
use log::debug;
use sled::{Db, Tree};

use models::HospitalRecord;

use super::storage_utils::{deserialize_record, serialize_record};
use crate::errors::Result;

#[async_trait]
pub trait HospitalStorageEngine: Send + Sync + 'static {
    /// Stores `hospital` unless one with the same name exists. Returns whether it was inserted.
    async fn insert_if_absent(&self, hospital: &HospitalRecord) -> Result<bool>;
    async fn list_hospitals(&self) -> Result<Vec<HospitalRecord>>;
}

/// Hospitals are keyed by lower-cased name, which is what catalog syncs dedupe on.
pub struct SledHospitalStorage {
    tree: Tree,
}

impl SledHospitalStorage {
    pub fn new(db: &Db) -> Result<Self> {
        Ok(Self { tree: db.open_tree("hospitals")? })
    }
}

#[async_trait]
impl HospitalStorageEngine for SledHospitalStorage {
    async fn insert_if_absent(&self, hospital: &HospitalRecord) -> Result<bool> {
        let key = hospital.name.to_lowercase();
        let inserted = self
            .tree
            .compare_and_swap(key.as_bytes(), None::<&[u8]>, Some(serialize_record(hospital)?))?
            .is_ok();
        debug!("Hospital '{}' inserted: {}", hospital.name, inserted);
        Ok(inserted)
    }

    async fn list_hospitals(&self) -> Result<Vec<HospitalRecord>> {
        self.tree
            .iter()
            .map(|item| {
                let (_key, value) = item?;
                deserialize_record(&value)
            })
            .collect()
    }
}
