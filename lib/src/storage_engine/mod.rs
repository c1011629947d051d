// lib/src/storage_engine/mod.rs

// Module declarations
pub mod assessment_storage;
pub mod contact_storage;
pub mod hospital_storage;
pub mod storage_utils;
pub mod user_storage;

// Re-export key types and traits for external use
pub use assessment_storage::{AssessmentStorageEngine, SledAssessmentStorage};
pub use contact_storage::{ContactStorageEngine, SledContactStorage};
pub use hospital_storage::{HospitalStorageEngine, SledHospitalStorage};
pub use user_storage::{SledUserStorage, UserStorageEngine};

use std::path::Path;
use std::sync::Arc;

use log::info;
use sled::Db;

use crate::errors::Result;

/// All record stores, backed by one sled database. Cheap to clone.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserStorageEngine>,
    pub contacts: Arc<dyn ContactStorageEngine>,
    pub assessments: Arc<dyn AssessmentStorageEngine>,
    pub hospitals: Arc<dyn HospitalStorageEngine>,
    db: Db,
}

impl Storage {
    /// Opens (or creates) the database under `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;
        let db = sled::open(path)?;
        info!("Opened sled database at {}", path.display());
        Self::from_db(db)
    }

    /// A throwaway database removed when dropped.
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> Result<Self> {
        Ok(Self {
            users: Arc::new(SledUserStorage::new(&db)?),
            contacts: Arc::new(SledContactStorage::new(&db)?),
            assessments: Arc::new(SledAssessmentStorage::new(&db)?),
            hospitals: Arc::new(SledHospitalStorage::new(&db)?),
            db,
        })
    }

    pub async fn flush(&self) -> Result<()> {
        self.db.flush_async().await?;
        Ok(())
    }
}
