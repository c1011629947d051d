// lib/src/storage_engine/assessment_storage.rs

use async_trait::async_trait;
use log::info;
use sled::{Db, Tree};

use models::{Assessment, NewAssessment};

use super::storage_utils::{deserialize_record, id_key, next_id, serialize_record};
use crate::errors::Result;

#[async_trait]
pub trait AssessmentStorageEngine: Send + Sync + 'static {
    /// Assigns an id and creation time, then stores the assessment.
    async fn insert_assessment(&self, assessment: NewAssessment) -> Result<Assessment>;
    async fn get_assessment(&self, id: u64) -> Result<Option<Assessment>>;
}

pub struct SledAssessmentStorage {
    db: Db,
    tree: Tree,
}

impl SledAssessmentStorage {
    pub fn new(db: &Db) -> Result<Self> {
        Ok(Self { db: db.clone(), tree: db.open_tree("assessments")? })
    }
}

#[async_trait]
impl AssessmentStorageEngine for SledAssessmentStorage {
    async fn insert_assessment(&self, assessment: NewAssessment) -> Result<Assessment> {
        let id = next_id(&self.db)?;
        let assessment = Assessment::from_new(id, assessment);
        self.tree.insert(id_key(id), serialize_record(&assessment)?)?;
        info!("Stored assessment {} with severity {}", id, assessment.severity_level());
        Ok(assessment)
    }

    async fn get_assessment(&self, id: u64) -> Result<Option<Assessment>> {
        self.tree
            .get(id_key(id))?
            .map(|bytes| deserialize_record(&bytes))
            .transpose()
    }
}
