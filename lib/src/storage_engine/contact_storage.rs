// lib/src/storage_engine/contact_storage.rs

use async_trait::async_trait;
use log::info;
use sled::{Db, Tree};

use models::{EmergencyContact, NewEmergencyContact};

use super::storage_utils::{deserialize_record, id_key, next_id, owned_key, serialize_record};
use crate::errors::Result;

#[async_trait]
pub trait ContactStorageEngine: Send + Sync + 'static {
    async fn add_contact(&self, user_id: u64, contact: NewEmergencyContact) -> Result<EmergencyContact>;
    /// Contacts belonging to `user_id`, oldest first.
    async fn list_contacts(&self, user_id: u64) -> Result<Vec<EmergencyContact>>;
}

/// Contacts are keyed by (user id, contact id) so one user's list is a prefix scan.
pub struct SledContactStorage {
    db: Db,
    tree: Tree,
}

impl SledContactStorage {
    pub fn new(db: &Db) -> Result<Self> {
        Ok(Self { db: db.clone(), tree: db.open_tree("emergency_contacts")? })
    }
}

#[async_trait]
impl ContactStorageEngine for SledContactStorage {
    async fn add_contact(&self, user_id: u64, contact: NewEmergencyContact) -> Result<EmergencyContact> {
        let id = next_id(&self.db)?;
        let contact = EmergencyContact::from_new(id, user_id, contact);
        self.tree.insert(owned_key(user_id, id), serialize_record(&contact)?)?;
        info!("Added emergency contact {} for user {}", id, user_id);
        Ok(contact)
    }

    async fn list_contacts(&self, user_id: u64) -> Result<Vec<EmergencyContact>> {
        self.tree
            .scan_prefix(id_key(user_id))
            .map(|item| {
                let (_key, value) = item?;
                deserialize_record(&value)
            })
            .collect()
    }
}
