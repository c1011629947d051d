// lib/src/storage_engine/user_storage.rs

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use sled::{Db, Tree};

use models::{NewUser, User};

use super::storage_utils::{deserialize_record, id_key, next_id, serialize_record};
use crate::errors::{MediAlertError, Result};

#[async_trait]
pub trait UserStorageEngine: Send + Sync + 'static {
    /// Adds a new user. Fails with `AlreadyExists` if the email is taken.
    async fn add_user(&self, new_user: &NewUser, password_hash: String) -> Result<User>;
    /// Retrieves a user by email, ignoring case.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Retrieves a user by their numeric ID.
    async fn get_user_by_id(&self, id: u64) -> Result<Option<User>>;
}

/// Sled-backed implementation of the `UserStorageEngine` trait.
/// Users live in the "users" tree; "user_emails" maps email to id.
pub struct SledUserStorage {
    db: Db,
    users: Tree,
    emails: Tree,
}

impl SledUserStorage {
    pub fn new(db: &Db) -> Result<Self> {
        Ok(Self {
            db: db.clone(),
            users: db.open_tree("users")?,
            emails: db.open_tree("user_emails")?,
        })
    }

    /// Runs `insert` for a freshly claimed email. On failure the claim is
    /// dropped again so the email stays free for a later registration.
    fn insert_or_release<F>(&self, key: &[u8], id: u64, insert: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        if let Err(e) = insert() {
            warn!("Storing user {} failed, releasing its email: {}", id, e);
            let _ = self.emails.compare_and_swap(key, Some(&id_key(id)[..]), None::<&[u8]>)?;
            return Err(e);
        }
        Ok(())
    }
}

fn email_key(email: &str) -> Vec<u8> {
    email.trim().to_lowercase().into_bytes()
}

#[async_trait]
impl UserStorageEngine for SledUserStorage {
    async fn add_user(&self, new_user: &NewUser, password_hash: String) -> Result<User> {
        let id = next_id(&self.db)?;
        let key = email_key(&new_user.email);

        // Claim the email first so two concurrent registrations cannot both win.
        let claimed = self
            .emails
            .compare_and_swap(&key, None::<&[u8]>, Some(id_key(id).to_vec()))?;
        if claimed.is_err() {
            debug!("Registration rejected, email already present: {}", new_user.email);
            return Err(MediAlertError::AlreadyExists("Email already registered".to_string()));
        }

        let user = User {
            id,
            email: new_user.email.trim().to_string(),
            phone: new_user.phone.clone(),
            full_name: new_user.full_name.clone(),
            age: new_user.age,
            gender: new_user.gender.clone(),
            password_hash,
            created_at: Utc::now(),
        };
        self.insert_or_release(&key, id, || {
            self.users.insert(id_key(id), serialize_record(&user)?)?;
            Ok(())
        })?;
        info!("Stored user {}", id);
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        match self.emails.get(email_key(email))? {
            Some(id_bytes) => {
                let id_bytes = <[u8; 8]>::try_from(&id_bytes[..])
                    .map_err(|_| MediAlertError::StorageError("Corrupt email index entry".to_string()))?;
                self.get_user_by_id(u64::from_be_bytes(id_bytes)).await
            }
            None => Ok(None),
        }
    }

    async fn get_user_by_id(&self, id: u64) -> Result<Option<User>> {
        self.users
            .get(id_key(id))?
            .map(|bytes| deserialize_record(&bytes))
            .transpose()
    }
}
