// models/src/medical/emergency_contact.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmergencyContact {
    pub contact_name: String,
    pub contact_phone: String,
    pub relationship: String,
}

impl NewEmergencyContact {
    pub fn validate(&self) -> ValidationResult<()> {
        if self.contact_name.trim().is_empty() {
            return Err(ValidationError::EmptyField("contact_name"));
        }
        if self.contact_phone.trim().is_empty() {
            return Err(ValidationError::EmptyField("contact_phone"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub id: u64,
    pub user_id: u64,
    pub contact_name: String,
    pub contact_phone: String,
    pub relationship: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl EmergencyContact {
    pub fn from_new(id: u64, user_id: u64, new_contact: NewEmergencyContact) -> Self {
        Self {
            id,
            user_id,
            contact_name: new_contact.contact_name,
            contact_phone: new_contact.contact_phone,
            relationship: new_contact.relationship,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
