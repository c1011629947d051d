// models/src/medical/assessment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::medical::triage::{SeverityTier, SeverityVerdict, SymptomReport};

/// Clinical context that travels with a report but plays no part in scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentContext {
    pub medical_history: Option<String>,
    pub current_medications: Option<String>,
    pub allergies: Option<String>,
    pub location_address: Option<String>,
    pub emergency_contacts_to_notify: Option<Vec<u64>>,
}

/// An assessment that has been classified but not yet stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssessment {
    pub user_id: Option<u64>,
    pub report: SymptomReport,
    pub context: AssessmentContext,
    pub verdict: SeverityVerdict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: u64,
    pub user_id: Option<u64>,
    pub report: SymptomReport,
    pub context: AssessmentContext,
    pub verdict: SeverityVerdict,
    pub contacts_notified: bool,
    pub hospital_alert_sent: bool,
    pub created_at: DateTime<Utc>,
}

impl Assessment {
    pub fn from_new(id: u64, new_assessment: NewAssessment) -> Self {
        Self {
            id,
            user_id: new_assessment.user_id,
            report: new_assessment.report,
            context: new_assessment.context,
            verdict: new_assessment.verdict,
            contacts_notified: false,
            hospital_alert_sent: false,
            created_at: Utc::now(),
        }
    }

    pub fn severity_level(&self) -> SeverityTier {
        self.verdict.tier
    }
}
