// lib/src/engine/assessment.rs

use models::{AssessmentContext, NewAssessment, SymptomReport};

use super::triage::classify;

/// Classifies `report` and bundles the verdict with the report for storage.
///
/// `user_id` of `None` is an anonymous assessment. The verdict is passed
/// through untouched.
pub fn assess(report: SymptomReport, context: AssessmentContext, user_id: Option<u64>) -> NewAssessment {
    let verdict = classify(&report.symptoms, report.age, report.pain_rating);
    NewAssessment { user_id, report, context, verdict }
}
