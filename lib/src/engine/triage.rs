// lib/src/engine/triage.rs

//! Symptom-to-severity classification.
//!
//! Matching is substring containment on lower-cased text, so a needle such as
//! `"difficulty breath"` also fires on `"Difficulty breathing since noon"`.
//! The weights and thresholds below are heuristics with no clinical
//! validation behind them; they are kept as-is for behavioural compatibility.

use models::{SeverityTier, SeverityVerdict};

/// Any of these alone forces an ambulance call.
pub const CRITICAL_KEYWORDS: [&str; 8] = [
    "chest pain",
    "difficulty breathing",
    "severe bleeding",
    "loss of consciousness",
    "choking",
    "severe allergic reaction",
    "unconscious",
    "difficulty breath",
];

/// Each symptom matching one of these adds `WARNING_WEIGHT` to the score.
pub const WARNING_KEYWORDS: [&str; 10] = [
    "fever",
    "cough",
    "severe headache",
    "dizziness",
    "severe nausea",
    "fracture",
    "burns",
    "vomiting",
    "seizure",
    "head injury",
];

const WARNING_WEIGHT: f64 = 2.0;
const PAIN_DIVISOR: f64 = 10.0;

const RED_SCORE: f64 = 6.0;
const RED_PAIN: i32 = 8;
const YELLOW_SCORE: f64 = 3.0;
const YELLOW_PAIN: i32 = 5;

struct Guidance {
    tier: SeverityTier,
    action: &'static str,
    recommendation: &'static str,
    estimated_response: &'static str,
    phone: &'static str,
}

impl Guidance {
    fn verdict(&self) -> SeverityVerdict {
        SeverityVerdict {
            tier: self.tier,
            action: self.action.to_string(),
            recommendation: self.recommendation.to_string(),
            estimated_response: self.estimated_response.to_string(),
            phone: self.phone.to_string(),
        }
    }
}

const CRITICAL_OVERRIDE: Guidance = Guidance {
    tier: SeverityTier::Red,
    action: "CALL AMBULANCE NOW",
    recommendation: "This is a medical emergency. Call 112 immediately.",
    estimated_response: "5-8 minutes",
    phone: "112",
};

const SCORED_GUIDANCE: [Guidance; 3] = [
    Guidance {
        tier: SeverityTier::Red,
        action: "Go to nearest hospital urgently",
        recommendation: "Visit emergency room immediately. Your symptoms require urgent evaluation.",
        estimated_response: "10-15 minutes",
        phone: "112",
    },
    Guidance {
        tier: SeverityTier::Yellow,
        action: "See doctor within hours",
        recommendation: "Schedule a consultation with a doctor today. Monitor your symptoms carefully.",
        estimated_response: "Book within 2-4 hours",
        phone: "Call hospital",
    },
    Guidance {
        tier: SeverityTier::Green,
        action: "Monitor at home",
        recommendation: "Get rest, stay hydrated, and monitor symptoms. Most conditions improve within 24-48 hours.",
        estimated_response: "Continue observation",
        phone: "Call if worsens",
    },
];

fn scored_guidance(tier: SeverityTier) -> &'static Guidance {
    match tier {
        SeverityTier::Red => &SCORED_GUIDANCE[0],
        SeverityTier::Yellow => &SCORED_GUIDANCE[1],
        SeverityTier::Green => &SCORED_GUIDANCE[2],
    }
}

fn contains_any(symptom: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| symptom.contains(needle))
}

fn age_risk(age: i32) -> f64 {
    if age > 65 {
        1.5
    } else if age > 45 {
        1.3
    } else {
        1.0
    }
}

/// Weighted score used when no critical keyword is present.
///
/// `count * age_risk + pain_rating / 10 + warnings * 2`, where `warnings` is
/// the number of symptoms matching at least one warning keyword.
pub fn score_symptoms<S: AsRef<str>>(symptoms: &[S], age: i32, pain_rating: i32) -> f64 {
    let warning_count = symptoms
        .iter()
        .filter(|s| contains_any(&s.as_ref().to_lowercase(), &WARNING_KEYWORDS))
        .count();

    symptoms.len() as f64 * age_risk(age)
        + f64::from(pain_rating) / PAIN_DIVISOR
        + warning_count as f64 * WARNING_WEIGHT
}

fn tier_for(score: f64, pain_rating: i32) -> SeverityTier {
    if score >= RED_SCORE || pain_rating >= RED_PAIN {
        SeverityTier::Red
    } else if score >= YELLOW_SCORE || pain_rating >= YELLOW_PAIN {
        SeverityTier::Yellow
    } else {
        SeverityTier::Green
    }
}

/// Classifies a symptom report. Never fails; inputs are not range-checked.
pub fn classify<S: AsRef<str>>(symptoms: &[S], age: i32, pain_rating: i32) -> SeverityVerdict {
    let critical = symptoms
        .iter()
        .any(|s| contains_any(&s.as_ref().to_lowercase(), &CRITICAL_KEYWORDS));
    if critical {
        return CRITICAL_OVERRIDE.verdict();
    }

    let score = score_symptoms(symptoms, age, pain_rating);
    scored_guidance(tier_for(score, pain_rating)).verdict()
}
