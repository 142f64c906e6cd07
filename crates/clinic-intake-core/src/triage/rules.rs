//! Ordered triage rules.

use crate::models::Priority;

/// Intensity at or above which any pain point is an emergency.
pub const SEVERE_INTENSITY: f64 = 8.0;

/// Intensity at or above which a lumbar pain point is an emergency.
pub const LUMBAR_INTENSITY: f64 = 7.0;

/// Intensity at or above which a pain point needs prompt review.
pub const MODERATE_INTENSITY: f64 = 5.0;

/// Body part matched by the lumbar rule. Compared exactly.
pub const LUMBAR_BODY_PART: &str = "lumbar";

/// MTC onset value that flags an acute presentation.
pub const ACUTE_ONSET: &str = "Agudo";

/// Digestive complaint keywords searched in the consultation reason.
pub const DIGESTIVE_KEYWORDS: [&str; 5] = ["digestión", "estómago", "intestinal", "náuseas", "acidez"];

/// A triage rule. Rules are evaluated in `TriageRule::ORDERED` order and the
/// first one that matches decides the priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriageRule {
    /// Any pain point with intensity >= 8
    SevereIntensity,
    /// A "lumbar" pain point with intensity >= 7
    LumbarIntensity,
    /// Any pain point with intensity >= 5
    ModerateIntensity,
    /// Digestive keyword in the reason, or acute MTC onset
    DigestiveOrAcute,
}

impl TriageRule {
    /// Evaluation order. Severity rules come before symptom rules.
    pub const ORDERED: [TriageRule; 4] = [
        TriageRule::SevereIntensity,
        TriageRule::LumbarIntensity,
        TriageRule::ModerateIntensity,
        TriageRule::DigestiveOrAcute,
    ];

    /// Priority assigned when this rule fires.
    pub fn priority(&self) -> Priority {
        match self {
            TriageRule::SevereIntensity | TriageRule::LumbarIntensity => Priority::High,
            TriageRule::ModerateIntensity | TriageRule::DigestiveOrAcute => Priority::Medium,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TriageRule::SevereIntensity => "severe_intensity",
            TriageRule::LumbarIntensity => "lumbar_intensity",
            TriageRule::ModerateIntensity => "moderate_intensity",
            TriageRule::DigestiveOrAcute => "digestive_or_acute",
        }
    }
}
