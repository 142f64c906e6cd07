//! Priority classifier for clinical wizard answers.
//!
//! A short-circuit rule chain: any red flag escalates, nothing is averaged.
//! Missing or malformed data is "no signal", so classification cannot fail
//! and an empty document is `low`.
//!
//! The lumbar rule compares `bodyPart` against the literal `"lumbar"`. The
//! body-map UI emits region ids such as `"espalda-inferior"`, so in practice
//! only the severity and moderate rules see those points.

mod rules;

pub use rules::*;

use serde_json::Value;

use crate::models::{ClinicalWizardAnswers, Priority};

/// Outcome of classifying one answer document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub priority: Priority,
    /// Rule that fired, `None` when falling through to `low`
    pub rule: Option<TriageRule>,
}

/// Classifier holding the digestive keyword set.
#[derive(Debug, Clone)]
pub struct PriorityClassifier {
    /// Lower-cased keywords matched as substrings of the reason text
    keywords: Vec<String>,
}

impl Default for PriorityClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorityClassifier {
    /// Create a classifier with the default keyword set.
    pub fn new() -> Self {
        Self {
            keywords: DIGESTIVE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Add a keyword to the digestive rule.
    pub fn add_keyword(&mut self, keyword: &str) {
        let keyword = keyword.to_lowercase();
        if !keyword.is_empty() && !self.keywords.contains(&keyword) {
            self.keywords.push(keyword);
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Priority tier for an answer document.
    pub fn classify(&self, answers: &ClinicalWizardAnswers) -> Priority {
        self.evaluate(answers).priority
    }

    /// Priority tier for a raw JSON answer document.
    pub fn classify_value(&self, answers: &Value) -> Classification {
        self.evaluate(&ClinicalWizardAnswers::from_value(answers))
    }

    /// Run the rule chain and report which rule decided the tier.
    pub fn evaluate(&self, answers: &ClinicalWizardAnswers) -> Classification {
        TriageRule::ORDERED
            .iter()
            .find(|rule| self.matches(**rule, answers))
            .map(|rule| Classification {
                priority: rule.priority(),
                rule: Some(*rule),
            })
            .unwrap_or(Classification {
                priority: Priority::Low,
                rule: None,
            })
    }

    /// Whether a single rule matches the document.
    pub fn matches(&self, rule: TriageRule, answers: &ClinicalWizardAnswers) -> bool {
        match rule {
            TriageRule::SevereIntensity => answers
                .body_map
                .iter()
                .any(|p| p.intensity_at_least(SEVERE_INTENSITY)),
            TriageRule::LumbarIntensity => answers.body_map.iter().any(|p| {
                p.body_part.as_deref() == Some(LUMBAR_BODY_PART)
                    && p.intensity_at_least(LUMBAR_INTENSITY)
            }),
            TriageRule::ModerateIntensity => answers
                .body_map
                .iter()
                .any(|p| p.intensity_at_least(MODERATE_INTENSITY)),
            TriageRule::DigestiveOrAcute => {
                self.mentions_keyword(answers.reason_text())
                    || answers.onset() == Some(ACUTE_ONSET)
            }
        }
    }

    fn mentions_keyword(&self, reason: Option<&str>) -> bool {
        let Some(reason) = reason else {
            return false;
        };
        let lower = reason.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}
