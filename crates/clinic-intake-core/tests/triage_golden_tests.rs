//! Golden tests for the priority classifier.
//!
//! Each case is a raw answer document as the clinical wizard posts it.

use clinic_intake_core::models::Priority;
use clinic_intake_core::triage::{PriorityClassifier, TriageRule};
use serde_json::{json, Value};

/// Test case from golden file.
struct GoldenCase {
    id: &'static str,
    answers: Value,
    expected_priority: Priority,
    expected_rule: Option<TriageRule>,
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "empty-document",
            answers: json!({}),
            expected_priority: Priority::Low,
            expected_rule: None,
        },
        GoldenCase {
            id: "empty-sections",
            answers: json!({
                "generalData": {},
                "consultationReason": {"reason": ""},
                "bodyMap": [],
                "mtc": {"onset": "Crónico"},
                "tongue": []
            }),
            expected_priority: Priority::Low,
            expected_rule: None,
        },
        GoldenCase {
            id: "severe-knee",
            answers: json!({
                "bodyMap": [
                    {"bodyPart": "rodilla-derecha", "painType": "punzante", "intensity": 8,
                     "duration": "3 días", "view": "front"}
                ]
            }),
            expected_priority: Priority::High,
            expected_rule: Some(TriageRule::SevereIntensity),
        },
        GoldenCase {
            id: "severe-overrides-digestive",
            answers: json!({
                "consultationReason": {"reason": "Náuseas y acidez"},
                "bodyMap": [{"bodyPart": "cabeza", "intensity": 10}],
                "mtc": {"onset": "Agudo"}
            }),
            expected_priority: Priority::High,
            expected_rule: Some(TriageRule::SevereIntensity),
        },
        GoldenCase {
            id: "lumbar-seven",
            answers: json!({"bodyMap": [{"bodyPart": "lumbar", "intensity": 7}]}),
            expected_priority: Priority::High,
            expected_rule: Some(TriageRule::LumbarIntensity),
        },
        GoldenCase {
            id: "lumbar-seven-from-form-input",
            answers: json!({"bodyMap": [{"bodyPart": "lumbar", "intensity": "7", "view": "back"}]}),
            expected_priority: Priority::High,
            expected_rule: Some(TriageRule::LumbarIntensity),
        },
        GoldenCase {
            id: "reason-as-bare-string",
            answers: json!({"consultationReason": "acidez"}),
            expected_priority: Priority::Low,
            expected_rule: None,
        },
        GoldenCase {
            id: "lumbar-six",
            answers: json!({"bodyMap": [{"bodyPart": "lumbar", "intensity": 6}]}),
            expected_priority: Priority::Medium,
            expected_rule: Some(TriageRule::ModerateIntensity),
        },
        GoldenCase {
            id: "lower-back-ui-id-seven",
            answers: json!({"bodyMap": [{"bodyPart": "espalda-inferior", "intensity": 7, "view": "back"}]}),
            expected_priority: Priority::Medium,
            expected_rule: Some(TriageRule::ModerateIntensity),
        },
        GoldenCase {
            id: "moderate-five",
            answers: json!({"bodyMap": [
                {"bodyPart": "cuello", "intensity": 2},
                {"bodyPart": "hombro", "intensity": 5}
            ]}),
            expected_priority: Priority::Medium,
            expected_rule: Some(TriageRule::ModerateIntensity),
        },
        GoldenCase {
            id: "digestion-keyword",
            answers: json!({"consultationReason": {"reason": "Tengo problemas de digestión"}}),
            expected_priority: Priority::Medium,
            expected_rule: Some(TriageRule::DigestiveOrAcute),
        },
        GoldenCase {
            id: "uppercase-keyword",
            answers: json!({"consultationReason": {"reason": "MOLESTIAS INTESTINALES"}}),
            expected_priority: Priority::Medium,
            expected_rule: Some(TriageRule::DigestiveOrAcute),
        },
        GoldenCase {
            id: "keyword-without-accent",
            answers: json!({"consultationReason": {"reason": "nauseas por la mañana"}}),
            expected_priority: Priority::Low,
            expected_rule: None,
        },
        GoldenCase {
            id: "acute-onset-only",
            answers: json!({"mtc": {"onset": "Agudo"}}),
            expected_priority: Priority::Medium,
            expected_rule: Some(TriageRule::DigestiveOrAcute),
        },
        GoldenCase {
            id: "acute-onset-lowercase",
            answers: json!({"mtc": {"onset": "agudo"}}),
            expected_priority: Priority::Low,
            expected_rule: None,
        },
        GoldenCase {
            id: "mild-pain-chronic",
            answers: json!({
                "consultationReason": {"reason": "Dolor de cuello"},
                "bodyMap": [{"bodyPart": "cuello", "intensity": 3}],
                "mtc": {"temperature": "Frío", "timing": "Noche", "fullness": "Vacío", "onset": "Crónico"},
                "tongue": ["pálida"]
            }),
            expected_priority: Priority::Low,
            expected_rule: None,
        },
        GoldenCase {
            id: "string-intensity",
            answers: json!({"bodyMap": [{"bodyPart": "tobillo", "intensity": "9"}]}),
            expected_priority: Priority::High,
            expected_rule: Some(TriageRule::SevereIntensity),
        },
        GoldenCase {
            id: "garbage-sections",
            answers: json!({"bodyMap": {"intensity": 10}, "mtc": "Agudo", "consultationReason": []}),
            expected_priority: Priority::Low,
            expected_rule: None,
        },
    ]
}

#[test]
fn test_golden_cases() {
    let classifier = PriorityClassifier::new();
    let mut failures = Vec::new();

    for case in get_golden_cases() {
        let result = classifier.classify_value(&case.answers);
        if result.priority != case.expected_priority || result.rule != case.expected_rule {
            failures.push(format!(
                "[{}] expected {:?} via {:?}, got {:?} via {:?}",
                case.id, case.expected_priority, case.expected_rule, result.priority, result.rule
            ));
        }
    }

    assert!(failures.is_empty(), "Golden test failures:\n{}", failures.join("\n"));
}

#[test]
fn test_classification_is_idempotent() {
    let classifier = PriorityClassifier::new();
    for case in get_golden_cases() {
        let first = classifier.classify_value(&case.answers);
        let second = classifier.classify_value(&case.answers);
        assert_eq!(first, second, "[{}] not idempotent", case.id);
    }
}
