//! Clinical wizard answer document.
//!
//! Answers arrive as untrusted JSON. Parsing never fails: each section is read
//! on its own, and a section (or body-map entry) with the wrong shape is
//! dropped rather than rejecting the whole document.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Free-form patient details (name, age, occupation...). Not used for triage.
pub type GeneralData = Map<String, Value>;

/// Which side of the body map a point was placed on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BodyView {
    Front,
    Back,
}

/// A single recorded pain location.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BodyPainPoint {
    /// Body-map region identifier (e.g. "espalda-inferior")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_part: Option<String>,
    /// Kind of pain (e.g. "punzante", "sordo")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pain_type: Option<String>,
    /// Pain intensity on a 0-10 scale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<BodyView>,
}

impl BodyPainPoint {
    /// Create a point with a body part and intensity.
    pub fn new(body_part: &str, intensity: f64) -> Self {
        Self {
            body_part: Some(body_part.into()),
            intensity: Some(intensity),
            ..Default::default()
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            body_part: str_field(obj, "bodyPart"),
            pain_type: str_field(obj, "painType"),
            intensity: number_field(obj, "intensity"),
            duration: str_field(obj, "duration"),
            view: match obj.get("view").and_then(Value::as_str) {
                Some("front") => Some(BodyView::Front),
                Some("back") => Some(BodyView::Back),
                _ => None,
            },
        })
    }

    /// Whether the recorded intensity is at least `threshold`.
    pub fn intensity_at_least(&self, threshold: f64) -> bool {
        self.intensity.is_some_and(|i| i >= threshold)
    }
}

/// Why the patient is consulting.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConsultationReason {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ConsultationReason {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            reason: str_field(obj, "reason"),
        })
    }
}

/// Traditional Chinese Medicine classifiers, one binary axis each.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MtcProfile {
    /// Cold / heat ("Frío" / "Calor")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
    /// Day / night ("Día" / "Noche")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<String>,
    /// Fullness / emptiness ("Plenitud" / "Vacío")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullness: Option<String>,
    /// Acute / chronic ("Agudo" / "Crónico")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onset: Option<String>,
}

impl MtcProfile {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            temperature: str_field(obj, "temperature"),
            timing: str_field(obj, "timing"),
            fullness: str_field(obj, "fullness"),
            onset: str_field(obj, "onset"),
        })
    }
}

/// Structured answers of a clinical wizard submission.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalWizardAnswers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_data: Option<GeneralData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consultation_reason: Option<ConsultationReason>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub body_map: Vec<BodyPainPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtc: Option<MtcProfile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tongue: Vec<String>,
}

impl ClinicalWizardAnswers {
    /// Read an answer document, keeping whatever sections are well formed.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let body_map = obj
            .get("bodyMap")
            .and_then(Value::as_array)
            .map(|points| points.iter().filter_map(BodyPainPoint::from_value).collect())
            .unwrap_or_default();

        let tongue = obj
            .get("tongue")
            .and_then(Value::as_array)
            .map(|marks| {
                marks
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            general_data: obj.get("generalData").and_then(Value::as_object).cloned(),
            consultation_reason: obj
                .get("consultationReason")
                .and_then(ConsultationReason::from_value),
            body_map,
            mtc: obj.get("mtc").and_then(MtcProfile::from_value),
            tongue,
        }
    }

    /// Consultation free text, if any.
    pub fn reason_text(&self) -> Option<&str> {
        self.consultation_reason
            .as_ref()
            .and_then(|c| c.reason.as_deref())
    }

    /// Recorded MTC onset, if any.
    pub fn onset(&self) -> Option<&str> {
        self.mtc.as_ref().and_then(|m| m.onset.as_deref())
    }

    /// Convert back into a JSON document.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl<'de> Deserialize<'de> for ClinicalWizardAnswers {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

fn str_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Numbers may arrive as JSON numbers or numeric strings from form inputs.
fn number_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_document() {
        let doc = json!({
            "generalData": {"name": "Ana", "age": 42},
            "consultationReason": {"reason": "Dolor de espalda"},
            "bodyMap": [
                {"bodyPart": "espalda-inferior", "painType": "punzante", "intensity": 6,
                 "duration": "2 semanas", "view": "back"}
            ],
            "mtc": {"temperature": "Frío", "timing": "Noche", "fullness": "Vacío", "onset": "Crónico"},
            "tongue": ["pálida", "saburra blanca"]
        });

        let answers = ClinicalWizardAnswers::from_value(&doc);
        assert_eq!(answers.reason_text(), Some("Dolor de espalda"));
        assert_eq!(answers.body_map.len(), 1);
        assert_eq!(answers.body_map[0].view, Some(BodyView::Back));
        assert_eq!(answers.body_map[0].intensity, Some(6.0));
        assert_eq!(answers.onset(), Some("Crónico"));
        assert_eq!(answers.tongue.len(), 2);
        assert_eq!(answers.general_data.unwrap()["name"], "Ana");
    }

    #[test]
    fn test_non_object_is_empty() {
        assert_eq!(ClinicalWizardAnswers::from_value(&json!(null)), ClinicalWizardAnswers::default());
        assert_eq!(ClinicalWizardAnswers::from_value(&json!([1, 2])), ClinicalWizardAnswers::default());
        assert_eq!(ClinicalWizardAnswers::from_value(&json!("text")), ClinicalWizardAnswers::default());
    }

    #[test]
    fn test_malformed_sections_are_dropped_independently() {
        let doc = json!({
            "consultationReason": 17,
            "bodyMap": [
                "not a point",
                {"bodyPart": "hombro", "intensity": "8"},
                {"bodyPart": "rodilla", "intensity": "severe"}
            ],
            "mtc": "Agudo",
            "tongue": ["roja", 3]
        });

        let answers = ClinicalWizardAnswers::from_value(&doc);
        assert!(answers.consultation_reason.is_none());
        assert!(answers.mtc.is_none());
        assert_eq!(answers.body_map.len(), 2);
        assert_eq!(answers.body_map[0].intensity, Some(8.0));
        assert_eq!(answers.body_map[1].intensity, None);
        assert_eq!(answers.tongue, vec!["roja".to_string()]);
    }

    #[test]
    fn test_reason_must_be_an_object() {
        let answers = ClinicalWizardAnswers::from_value(&json!({"consultationReason": "Acidez"}));
        assert!(answers.consultation_reason.is_none());
        assert_eq!(answers.reason_text(), None);
    }

    #[test]
    fn test_typed_document_reads_back() {
        let answers = ClinicalWizardAnswers {
            consultation_reason: Some(ConsultationReason {
                reason: Some("Náuseas".into()),
            }),
            body_map: vec![BodyPainPoint::new("lumbar", 7.0)],
            mtc: Some(MtcProfile {
                onset: Some("Agudo".into()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let value = answers.to_value();
        assert_eq!(value["bodyMap"][0]["bodyPart"], "lumbar");
        assert!(value.get("tongue").is_none());

        let parsed: ClinicalWizardAnswers = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, answers);
    }
}
