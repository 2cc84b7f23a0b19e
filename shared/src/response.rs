use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::AnalysisError;

pub const STATUS_CHILD_SCREENED: &str = "child_autism_screened";
pub const STATUS_ADULT_INVALID: &str = "adult_invalid";

/// A successful response body: always a JSON object without an `error` key.
/// Decoding into a typed [`AnalysisOutcome`] happens later, at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResponse(Map<String, Value>);

impl AnalysisResponse {
    pub fn from_value(value: Value) -> Result<Self, AnalysisError> {
        let Value::Object(map) = value else {
            return Err(AnalysisError::InvalidResponse(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        };

        if let Some(error) = map.get("error").filter(|e| !e.is_null()) {
            let detail = match error.as_str().map(str::trim) {
                Some("") => "the service reported an error without details".to_string(),
                Some(text) => text.to_string(),
                None => error.to_string(),
            };
            return Err(AnalysisError::InvalidResponse(detail));
        }

        Ok(Self(map))
    }

    pub fn from_body(body: &str) -> Result<Self, AnalysisError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| AnalysisError::InvalidResponse(format!("body is not valid JSON ({})", e)))?;
        Self::from_value(value)
    }

    pub fn status(&self) -> AnalysisStatus {
        AnalysisStatus::from_wire(self.0.get("status").and_then(Value::as_str).unwrap_or_default())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Turns the loose JSON into the typed outcome for its `status`.
    /// Adult responses never look at `autism_prediction_data`.
    pub fn decode(&self) -> Result<AnalysisOutcome, AnalysisError> {
        let message = self.field::<String>("message")?;

        let outcome = match self.status() {
            AnalysisStatus::ChildAutismScreened => AnalysisOutcome::ChildScreened {
                message,
                age: self.field("age_check_summary")?,
                screening: self.field("autism_prediction_data")?,
            },
            AnalysisStatus::AdultInvalid => AnalysisOutcome::AdultInvalid {
                message,
                age: self.field("age_check_summary")?,
                fallback_image_url: self.field("annotated_image_url")?,
            },
            AnalysisStatus::Other(status) => AnalysisOutcome::Unrecognized { status, message },
        };

        Ok(outcome)
    }

    fn field<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AnalysisError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|e| AnalysisError::Render(format!("field `{}`: {}", key, e))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisStatus {
    ChildAutismScreened,
    AdultInvalid,
    Other(String),
}

impl AnalysisStatus {
    pub fn from_wire(status: &str) -> Self {
        match status {
            STATUS_CHILD_SCREENED => AnalysisStatus::ChildAutismScreened,
            STATUS_ADULT_INVALID => AnalysisStatus::AdultInvalid,
            other => AnalysisStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AnalysisStatus::ChildAutismScreened => STATUS_CHILD_SCREENED,
            AnalysisStatus::AdultInvalid => STATUS_ADULT_INVALID,
            AnalysisStatus::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    ChildScreened {
        message: Option<String>,
        age: Option<AgeCheckSummary>,
        screening: Option<AutismPrediction>,
    },
    AdultInvalid {
        message: Option<String>,
        age: Option<AgeCheckSummary>,
        // Older deployments put the age image at the top level.
        fallback_image_url: Option<String>,
    },
    Unrecognized {
        status: String,
        message: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeCheckSummary {
    #[serde(default)]
    pub annotated_image_url: Option<String>,
    #[serde(default)]
    pub kids_count: u32,
    #[serde(default)]
    pub adults_count: u32,
    #[serde(default)]
    pub annotations: Vec<AgeAnnotation>,
    #[serde(default)]
    pub has_faces: Option<bool>,
}

impl AgeCheckSummary {
    pub fn faces_detected(&self) -> bool {
        self.has_faces
            .unwrap_or(self.kids_count + self.adults_count > 0 || !self.annotations.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeAnnotation {
    pub age: AgeValue,
    #[serde(rename = "box", default)]
    pub bbox: Vec<f64>,
}

/// Age estimators report either a number or a bracket such as "(4-6)".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgeValue {
    Years(f64),
    Bracket(String),
}

impl std::fmt::Display for AgeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgeValue::Years(y) if y.fract() == 0.0 => write!(f, "{}", *y as i64),
            AgeValue::Years(y) => write!(f, "{:.1}", y),
            AgeValue::Bracket(b) => f.write_str(b),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutismPrediction {
    #[serde(default)]
    pub annotated_image_path: Option<String>,
    #[serde(default)]
    pub results: Vec<PredictionEntry>,
}

impl AutismPrediction {
    /// The first verdict entry wins; later ones are ignored.
    pub fn final_decision(&self) -> Option<&str> {
        self.results.iter().find_map(|entry| match entry {
            PredictionEntry::Verdict { final_decision } => Some(final_decision.as_str()),
            _ => None,
        })
    }

    pub fn regions(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.results.iter().filter_map(|entry| match entry {
            PredictionEntry::Region { region, label, confidence } => {
                Some((region.as_str(), label.as_str(), *confidence))
            }
            _ => None,
        })
    }
}

/// One item of `autism_prediction_data.results`. Entries carrying
/// `final_decision` or `region` must be well formed; anything else is kept
/// as `Unknown` and skipped when rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionEntry {
    Verdict {
        final_decision: String,
    },
    Region {
        region: String,
        label: String,
        confidence: f64,
    },
    Unknown(Value),
}

#[derive(Deserialize)]
struct VerdictEntry {
    final_decision: String,
}

#[derive(Deserialize)]
struct RegionEntry {
    region: String,
    label: String,
    #[serde(deserialize_with = "confidence_value")]
    confidence: f64,
}

impl<'de> Deserialize<'de> for PredictionEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let (has_verdict, has_region) = match &value {
            Value::Object(map) => (map.contains_key("final_decision"), map.contains_key("region")),
            _ => (false, false),
        };

        if has_verdict {
            let entry = VerdictEntry::deserialize(value)
                .map_err(|e| serde::de::Error::custom(format!("verdict entry: {}", e)))?;
            Ok(PredictionEntry::Verdict { final_decision: entry.final_decision })
        } else if has_region {
            let entry = RegionEntry::deserialize(value)
                .map_err(|e| serde::de::Error::custom(format!("region entry: {}", e)))?;
            Ok(PredictionEntry::Region {
                region: entry.region,
                label: entry.label,
                confidence: entry.confidence,
            })
        } else {
            Ok(PredictionEntry::Unknown(value))
        }
    }
}

// Accepts 82, 82.5, "82.5" and "82.5%".
fn confidence_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("confidence out of range")),
        Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map_err(serde::de::Error::custom),
        other => Err(serde::de::Error::custom(format!(
            "confidence must be a number, got {}",
            json_kind(&other)
        ))),
    }
}
