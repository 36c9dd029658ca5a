use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog entry mapping a human-readable model name to the identifier of
/// its remote weights artifact. The catalog is compiled in and immutable.
#[derive(Debug, Clone, Copy)]
pub struct ModelDescriptor {
    pub name: &'static str,
    pub artifact_id: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Fracture,
    Normal,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Fracture => "Fracture Detected",
            Verdict::Normal => "Normal",
        }
    }
}

/// Outcome of a single forward pass. The confidence measures distance from
/// the 0.5 decision boundary toward the chosen label, so it is always >= 50%.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct InferenceResult {
    pub raw_score: f32,
    pub verdict: Verdict,
}

impl InferenceResult {
    /// Strict `>` on the boundary: a score of exactly 0.5 is Normal.
    pub fn from_score(raw_score: f32) -> Self {
        let verdict = if raw_score > 0.5 {
            Verdict::Fracture
        } else {
            Verdict::Normal
        };
        Self { raw_score, verdict }
    }

    pub fn confidence_percent(&self) -> f32 {
        let toward_label = match self.verdict {
            Verdict::Fracture => self.raw_score,
            Verdict::Normal => 1.0 - self.raw_score,
        };
        toward_label * 100.0
    }

    pub fn confidence_display(&self) -> String {
        format!("{:.1}%", self.confidence_percent())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub name: String,
    pub age: String,
    #[serde(default)]
    pub gender: String,
    pub id: String,
    #[serde(default)]
    pub allergies: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedicationEntry {
    pub name: String,
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub instructions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicianRecord {
    pub name: String,
    pub specialty: String,
    pub license: String,
    #[serde(default)]
    pub contact: String,
}

/// A validated, ready-to-render prescription. Produced by form validation;
/// the document builder assumes every field here is complete.
#[derive(Debug, Clone, Serialize)]
pub struct Prescription {
    pub id: String,
    pub issued_at: DateTime<Utc>,
    pub patient: PatientRecord,
    pub diagnosis: String,
    pub medications: Vec<MedicationEntry>,
    pub instructions: String,
    pub physician: PhysicianRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fracture_above_boundary() {
        let result = InferenceResult::from_score(0.82);
        assert_eq!(result.verdict, Verdict::Fracture);
        assert_eq!(result.verdict.label(), "Fracture Detected");
        assert_eq!(result.confidence_display(), "82.0%");
    }

    #[test]
    fn normal_below_boundary() {
        let result = InferenceResult::from_score(0.10);
        assert_eq!(result.verdict, Verdict::Normal);
        assert_eq!(result.verdict.label(), "Normal");
        assert_eq!(result.confidence_display(), "90.0%");
    }

    #[test]
    fn boundary_is_normal() {
        let result = InferenceResult::from_score(0.5);
        assert_eq!(result.verdict, Verdict::Normal);
        assert_eq!(result.confidence_percent(), 50.0);
    }

    #[test]
    fn confidence_never_below_half() {
        for score in [0.0, 0.25, 0.5, 0.51, 0.75, 1.0] {
            let result = InferenceResult::from_score(score);
            assert!(result.confidence_percent() >= 50.0, "score {}", score);
        }
    }
}
