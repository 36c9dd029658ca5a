use bs_core::{Error, MedicationEntry, PatientRecord, PhysicianRecord, Prescription, Result};
use chrono::Utc;
use serde::Deserialize;

/// The observed form exposes three medication rows.
pub const MAX_MEDICATIONS: usize = 3;

/// Raw form input as submitted by the client. Validation happens here, at
/// the caller boundary; the document builder assumes complete input.
#[derive(Debug, Clone, Deserialize)]
pub struct PrescriptionForm {
    pub patient: PatientRecord,
    pub diagnosis: String,
    #[serde(default)]
    pub medications: Vec<MedicationEntry>,
    #[serde(default)]
    pub instructions: String,
    pub physician: PhysicianRecord,
}

impl PrescriptionForm {
    /// Check required fields, filter out unused medication rows and stamp
    /// the prescription with a time-derived identifier.
    pub fn validate(self) -> Result<Prescription> {
        let mut missing = Vec::new();
        if self.patient.name.trim().is_empty() {
            missing.push("patient name");
        }
        if self.patient.age.trim().is_empty() {
            missing.push("patient age");
        }
        if self.patient.id.trim().is_empty() {
            missing.push("patient id");
        }
        if self.diagnosis.trim().is_empty() {
            missing.push("diagnosis");
        }
        if self.physician.name.trim().is_empty() {
            missing.push("doctor name");
        }
        if self.physician.specialty.trim().is_empty() {
            missing.push("specialty");
        }
        if self.physician.license.trim().is_empty() {
            missing.push("license number");
        }
        if !missing.is_empty() {
            return Err(Error::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        // Rows without a name or dosage are unused form slots, not errors.
        let medications: Vec<MedicationEntry> = self
            .medications
            .into_iter()
            .filter(|m| !m.name.trim().is_empty() && !m.dosage.trim().is_empty())
            .collect();
        if medications.is_empty() {
            return Err(Error::Validation(
                "at least one medication with a name and dosage is required".to_string(),
            ));
        }
        if medications.len() > MAX_MEDICATIONS {
            return Err(Error::Validation(format!(
                "at most {} medications are supported",
                MAX_MEDICATIONS
            )));
        }

        let mut patient = self.patient;
        if patient.allergies.trim().is_empty() {
            patient.allergies = "None".to_string();
        }

        let issued_at = Utc::now();
        Ok(Prescription {
            id: format!("RX-{}", issued_at.format("%Y%m%d%H%M%S")),
            issued_at,
            patient,
            diagnosis: self.diagnosis,
            medications,
            instructions: self.instructions,
            physician: self.physician,
        })
    }
}
