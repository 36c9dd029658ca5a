pub mod error;
pub mod recommend;
pub mod types;

pub use error::Error;
pub use types::{
    InferenceResult, MedicationEntry, ModelDescriptor, PatientRecord, PhysicianRecord,
    Prescription, Verdict,
};
pub type Result<T> = std::result::Result<T, Error>;
