pub mod form;
pub mod layout;
pub mod pdf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bs_core::Prescription;

pub use form::PrescriptionForm;
pub use pdf::render;

/// Inline transport encoding for previews and client-triggered downloads.
pub fn to_data_uri(pdf_bytes: &[u8]) -> String {
    format!("data:application/pdf;base64,{}", STANDARD.encode(pdf_bytes))
}

/// Per-request filename derived from the prescription id.
pub fn suggested_filename(prescription: &Prescription) -> String {
    format!("prescription_{}.pdf", prescription.id)
}
