use crate::types::Verdict;

/// Static recommendation templates shown alongside a verdict. These are
/// advisory text only; the tool is not a diagnostic device.
pub fn recommendations(verdict: Verdict) -> &'static [&'static str] {
    match verdict {
        Verdict::Fracture => &[
            "Consult an orthopedic specialist immediately",
            "Immobilize the affected area",
            "Avoid putting weight on the injured limb",
            "Apply ice to reduce swelling if appropriate",
        ],
        Verdict::Normal => &[
            "If pain persists, consult a healthcare provider",
            "Consider follow-up imaging if symptoms worsen",
            "Practice proper bone health with calcium and vitamin D",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_verdicts_have_recommendations() {
        assert!(!recommendations(Verdict::Fracture).is_empty());
        assert!(!recommendations(Verdict::Normal).is_empty());
    }
}
