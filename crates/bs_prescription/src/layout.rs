use bs_core::Prescription;

pub const TABLE_COLUMNS: [&str; 5] = [
    "Medication",
    "Dosage",
    "Frequency",
    "Duration",
    "Instructions",
];

/// Column x offsets in millimetres from the left margin. Fixed constants,
/// like everything else about the page.
pub const COLUMN_OFFSETS: [f32; 5] = [0.0, 45.0, 75.0, 105.0, 135.0];

/// Maximum characters per wrapped body line at the fixed body font size.
const WRAP_WIDTH: usize = 95;

/// One drawable unit of the fixed document layout, in render order. Keeping
/// this explicit makes the section structure checkable without parsing the
/// emitted PDF.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Heading(String),
    Text(String),
    TableHeader,
    TableRow([String; 5]),
    Separator,
    SignatureLine,
    Spacer,
}

/// Build the fixed section sequence: title, timestamp and identifier,
/// patient panel, diagnosis, medication table, additional instructions,
/// physician panel, signature line.
pub fn layout(prescription: &Prescription) -> Vec<Block> {
    let mut blocks = vec![
        Block::Title("MEDICAL PRESCRIPTION".to_string()),
        Block::Text(format!(
            "Date: {}",
            prescription.issued_at.format("%Y-%m-%d %H:%M UTC")
        )),
        Block::Text(format!("Prescription ID: {}", prescription.id)),
        Block::Separator,
        Block::Heading("Patient Information".to_string()),
        Block::Text(format!("Name: {}", prescription.patient.name)),
        Block::Text(format!(
            "Age: {}    Gender: {}",
            prescription.patient.age, prescription.patient.gender
        )),
        Block::Text(format!("Patient ID: {}", prescription.patient.id)),
        Block::Text(format!("Allergies: {}", prescription.patient.allergies)),
        Block::Spacer,
        Block::Heading("Diagnosis".to_string()),
    ];
    blocks.extend(wrapped(&prescription.diagnosis));
    blocks.push(Block::Spacer);

    blocks.push(Block::Heading("Medications".to_string()));
    blocks.push(Block::TableHeader);
    for med in &prescription.medications {
        blocks.push(Block::TableRow([
            med.name.clone(),
            med.dosage.clone(),
            med.frequency.clone(),
            med.duration.clone(),
            med.instructions.clone(),
        ]));
    }
    blocks.push(Block::Spacer);

    blocks.push(Block::Heading("Additional Instructions".to_string()));
    if prescription.instructions.trim().is_empty() {
        blocks.push(Block::Text("None".to_string()));
    } else {
        blocks.extend(wrapped(&prescription.instructions));
    }
    blocks.push(Block::Spacer);

    blocks.push(Block::Heading("Physician".to_string()));
    blocks.push(Block::Text(format!(
        "{} ({})",
        prescription.physician.name, prescription.physician.specialty
    )));
    blocks.push(Block::Text(format!(
        "License: {}",
        prescription.physician.license
    )));
    if !prescription.physician.contact.trim().is_empty() {
        blocks.push(Block::Text(format!(
            "Contact: {}",
            prescription.physician.contact
        )));
    }
    blocks.push(Block::Spacer);
    blocks.push(Block::SignatureLine);
    blocks
}

/// Greedy word wrap into Text blocks. Words that cannot fit on any line are
/// split so nothing gets drawn past the right page edge.
fn wrapped(text: &str) -> Vec<Block> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word = word;
        while word.len() > WRAP_WIDTH {
            if !current.is_empty() {
                lines.push(Block::Text(std::mem::take(&mut current)));
            }
            let mut split = WRAP_WIDTH;
            while !word.is_char_boundary(split) {
                split -= 1;
            }
            let (head, tail) = word.split_at(split);
            lines.push(Block::Text(head.to_string()));
            word = tail;
        }
        if !current.is_empty() && current.len() + 1 + word.len() > WRAP_WIDTH {
            lines.push(Block::Text(std::mem::take(&mut current)));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(Block::Text(current));
    }
    lines
}
