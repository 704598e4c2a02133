use std::io::{self, IsTerminal};

use owo_colors::OwoColorize;

use crate::pharmacy::MedicineRecord;
use crate::pharmacy::language::{Language, Notice};

pub(crate) fn stdout_is_terminal() -> bool {
    io::stdout().is_terminal()
}

fn heading(label: &str, color: bool) -> String {
    if color {
        label.bold().green().to_string()
    } else {
        label.to_string()
    }
}

fn list(out: &mut String, label: &str, items: &[String], color: bool) {
    out.push_str(&heading(label, color));
    out.push('\n');
    if items.is_empty() {
        out.push_str("  -\n");
    }
    for item in items {
        out.push_str("  - ");
        out.push_str(item);
        out.push('\n');
    }
}

/// Plain-text card for one medicine, ending with the disclaimer.
pub(crate) fn medicine_card(record: &MedicineRecord, language: Language, color: bool) -> String {
    let mut out = String::new();
    let title = if color {
        record.name.bold().to_string()
    } else {
        record.name.clone()
    };
    out.push_str(&title);
    out.push('\n');
    out.push_str(&record.description);
    out.push_str("\n\n");

    for (label, value) in [
        ("Purpose", &record.purpose),
        ("How it works", &record.action),
        ("Dosage", &record.dosage),
    ] {
        out.push_str(&heading(&format!("{label}:"), color));
        out.push(' ');
        out.push_str(value);
        out.push('\n');
    }
    out.push('\n');

    list(&mut out, "Composition:", &record.composition, color);
    list(&mut out, "Side effects:", &record.side_effects, color);
    list(&mut out, "Warnings:", &record.warnings, color);

    out.push('\n');
    let disclaimer = language.notice(Notice::Disclaimer);
    if color {
        out.push_str(&disclaimer.yellow().to_string());
    } else {
        out.push_str(disclaimer);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::medicine_card;
    use crate::pharmacy::{Language, MedicineRecord};

    #[test]
    fn plain_card_lists_every_section() {
        let record = MedicineRecord {
            name: "Crocin".to_string(),
            description: "Fever reducer".to_string(),
            purpose: "Fever".to_string(),
            action: "Acts on the hypothalamus".to_string(),
            dosage: "1 tablet".to_string(),
            composition: vec!["Paracetamol 500 mg".to_string()],
            side_effects: Vec::new(),
            warnings: vec!["Do not exceed 4 g a day".to_string()],
        };

        let card = medicine_card(&record, Language::En, false);
        assert!(card.starts_with("Crocin\nFever reducer\n"));
        assert!(card.contains("How it works: Acts on the hypothalamus"));
        assert!(card.contains("Side effects:\n  -\n"));
        assert!(card.contains("  - Do not exceed 4 g a day\n"));
        assert!(card.ends_with("Always consult a qualified doctor before medication."));
        assert!(!card.contains('\u{1b}'));
    }
}
