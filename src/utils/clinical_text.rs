// ============================================================================
// CLINICAL TEXT - Narrativa cronológica a partir de la HCE anidada
// ============================================================================

use chrono::{NaiveDate, NaiveDateTime};
use crate::models::hce::{HceEntry, HceHistory};
use crate::utils::text::parse_datetime;

/// La entrada trae hora explícita si tiene separador de tiempo
fn has_time(raw: &str) -> bool {
    raw.contains('T') || raw.trim().contains(' ')
}

fn entry_line(entry: &HceEntry, time: Option<String>) -> String {
    let mut line = String::new();
    if let Some(time) = time {
        line.push_str(&format!("[{}] ", time));
    }
    line.push_str(entry.tipo.trim());
    if let Some(autor) = entry.autor.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        line.push_str(&format!(" ({})", autor));
    }
    line.push_str(": ");
    line.push_str(entry.texto.trim());
    line
}

/// Arma el texto agrupado por día, en orden cronológico ascendente.
///
/// Dentro de un mismo instante se respeta el orden original. Las entradas
/// sin texto se omiten; las de fecha ilegible van al final bajo "Sin fecha".
pub fn build_grouped_clinical_text(history: &HceHistory) -> String {
    let mut dated: Vec<(NaiveDateTime, bool, &HceEntry)> = Vec::new();
    let mut undated: Vec<&HceEntry> = Vec::new();

    for entry in history.all_entries().filter(|e| !e.texto.trim().is_empty()) {
        match parse_datetime(&entry.fecha) {
            Some(dt) => dated.push((dt, has_time(&entry.fecha), entry)),
            None => undated.push(entry),
        }
    }
    // sort_by_key es estable
    dated.sort_by_key(|(dt, _, _)| *dt);

    let mut blocks: Vec<String> = Vec::new();
    let mut current_day: Option<NaiveDate> = None;
    let mut lines: Vec<String> = Vec::new();

    for (dt, with_time, entry) in dated {
        let day = dt.date();
        if current_day != Some(day) {
            if let Some(prev) = current_day {
                blocks.push(day_block(&prev.format("%d/%m/%Y").to_string(), &lines));
                lines.clear();
            }
            current_day = Some(day);
        }
        let time = with_time.then(|| dt.format("%H:%M").to_string());
        lines.push(entry_line(entry, time));
    }
    if let Some(day) = current_day {
        blocks.push(day_block(&day.format("%d/%m/%Y").to_string(), &lines));
    }

    if !undated.is_empty() {
        let lines: Vec<String> = undated.iter().map(|e| entry_line(e, None)).collect();
        blocks.push(day_block("Sin fecha", &lines));
    }

    blocks.join("\n\n")
}

fn day_block(title: &str, lines: &[String]) -> String {
    format!("=== {} ===\n{}", title, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hce::HceAdmission;

    fn entry(fecha: &str, tipo: &str, autor: Option<&str>, texto: &str) -> HceEntry {
        HceEntry {
            fecha: fecha.into(),
            tipo: tipo.into(),
            autor: autor.map(Into::into),
            texto: texto.into(),
            seccion: None,
        }
    }

    #[test]
    fn groups_by_day_in_chronological_order() {
        let history = HceHistory {
            patient_id: "p1".into(),
            admissions: vec![HceAdmission {
                fecha_ingreso: Some("2024-03-01".into()),
                servicio: Some("Clínica Médica".into()),
                entries: vec![
                    entry("2024-03-02T09:00:00", "Evolución", Some("Dr. Ruiz"), "Afebril."),
                    entry("2024-03-01T22:15:00", "Ingreso", None, "Fiebre y tos."),
                    entry("2024-03-02T08:00:00", "Enfermería", Some("Lic. Sosa"), "Signos estables."),
                ],
            }],
            entries: vec![entry("2024-03-01T23:00:00", "Laboratorio", None, "PCR 12 mg/dl")],
        };

        let text = build_grouped_clinical_text(&history);
        let expected = "=== 01/03/2024 ===\n\
            [22:15] Ingreso: Fiebre y tos.\n\
            [23:00] Laboratorio: PCR 12 mg/dl\n\n\
            === 02/03/2024 ===\n\
            [08:00] Enfermería (Lic. Sosa): Signos estables.\n\
            [09:00] Evolución (Dr. Ruiz): Afebril.";
        assert_eq!(text, expected);
    }

    #[test]
    fn skips_blank_text_and_keeps_undated_last() {
        let history = HceHistory {
            patient_id: "p1".into(),
            admissions: vec![],
            entries: vec![
                entry("sin-fecha", "Nota", None, "Texto suelto"),
                entry("2024-01-05", "Epicrisis", None, "   "),
                entry("2024-01-05", "Alta", None, "Alta médica"),
            ],
        };
        let text = build_grouped_clinical_text(&history);
        assert_eq!(text, "=== 05/01/2024 ===\nAlta: Alta médica\n\n=== Sin fecha ===\nNota: Texto suelto");
    }

    #[test]
    fn accepts_rfc3339_with_zone() {
        let dt = parse_datetime("2024-03-01T10:30:00-03:00").unwrap();
        assert_eq!(dt.format("%H:%M").to_string(), "10:30");
        assert!(parse_datetime("ayer").is_none());
    }

    #[test]
    fn empty_history_renders_empty_text() {
        let history = HceHistory { patient_id: "p1".into(), admissions: vec![], entries: vec![] };
        assert!(build_grouped_clinical_text(&history).is_empty());
    }
}
