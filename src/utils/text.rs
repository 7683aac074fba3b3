use std::cmp::Ordering;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Reemplaza vocales acentuadas y letras latinas comunes por su base ASCII
fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' | 'å' => 'a',
        'Á' | 'À' | 'Ä' | 'Â' | 'Ã' | 'Å' => 'A',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'É' | 'È' | 'Ë' | 'Ê' => 'E',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'Ó' | 'Ò' | 'Ö' | 'Ô' | 'Õ' => 'O',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        other => other,
    }
}

/// Minúsculas sin diacríticos. La ñ se conserva: en español es otra letra.
pub fn fold(text: &str) -> String {
    text.chars().map(fold_char).collect::<String>().to_lowercase()
}

/// Normalización de consultas de búsqueda: trim + minúsculas
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Comparación de texto insensible a mayúsculas y acentos.
/// La ñ ordena después de la n, como en el alfabeto español.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    let key = |s: &str| -> Vec<(char, u8)> {
        fold(s)
            .chars()
            .map(|c| match c {
                'ñ' => ('n', 1),
                other => (other, 0),
            })
            .collect()
    };
    key(a).cmp(&key(b))
}

/// `Some(trimmed)` si el texto tiene contenido
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Fecha/hora de los payloads del backend. Acepta RFC 3339, ISO sin zona y solo fecha.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    for fmt in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_removes_accents_and_case() {
        assert_eq!(fold("Fernández"), "fernandez");
        assert_eq!(fold("MUÑOZ"), "muñoz");
    }

    #[test]
    fn compare_is_accent_insensitive() {
        assert_eq!(compare_text("Álvarez", "alvarez"), Ordering::Equal);
        assert_eq!(compare_text("Nuñez", "Nuzzi"), Ordering::Less);
        assert_eq!(compare_text("Muñoz", "Munoz"), Ordering::Greater);
        assert_eq!(compare_text("Muñoz", "Muoz"), Ordering::Less);
    }

    #[test]
    fn non_blank_trims() {
        assert_eq!(non_blank(Some("  x ")).as_deref(), Some("x"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
