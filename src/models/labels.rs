use chrono::{Datelike, Local, Month};

/// Canonical form for crop and district keys: trimmed and lowercased.
pub fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Canonical form for stage and soil labels.
///
/// `sandy_loam`, `Sandy-Loam` and ` sandy  loam ` all become `sandy loam`.
pub fn normalize_label(s: &str) -> String {
    s.to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// "dakshina kannada" -> "Dakshina Kannada"
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a month from its number (1-12), full name or three-letter abbreviation.
pub fn parse_month(s: &str) -> Option<Month> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u8>() {
        return Month::try_from(n).ok();
    }
    s.parse::<Month>().ok()
}

/// Parse a full English month name, case-insensitively. Numbers and abbreviations are rejected.
pub fn parse_month_name(s: &str) -> Option<Month> {
    let s = s.trim();
    s.parse::<Month>()
        .ok()
        .filter(|month| month.name().eq_ignore_ascii_case(s))
}

pub fn current_month() -> Month {
    let month = Local::now().month();
    // chrono months are always 1-12
    Month::try_from(month as u8).unwrap_or(Month::January)
}
