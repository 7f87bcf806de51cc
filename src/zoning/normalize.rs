//! Canonical zoning keys from raw codes.

/// Raw codes that only say "some urban development program" and need the
/// descriptive text to pick a subtype.
pub const GENERIC_MARKERS: &[&str] = &["PDU", "PROGRAMAS", "ZONA URBANA"];

pub const PDU_EQUIPMENT: &str = "PDU_ER";
pub const PDU_PARTIAL: &str = "PDU_PP";
pub const PDU_RURAL: &str = "PDU_PR";
pub const PDU_URBAN: &str = "PDU_ZU";

/// Keyword sets checked in order; the first set with a hit decides the subtype.
const PDU_SUBTYPES: &[(&[&str], &str)] = &[
    (&["equipamiento"], PDU_EQUIPMENT),
    (&["parcial"], PDU_PARTIAL),
    (&["poblad", "rural", "habitacional"], PDU_RURAL),
    (&["urbana", "urbano", "barrio"], PDU_URBAN),
];

/// Normalize a raw zoning code into its canonical key.
///
/// The code is trimmed and upper-cased. Generic markers are resolved to a
/// PDU subtype from `descriptive_text` (case-insensitive). A marker with no
/// matching keyword is returned unresolved. Any other code is already canonical.
pub fn normalize_key(raw_clave: &str, descriptive_text: Option<&str>) -> String {
    let clave = raw_clave.trim().to_uppercase();

    if !GENERIC_MARKERS.contains(&clave.as_str()) {
        return clave;
    }

    let text = descriptive_text.unwrap_or_default().to_lowercase();
    PDU_SUBTYPES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| text.contains(kw)))
        .map(|(_, subtype)| subtype.to_string())
        .unwrap_or(clave)
}

/// Urban development program keys, resolved or not. No activity catalog exists for them.
pub fn is_pdu_key(key: &str) -> bool {
    key == "PDU" || key.starts_with("PDU_")
}
