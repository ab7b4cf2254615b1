// src/mapping/mod.rs
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Company name used for reports whose identifier could not be resolved.
pub const UNKNOWN_COMPANY: &str = "Unknown";

// A CNPJ is 14 ASCII digits; the first run found in the filename wins
static CNPJ_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]{14}").expect("Failed to compile CNPJ_RE")
});

/// Normalized identifier (digits only) -> company display name.
#[derive(Debug, Clone, Default)]
pub struct CompanyMapping {
    entries: BTreeMap<String, String>,
}

impl CompanyMapping {
    /// Parses operator-pasted `name<TAB>identifier` lines.
    ///
    /// Lines that do not split into exactly two tab-separated fields are skipped.
    /// Duplicate identifiers keep the last name seen.
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut entries = BTreeMap::new();

        for (line_no, line) in text.lines().enumerate() {
            if !line.contains('\t') {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            let [name, identifier] = fields.as_slice() else {
                tracing::debug!("Skipping mapping line {}: expected 2 fields, found {}", line_no + 1, fields.len());
                continue;
            };

            let key = normalize_identifier(identifier);
            if let Some(previous) = entries.insert(key.clone(), name.trim().to_string()) {
                tracing::debug!("Identifier {} remapped from '{}' (line {})", key, previous, line_no + 1);
            }
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.entries.get(identifier).map(String::as_str)
    }

    /// Resolves a report filename to `(identifier, company)`.
    /// The company is [`UNKNOWN_COMPANY`] when no identifier is found or it is not mapped.
    pub fn resolve(&self, filename: &str) -> (Option<String>, String) {
        let identifier = extract_identifier(filename);
        let company = identifier
            .as_deref()
            .and_then(|id| self.get(id))
            .unwrap_or(UNKNOWN_COMPANY)
            .to_string();
        (identifier, company)
    }
}

/// Strips every non-digit character.
pub fn normalize_identifier(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// First 14-digit run inside the filename, if any.
pub fn extract_identifier(filename: &str) -> Option<String> {
    CNPJ_RE.find(filename).map(|m| m.as_str().to_string())
}
