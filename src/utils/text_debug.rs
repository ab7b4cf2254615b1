// src/utils/text_debug.rs
use std::fs;
use std::path::Path;
use crate::utils::error::StorageError;

/// Saves extracted report text with bracketed markers around the highlighted spans.
pub fn save_debug_text(text: &str, path: &Path, highlights: &[(usize, usize, &str)]) -> Result<(), StorageError> {
    let mut annotated = String::with_capacity(text.len() + highlights.len() * 32);

    let mut last_pos = 0;
    let mut sorted_highlights = highlights.to_vec();
    sorted_highlights.sort_by_key(|h| h.0); // Sort by position

    for (start, end, label) in sorted_highlights {
        // Overlapping spans are dropped, the earlier one is kept
        if start < last_pos {
            continue;
        }
        annotated.push_str(&text[last_pos..start]);
        annotated.push_str(&format!("[[{} @{}-{}]]", label, start, end));
        annotated.push_str(&text[start..end]);
        annotated.push_str(&format!("[[/{}]]", label));
        last_pos = end;
    }

    if last_pos < text.len() {
        annotated.push_str(&text[last_pos..]);
    }

    fs::write(path, annotated)?;

    tracing::debug!("Saved annotated text to {}", path.display());
    Ok(())
}

/// Writes the raw extracted text plus an annotated copy where every occurrence
/// of each `(literal, label)` marker is highlighted.
pub fn create_debug_text(text: &str, debug_dir: &Path, stem: &str, markers: &[(&str, &str)]) -> Result<(), StorageError> {
    fs::create_dir_all(debug_dir)?;

    let raw_path = debug_dir.join(format!("{}.txt", stem));
    fs::write(&raw_path, text)?;

    let mut highlights = Vec::new();
    for (literal, label) in markers {
        if literal.is_empty() {
            continue;
        }
        for (start, matched) in text.match_indices(literal) {
            highlights.push((start, start + matched.len(), *label));
        }
    }

    save_debug_text(text, &debug_dir.join(format!("{}_annotated.txt", stem)), &highlights)
}
