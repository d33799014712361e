//! Text normalization used by the per-example correctness rules

/// Suffixes stripped by [`stem_minimal`], tried in order
const STEM_SUFFIXES: [&str; 4] = ["ing", "ed", "es", "s"];

/// Minimum stem length left behind after stripping a suffix
const MIN_STEM_CHARS: usize = 3;

/// Lowercase, keep alphanumerics and whitespace, trim.
///
/// Lowercasing comes first: it can emit combining marks (`İ` becomes `i`
/// plus U+0307) that the filter must see.
pub fn normalize_text(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    kept.trim().to_string()
}

/// Normalize, then strip at most one inflectional suffix.
///
/// The suffix is only removed if at least three characters remain.
pub fn stem_minimal(text: &str) -> String {
    let out = normalize_text(text);
    let len = out.chars().count();
    for suffix in STEM_SUFFIXES {
        if out.ends_with(suffix) && len >= suffix.len() + MIN_STEM_CHARS {
            return out[..out.len() - suffix.len()].trim().to_string();
        }
    }
    out
}

/// Split a comma-separated list, dropping blank entries, and stem each term.
pub fn stemmed_terms(list: &str) -> Vec<String> {
    list.split(',')
        .filter(|term| !term.trim().is_empty())
        .map(stem_minimal)
        .collect()
}
