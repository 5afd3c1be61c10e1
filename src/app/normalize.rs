//! Column label normalization
//!
//! Raw catalog CSVs carry headers like `"Hospital Name (CCN)"`. Downstream
//! tooling wants stable snake_case identifiers, so every header is passed
//! through [`normalize_column`] before the table is written out.

/// Normalize a raw column label into a canonical snake_case identifier.
///
/// The transformation, in order:
/// 1. characters that are neither alphanumeric nor whitespace are removed
///    (input underscores count as separators and survive as at most one `_`),
/// 2. whitespace runs become a single underscore,
/// 3. everything is lowercased,
/// 4. consecutive underscores are collapsed,
/// 5. leading and trailing underscores are trimmed.
///
/// Total and deterministic; never fails. Idempotent: normalizing an already
/// normalized label returns it unchanged.
///
/// Known limitation: two distinct raw labels can normalize to the same
/// identifier (e.g. `"Rate %"` and `"Rate #"` both become `"rate"`). No
/// disambiguation is applied; duplicate headers are written as-is.
pub fn normalize_column(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    let mut pending_separator = false;

    for c in raw.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !normalized.is_empty() {
                normalized.push('_');
            }
            pending_separator = false;
            for lower in c.to_lowercase() {
                normalized.push(lower);
            }
        } else if c.is_whitespace() || c == '_' {
            pending_separator = true;
        }
        // Any other character is punctuation: dropped without acting as a
        // separator, so "Name(CCN)" becomes "nameccn".
    }

    normalized
}
