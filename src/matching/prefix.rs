use crate::core::types::CodeForm;

/// Letters survey publishers use for suppressed code digits
pub const DEFAULT_MASK_CHARS: &[char] = &['X', 'Y'];

/// Strip the trailing run of mask characters from a normalized code.
///
/// Only a trailing run is removed; a mask letter in the middle of a code is
/// left alone (no published code has one, but the derivation must stay a pure
/// function of the literal string).
#[must_use]
pub fn strip_mask<'a>(code: &'a str, mask_chars: &[char]) -> &'a str {
    code.trim_end_matches(|c: char| mask_chars.contains(&c))
}

/// Derive the lookup prefix for a code that failed exact matching.
///
/// After mask-stripping, a trailing zero run marks an aggregated code and
/// selects exactly one truncation, longest run first:
///
/// - ends in `000` → first 3 characters
/// - ends in `00` → first 4 characters
/// - ends in `0` → first 5 characters
/// - otherwise the mask-stripped string unchanged
#[must_use]
pub fn derive_prefix(code: &str, mask_chars: &[char]) -> String {
    let stripped = strip_mask(code, mask_chars);
    if stripped.ends_with("000") {
        stripped.chars().take(3).collect()
    } else if stripped.ends_with("00") {
        stripped.chars().take(4).collect()
    } else if stripped.ends_with('0') {
        stripped.chars().take(5).collect()
    } else {
        stripped.to_string()
    }
}

/// Check if a code contains a mask character anywhere
#[must_use]
pub fn is_masked(code: &str, mask_chars: &[char]) -> bool {
    code.chars().any(|c| mask_chars.contains(&c))
}

/// Classify a code's surface form from its literal string
#[must_use]
pub fn classify(code: &str, mask_chars: &[char]) -> CodeForm {
    if is_masked(code, mask_chars) {
        CodeForm::Masked
    } else if code.ends_with('0') {
        CodeForm::Aggregated
    } else {
        CodeForm::Detailed
    }
}
