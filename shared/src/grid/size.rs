//! Canonical apparel size order

use std::cmp::Ordering;

/// Known sizes, smallest first: (code, chest measure)
pub const CANONICAL_SIZES: [(&str, u32); 6] = [
    ("XS", 36),
    ("S", 38),
    ("M", 40),
    ("L", 42),
    ("XL", 44),
    ("2XL", 46),
];

/// Trimmed, upper-cased size text used for comparisons
pub fn normalize_size(size: &str) -> String {
    size.trim().to_uppercase()
}

/// Position in [`CANONICAL_SIZES`], `None` for sizes outside the known set
///
/// Accepts the full label (`M(40)`) or the bare code (`M`). A bare number
/// such as a waist size `40` is not a canonical size. `XXL` is read as `2XL`.
pub fn size_rank(size: &str) -> Option<usize> {
    let normalized = normalize_size(size);
    let (code, measure) = match normalized.split_once('(') {
        Some((code, rest)) => (code.trim(), rest.trim_end_matches(')').trim()),
        None => (normalized.as_str(), ""),
    };
    let code = if code == "XXL" { "2XL" } else { code };

    CANONICAL_SIZES.iter().position(|(known, chest)| {
        let chest = chest.to_string();
        match (code.is_empty(), measure.is_empty()) {
            (false, false) => *known == code && chest == measure,
            (false, true) => *known == code,
            (true, _) => false,
        }
    })
}

/// Known sizes in canonical order, then unknown sizes lexicographically
pub fn compare_sizes(a: &str, b: &str) -> Ordering {
    match (size_rank(a), size_rank(b)) {
        (Some(ra), Some(rb)) => ra.cmp(&rb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
