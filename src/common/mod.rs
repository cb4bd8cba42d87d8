//! Small string helpers shared by the trigger detector and the insertion engine.
//!
//! All offsets are char offsets. Hosts report cursor positions in chars, so
//! nothing here works on raw byte indices except [`byte_offset`].

/// Case-insensitive `ends_with`.
pub fn ends_with_ci(s: &str, suffix: &str) -> bool {
    let suffix_len = suffix.chars().count();
    let len = s.chars().count();
    if suffix_len > len {
        return false;
    }
    let tail = &s[byte_offset(s, len - suffix_len)..];
    eq_ci(tail, suffix)
}

/// Char offset of the last case-insensitive occurrence of `needle`.
pub fn rfind_ci(haystack: &str, needle: &str) -> Option<usize> {
    let hay: Vec<char> = haystack.chars().collect();
    let pat: Vec<char> = needle.chars().collect();
    if pat.is_empty() || pat.len() > hay.len() {
        return None;
    }
    (0..=hay.len() - pat.len())
        .rev()
        .find(|&start| {
            hay[start..start + pat.len()]
                .iter()
                .zip(&pat)
                .all(|(a, b)| char_eq_ci(*a, *b))
        })
}

/// Case-insensitive substring test used by the picker filter.
pub fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || haystack.to_lowercase().contains(needle_lower)
}

/// Convert a char offset into a byte offset, clamping to the end of `s`.
pub fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map(|(i, _)| i).unwrap_or(s.len())
}

/// Replace `remove` chars starting at char offset `at` with `insert`.
///
/// Both `at` and `remove` are clamped to the text.
pub fn splice_chars(s: &str, at: usize, remove: usize, insert: &str) -> String {
    let start = byte_offset(s, at);
    let end = byte_offset(s, at.saturating_add(remove));
    let mut out = String::with_capacity(s.len() + insert.len());
    out.push_str(&s[..start]);
    out.push_str(insert);
    out.push_str(&s[end..]);
    out
}

fn eq_ci(a: &str, b: &str) -> bool {
    a.chars().count() == b.chars().count() && a.chars().zip(b.chars()).all(|(x, y)| char_eq_ci(x, y))
}

fn char_eq_ci(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}
