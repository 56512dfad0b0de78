//! Text helpers shared by the locator, the gate and the markdown renderer.

/// Length in Unicode scalar values, not bytes
///
/// Every content threshold in this crate is a character count.
#[inline]
#[must_use]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Total length of the fragments once each is trimmed, with no separators
///
/// Region thresholds are measured this way, so the newlines `join_trimmed_lines`
/// puts between fragments never count towards them.
#[must_use]
pub fn stripped_len<'a, I>(fragments: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    fragments.into_iter().map(|f| char_len(f.trim())).sum()
}

/// Join text fragments into lines, trimming each line and dropping blanks
///
/// Fragments are joined with `\n` first, so a fragment containing its own
/// line breaks is split as well.
#[must_use]
pub fn join_trimmed_lines<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    for fragment in fragments {
        for line in fragment.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(line);
        }
    }
    out
}

/// Safely truncate a string to a maximum number of characters
///
/// Used for log previews; never splits a multi-byte character.
#[inline]
#[must_use]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}
