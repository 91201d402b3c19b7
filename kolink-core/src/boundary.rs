//! Hangul word-boundary heuristic for short matches
//!
//! A match of one or two characters sitting between two Hangul characters is
//! most likely part of a longer word ("시" inside "아시아") and is dropped.
//! This is a heuristic, not tokenization: it can also drop a real standalone
//! word at a Hangul/Hangul boundary.

/// Longest match length, in characters, that the heuristic applies to
pub const SHORT_MATCH_MAX_LEN: usize = 2;

/// Hangul syllables and compatibility jamo
#[inline]
pub fn is_hangul(ch: char) -> bool {
    matches!(ch, '\u{AC00}'..='\u{D7A3}' | '\u{3131}'..='\u{318E}')
}

/// Whether the candidate `[start, end)` of `chars` is embedded in a longer Hangul word
///
/// Only candidates of at most [`SHORT_MATCH_MAX_LEN`] characters can be
/// embedded. Text edges count as non-Hangul.
#[inline]
pub fn is_embedded(chars: &[char], start: usize, end: usize) -> bool {
    if end - start > SHORT_MATCH_MAX_LEN {
        return false;
    }
    let before = start.checked_sub(1).and_then(|index| chars.get(index));
    let after = chars.get(end);
    matches!((before, after), (Some(&b), Some(&a)) if is_hangul(b) && is_hangul(a))
}
