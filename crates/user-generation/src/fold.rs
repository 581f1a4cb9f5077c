//! ASCII folding for email local parts.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Letters that have no canonical decomposition onto ASCII.
const TRANSLITERATIONS: &[(char, &str)] = &[
    ('æ', "ae"),
    ('Æ', "AE"),
    ('œ', "oe"),
    ('Œ', "OE"),
    ('ß', "sz"),
    ('ø', "o"),
    ('Ø', "O"),
    ('đ', "d"),
    ('Đ', "D"),
    ('ł', "l"),
    ('Ł', "L"),
    ('þ', "t"),
    ('Þ', "T"),
    ('ð', "d"),
    ('Ð', "D"),
    ('ı', "i"),
];

/// Folds `input` onto ASCII.
///
/// The text is canonically decomposed, combining marks are dropped, the
/// letters in the transliteration table are spelled out and any remaining
/// non-ASCII character is removed. The result is stable under a second
/// application.
///
/// ```
/// use user_generation::ascii_fold;
///
/// assert_eq!(ascii_fold("zoltán.kovács"), "zoltan.kovacs");
/// assert_eq!(ascii_fold("weiß"), "weisz");
/// ```
#[must_use]
pub fn ascii_fold(input: &str) -> String {
    let mut folded = String::with_capacity(input.len());
    for ch in input.nfd().filter(|ch| !is_combining_mark(*ch)) {
        if ch.is_ascii() {
            folded.push(ch);
        } else if let Some((_, replacement)) =
            TRANSLITERATIONS.iter().find(|(from, _)| *from == ch)
        {
            folded.push_str(replacement);
        }
    }
    folded
}
