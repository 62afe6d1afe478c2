// Splits free text into the words a speller is asked about.
//
// Only the ASCII punctuation below, ASCII digits and whitespace separate
// words. Apostrophes, Unicode punctuation and anything else stay inside the
// token, so "don't" or "«quoted»" reach the speller as a single word.

const SEPARATORS: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`', '~',
    '(', ')',
];

/// ASCII control whitespace, the Unicode space separators, line and
/// paragraph separators, and the byte-order mark. Unlike
/// `char::is_whitespace`, U+FEFF splits words and U+0085 does not.
fn is_space(ch: char) -> bool {
    matches!(
        ch,
        '\t' | '\n'
            | '\u{0b}'
            | '\u{0c}'
            | '\r'
            | ' '
            | '\u{a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
    )
}

fn is_separator(ch: char) -> bool {
    is_space(ch) || ch.is_ascii_digit() || SEPARATORS.contains(&ch)
}

/// Candidate words of `text`, left to right. Tokens shorter than two
/// characters are dropped.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(is_separator)
        .filter(|token| token.chars().nth(1).is_some())
        .collect()
}
