//! Greeting text composition.
//!
//! Title-casing is deliberately locale-naive: word boundaries come from a
//! fixed character classification and each word's first letter gets a simple
//! one-to-one upper-case mapping.

use crate::User;

/// Composes `"<Title Cased Greeting>, <username>! You are a great <role>!"`.
pub fn compose(greeting: &str, user: &User) -> String {
    format!(
        "{}, {}! You are a great {}!",
        title_case(greeting),
        user.username(),
        user.role()
    )
}

/// Upper-cases the first letter of every word and leaves the rest untouched.
pub fn title_case(text: &str) -> String {
    let mut prev = ' ';
    text.chars()
        .map(|c| {
            let out = if is_separator(prev) { to_title(c) } else { c };
            prev = c;
            out
        })
        .collect()
}

fn is_separator(c: char) -> bool {
    if c.is_ascii() {
        return !(c.is_ascii_alphanumeric() || c == '_');
    }
    if c.is_alphabetic() || c.is_numeric() {
        return false;
    }
    c.is_whitespace()
}

// Latin digraphs have a distinct titlecase form (U+01C5 'ǅ', not 'Ǆ').
// Multi-character expansions (e.g. 'ß' -> "SS") keep the original letter.
fn to_title(c: char) -> char {
    match c {
        '\u{01C4}'..='\u{01C6}' => return '\u{01C5}',
        '\u{01C7}'..='\u{01C9}' => return '\u{01C8}',
        '\u{01CA}'..='\u{01CC}' => return '\u{01CB}',
        '\u{01F1}'..='\u{01F3}' => return '\u{01F2}',
        _ => {}
    }

    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => c,
    }
}
