//! Escape expansion for "extended" search mode.
//!
//! In extended mode the find and replace strings may spell control characters as escapes:
//! `\r`, `\n`, `\t` and `\0`. Any other backslash sequence is kept verbatim.

use std::borrow::Cow;

/// Expand extended-mode escapes in `text`.
pub fn expand_escapes(text: &str) -> Cow<'_, str> {
    if !text.contains('\\') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        let expanded = match chars.peek() {
            Some('r') => Some('\r'),
            Some('n') => Some('\n'),
            Some('t') => Some('\t'),
            Some('0') => Some('\0'),
            _ => None,
        };
        match expanded {
            Some(c) => {
                out.push(c);
                chars.next();
            }
            None => out.push('\\'),
        }
    }

    Cow::Owned(out)
}
