//! ASCII character classes shared by the bundled acceptors

pub fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Lowercase letter or underscore
pub fn is_small(c: char) -> bool {
    c.is_ascii_lowercase() || c == '_'
}

pub fn is_large(c: char) -> bool {
    c.is_ascii_uppercase()
}

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Operator characters usable in symbolic names
pub fn is_symbolic(c: char) -> bool {
    matches!(
        c,
        '!' | '#'
            | '$'
            | '%'
            | '&'
            | '*'
            | '+'
            | '.'
            | '/'
            | '<'
            | '='
            | '>'
            | '?'
            | '@'
            | '\\'
            | '^'
            | '|'
            | '-'
            | '~'
            | ':'
    )
}

pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\u{000C}')
}

pub fn is_newline(c: char) -> bool {
    matches!(c, '\r' | '\n' | '\u{000C}')
}
