//! Token joining and parenthesis cleanup

use lazy_static::lazy_static;
use regex::Regex;

use super::token::Token;

lazy_static! {
    static ref SPACE_BEFORE_CLOSE: Regex = Regex::new(r"\s+\)").unwrap();
    static ref SPACE_AFTER_OPEN: Regex = Regex::new(r"\(\s+").unwrap();
}

/// Join tokens with single spaces, honouring their suppression flags
pub fn join_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    // No leading space before the first token
    let mut glue_next = true;

    for token in tokens {
        if !glue_next && !token.suppress_space_before {
            out.push(' ');
        }
        out.push_str(&token.text);
        glue_next = token.suppress_space_after;
    }

    cleanup_parens(&out)
}

/// Drop whitespace just inside parentheses; idempotent
pub fn cleanup_parens(text: &str) -> String {
    let text = SPACE_BEFORE_CLOSE.replace_all(text, ")");
    SPACE_AFTER_OPEN.replace_all(&text, "(").into_owned()
}
