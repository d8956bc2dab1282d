//! Token types produced while interpreting a cell

/// What a token stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Gloss,
    Literal,
    /// Reference code, already wrapped in parentheses
    Code,
    /// Compressed clause-marker targets
    Clause,
    RowNumber,
    MoveMarker,
    Note,
}

/// A piece of display text with spacing hints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    pub suppress_space_before: bool,
    pub suppress_space_after: bool,
}

impl Token {
    /// Token with default (single space) separation on both sides
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            text: text.into(),
            kind,
            suppress_space_before: false,
            suppress_space_after: false,
        }
    }

    pub fn word(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Word, text)
    }

    pub fn gloss(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Gloss, text)
    }

    pub fn literal(text: impl Into<String>, no_space_before: bool, no_space_after: bool) -> Self {
        Token {
            suppress_space_before: no_space_before,
            suppress_space_after: no_space_after,
            ..Token::new(TokenKind::Literal, text)
        }
    }

    pub fn code(code: &str) -> Self {
        Token::new(TokenKind::Code, format!("({})", code))
    }

    pub fn clause(display: impl Into<String>) -> Self {
        Token::new(TokenKind::Clause, display)
    }

    /// Synthesized `(` that glues to the text after it
    pub fn open_paren() -> Self {
        Token {
            suppress_space_after: true,
            ..Token::new(TokenKind::Gloss, "(")
        }
    }

    /// Synthesized `)` that glues to the text before it
    pub fn close_paren() -> Self {
        Token {
            suppress_space_before: true,
            ..Token::new(TokenKind::Gloss, ")")
        }
    }

    /// Whether the token is a lexical word that glosses pair with
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }
}
