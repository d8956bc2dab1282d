//! Word/gloss pairing
//!
//! Decides how a cell's glosses are woven into its lexical tokens. Tokens
//! other than words (literals, the clause token) keep their positions.

use super::token::Token;

/// Arity decision for one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// Same non-zero number of words and glosses: `w1 (g1) w2 (g2)`
    Matched,
    /// Different non-zero counts: `w1 w2 (g1 g2 g3)`
    Mismatched,
    /// Glosses without words: `(g1 g2)`
    GlossOnly,
    /// No glosses: words as they are
    WordsOnly,
}

impl Pairing {
    /// Decide from the word count and the gloss count (empty glosses included)
    pub fn decide(words: usize, glosses: usize) -> Self {
        if glosses == 0 {
            Pairing::WordsOnly
        } else if words == 0 {
            Pairing::GlossOnly
        } else if words == glosses {
            Pairing::Matched
        } else {
            Pairing::Mismatched
        }
    }
}

/// Weave `glosses` into `lexical` according to the pairing rules
pub fn apply_pairing(lexical: Vec<Token>, glosses: &[String]) -> Vec<Token> {
    let word_count = lexical.iter().filter(|t| t.is_word()).count();

    match Pairing::decide(word_count, glosses.len()) {
        Pairing::WordsOnly => lexical,
        Pairing::Matched => {
            let mut out = Vec::with_capacity(lexical.len() + glosses.len() * 3);
            let mut glosses = glosses.iter();
            for token in lexical {
                let is_word = token.is_word();
                out.push(token);
                if !is_word {
                    continue;
                }
                match glosses.next() {
                    Some(gloss) if !gloss.is_empty() => {
                        out.push(Token::open_paren());
                        out.push(Token::gloss(gloss.as_str()));
                        out.push(Token::close_paren());
                    }
                    _ => {}
                }
            }
            out
        }
        Pairing::Mismatched => {
            let last_word = lexical
                .iter()
                .rposition(Token::is_word)
                .unwrap_or(lexical.len());
            let mut out = Vec::with_capacity(lexical.len() + 3);
            for (i, token) in lexical.into_iter().enumerate() {
                out.push(token);
                if i == last_word {
                    out.extend(gloss_bundle(glosses));
                }
            }
            out
        }
        Pairing::GlossOnly => {
            let mut out = lexical;
            out.extend(gloss_bundle(glosses));
            out
        }
    }
}

/// `(` + non-empty glosses + `)`, or nothing when every gloss is empty
pub fn gloss_bundle(glosses: &[String]) -> Vec<Token> {
    let joined = glosses
        .iter()
        .filter(|g| !g.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    if joined.is_empty() {
        return Vec::new();
    }
    vec![Token::open_paren(), Token::gloss(joined), Token::close_paren()]
}
