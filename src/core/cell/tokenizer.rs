//! Cell interpretation
//!
//! Walks one cell's children in document order and turns them into an
//! ordered token stream. The result is a self-contained [`CellContent`]: the
//! reference codes and clause targets a cell observed travel with it instead
//! of being pushed into shared state.

use super::pairing::apply_pairing;
use super::spacer::join_tokens;
use super::token::{Token, TokenKind};
use crate::core::clause::clause_label;
use crate::core::source::{Cell, CellChild, CellRole};
use crate::data::constants::REFERENCE_PLACEHOLDER;

/// Interpretation of a single cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellContent {
    /// Final display text (possibly empty)
    pub text: String,
    /// Token stream the text was joined from
    pub tokens: Vec<Token>,
    pub role: CellRole,
    /// Reference codes in document order, placeholder already substituted
    pub codes: Vec<String>,
    /// Clause-marker targets in document order
    pub clause_targets: Vec<String>,
}

impl CellContent {
    fn blank(role: CellRole) -> Self {
        CellContent {
            text: String::new(),
            tokens: Vec::new(),
            role,
            codes: Vec::new(),
            clause_targets: Vec::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Builder for one cell's interpretation
#[derive(Debug, Clone)]
pub struct CellInterpreter<'a> {
    placeholder: &'a str,
}

impl Default for CellInterpreter<'_> {
    fn default() -> Self {
        CellInterpreter {
            placeholder: REFERENCE_PLACEHOLDER,
        }
    }
}

impl<'a> CellInterpreter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text used for reference codes that have none
    pub fn with_placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Interpret `cell`
    pub fn interpret(&self, cell: &Cell) -> CellContent {
        match cell.role() {
            CellRole::Content => self.interpret_content(cell),
            role => interpret_special(cell, role),
        }
    }

    fn interpret_content(&self, cell: &Cell) -> CellContent {
        let mut lexical: Vec<Token> = Vec::new();
        let mut code_tokens: Vec<Token> = Vec::new();
        let mut codes: Vec<String> = Vec::new();
        let mut targets: Vec<String> = Vec::new();
        let mut clause_slot: Option<usize> = None;

        for child in &cell.children {
            match child {
                CellChild::Word(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        lexical.push(Token::word(text));
                    }
                }
                CellChild::Literal {
                    text,
                    no_space_before,
                    no_space_after,
                } => {
                    let text = text.trim();
                    // Parentheses are synthesized around glosses and codes
                    if !text.is_empty() && text != "(" && text != ")" {
                        lexical.push(Token::literal(text, *no_space_before, *no_space_after));
                    }
                }
                CellChild::Reference(text) => {
                    let code = match text.trim() {
                        "" => self.placeholder,
                        code => code,
                    };
                    code_tokens.push(Token::code(code));
                    codes.push(code.to_string());
                }
                CellChild::ClauseMarker { target, text } => {
                    let target = target
                        .as_deref()
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .or_else(|| Some(text.trim()).filter(|t| !t.is_empty()));
                    if let Some(target) = target {
                        targets.push(target.to_string());
                        clause_slot.get_or_insert(lexical.len());
                    }
                }
                CellChild::RowNumber(_) | CellChild::MoveMarker(_) | CellChild::Note(_) => {}
            }
        }

        if let (Some(slot), Some(label)) = (clause_slot, clause_label(&targets)) {
            lexical.insert(slot, Token::clause(label));
        }

        let glosses: Vec<String> = cell.glosses.iter().map(|g| g.trim().to_string()).collect();
        let mut tokens = apply_pairing(lexical, &glosses);
        // Codes always trail the gloss material
        tokens.extend(code_tokens);

        if tokens.is_empty() {
            if let Some(fallback) = cell.first_literal().map(str::trim).filter(|t| !t.is_empty())
            {
                tokens.push(Token::literal(fallback, false, false));
            }
        }

        CellContent {
            text: join_tokens(&tokens),
            tokens,
            role: CellRole::Content,
            codes,
            clause_targets: targets,
        }
    }
}

/// Row-number, move-marker and note cells: their text, uninterpreted
fn interpret_special(cell: &Cell, role: CellRole) -> CellContent {
    let (kind, text) = match role {
        CellRole::RowNumber => (
            TokenKind::RowNumber,
            cell.children.iter().find_map(|c| match c {
                CellChild::RowNumber(t) => Some(t),
                _ => None,
            }),
        ),
        CellRole::MoveMarker => (
            TokenKind::MoveMarker,
            cell.children.iter().find_map(|c| match c {
                CellChild::MoveMarker(t) => Some(t),
                _ => None,
            }),
        ),
        CellRole::Note => (
            TokenKind::Note,
            cell.children.iter().find_map(|c| match c {
                CellChild::Note(t) => Some(t),
                _ => None,
            }),
        ),
        CellRole::Content => return CellContent::blank(role),
    };

    let text = text.map(|t| t.trim()).unwrap_or_default();
    if text.is_empty() {
        return CellContent::blank(role);
    }

    CellContent {
        text: text.to_string(),
        tokens: vec![Token::new(kind, text)],
        ..CellContent::blank(role)
    }
}

/// Interpret `cell` with the default placeholder
pub fn interpret_cell(cell: &Cell) -> CellContent {
    CellInterpreter::new().interpret(cell)
}
