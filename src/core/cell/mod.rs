//! Cell Content Interpreter
//!
//! Turns the structured children of one chart cell into a display string.
//!
//! # Architecture
//!
//! ```text
//! Cell children -> Tokenizer -> Pairing Resolver -> Spacer/Joiner -> text
//!                      |
//!                      +-> codes, clause targets (side data)
//! ```
//!
//! Ordering rules enforced here:
//! - a word is followed by its own gloss when word and gloss counts agree,
//!   otherwise all glosses are bundled after the last word;
//! - gloss material always comes before reference codes;
//! - the clause label sits where the first clause marker was.
//!
//! # Example
//!
//! ```rust
//! use textchart::core::cell::interpret_cell;
//! use textchart::core::source::{Cell, CellChild};
//!
//! let cell = Cell::new(vec![
//!     CellChild::Reference("T".into()),
//!     CellChild::Word("kuma".into()),
//! ])
//! .with_glosses(["go"]);
//! assert_eq!(interpret_cell(&cell).text, "kuma (go) (T)");
//! ```

mod pairing;
mod spacer;
mod token;
mod tokenizer;


// Re-export public API
pub use pairing::{apply_pairing, gloss_bundle, Pairing};
pub use spacer::{cleanup_parens, join_tokens};
pub use token::{Token, TokenKind};
pub use tokenizer::{interpret_cell, CellContent, CellInterpreter};
