//! Clause-range compression
//!
//! Clause markers name the rows a clause points at (`19a`, `19b`, ...). A set
//! of targets is shown as one bracketed label: a single id, a contiguous
//! `first-last` range, or a comma list in the order the author wrote them.

use fxhash::FxHashSet;
use std::cmp::Ordering;

/// A parsed `<number><letter>` clause identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClauseId {
    pub number: u32,
    pub letter: char,
}

impl ClauseId {
    /// Parse `19a`; anything else (no digits, no letter, extra text) is `None`
    pub fn parse(id: &str) -> Option<Self> {
        let id = id.trim();
        let digits_end = id.find(|c: char| !c.is_ascii_digit())?;
        if digits_end == 0 {
            return None;
        }
        let number = id[..digits_end].parse().ok()?;

        let mut rest = id[digits_end..].chars();
        let letter = rest.next().filter(|c| c.is_alphabetic())?;
        if rest.next().is_some() {
            return None;
        }
        Some(ClauseId { number, letter })
    }

    /// Whether `next` is the very next clause of the same number
    pub fn is_followed_by(&self, next: &ClauseId) -> bool {
        self.number == next.number && char::from_u32(self.letter as u32 + 1) == Some(next.letter)
    }
}

impl Ord for ClauseId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number
            .cmp(&other.number)
            .then(self.letter.cmp(&other.letter))
    }
}

impl PartialOrd for ClauseId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compressed, unbracketed form of `targets`; `None` when there are none
///
/// Duplicates are dropped, keeping the first occurrence.
pub fn compress_targets<S: AsRef<str>>(targets: &[S]) -> Option<String> {
    let mut seen = FxHashSet::default();
    let unique: Vec<&str> = targets
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty() && seen.insert(*t))
        .collect();

    match unique.as_slice() {
        [] => None,
        [single] => Some(single.to_string()),
        _ => match contiguous_run(&unique) {
            Some((first, last)) => Some(format!("{}-{}", first, last)),
            None => Some(unique.join(",")),
        },
    }
}

/// Bracketed display label for a clause target set
pub fn clause_label<S: AsRef<str>>(targets: &[S]) -> Option<String> {
    compress_targets(targets).map(|inner| format!("[{}]", inner))
}

/// Ends of the run when every id parses and the sorted ids leave no gap
fn contiguous_run<'a>(ids: &[&'a str]) -> Option<(&'a str, &'a str)> {
    let mut parsed: Vec<(ClauseId, &str)> = ids
        .iter()
        .map(|id| ClauseId::parse(id).map(|p| (p, *id)))
        .collect::<Option<_>>()?;
    parsed.sort_by(|a, b| a.0.cmp(&b.0));

    let unbroken = parsed.windows(2).all(|w| w[0].0.is_followed_by(&w[1].0));
    if !unbroken {
        return None;
    }

    let first = parsed.first()?.1;
    let last = parsed.last()?.1;
    Some((first, last))
}
