//! Reference code tally
//!
//! Counts how often each reference code occurs across one chart. The tally
//! is an ordinary value: cells report the codes they saw and the converter
//! merges them in, so nothing outlives a single run.

use indexmap::IndexMap;

/// Occurrence count per reference code, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(transparent))]
pub struct ReferenceTally {
    counts: IndexMap<String, usize>,
}

impl ReferenceTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `code`
    pub fn record(&mut self, code: &str) {
        *self.counts.entry(code.to_string()).or_insert(0) += 1;
    }

    /// Count every code in `codes`
    pub fn extend<I, S>(&mut self, codes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for code in codes {
            self.record(code.as_ref());
        }
    }

    /// Add the counts of another tally
    pub fn merge(&mut self, other: ReferenceTally) {
        for (code, count) in other.counts {
            *self.counts.entry(code).or_insert(0) += count;
        }
    }

    pub fn count(&self, code: &str) -> usize {
        self.counts.get(code).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Total number of occurrences
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// `(code, count)` pairs sorted by code, for the legend
    pub fn sorted(&self) -> Vec<(String, usize)> {
        let mut entries: Vec<(String, usize)> = self
            .counts
            .iter()
            .map(|(code, count)| (code.clone(), *count))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl<S: AsRef<str>> FromIterator<S> for ReferenceTally {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tally = ReferenceTally::new();
        tally.extend(iter);
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let tally: ReferenceTally = ["a", "b", "a"].into_iter().collect();
        assert_eq!(tally.count("a"), 2);
        assert_eq!(tally.count("b"), 1);
        assert_eq!(tally.count("c"), 0);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_sorted_by_code() {
        let tally: ReferenceTally = ["T", "A", "T", "M"].into_iter().collect();
        assert_eq!(
            tally.sorted(),
            vec![
                ("A".to_string(), 1),
                ("M".to_string(), 1),
                ("T".to_string(), 2)
            ]
        );
    }

    #[test]
    fn test_merge() {
        let mut left: ReferenceTally = ["a"].into_iter().collect();
        let right: ReferenceTally = ["a", "b"].into_iter().collect();
        left.merge(right);
        assert_eq!(left.count("a"), 2);
        assert_eq!(left.count("b"), 1);
        assert_eq!(left.len(), 2);
    }
}
