//! Fuzzy global filter.
//!
//! Every column value of a row is rendered as text and scored against the
//! query. The row keeps the best score of any column; rows scoring
//! [`MatchRank::NoMatch`] are filtered out. Tiers, best first:
//!
//! | Rank | Tier |
//! |---|---|
//! | 7 | case-sensitive equal |
//! | 6 | equal ignoring case |
//! | 5 | starts with |
//! | 4 | a word starts with (words split on space, `-`, `_`) |
//! | 3 | contains |
//! | 2 | acronym: the word initials contain the query |
//! | 1 | subsequence: every query character appears in order |
//! | 0 | no match |
//!
//! All tiers below case-sensitive equality ignore case.
//!
//! Sub rows are scored too. A parent stays visible when it or any of its
//! descendants matches, and only matching sub rows are listed under it.

use serde::Serialize;

use crate::types::Record;

use super::Column;

/// How well a value matches a filter query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum MatchRank {
    NoMatch = 0,
    Subsequence = 1,
    Acronym = 2,
    Contains = 3,
    WordStartsWith = 4,
    StartsWith = 5,
    Equal = 6,
    CaseSensitiveEqual = 7,
}

impl MatchRank {
    /// Whether the value survives the filter.
    pub fn passed(self) -> bool {
        self != MatchRank::NoMatch
    }
}

fn is_word_separator(c: char) -> bool {
    c.is_whitespace() || c == '-' || c == '_'
}

fn acronym(text: &str) -> String {
    text.split(is_word_separator)
        .filter_map(|word| word.chars().next())
        .collect()
}

fn is_subsequence(query: &str, text: &str) -> bool {
    let mut remaining = text.chars();
    query.chars().all(|q| remaining.any(|t| t == q))
}

/// Score one value against a query.
pub fn rank_text(text: &str, query: &str) -> MatchRank {
    if query.is_empty() {
        return MatchRank::StartsWith;
    }
    if text == query {
        return MatchRank::CaseSensitiveEqual;
    }

    let text = text.to_lowercase();
    let query = query.to_lowercase();

    if query.chars().count() > text.chars().count() {
        return MatchRank::NoMatch;
    }
    if text == query {
        return MatchRank::Equal;
    }
    if text.starts_with(&query) {
        return MatchRank::StartsWith;
    }
    if [" ", "-", "_"]
        .iter()
        .any(|sep| text.contains(&format!("{}{}", sep, query)))
    {
        return MatchRank::WordStartsWith;
    }
    if text.contains(&query) {
        return MatchRank::Contains;
    }
    if query.chars().count() > 1 && acronym(&text).contains(&query) {
        return MatchRank::Acronym;
    }
    if is_subsequence(&query, &text) {
        return MatchRank::Subsequence;
    }
    MatchRank::NoMatch
}

/// Best score of any column of `record`.
pub fn rank_record(record: &Record, query: &str) -> MatchRank {
    Column::ALL
        .iter()
        .map(|column| rank_text(&column.text(record), query))
        .max()
        .unwrap_or(MatchRank::NoMatch)
}

/// Best score of `record` or any of its descendants.
pub fn rank_tree(record: &Record, query: &str) -> MatchRank {
    record
        .sub_rows
        .iter()
        .map(|child| rank_tree(child, query))
        .fold(rank_record(record, query), MatchRank::max)
}

/// Whether a filter text filters anything at all.
pub fn is_active(query: &str) -> bool {
    !query.trim().is_empty()
}

/// Rows passing the filter as `(original index, rank)`, in original order.
pub fn filter_rows(rows: &[Record], query: &str) -> Vec<(usize, MatchRank)> {
    let query = query.trim();
    rows.iter()
        .enumerate()
        .map(|(index, record)| {
            let rank = if query.is_empty() {
                MatchRank::CaseSensitiveEqual
            } else {
                rank_tree(record, query)
            };
            (index, rank)
        })
        .filter(|(_, rank)| rank.passed())
        .collect()
}

/// Order filter survivors by rank, best first; ties keep original order.
pub fn order_by_rank(ranked: &mut [(usize, MatchRank)]) {
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers() {
        assert_eq!(rank_text("Kayak", "Kayak"), MatchRank::CaseSensitiveEqual);
        assert_eq!(rank_text("Kayak", "kayak"), MatchRank::Equal);
        assert_eq!(rank_text("Kayak", "kay"), MatchRank::StartsWith);
        assert_eq!(rank_text("Sea Kayak", "kay"), MatchRank::WordStartsWith);
        assert_eq!(rank_text("Sea-kayak", "kay"), MatchRank::WordStartsWith);
        assert_eq!(rank_text("Kayak", "yak"), MatchRank::Contains);
        assert_eq!(rank_text("mountain bike pro", "mbp"), MatchRank::Acronym);
        assert_eq!(rank_text("Kayak", "kyk"), MatchRank::Subsequence);
        assert_eq!(rank_text("Kayak", "canoe"), MatchRank::NoMatch);
    }

    #[test]
    fn longer_query_never_matches() {
        assert_eq!(rank_text("ab", "abc"), MatchRank::NoMatch);
    }

    #[test]
    fn record_takes_best_column() {
        let record = Record::new(42, "Tent");
        assert_eq!(rank_record(&record, "42"), MatchRank::CaseSensitiveEqual);
        assert_eq!(rank_record(&record, "te"), MatchRank::StartsWith);
        assert_eq!(rank_record(&record, "zzz"), MatchRank::NoMatch);
    }

    #[test]
    fn parent_takes_best_descendant_score() {
        let mut parent = Record::new(1, "Bike set");
        let mut child = Record::new(2, "Helmets");
        child.sub_rows.push(Record::new(3, "Sea kayak"));
        parent.sub_rows.push(child);

        assert_eq!(rank_record(&parent, "kayak"), MatchRank::NoMatch);
        assert_eq!(rank_tree(&parent, "kayak"), MatchRank::WordStartsWith);
        assert_eq!(filter_rows(&[parent], "kayak").len(), 1);
    }

    #[test]
    fn empty_filter_keeps_everything_in_order() {
        let rows = vec![Record::new(1, "b"), Record::new(2, "a")];
        let kept = filter_rows(&rows, "   ");
        assert_eq!(kept.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![0, 1]);
        assert!(!is_active("   "));
    }

    #[test]
    fn rank_order_breaks_ties_by_original_index() {
        let rows = vec![
            Record::new(1, "Canoe trailer"),
            Record::new(2, "Canoe"),
            Record::new(3, "Old canoe"),
            Record::new(4, "Canoes"),
            Record::new(5, "Raft"),
        ];

        let mut kept = filter_rows(&rows, "canoe");
        order_by_rank(&mut kept);

        let order: Vec<usize> = kept.iter().map(|(i, _)| *i).collect();
        // Equal, then the two starts-with rows in original order, then word start.
        assert_eq!(order, vec![1, 0, 3, 2]);
    }
}
