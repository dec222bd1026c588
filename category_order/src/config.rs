// ********* Input data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

use regex::Regex;

/// The occurrences of each category label of a column.
///
/// The entries are always sorted by descending count. Labels with the same
/// count keep the order in which they were first seen, so the display order
/// is stable from one run to the next.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ValueCounts {
    entries: Vec<(String, u64)>,
}

impl ValueCounts {
    /// Builds the counts out of explicit (label, count) pairs.
    ///
    /// A label given more than once has its counts summed, at the position of
    /// its first occurrence.
    pub fn from_pairs<S: AsRef<str>>(pairs: &[(S, u64)]) -> ValueCounts {
        let mut entries: Vec<(String, u64)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for (label, count) in pairs {
            let label = label.as_ref();
            if let Some(idx) = positions.get(label) {
                entries[*idx].1 += count;
            } else {
                positions.insert(label.to_string(), entries.len());
                entries.push((label.to_string(), *count));
            }
        }
        ValueCounts::from_first_seen(entries)
    }

    /// Input: the entries in order of first appearance, labels unique.
    pub(crate) fn from_first_seen(mut entries: Vec<(String, u64)>) -> ValueCounts {
        // sort_by is stable: ties keep the order of first appearance.
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        ValueCounts { entries }
    }

    /// The labels, by descending count.
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|(label, _)| label.clone()).collect()
    }

    pub fn count(&self, label: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, count)| *count)
    }

    /// The total number of counted values.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(l, c)| (l.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ********* Configuration **********

/// Where a matched label is moved.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Placement {
    /// Becomes the first category.
    Front,
    /// Becomes the last category.
    Back,
}

/// A pattern and the place where the labels matching it are pinned.
///
/// The pattern is a case-sensitive regular expression. A label matches if
/// the expression is found anywhere in it.
#[derive(Debug, Clone)]
pub struct ReorderRule {
    pub pattern: Regex,
    pub placement: Placement,
}

impl ReorderRule {
    pub fn new(pattern: &str, placement: Placement) -> Result<ReorderRule, OrderError> {
        let pattern = Regex::new(pattern).map_err(|e| OrderError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(ReorderRule { pattern, placement })
    }

    pub fn matches(&self, label: &str) -> bool {
        self.pattern.is_match(label)
    }
}

impl PartialEq for ReorderRule {
    fn eq(&self, other: &Self) -> bool {
        self.pattern.as_str() == other.pattern.as_str() && self.placement == other.placement
    }
}

impl Eq for ReorderRule {}

/// Catch-all answers, such as "Other" or "Others (please specify)".
pub const OTHER_PATTERN: &str = "Other|other";
/// Missing answers, as exported by the registration system.
pub const NO_RECORD_PATTERN: &str = "No Record";

/// The sequence of rules that adjusts the order of the categories.
///
/// Rules are applied one after the other: if a label is matched by several
/// rules, the last one decides where it ends up.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct OrderPolicy {
    pub rules: Vec<ReorderRule>,
}

impl OrderPolicy {
    /// Plain descending counts, nothing pinned.
    pub const EMPTY: OrderPolicy = OrderPolicy { rules: Vec::new() };

    /// The policy of the attendee charts.
    ///
    /// "Other"-like categories go last, then "No Record"-like categories go
    /// after them. A label matching both patterns is the very last one.
    pub fn default_policy() -> OrderPolicy {
        OrderPolicy {
            rules: vec![
                ReorderRule {
                    pattern: Regex::new(OTHER_PATTERN).expect("built-in pattern"),
                    placement: Placement::Back,
                },
                ReorderRule {
                    pattern: Regex::new(NO_RECORD_PATTERN).expect("built-in pattern"),
                    placement: Placement::Back,
                },
            ],
        }
    }

    pub fn with_rule(mut self, rule: ReorderRule) -> OrderPolicy {
        self.rules.push(rule);
        self
    }
}

/// Errors that prevent an order from being computed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum OrderError {
    /// A label to relocate is not part of the order.
    MissingLabel(String),
    /// The pattern of a rule is not a valid regular expression.
    InvalidPattern { pattern: String, message: String },
}

impl Error for OrderError {}

impl Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderError::MissingLabel(label) => {
                write!(f, "label {:?} is not present in the order", label)
            }
            OrderError::InvalidPattern { pattern, message } => {
                write!(f, "invalid pattern {:?}: {}", pattern, message)
            }
        }
    }
}
