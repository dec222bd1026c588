use std::collections::HashMap;

pub use crate::config::*;

/// A builder for counting the values of a column.
///
/// Missing values (empty strings) are not counted: they do not form a
/// category on their own.
///
/// ```
/// pub use category_order::builder::Builder;
///
/// let mut builder = Builder::new();
/// for value in ["Engineer", "Manager", "", "Engineer"] {
///     builder.add_value(value);
/// }
/// let counts = builder.build();
///
/// assert_eq!(counts.labels(), vec!["Engineer", "Manager"]);
/// assert_eq!(counts.count("Engineer"), Some(2));
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    pub(crate) _entries: Vec<(String, u64)>,
    pub(crate) _positions: HashMap<String, usize>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Adds one occurrence of a value.
    pub fn add_value(&mut self, label: &str) {
        self.add_count(label, 1)
    }

    /// Adds several occurrences of a value at once.
    pub fn add_count(&mut self, label: &str, count: u64) {
        if label.is_empty() {
            return;
        }
        match self._positions.get(label) {
            Some(idx) => self._entries[*idx].1 += count,
            None => {
                self._positions
                    .insert(label.to_string(), self._entries.len());
                self._entries.push((label.to_string(), count));
            }
        }
    }

    pub fn build(self) -> ValueCounts {
        ValueCounts::from_first_seen(self._entries)
    }
}
