//! Row identity and selection state.

use std::collections::HashSet;
use std::fmt;

/// Stable identity of a row.
///
/// Positional (the row's original index) unless the table was given a
/// key function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(String);

impl RowId {
    /// Creates a row id from any string-like key.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&RowId> for RowId {
    fn from(id: &RowId) -> Self {
        id.clone()
    }
}

impl From<usize> for RowId {
    fn from(index: usize) -> Self {
        Self(index.to_string())
    }
}

/// Set of selected row ids.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: HashSet<RowId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle a row. Returns the new selected state.
    pub fn toggle(&mut self, id: RowId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// Set a row's selected state. Returns true if it changed.
    pub fn set(&mut self, id: RowId, selected: bool) -> bool {
        if selected {
            self.selected.insert(id)
        } else {
            self.selected.remove(&id)
        }
    }

    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drop ids that no longer name a row.
    pub fn retain(&mut self, mut keep: impl FnMut(&RowId) -> bool) {
        self.selected.retain(|id| keep(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut selection = Selection::new();
        assert!(selection.toggle("a".into()));
        assert!(selection.is_selected(&"a".into()));
        assert!(!selection.toggle("a".into()));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_set_reports_change() {
        let mut selection = Selection::new();
        assert!(selection.set(RowId::from(1), true));
        assert!(!selection.set(RowId::from(1), true));
        assert!(selection.set(RowId::from(1), false));
        assert!(!selection.set(RowId::from(1), false));
    }

    #[test]
    fn test_retain() {
        let mut selection = Selection::new();
        selection.set("0".into(), true);
        selection.set("5".into(), true);
        selection.retain(|id| id.as_str() != "5");
        assert_eq!(selection.len(), 1);
    }
}
