//! Sorting state and the stable multi-key sort.

use std::cmp::Ordering;

use super::column::Column;
use super::value::CellValue;

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9).
    Ascending,
    /// Descending order (Z-A, 9-0).
    Descending,
}

impl SortDirection {
    /// Header marker shown next to a sorted column.
    pub fn indicator(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// One entry of the active sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column_id: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(column_id: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column_id: column_id.into(),
            direction,
        }
    }
}

/// Ordered sort keys; earlier keys take precedence, later keys break ties.
///
/// Empty means insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortingState {
    keys: Vec<SortKey>,
}

impl SortingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Current direction of a column, if it is sorted.
    pub fn direction(&self, column_id: &str) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|k| k.column_id == column_id)
            .map(|k| k.direction)
    }

    /// Cycle a column through none → ascending → descending → none.
    ///
    /// A column not yet sorted replaces the active sort, or is appended
    /// when `multi` is set. Returns the column's new direction.
    pub fn toggle(&mut self, column_id: &str, multi: bool) -> Option<SortDirection> {
        let next = match self.direction(column_id) {
            None => Some(SortDirection::Ascending),
            Some(SortDirection::Ascending) => Some(SortDirection::Descending),
            Some(SortDirection::Descending) => None,
        };
        self.set(column_id, next, multi);
        next
    }

    /// Set a column's direction explicitly; `None` removes it.
    pub fn set(&mut self, column_id: &str, direction: Option<SortDirection>, multi: bool) {
        let position = self.keys.iter().position(|k| k.column_id == column_id);
        match (position, direction) {
            (Some(i), Some(direction)) => self.keys[i].direction = direction,
            (Some(i), None) => {
                self.keys.remove(i);
            }
            (None, Some(direction)) => {
                if !multi {
                    self.keys.clear();
                }
                self.keys.push(SortKey::new(column_id, direction));
            }
            (None, None) => {}
        }
        if !multi && self.keys.len() > 1 {
            self.keys.retain(|k| k.column_id == column_id);
        }
    }

    /// Drop keys whose column no longer exists or cannot be sorted.
    pub(crate) fn retain_sortable<T>(&mut self, columns: &[Column<T>]) {
        self.keys
            .retain(|k| columns.iter().any(|c| c.id == k.column_id && c.is_sortable()));
    }
}

/// Empty values sort last in either direction.
fn compare_keyed(a: &CellValue, b: &CellValue, direction: SortDirection) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = a.compare(b);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
    }
}

/// Stable sort of row indices by the given keys.
///
/// Each accessor runs once per row and key; rows equal on every key keep
/// their relative order.
pub(crate) fn sort_indices<T>(
    indices: &mut Vec<usize>,
    rows: &[T],
    columns: &[Column<T>],
    keys: &[SortKey],
) {
    let active: Vec<(&Column<T>, SortDirection)> = keys
        .iter()
        .filter_map(|key| {
            columns
                .iter()
                .find(|c| c.id == key.column_id && c.is_sortable())
                .map(|c| (c, key.direction))
        })
        .collect();
    if active.is_empty() {
        return;
    }

    let mut keyed: Vec<(usize, Vec<CellValue>)> = indices
        .iter()
        .map(|&i| {
            let values = active
                .iter()
                .map(|(column, _)| column.value(&rows[i]).unwrap_or_default())
                .collect();
            (i, values)
        })
        .collect();

    keyed.sort_by(|(_, a), (_, b)| {
        active
            .iter()
            .zip(a.iter().zip(b.iter()))
            .map(|((_, direction), (va, vb))| compare_keyed(va, vb, *direction))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });

    *indices = keyed.into_iter().map(|(i, _)| i).collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_cycles_back_to_none() {
        let mut sorting = SortingState::new();
        assert_eq!(sorting.toggle("score", false), Some(SortDirection::Ascending));
        assert_eq!(sorting.toggle("score", false), Some(SortDirection::Descending));
        assert_eq!(sorting.toggle("score", false), None);
        assert!(sorting.is_empty());
    }

    #[test]
    fn test_single_sort_replaces() {
        let mut sorting = SortingState::new();
        sorting.toggle("score", false);
        sorting.toggle("name", false);
        assert_eq!(sorting.keys(), &[SortKey::new("name", SortDirection::Ascending)]);
    }

    #[test]
    fn test_multi_sort_appends() {
        let mut sorting = SortingState::new();
        sorting.toggle("score", true);
        sorting.toggle("score", true);
        sorting.toggle("name", true);
        assert_eq!(
            sorting.keys(),
            &[
                SortKey::new("score", SortDirection::Descending),
                SortKey::new("name", SortDirection::Ascending),
            ]
        );
        sorting.toggle("score", true);
        assert_eq!(sorting.keys(), &[SortKey::new("name", SortDirection::Ascending)]);
    }

    #[test]
    fn test_sort_indices_stable_with_empty_last() {
        let rows = vec![
            serde_json::json!({"n": "a", "s": 90}),
            serde_json::json!({"n": "b"}),
            serde_json::json!({"n": "c", "s": 70}),
            serde_json::json!({"n": "d", "s": 90}),
        ];
        let columns = vec![Column::field("n", "N"), Column::field("s", "S")];

        let mut indices: Vec<usize> = (0..rows.len()).collect();
        sort_indices(
            &mut indices,
            &rows,
            &columns,
            &[SortKey::new("s", SortDirection::Descending)],
        );
        assert_eq!(indices, vec![0, 3, 2, 1]);

        let mut indices: Vec<usize> = (0..rows.len()).collect();
        sort_indices(
            &mut indices,
            &rows,
            &columns,
            &[SortKey::new("s", SortDirection::Ascending)],
        );
        assert_eq!(indices, vec![2, 0, 3, 1]);
    }

    #[test]
    fn test_sort_indices_tie_breaker() {
        let rows = vec![
            serde_json::json!({"n": "b", "s": 90}),
            serde_json::json!({"n": "a", "s": 90}),
            serde_json::json!({"n": "c", "s": 70}),
        ];
        let columns = vec![Column::field("n", "N"), Column::field("s", "S")];
        let mut indices: Vec<usize> = (0..rows.len()).collect();
        sort_indices(
            &mut indices,
            &rows,
            &columns,
            &[
                SortKey::new("s", SortDirection::Descending),
                SortKey::new("n", SortDirection::Ascending),
            ],
        );
        assert_eq!(indices, vec![1, 0, 2]);
    }
}
