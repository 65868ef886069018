//! Global text filter.

use super::column::Column;

/// Case-insensitive substring match over the cell text of the searchable
/// columns of a row, formatters applied.
///
/// `needle` must already be lowercased. An empty needle matches every row.
pub(crate) fn row_matches<T>(row: &T, columns: &[Column<T>], needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    columns
        .iter()
        .filter_map(|c| c.search_text(row))
        .any(|text| text.to_lowercase().contains(needle))
}

/// Indices of rows passing the filter, in original order.
pub(crate) fn filter_indices<T>(rows: &[T], columns: &[Column<T>], filter_text: &str) -> Vec<usize> {
    let needle = filter_text.to_lowercase();
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row_matches(*row, columns, &needle))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<Column<serde_json::Value>> {
        vec![
            Column::selection("select"),
            Column::field("name", "Name"),
            Column::field("score", "Score"),
            Column::field("note", "Note").searchable(false),
        ]
    }

    fn rows() -> Vec<serde_json::Value> {
        vec![
            serde_json::json!({"name": "Ana", "score": 90, "note": "cici"}),
            serde_json::json!({"name": "Budi", "score": 70}),
            serde_json::json!({"name": "Cici", "score": 90}),
        ]
    }

    #[test]
    fn test_empty_filter_keeps_all() {
        assert_eq!(filter_indices(&rows(), &columns(), ""), vec![0, 1, 2]);
    }

    #[test]
    fn test_case_insensitive_substring() {
        assert_eq!(filter_indices(&rows(), &columns(), "CI"), vec![2]);
        assert_eq!(filter_indices(&rows(), &columns(), "9"), vec![0, 2]);
    }

    #[test]
    fn test_matches_formatted_text() {
        let columns = vec![
            Column::field("name", "Name"),
            Column::field("score", "Score").format(|v| format!("{} pts", v)),
        ];
        assert_eq!(filter_indices(&rows(), &columns, "PTS"), vec![0, 1, 2]);
        assert_eq!(filter_indices(&rows(), &columns, "70 p"), vec![1]);
    }

    #[test]
    fn test_unsearchable_column_ignored() {
        assert!(!row_matches(&rows()[0], &columns(), "cici"));
    }
}
