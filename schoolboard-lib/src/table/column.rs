//! Column definitions.
//!
//! A column is either an accessor column, backed by a field of the row,
//! or a display column with no underlying field (selection checkbox, row
//! number, computed text). Display columns are never sorted or searched.

use std::fmt;
use std::sync::Arc;

use super::selection::RowId;
use super::value::CellValue;

/// Maps a row to the value of one column.
pub type Accessor<T> = Arc<dyn Fn(&T) -> CellValue + Send + Sync>;

/// Formats an accessor value for display.
pub type CellFormatter = Arc<dyn Fn(&CellValue) -> String + Send + Sync>;

/// Renders a display column cell.
pub type DisplayRenderer<T> = Arc<dyn Fn(&RowContext<'_, T>) -> String + Send + Sync>;

/// Everything a cell renderer may look at.
#[derive(Debug)]
pub struct RowContext<'a, T> {
    pub row: &'a T,
    pub id: &'a RowId,
    /// Index in the original row collection.
    pub index: usize,
    /// Position in the filtered and sorted view, across all pages.
    pub position: usize,
    pub selected: bool,
}

/// Structural columns with no backing field.
pub enum DisplayColumn<T> {
    /// Selection checkbox.
    Selection,
    /// 1-based original row index.
    RowNumber,
    /// Caller-provided renderer.
    Custom(DisplayRenderer<T>),
}

impl<T> Clone for DisplayColumn<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Selection => Self::Selection,
            Self::RowNumber => Self::RowNumber,
            Self::Custom(render) => Self::Custom(Arc::clone(render)),
        }
    }
}

/// Column kind.
pub enum ColumnKind<T> {
    Accessor {
        accessor: Accessor<T>,
        format: Option<CellFormatter>,
        sortable: bool,
        searchable: bool,
    },
    Display(DisplayColumn<T>),
}

impl<T> Clone for ColumnKind<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Accessor {
                accessor,
                format,
                sortable,
                searchable,
            } => Self::Accessor {
                accessor: Arc::clone(accessor),
                format: format.clone(),
                sortable: *sortable,
                searchable: *searchable,
            },
            Self::Display(display) => Self::Display(display.clone()),
        }
    }
}

/// A table column definition.
///
/// # Example
///
/// ```
/// use schoolboard_lib::table::Column;
///
/// struct Score {
///     name: String,
///     score: i64,
/// }
///
/// let columns: Vec<Column<Score>> = vec![
///     Column::selection("select"),
///     Column::row_number("row_number", "#"),
///     Column::accessor("name", "Name", |s: &Score| s.name.clone()),
///     Column::accessor("score", "Score", |s: &Score| s.score),
/// ];
/// ```
pub struct Column<T> {
    /// Unique identifier for this column.
    pub id: String,
    /// Header text.
    pub header: String,
    pub kind: ColumnKind<T>,
}

impl<T: 'static> Column<T> {
    /// Create a sortable, searchable accessor column.
    pub fn accessor<V, F>(id: impl Into<String>, header: impl Into<String>, accessor: F) -> Self
    where
        V: Into<CellValue>,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            header: header.into(),
            kind: ColumnKind::Accessor {
                accessor: Arc::new(move |row: &T| -> CellValue { accessor(row).into() }),
                format: None,
                sortable: true,
                searchable: true,
            },
        }
    }

    /// Create a selection checkbox column.
    pub fn selection(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: String::new(),
            kind: ColumnKind::Display(DisplayColumn::Selection),
        }
    }

    /// Create a row number column.
    pub fn row_number(id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            kind: ColumnKind::Display(DisplayColumn::RowNumber),
        }
    }

    /// Create a display column with a custom renderer.
    pub fn display<F>(id: impl Into<String>, header: impl Into<String>, render: F) -> Self
    where
        F: Fn(&RowContext<'_, T>) -> String + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            header: header.into(),
            kind: ColumnKind::Display(DisplayColumn::Custom(Arc::new(render))),
        }
    }

    /// Set a display formatter for an accessor column.
    pub fn format<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&CellValue) -> String + Send + Sync + 'static,
    {
        if let ColumnKind::Accessor { format, .. } = &mut self.kind {
            *format = Some(Arc::new(formatter));
        }
        self
    }

    /// Enable or disable sorting on an accessor column.
    pub fn sortable(mut self, enabled: bool) -> Self {
        if let ColumnKind::Accessor { sortable, .. } = &mut self.kind {
            *sortable = enabled;
        }
        self
    }

    /// Include or exclude an accessor column from the global filter.
    pub fn searchable(mut self, enabled: bool) -> Self {
        if let ColumnKind::Accessor { searchable, .. } = &mut self.kind {
            *searchable = enabled;
        }
        self
    }
}

impl<T> Column<T> {
    pub fn is_display(&self) -> bool {
        matches!(self.kind, ColumnKind::Display(_))
    }

    pub fn is_sortable(&self) -> bool {
        matches!(self.kind, ColumnKind::Accessor { sortable: true, .. })
    }

    pub fn is_searchable(&self) -> bool {
        matches!(self.kind, ColumnKind::Accessor { searchable: true, .. })
    }

    /// The underlying value, or `None` for display columns.
    pub fn value(&self, row: &T) -> Option<CellValue> {
        match &self.kind {
            ColumnKind::Accessor { accessor, .. } => Some(accessor(row)),
            ColumnKind::Display(_) => None,
        }
    }

    /// Text the filter matches: the formatted cell text of searchable
    /// accessor columns, `None` for everything else.
    pub fn search_text(&self, row: &T) -> Option<String> {
        match &self.kind {
            ColumnKind::Accessor {
                accessor,
                format,
                searchable: true,
                ..
            } => {
                let value = accessor(row);
                Some(match format {
                    Some(format) => format(&value),
                    None => value.to_string(),
                })
            }
            _ => None,
        }
    }

    /// Render the cell text for a row.
    pub fn render(&self, cx: &RowContext<'_, T>) -> String {
        match &self.kind {
            ColumnKind::Accessor {
                accessor, format, ..
            } => {
                let value = accessor(cx.row);
                match format {
                    Some(format) => format(&value),
                    None => value.to_string(),
                }
            }
            ColumnKind::Display(DisplayColumn::Selection) => {
                if cx.selected { "[x]" } else { "[ ]" }.to_string()
            }
            ColumnKind::Display(DisplayColumn::RowNumber) => (cx.index + 1).to_string(),
            ColumnKind::Display(DisplayColumn::Custom(render)) => render(cx),
        }
    }
}

impl Column<serde_json::Value> {
    /// Accessor column reading a top-level JSON field named like the column.
    ///
    /// Rows missing the field render an empty cell.
    pub fn field(id: impl Into<String>, header: impl Into<String>) -> Self {
        let id = id.into();
        let key = id.clone();
        Self::accessor(id, header, move |row: &serde_json::Value| {
            row.get(&key).map(CellValue::from_json).unwrap_or_default()
        })
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            ColumnKind::Accessor { .. } => "accessor",
            ColumnKind::Display(DisplayColumn::Selection) => "selection",
            ColumnKind::Display(DisplayColumn::RowNumber) => "row_number",
            ColumnKind::Display(DisplayColumn::Custom(_)) => "display",
        };
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("kind", &kind)
            .field("sortable", &self.is_sortable())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cx<'a>(row: &'a serde_json::Value, id: &'a RowId, selected: bool) -> RowContext<'a, serde_json::Value> {
        RowContext {
            row,
            id,
            index: 4,
            position: 0,
            selected,
        }
    }

    #[test]
    fn test_field_missing_key_is_empty() {
        let column = Column::field("score", "Score");
        let row = serde_json::json!({"name": "Ana"});
        assert_eq!(column.value(&row), Some(CellValue::Empty));
        let id = RowId::from(4);
        assert_eq!(column.render(&cx(&row, &id, false)), "");
    }

    #[test]
    fn test_display_columns() {
        let row = serde_json::json!({"name": "Ana"});
        let id = RowId::from(4);
        let selection = Column::<serde_json::Value>::selection("select");
        let number = Column::<serde_json::Value>::row_number("row_number", "#");
        assert!(!selection.is_sortable());
        assert!(!number.is_searchable());
        assert_eq!(selection.render(&cx(&row, &id, true)), "[x]");
        assert_eq!(number.render(&cx(&row, &id, false)), "5");
        assert_eq!(number.value(&row), None);
    }

    #[test]
    fn test_format_and_flags() {
        let column = Column::field("score", "Score")
            .format(|v| format!("{} pts", v))
            .sortable(false);
        let row = serde_json::json!({"score": 90});
        let id = RowId::from(0);
        assert_eq!(column.render(&cx(&row, &id, false)), "90 pts");
        assert!(!column.is_sortable());
        assert!(column.is_searchable());
    }
}
