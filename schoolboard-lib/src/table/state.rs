//! Table engine state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use log::trace;
use tokio::sync::watch;

use super::column::{Column, RowContext};
use super::filter::filter_indices;
use super::pagination::{PageInfo, PageSize, Pagination};
use super::selection::{RowId, Selection};
use super::sort::{SortDirection, SortKey, SortingState, sort_indices};
use crate::config::TableConfig;
use crate::error::TableError;

/// Unique identifier for a Table instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(usize);

impl TableId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__table_{}", self.0)
    }
}

/// Derives a stable row id from a row.
pub type KeyFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// A row of the current page.
#[derive(Debug, Clone)]
pub struct VisibleRow<T> {
    pub id: RowId,
    /// Index in the original row collection.
    pub index: usize,
    /// Position in the filtered and sorted view, across all pages.
    pub position: usize,
    pub row: T,
    pub selected: bool,
}

/// A header cell for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub column_id: String,
    pub label: String,
    pub sortable: bool,
    pub sort: Option<SortDirection>,
}

/// Internal state for the table.
struct TableInner<T> {
    columns: Vec<Column<T>>,
    rows: Vec<T>,
    /// Row ids, parallel to `rows`.
    ids: Vec<RowId>,
    key_fn: Option<KeyFn<T>>,
    filter_text: String,
    sorting: SortingState,
    selection: Selection,
    pagination: Pagination,
    multi_sort: bool,
}

impl<T> TableInner<T> {
    fn new(columns: Vec<Column<T>>, config: TableConfig) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            ids: Vec::new(),
            key_fn: None,
            filter_text: String::new(),
            sorting: SortingState::new(),
            selection: Selection::new(),
            pagination: Pagination::new(config.page_size),
            multi_sort: config.multi_sort,
        }
    }

    fn row_id(&self, index: usize, row: &T) -> RowId {
        match &self.key_fn {
            Some(key) => RowId::new(key(row)),
            None => RowId::from(index),
        }
    }

    fn rebuild_ids(&mut self) {
        self.ids = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| self.row_id(i, row))
            .collect();
        let ids = &self.ids;
        self.selection.retain(|id| ids.contains(id));
    }

    fn find_column(&self, column_id: &str) -> Result<&Column<T>, TableError> {
        self.columns
            .iter()
            .find(|c| c.id == column_id)
            .ok_or_else(|| TableError::UnknownColumn(column_id.to_string()))
    }

    fn sortable_column(&self, column_id: &str) -> Result<(), TableError> {
        if self.find_column(column_id)?.is_sortable() {
            Ok(())
        } else {
            Err(TableError::NotSortable(column_id.to_string()))
        }
    }

    fn filtered(&self) -> Vec<usize> {
        filter_indices(&self.rows, &self.columns, &self.filter_text)
    }

    /// Filter, then sort.
    fn sorted(&self) -> Vec<usize> {
        let mut indices = self.filtered();
        sort_indices(&mut indices, &self.rows, &self.columns, self.sorting.keys());
        indices
    }

    fn filtered_count(&self) -> usize {
        if self.filter_text.is_empty() {
            self.rows.len()
        } else {
            self.filtered().len()
        }
    }

    fn clamp_page(&mut self) {
        let total = self.filtered_count();
        self.pagination.clamp(total);
    }
}

/// A client-side table engine: filter, sort, paginate and select rows.
///
/// `Table<T>` owns an ordered row collection and derives the visible page
/// on demand, always in the order filter → sort → paginate. It is cheap to
/// clone; clones share state.
///
/// Every mutation marks the table dirty and bumps a revision observable
/// through [`Table::subscribe`], so views know when to call
/// [`Table::visible_rows`] again.
pub struct Table<T> {
    id: TableId,
    inner: Arc<RwLock<TableInner<T>>>,
    dirty: Arc<AtomicBool>,
    revision: Arc<watch::Sender<u64>>,
}

impl<T: Clone + Send + Sync + 'static> Table<T> {
    /// Create an empty table with column definitions.
    pub fn new(columns: Vec<Column<T>>) -> Self {
        Self::with_config(columns, TableConfig::default())
    }

    /// Create an empty table with explicit settings.
    pub fn with_config(columns: Vec<Column<T>>, config: TableConfig) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            id: TableId::new(),
            inner: Arc::new(RwLock::new(TableInner::new(columns, config))),
            dirty: Arc::new(AtomicBool::new(false)),
            revision: Arc::new(revision),
        }
    }

    /// Create a table with initial rows.
    pub fn with_rows(columns: Vec<Column<T>>, rows: Vec<T>) -> Self {
        let table = Self::new(columns);
        table.set_rows(rows);
        table.clear_dirty();
        table
    }

    /// Identify rows by a key instead of their position.
    pub fn with_key<F>(self, key: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        if let Ok(mut guard) = self.inner.write() {
            guard.key_fn = Some(Arc::new(key));
            guard.rebuild_ids();
        }
        self
    }

    /// Enable or disable multi-column sort.
    pub fn with_multi_sort(self, enabled: bool) -> Self {
        self.set_multi_sort(enabled);
        self
    }

    /// Get the unique ID.
    pub fn id(&self) -> TableId {
        self.id
    }

    fn touch(&self) {
        self.dirty.store(true, Ordering::SeqCst);
        self.revision.send_modify(|rev| *rev += 1);
    }

    // -------------------------------------------------------------------------
    // Observation
    // -------------------------------------------------------------------------

    /// Receiver that changes whenever table state changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current revision number.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Check if the table has been modified since last check.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    /// Get the column definitions.
    pub fn columns(&self) -> Vec<Column<T>> {
        self.inner
            .read()
            .map(|g| g.columns.clone())
            .unwrap_or_default()
    }

    /// Replace the column definitions. Sort keys on removed or unsortable
    /// columns are dropped.
    pub fn set_columns(&self, columns: Vec<Column<T>>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.sorting.retain_sortable(&columns);
            guard.columns = columns;
            guard.clamp_page();
        }
        self.touch();
    }

    /// Header cells with their sort state.
    pub fn header_cells(&self) -> Vec<HeaderCell> {
        self.inner
            .read()
            .map(|g| {
                g.columns
                    .iter()
                    .map(|c| HeaderCell {
                        column_id: c.id.clone(),
                        label: c.header.clone(),
                        sortable: c.is_sortable(),
                        sort: g.sorting.direction(&c.id),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// Number of rows, ignoring the filter.
    pub fn len(&self) -> usize {
        self.inner.read().map(|g| g.rows.len()).unwrap_or(0)
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All rows in original order.
    pub fn rows(&self) -> Vec<T> {
        self.inner
            .read()
            .map(|g| g.rows.clone())
            .unwrap_or_default()
    }

    /// Find a row by id.
    pub fn row(&self, id: &RowId) -> Option<T> {
        self.inner.read().ok().and_then(|g| {
            g.ids
                .iter()
                .position(|i| i == id)
                .map(|pos| g.rows[pos].clone())
        })
    }

    /// Replace all rows.
    ///
    /// Selection keeps only ids that still exist; the page index is clamped.
    pub fn set_rows(&self, rows: Vec<T>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.rows = rows;
            guard.rebuild_ids();
            guard.clamp_page();
        }
        self.touch();
    }

    /// Remove a row by id, returning it.
    pub fn remove_row(&self, id: &RowId) -> Option<T> {
        let removed = self.inner.write().ok().and_then(|mut guard| {
            let pos = guard.ids.iter().position(|i| i == id)?;
            // Positional ids shift after a removal, so carry selection by row.
            let mut flags: Vec<bool> = guard
                .ids
                .iter()
                .map(|i| guard.selection.is_selected(i))
                .collect();
            flags.remove(pos);
            let row = guard.rows.remove(pos);
            guard.rebuild_ids();
            guard.selection.clear();
            for (i, selected) in flags.into_iter().enumerate() {
                if selected {
                    let id = guard.ids[i].clone();
                    guard.selection.set(id, true);
                }
            }
            guard.clamp_page();
            Some(row)
        });
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    // -------------------------------------------------------------------------
    // Filter
    // -------------------------------------------------------------------------

    /// Current global filter text.
    pub fn filter_text(&self) -> String {
        self.inner
            .read()
            .map(|g| g.filter_text.clone())
            .unwrap_or_default()
    }

    /// Replace the global filter.
    ///
    /// Returns to the first page when the current page would fall outside
    /// the filtered rows.
    pub fn set_filter_text(&self, text: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.filter_text = text.into();
            let total = guard.filtered_count();
            if guard.pagination.page_index >= guard.pagination.page_count(total).max(1) {
                guard.pagination.page_index = 0;
            }
        }
        self.touch();
    }

    /// Number of rows passing the filter.
    pub fn filtered_count(&self) -> usize {
        self.inner.read().map(|g| g.filtered_count()).unwrap_or(0)
    }

    // -------------------------------------------------------------------------
    // Sort
    // -------------------------------------------------------------------------

    /// Active sort keys, highest precedence first.
    pub fn sorting(&self) -> Vec<SortKey> {
        self.inner
            .read()
            .map(|g| g.sorting.keys().to_vec())
            .unwrap_or_default()
    }

    /// Direction a column is sorted in, if any.
    pub fn sort_direction(&self, column_id: &str) -> Option<SortDirection> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.sorting.direction(column_id))
    }

    /// Cycle a column through none → ascending → descending → none.
    ///
    /// Display and non-sortable columns are rejected without touching
    /// state. Returns the column's new direction.
    pub fn toggle_sort(&self, column_id: &str) -> Result<Option<SortDirection>, TableError> {
        let next = {
            let mut guard = match self.inner.write() {
                Ok(guard) => guard,
                Err(_) => return Ok(None),
            };
            guard.sortable_column(column_id)?;
            let multi = guard.multi_sort;
            guard.sorting.toggle(column_id, multi)
        };
        self.touch();
        Ok(next)
    }

    /// Set a column's sort direction; `None` removes it from the sort.
    pub fn set_sort(
        &self,
        column_id: &str,
        direction: Option<SortDirection>,
    ) -> Result<(), TableError> {
        {
            let mut guard = match self.inner.write() {
                Ok(guard) => guard,
                Err(_) => return Ok(()),
            };
            guard.sortable_column(column_id)?;
            let multi = guard.multi_sort;
            guard.sorting.set(column_id, direction, multi);
        }
        self.touch();
        Ok(())
    }

    /// Return to insertion order.
    pub fn clear_sort(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.sorting.clear();
        }
        self.touch();
    }

    pub fn is_multi_sort(&self) -> bool {
        self.inner.read().map(|g| g.multi_sort).unwrap_or(false)
    }

    /// Enable or disable multi-column sort. Disabling keeps only the
    /// primary key.
    pub fn set_multi_sort(&self, enabled: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.multi_sort = enabled;
            if !enabled
                && let Some(primary) = guard.sorting.keys().first().cloned()
            {
                guard.sorting.clear();
                guard.sorting.set(&primary.column_id, Some(primary.direction), false);
            }
        }
        self.touch();
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Toggle one row. Returns its new state; unknown ids are ignored.
    pub fn toggle_row_selected(&self, id: impl Into<RowId>) -> bool {
        let id = id.into();
        let selected = self.inner.write().ok().and_then(|mut guard| {
            if !guard.ids.contains(&id) {
                return None;
            }
            Some(guard.selection.toggle(id))
        });
        match selected {
            Some(selected) => {
                self.touch();
                selected
            }
            None => false,
        }
    }

    /// Set one row's selected state; unknown ids are ignored.
    pub fn set_row_selected(&self, id: impl Into<RowId>, selected: bool) {
        let id = id.into();
        let changed = self
            .inner
            .write()
            .map(|mut guard| guard.ids.contains(&id) && guard.selection.set(id, selected))
            .unwrap_or(false);
        if changed {
            self.touch();
        }
    }

    pub fn is_row_selected(&self, id: &RowId) -> bool {
        self.inner
            .read()
            .map(|g| g.selection.is_selected(id))
            .unwrap_or(false)
    }

    /// Select every row passing the filter, or deselect them all when they
    /// are already all selected. Rows hidden by the filter keep their state.
    pub fn toggle_all_selected(&self) {
        if let Ok(mut guard) = self.inner.write() {
            let filtered = guard.filtered();
            let all = !filtered.is_empty()
                && filtered
                    .iter()
                    .all(|&i| guard.selection.is_selected(&guard.ids[i]));
            for i in filtered {
                let id = guard.ids[i].clone();
                guard.selection.set(id, !all);
            }
        }
        self.touch();
    }

    fn selected_visible_count(guard: &TableInner<T>) -> (usize, usize) {
        let filtered = guard.filtered();
        let selected = filtered
            .iter()
            .filter(|&&i| guard.selection.is_selected(&guard.ids[i]))
            .count();
        (selected, filtered.len())
    }

    /// `true` when at least one row passes the filter and all of them are selected.
    pub fn is_all_selected(&self) -> bool {
        self.inner
            .read()
            .map(|g| {
                let (selected, total) = Self::selected_visible_count(&g);
                total > 0 && selected == total
            })
            .unwrap_or(false)
    }

    /// Indeterminate state: some, but not all, filtered rows are selected.
    pub fn is_some_selected(&self) -> bool {
        self.inner
            .read()
            .map(|g| {
                let (selected, total) = Self::selected_visible_count(&g);
                selected > 0 && selected < total
            })
            .unwrap_or(false)
    }

    /// Number of selected rows, including rows hidden by the filter.
    pub fn selected_count(&self) -> usize {
        self.inner.read().map(|g| g.selection.len()).unwrap_or(0)
    }

    /// Selected row ids in original row order.
    pub fn selected_ids(&self) -> Vec<RowId> {
        self.inner
            .read()
            .map(|g| {
                g.ids
                    .iter()
                    .filter(|id| g.selection.is_selected(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Selected rows in original order.
    pub fn selected_rows(&self) -> Vec<T> {
        self.inner
            .read()
            .map(|g| {
                g.ids
                    .iter()
                    .zip(g.rows.iter())
                    .filter(|(id, _)| g.selection.is_selected(id))
                    .map(|(_, row)| row.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Deselect every row.
    pub fn clear_selection(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.selection.clear();
        }
        self.touch();
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    pub fn page_index(&self) -> usize {
        self.inner
            .read()
            .map(|g| g.pagination.page_index)
            .unwrap_or(0)
    }

    pub fn page_size(&self) -> PageSize {
        self.inner
            .read()
            .map(|g| g.pagination.page_size)
            .unwrap_or_default()
    }

    /// Number of pages for the filtered rows; zero when none pass.
    pub fn page_count(&self) -> usize {
        self.inner
            .read()
            .map(|g| g.pagination.page_count(g.filtered_count()))
            .unwrap_or(0)
    }

    /// Pagination snapshot for rendering controls.
    pub fn page_info(&self) -> PageInfo {
        self.inner
            .read()
            .map(|g| PageInfo::new(&g.pagination, g.filtered_count()))
            .unwrap_or_else(|_| PageInfo::new(&Pagination::default(), 0))
    }

    /// Jump to a page, clamped to the last valid page.
    pub fn set_page_index(&self, index: usize) {
        if let Ok(mut guard) = self.inner.write() {
            let total = guard.filtered_count();
            guard.pagination.set_index(index, total);
        }
        self.touch();
    }

    /// Change rows per page, keeping the first visible row on screen.
    pub fn set_page_size(&self, page_size: PageSize) {
        if let Ok(mut guard) = self.inner.write() {
            let total = guard.filtered_count();
            guard.pagination.set_size(page_size, total);
        }
        self.touch();
    }

    pub fn can_previous_page(&self) -> bool {
        self.page_info().can_previous
    }

    pub fn can_next_page(&self) -> bool {
        self.page_info().can_next
    }

    pub fn first_page(&self) {
        self.set_page_index(0);
    }

    pub fn previous_page(&self) {
        let index = self.page_index();
        self.set_page_index(index.saturating_sub(1));
    }

    pub fn next_page(&self) {
        let index = self.page_index();
        self.set_page_index(index + 1);
    }

    pub fn last_page(&self) {
        self.set_page_index(usize::MAX);
    }

    // -------------------------------------------------------------------------
    // View
    // -------------------------------------------------------------------------

    /// Rows on the current page: filter → sort → paginate.
    pub fn visible_rows(&self) -> Vec<VisibleRow<T>> {
        let Ok(guard) = self.inner.read() else {
            return Vec::new();
        };
        let sorted = guard.sorted();
        let range = guard.pagination.range(sorted.len());
        trace!(
            "{}: {} of {} rows pass filter, showing {:?}",
            self.id,
            sorted.len(),
            guard.rows.len(),
            range
        );
        let start = range.start;
        sorted[range]
            .iter()
            .enumerate()
            .map(|(offset, &index)| {
                let id = guard.ids[index].clone();
                VisibleRow {
                    selected: guard.selection.is_selected(&id),
                    id,
                    index,
                    position: start + offset,
                    row: guard.rows[index].clone(),
                }
            })
            .collect()
    }

    /// Render one cell of a visible row. `None` for an unknown column.
    pub fn render_cell(&self, row: &VisibleRow<T>, column_id: &str) -> Option<String> {
        let guard = self.inner.read().ok()?;
        let column = guard.columns.iter().find(|c| c.id == column_id)?;
        Some(column.render(&Self::context(row)))
    }

    /// Render every cell of a visible row, in column order.
    pub fn render_row(&self, row: &VisibleRow<T>) -> Vec<String> {
        let cx = Self::context(row);
        self.inner
            .read()
            .map(|g| g.columns.iter().map(|c| c.render(&cx)).collect())
            .unwrap_or_default()
    }

    fn context(row: &VisibleRow<T>) -> RowContext<'_, T> {
        RowContext {
            row: &row.row,
            id: &row.id,
            index: row.index,
            position: row.position,
            selected: row.selected,
        }
    }
}

impl<T> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
            revision: Arc::clone(&self.revision),
        }
    }
}

impl<T> std::fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("id", &self.id)
            .field("revision", &*self.revision.borrow())
            .finish_non_exhaustive()
    }
}
