//! Pagination state.

use std::ops::Range;

/// Allowed page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PageSize {
    #[default]
    Ten,
    Twenty,
    Fifty,
    Hundred,
}

impl PageSize {
    /// All options, smallest first.
    pub const ALL: [PageSize; 4] = [Self::Ten, Self::Twenty, Self::Fifty, Self::Hundred];

    /// Rows per page.
    pub fn get(self) -> usize {
        match self {
            Self::Ten => 10,
            Self::Twenty => 20,
            Self::Fifty => 50,
            Self::Hundred => 100,
        }
    }

    /// Smallest option holding at least `rows` rows, capped at 100.
    pub fn at_least(rows: usize) -> Self {
        Self::ALL
            .into_iter()
            .find(|size| size.get() >= rows)
            .unwrap_or(Self::Hundred)
    }
}

impl TryFrom<usize> for PageSize {
    type Error = usize;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or(value)
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Page index and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    pub page_index: usize,
    pub page_size: PageSize,
}

impl Pagination {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_index: 0,
            page_size,
        }
    }

    /// Number of pages for `total` rows; zero when there are no rows.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size.get())
    }

    /// Largest valid page index for `total` rows.
    pub fn last_index(&self, total: usize) -> usize {
        self.page_count(total).saturating_sub(1)
    }

    /// Clamp the page index so the page start stays inside `total`.
    pub fn clamp(&mut self, total: usize) {
        self.page_index = self.page_index.min(self.last_index(total));
    }

    /// Set the page index, clamped into range.
    pub fn set_index(&mut self, index: usize, total: usize) {
        self.page_index = index.min(self.last_index(total));
    }

    /// Change the page size while keeping the first visible row on screen.
    pub fn set_size(&mut self, page_size: PageSize, total: usize) {
        let first_row = self.page_index * self.page_size.get();
        self.page_size = page_size;
        self.page_index = first_row / page_size.get();
        self.clamp(total);
    }

    /// Row range (into the filtered and sorted view) of the current page.
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = (self.page_index * self.page_size.get()).min(total);
        let end = (start + self.page_size.get()).min(total);
        start..end
    }
}

/// Snapshot of pagination for rendering controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page_index: usize,
    pub page_size: PageSize,
    pub page_count: usize,
    /// Rows passing the filter.
    pub total_rows: usize,
    pub can_previous: bool,
    pub can_next: bool,
}

impl PageInfo {
    pub(crate) fn new(pagination: &Pagination, total: usize) -> Self {
        let page_count = pagination.page_count(total);
        Self {
            page_index: pagination.page_index,
            page_size: pagination.page_size,
            page_count,
            total_rows: total,
            can_previous: pagination.page_index > 0,
            can_next: pagination.page_index + 1 < page_count,
        }
    }
}
