//! Client-side tabular data engine
//!
//! Global text filter, stable multi-column sort, pagination and row
//! selection over an in-memory row collection.
//!
//! # Example
//!
//! ```
//! use schoolboard_lib::table::{Column, SortDirection, Table};
//!
//! #[derive(Clone)]
//! struct Score {
//!     name: &'static str,
//!     score: i64,
//! }
//!
//! let table = Table::with_rows(
//!     vec![
//!         Column::accessor("name", "Name", |s: &Score| s.name),
//!         Column::accessor("score", "Score", |s: &Score| s.score),
//!     ],
//!     vec![
//!         Score { name: "Ana", score: 90 },
//!         Score { name: "Budi", score: 70 },
//!     ],
//! );
//!
//! table.set_sort("score", Some(SortDirection::Ascending)).unwrap();
//! let names: Vec<_> = table.visible_rows().into_iter().map(|r| r.row.name).collect();
//! assert_eq!(names, ["Budi", "Ana"]);
//! ```

mod column;
mod filter;
mod pagination;
mod selection;
mod sort;
mod state;
mod value;

pub use column::*;
pub use pagination::*;
pub use selection::*;
pub use sort::SortDirection;
pub use sort::SortKey;
pub use sort::SortingState;
pub use state::*;
pub use value::*;
