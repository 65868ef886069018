//! Schoolboard library
//!
//! The reusable core of a school administration dashboard: a generic
//! client-side table engine and an authenticated request lifecycle, plus
//! the credential storage, navigation boundary and state containers they
//! rely on.

pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod navigation;
pub mod storage;
pub mod store;
pub mod table;

mod client;

pub use client::*;
pub use error::Error;
