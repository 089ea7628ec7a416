//! # Contracts
//!
//! Frozen interface contracts shared by every tabular-output crate.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Model
//! - `Layout`: ordered column names, shared by every sink of one table
//! - `Row`: one ordered set of `Value`s matching a layout
//! - `RowSink`: anything that accepts rows, flushes, and closes

mod config;
mod error;
mod layout;
mod row;
mod sink;

pub use config::*;
pub use error::*;
pub use layout::{Layout, LayoutBuilder};
pub use row::{Row, Value};
pub use sink::RowSink;
