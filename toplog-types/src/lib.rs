//! # toplog-types
//!
//! Core types for process resource time series. This crate defines the table
//! model that `toplog` builds from `top`/`free` logs and hands to its
//! exporters: entity keys, observed samples, and a time-indexed table whose
//! rows always stay aligned with its header.
//!
//! ## Design Goals
//!
//! - **Absence is not zero**: a cell is either a [`Sample`] or empty
//! - **Index-consistent mutation**: column removal touches the header and
//!   every row in a single pass
//! - **Lossless values**: samples keep the text they were read from, so
//!   exported files show `5.0` rather than a reformatted float
//!
//! ## Features
//!
//! - `serde`: serialization of every type via serde
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use toplog_types::{EntityId, MetricTable, Row, Sample};
//!
//! let time = NaiveDate::from_ymd_opt(2024, 1, 1)
//!     .unwrap()
//!     .and_hms_opt(23, 59, 0)
//!     .unwrap();
//!
//! let mut table = MetricTable::new("cpu");
//! table.push_column(EntityId::new(1234, "myproc").label());
//! table.push_row(Row::new(time, vec![Sample::parse("5.0")]));
//!
//! assert_eq!(table.header(), vec!["", "1234(myproc)"]);
//! assert_eq!(table.grid()[0], vec!["2024-01-01 23:59:00", "5.0"]);
//! ```

mod entity;
mod sample;
mod table;

pub use entity::*;
pub use sample::*;
pub use table::*;

/// Format of every absolute timestamp written to or read from a table.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
