//! # toplog
//!
//! Rebuild per-process CPU and memory time series from periodic `top -b`
//! logs, and system memory usage from timestamped `free` logs.
//!
//! A monitor script on the target host appends one `top` screen (or one
//! `free` sample) to a dated log file every few seconds. This crate turns
//! those logs into one table per metric, with a row per snapshot and a column
//! per process, writes them as CSV, and can draw them in a terminal chart
//! viewer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          toplog                             │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │ source  │───▶│   data   │───▶│ export  │───▶│   ui    │ │
//! │  │ (input) │    │(processing)   │(csv/chart)   │(viewer) │ │
//! │  └─────────┘    └──────────┘    └─────────┘    └─────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: Finding logs in a directory and loading them
//! - **[`data`]**: Snapshot parsing, midnight rollover, sparse tables,
//!   time range filtering, ranking and summary rows
//! - **[`export`]**: CSV files, Excel workbooks and chart data
//! - **[`batch`]**: One run over many logs, each analyzed on its own
//! - **[`app`]** and **[`ui`]**: The ratatui chart viewer
//! - **[`config`]**: Layered settings
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Every top_*.log in ./input, results in ./output
//! toplog top
//!
//! # One file, restricted to a window, then open the charts
//! toplog top input/top_20240101.log --with-excel \
//!     --start-time "2024-01-01 23:00:00" --end-time "2024-01-02 01:00:00" \
//!     --view-graph
//!
//! # Memory usage from free logs
//! toplog free --view-graph
//! ```
//!
//! ### As a library
//!
//! ```
//! use toplog::data::{analyze_top, Metric, TimeRange, DEFAULT_THRESHOLD};
//! use toplog::source::LogFile;
//!
//! let log = LogFile::from_lines(
//!     "top_20240101.log",
//!     [
//!         "top - 23:59:00 up 1 day,  1 user,  load average: 0.00, 0.00, 0.00",
//!         "    PID USER      PR  NI    VIRT    RES    SHR S  %CPU  %MEM     TIME+ COMMAND",
//!         "   1234 root      20   0  123456  12345   1234 S   5.0   1.2   0:01.23 myproc",
//!         "top - 00:01:00 up 1 day,  1 user,  load average: 0.00, 0.00, 0.00",
//!         "    PID USER      PR  NI    VIRT    RES    SHR S  %CPU  %MEM     TIME+ COMMAND",
//!         "   1234 root      20   0  123456  12345   1234 S   7.0   1.2   0:01.23 myproc",
//!     ],
//! );
//!
//! let tables = analyze_top(&log, DEFAULT_THRESHOLD, &TimeRange::unbounded()).unwrap();
//! let (metric, cpu) = &tables[1];
//! assert_eq!(*metric, Metric::Cpu);
//! assert_eq!(cpu.grid()[1], vec!["2024-01-02 00:01:00", "7.0"]);
//! assert_eq!(cpu.grid()[2], vec!["MAX:", "7.0"]);
//! ```

pub mod app;
pub mod batch;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod export;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use batch::{run_batch, BatchOutcome};
pub use crate::config::{Overrides, Settings};
pub use data::{analyze_free_log, analyze_top, FreeReport, Metric, RankedTable, TimeRange};
pub use error::AnalyzeError;
pub use export::ChartData;
pub use source::{LogFile, LogKind};
pub use toplog_types::{EntityId, MetricTable, Sample, SummaryKind};
