//! # Getting Started
//! Add the following to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! tablecharts = "*"
//! ```
//!
//! ```rust,no_run
//! use tablecharts::chart::{pie_chart, time_chart, TimeChartOptions};
//! use tablecharts::render::{ChartWriter, ImageWriter, TermWriter};
//! use tablecharts::stats::Point;
//!
//! // Daily row count of a table, with trend and moving average
//! let points: Vec<Point> = (1..=30)
//!     .map(|day| Point::new(1_600_000_000.0 + 86400.0 * day as f64, 100.0 * day as f64))
//!     .collect();
//! let growth = time_chart("users", "Date", "Rows", &points, TimeChartOptions::default());
//!
//! // Biggest tables, the rest merged into "Other"
//! let labels = vec!["users".to_string(), "orders".to_string(), "logs".to_string()];
//! let sizes = pie_chart("Table sizes", &labels, &[5e9, 2e9, 1e6], 2);
//!
//! let mut term = TermWriter::stdout();
//! let mut images = ImageWriter::default();
//! for chart in [&growth, &sizes] {
//!     term.write(chart).unwrap();
//!     images.write(chart).unwrap();
//! }
//! ```

#[macro_use]
extern crate log;
#[macro_use]
extern crate derive_builder;

pub mod chart;
mod error;
pub mod format;
pub mod read;
pub mod render;
pub mod stats;

pub use error::ChartError;
