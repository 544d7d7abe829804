//! Output of consolidated ranges.
//!
//! This module handles formatting and outputting the run results:
//! - [`report`] - JSON artifact file
//! - [`terminal`] - run summary on the terminal

pub mod report;
pub mod terminal;

pub use report::{read_report, render_report, timestamp, write_report, Report};
pub use terminal::print_summary;
