//! Console renderers for the updated table.
//!
//! - [`terminal`] — head/tail preview tables and the run summary box.
//!
//! JSON output (`--report json`) is printed directly from `main`.

pub mod terminal;
