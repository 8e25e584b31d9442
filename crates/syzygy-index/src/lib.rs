//! Pure index-processing layer for a Syzygy tablebase mirror.
//!
//! The mirror serves a plain HTML directory listing; [`scan`] extracts link
//! targets from it without building a DOM, and [`classify`] turns raw table
//! names into ordered [`TableEntry`] values filtered by piece count. Nothing
//! in this crate performs I/O.

mod classify;
mod scan;

pub use classify::{PIECE_LETTERS, TableEntry, classify_tables, piece_count};
pub use scan::{StartTagSink, TABLE_SUFFIX, collect_table_links, scan_start_tags};
