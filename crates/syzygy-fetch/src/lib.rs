//! HTTP fetching of the mirror index and streaming table downloads with
//! atomic placement.
//!
//! # Architecture
//!
//! - [`data`] - Immutable options and per-transfer reports
//! - [`effects`] - I/O behind the [`HttpClient`] trait abstraction
//!
//! # Key properties
//!
//! - **Atomic placement**: a table streams into a `.part` sibling and only
//!   reaches its final name through one rename, so a reader never observes
//!   a partially written table.
//! - **Mechanism-only**: no retry, no concurrency, no progress UI; the
//!   caller owns run orchestration and reporting.

mod data;
mod effects;
mod error;

pub use data::{DownloadOutcome, DownloadReport, FetchOptions, format_bytes};
pub use effects::{BoxStream, Fetcher, HttpClient};
pub use error::FetchError;

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;
