//! Library half of the `graft` command line tool.
//!
//! - `demo`: the demonstration sequence and its payloads
//! - `format`: output formatting
//! - `watch`: re-applying a schema file on every write

pub mod demo;
mod format;
pub mod watch;

pub use format::{render, section};
