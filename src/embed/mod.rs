//! Embedded browser UI.
//!
//! The single-page UI is compiled into the binary, so the server ships
//! without an on-disk asset directory.

/// Landing page served at `/`.
pub const INDEX_HTML: &str = include_str!("index.html");
