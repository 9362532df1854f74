//! Support code for the `tsnmp-*` command-line tools.
//!
//! Only available with the `cli` feature.

pub mod args;
pub mod hints;
pub mod output;
