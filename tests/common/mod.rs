//! Shared helpers for typed-snmp integration tests.

// Not every test binary uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

mod agent;
mod fixtures;
mod stream;

pub use agent::*;
pub use fixtures::*;
pub use stream::collect_stream;
