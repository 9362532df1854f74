//! Common imports.
//!
//! ```rust
//! use typed_snmp::prelude::*;
//!
//! let value = TypedValue::new(SnmpType::Gauge, "1000000000");
//! assert_eq!(value.native_value().unwrap(), NativeValue::Unsigned(1_000_000_000));
//! assert_eq!(oid!(1, 3, 6, 1).to_string(), "1.3.6.1");
//! ```

pub use crate::error::{Error, Result};
pub use crate::oid::Oid;
pub use crate::session::{Session, WalkMode};
pub use crate::typed::{NativeValue, SnmpType, TypedValue};
pub use crate::value::Value;
pub use crate::varbind::VarBind;
pub use crate::varbind_list::VarBindList;
pub use crate::version::Version;

#[doc(no_inline)]
pub use crate::oid;
