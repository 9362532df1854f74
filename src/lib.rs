//! Async SNMPv1/v2c request sessions with typed variable bindings.
//!
//! A [`Session`] sends GET, GETNEXT, GETBULK and SET requests to one agent
//! and returns a [`VarBindList`]. Every binding carries a [`TypedValue`]: the
//! agent's value as text together with its [`SnmpType`], converted to a
//! native integer on demand. Walks ([`Walk`], [`BulkWalk`]) are lazy
//! streams over a subtree.
//!
//! ```rust,no_run
//! use typed_snmp::{oid, Session};
//!
//! # async fn example() -> typed_snmp::Result<()> {
//! let session = Session::v2c("192.168.1.1:161")
//!     .community(b"public")
//!     .connect()
//!     .await?;
//!
//! let uptime = session.get(&[oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)]).await?;
//! println!("{}", uptime[0]);
//!
//! let interfaces = session
//!     .walk(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2))
//!     .collect_all()
//!     .await?;
//! for vb in &interfaces {
//!     println!("ifDescr.{} = {}", vb.oid_index(), vb.value().raw());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber.
//! Fields use an `snmp.` prefix:
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `snmp.target` | agent address |
//! | `snmp.request_id` | request-id of the exchange |
//! | `snmp.pdu_type` | request PDU kind |
//! | `snmp.varbind_count` | bindings sent or received |
//! | `snmp.error_status` / `snmp.error_index` | agent-reported error |
//! | `snmp.max_repetitions` | GETBULK page size |
//! | `snmp.root_oid` | walk root |
//! | `snmp.bytes` | datagram size |
//! | `snmp.timeout_ms` | receive deadline |

#![allow(clippy::result_large_err)]

pub mod ber;
pub mod codec;
pub mod error;
pub mod message;
pub mod oid;
pub mod pdu;
pub mod prelude;
pub mod session;
pub mod transport;
pub mod typed;
pub mod value;
pub mod varbind;
pub mod varbind_list;
pub mod version;

#[cfg(feature = "cli")]
pub mod cli;

pub(crate) mod util;

pub use error::{Error, ErrorStatus, Result};
pub use oid::Oid;
pub use session::{BulkWalk, Session, SessionConfig, Walk, WalkMode, WalkStream};
pub use transport::{Transport, UdpTransport};
pub use typed::{NativeValue, SnmpType, TypedValue};
pub use value::Value;
pub use varbind::VarBind;
pub use varbind_list::VarBindList;
pub use version::Version;
