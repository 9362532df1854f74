//! Variable bindings and OID normalization.
//!
//! A [`VarBind`] pairs a full OID with its instance index, a
//! [`TypedValue`], and the root OID of the request that produced it.

use crate::codec::RawBinding;
use crate::error::Result;
use crate::oid::Oid;
use crate::typed::{TypedValue, sanitize};
use std::fmt;

/// One (OID, value) binding as returned by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarBind {
    oid: Oid,
    oid_index: Oid,
    value: TypedValue,
    root_oid: Option<Oid>,
}

impl VarBind {
    /// Create a binding whose index is the final arc of `oid`.
    pub fn new(oid: Oid, value: TypedValue) -> Self {
        let oid_index = last_arc_of(&oid);
        Self {
            oid,
            oid_index,
            value,
            root_oid: None,
        }
    }

    /// Create a binding from OID text and an optional separate index.
    ///
    /// See [`normalize_oid`] for how the two are combined.
    ///
    /// ```
    /// use typed_snmp::{SnmpType, TypedValue, VarBind};
    ///
    /// let vb = VarBind::from_parts(
    ///     "1.3.6.1.2.1.2.2.1.10",
    ///     Some("5"),
    ///     TypedValue::new(SnmpType::Counter, "1234"),
    /// )
    /// .unwrap();
    /// assert_eq!(vb.oid().to_string(), "1.3.6.1.2.1.2.2.1.10.5");
    /// assert_eq!(vb.oid_index().to_string(), "5");
    /// ```
    pub fn from_parts(oid_text: &str, index_text: Option<&str>, value: TypedValue) -> Result<Self> {
        let (oid, oid_index) = normalize_oid(oid_text, index_text)?;
        Ok(Self {
            oid,
            oid_index,
            value,
            root_oid: None,
        })
    }

    /// Full OID, index included.
    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// Instance index split from the end of [`oid`](Self::oid).
    pub fn oid_index(&self) -> &Oid {
        &self.oid_index
    }

    pub fn value(&self) -> &TypedValue {
        &self.value
    }

    /// The OID the producing request was issued against, set for walk results.
    pub fn root_oid(&self) -> Option<&Oid> {
        self.root_oid.as_ref()
    }

    /// Record the request root this binding belongs to.
    pub fn with_root_oid(mut self, root: Oid) -> Self {
        self.root_oid = Some(root);
        self
    }

    pub fn into_value(self) -> TypedValue {
        self.value
    }
}

impl From<RawBinding> for VarBind {
    fn from(raw: RawBinding) -> Self {
        VarBind::new(raw.oid, TypedValue::new(raw.snmp_type, raw.raw))
    }
}

impl fmt::Display for VarBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.oid, self.value)
    }
}

/// Clean OID text from outside the crate: control characters and
/// surrounding whitespace go, as does a leading dot.
pub fn sanitize_oid_text(text: &str) -> String {
    let clean = sanitize(text);
    let trimmed = clean.trim();
    trimmed.strip_prefix('.').unwrap_or(trimmed).to_string()
}

/// Split OID text and an optional index into a `(oid, index)` pair.
///
/// - No index (or an empty one): `oid` is the text as given and the index is
///   its final arc.
/// - An explicit index is appended to the OID, unless the OID already ends
///   with it, so normalizing a normalized pair changes nothing.
/// - Neither given: both are empty.
///
/// The suffix test compares arcs, not meaning. A column OID whose last
/// arc equals the index is taken as already carrying it:
/// `normalize_oid("1.3.6.1.2.1.2.2.1.10", Some("10"))` yields ifInOctets
/// itself with index `10`, not `ifInOctets.10`. Pass the instance in the
/// OID text when the column number and index can coincide.
///
/// ```
/// use typed_snmp::varbind::normalize_oid;
///
/// let (oid, index) = normalize_oid("1.3.6.1.2.1.1.1.3", None).unwrap();
/// assert_eq!((oid.to_string().as_str(), index.to_string().as_str()), ("1.3.6.1.2.1.1.1.3", "3"));
///
/// let again = normalize_oid(&oid.to_string(), Some(&index.to_string())).unwrap();
/// assert_eq!(again, (oid, index));
/// ```
pub fn normalize_oid(oid_text: &str, index_text: Option<&str>) -> Result<(Oid, Oid)> {
    let base = Oid::parse(&sanitize_oid_text(oid_text))?;

    let index = match index_text {
        Some(text) => Oid::parse(&sanitize_oid_text(text))?,
        None => Oid::empty(),
    };

    if index.is_empty() {
        let index = last_arc_of(&base);
        Ok((base, index))
    } else if base.ends_with(&index) {
        Ok((base, index))
    } else {
        Ok((base.join(&index), index))
    }
}

fn last_arc_of(oid: &Oid) -> Oid {
    oid.last_arc()
        .map(|arc| Oid::from_slice(&[arc]))
        .unwrap_or_default()
}
