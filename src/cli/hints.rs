//! Names for well-known OIDs.
//!
//! A small fixed table used to annotate output and to accept names on the
//! command line. This is not MIB support.

use crate::Oid;
use crate::varbind::sanitize_oid_text;

static WELL_KNOWN_OIDS: &[(&[u32], &str)] = &[
    // SNMPv2-MIB::system
    (&[1, 3, 6, 1, 2, 1, 1], "system"),
    (&[1, 3, 6, 1, 2, 1, 1, 1], "sysDescr"),
    (&[1, 3, 6, 1, 2, 1, 1, 2], "sysObjectID"),
    (&[1, 3, 6, 1, 2, 1, 1, 3], "sysUpTime"),
    (&[1, 3, 6, 1, 2, 1, 1, 4], "sysContact"),
    (&[1, 3, 6, 1, 2, 1, 1, 5], "sysName"),
    (&[1, 3, 6, 1, 2, 1, 1, 6], "sysLocation"),
    (&[1, 3, 6, 1, 2, 1, 1, 7], "sysServices"),
    // IF-MIB::interfaces
    (&[1, 3, 6, 1, 2, 1, 2], "interfaces"),
    (&[1, 3, 6, 1, 2, 1, 2, 1], "ifNumber"),
    (&[1, 3, 6, 1, 2, 1, 2, 2], "ifTable"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1], "ifEntry"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 1], "ifIndex"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 2], "ifDescr"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 3], "ifType"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 4], "ifMtu"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 5], "ifSpeed"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 6], "ifPhysAddress"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 7], "ifAdminStatus"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 8], "ifOperStatus"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 10], "ifInOctets"),
    (&[1, 3, 6, 1, 2, 1, 2, 2, 1, 16], "ifOutOctets"),
    // IF-MIB::ifXTable
    (&[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 1], "ifName"),
    (&[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 6], "ifHCInOctets"),
    (&[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 10], "ifHCOutOctets"),
    (&[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 18], "ifAlias"),
];

/// Name an OID by its longest well-known prefix.
///
/// The unmatched arcs are kept as a dotted suffix, so
/// `1.3.6.1.2.1.2.2.1.2.3` is `ifDescr.3`.
pub fn lookup(oid: &Oid) -> Option<String> {
    let arcs = oid.arcs();
    let (prefix, name) = WELL_KNOWN_OIDS
        .iter()
        .filter(|(prefix, _)| arcs.starts_with(prefix))
        .max_by_key(|(prefix, _)| prefix.len())?;

    let mut hint = (*name).to_string();
    for arc in &arcs[prefix.len()..] {
        hint.push('.');
        hint.push_str(&arc.to_string());
    }
    Some(hint)
}

/// Parse a command-line OID: dotted digits, or a well-known name with an
/// optional dotted suffix (`sysDescr.0`, `ifDescr.3`, `system`).
pub fn parse_oid(s: &str) -> Result<Oid, String> {
    let text = sanitize_oid_text(s);

    if text.starts_with(|c: char| c.is_ascii_digit()) {
        return Oid::parse(&text).map_err(|e| format!("invalid OID '{}': {}", s, e));
    }

    let (name, suffix) = match text.split_once('.') {
        Some((name, suffix)) => (name, Some(suffix)),
        None => (text.as_str(), None),
    };

    let (arcs, _) = WELL_KNOWN_OIDS
        .iter()
        .find(|(_, known)| known.eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            format!(
                "unknown OID name '{}'; use dotted notation (e.g. 1.3.6.1.2.1.1.1.0)",
                s
            )
        })?;

    let base = Oid::from_slice(arcs);
    match suffix {
        Some(suffix) => {
            let suffix = Oid::parse(suffix).map_err(|e| format!("invalid OID '{}': {}", s, e))?;
            Ok(base.join(&suffix))
        }
        None => Ok(base),
    }
}
