//! Test OIDs and a small device MIB.

use std::collections::BTreeMap;
use typed_snmp::{Oid, Value, oid};

pub const COMMUNITY: &[u8] = b"public";

pub fn sys_descr() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)
}
pub fn sys_object_id() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 2, 0)
}
pub fn sys_uptime() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)
}
pub fn sys_name() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)
}
pub fn sys_services() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 7, 0)
}

/// 1.3.6.1.2.1.1
pub fn system_subtree() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1)
}

/// ifDescr column: 1.3.6.1.2.1.2.2.1.2
pub fn if_descr() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2)
}

/// ifInOctets column: 1.3.6.1.2.1.2.2.1.10
pub fn if_in_octets() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10)
}

/// ifTable: 1.3.6.1.2.1.2.2
pub fn if_table() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 2, 2)
}

pub fn nonexistent_oid() -> Oid {
    oid!(1, 3, 6, 1, 99, 99, 99, 0)
}

/// A switch with three interfaces.
pub fn device_mib() -> BTreeMap<Oid, Value> {
    let mut mib = BTreeMap::new();
    mib.insert(sys_descr(), Value::from("Fake switch\r\nrev 2"));
    mib.insert(
        sys_object_id(),
        Value::ObjectIdentifier(oid!(1, 3, 6, 1, 4, 1, 8072, 3, 2, 10)),
    );
    mib.insert(sys_uptime(), Value::TimeTicks(8_640_000));
    mib.insert(sys_name(), Value::from("sw-lab-01"));
    mib.insert(sys_services(), Value::Integer(72));

    for (index, name) in [(1u32, "lo"), (2, "eth0"), (3, "eth1")] {
        mib.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 1, index), Value::Integer(index as i32));
        mib.insert(if_descr().child(index), Value::from(name));
        mib.insert(
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 5, index),
            Value::Gauge32(1_000_000_000),
        );
        mib.insert(
            if_in_octets().child(index),
            Value::Counter32(u32::MAX - index),
        );
    }

    mib.insert(
        oid!(1, 3, 6, 1, 2, 1, 4, 20, 1, 1, 10, 0, 0, 1),
        Value::IpAddress([10, 0, 0, 1]),
    );
    mib.insert(
        oid!(1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 6, 2),
        Value::Counter64(u64::MAX),
    );
    mib
}
