//! Ordered result container for one exchange or one walk.

use crate::oid::Oid;
use crate::varbind::VarBind;
use std::ops::Index;

/// Bindings in wire order.
///
/// Read-only once built: the order is what the agent sent, and walks and
/// bulk paging depend on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarBindList {
    varbinds: Vec<VarBind>,
}

impl VarBindList {
    pub fn new(varbinds: Vec<VarBind>) -> Self {
        Self { varbinds }
    }

    pub fn len(&self) -> usize {
        self.varbinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.varbinds.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&VarBind> {
        self.varbinds.get(index)
    }

    pub fn first(&self) -> Option<&VarBind> {
        self.varbinds.first()
    }

    pub fn last(&self) -> Option<&VarBind> {
        self.varbinds.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VarBind> {
        self.varbinds.iter()
    }

    pub fn as_slice(&self) -> &[VarBind] {
        &self.varbinds
    }

    /// OIDs in order.
    pub fn oids(&self) -> impl Iterator<Item = &Oid> {
        self.varbinds.iter().map(VarBind::oid)
    }

    /// First binding with exactly this OID.
    pub fn find(&self, oid: &Oid) -> Option<&VarBind> {
        self.varbinds.iter().find(|vb| vb.oid() == oid)
    }

    pub fn into_vec(self) -> Vec<VarBind> {
        self.varbinds
    }

    /// Group bindings by root OID.
    ///
    /// Groups appear in the order their root was first seen and each keeps
    /// its bindings in wire order. Bindings without a root form one group
    /// keyed by `None`.
    ///
    /// ```
    /// use typed_snmp::{oid, SnmpType, TypedValue, VarBind, VarBindList};
    ///
    /// let vb = |arcs: &[u32], root: &[u32]| {
    ///     VarBind::new(arcs.into(), TypedValue::new(SnmpType::Integer, "1"))
    ///         .with_root_oid(root.into())
    /// };
    /// let list: VarBindList = vec![
    ///     vb(&[1, 3, 6, 2, 1], &[1, 3, 6, 2]),
    ///     vb(&[1, 3, 6, 1, 1], &[1, 3, 6, 1]),
    ///     vb(&[1, 3, 6, 2, 2], &[1, 3, 6, 2]),
    /// ]
    /// .into_iter()
    /// .collect();
    ///
    /// let groups = list.group_by_root();
    /// assert_eq!(groups.len(), 2);
    /// assert_eq!(groups[0].0, Some(&oid!(1, 3, 6, 2)));
    /// assert_eq!(groups[0].1.len(), 2);
    /// ```
    pub fn group_by_root(&self) -> Vec<(Option<&Oid>, Vec<&VarBind>)> {
        let mut groups: Vec<(Option<&Oid>, Vec<&VarBind>)> = Vec::new();
        for vb in &self.varbinds {
            let root = vb.root_oid();
            match groups.iter_mut().find(|(key, _)| *key == root) {
                Some((_, members)) => members.push(vb),
                None => groups.push((root, vec![vb])),
            }
        }
        groups
    }
}

impl Index<usize> for VarBindList {
    type Output = VarBind;

    fn index(&self, index: usize) -> &VarBind {
        &self.varbinds[index]
    }
}

impl IntoIterator for VarBindList {
    type Item = VarBind;
    type IntoIter = std::vec::IntoIter<VarBind>;

    fn into_iter(self) -> Self::IntoIter {
        self.varbinds.into_iter()
    }
}

impl<'a> IntoIterator for &'a VarBindList {
    type Item = &'a VarBind;
    type IntoIter = std::slice::Iter<'a, VarBind>;

    fn into_iter(self) -> Self::IntoIter {
        self.varbinds.iter()
    }
}

impl FromIterator<VarBind> for VarBindList {
    fn from_iter<I: IntoIterator<Item = VarBind>>(iter: I) -> Self {
        Self {
            varbinds: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<VarBind>> for VarBindList {
    fn from(varbinds: Vec<VarBind>) -> Self {
        Self { varbinds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use crate::typed::{SnmpType, TypedValue};

    fn vb(oid: Oid, value: &str) -> VarBind {
        VarBind::new(oid, TypedValue::new(SnmpType::OctetStr, value))
    }

    fn sample() -> VarBindList {
        VarBindList::new(vec![
            vb(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), "descr"),
            vb(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), "name"),
            vb(oid!(1, 3, 6, 1, 2, 1, 1, 6, 0), "location"),
        ])
    }

    #[test]
    fn test_order_and_access() {
        let list = sample();
        assert_eq!(list.len(), 3);
        assert_eq!(list[1].value().raw(), "name");
        assert_eq!(list.first().unwrap().value().raw(), "descr");
        assert_eq!(list.last().unwrap().value().raw(), "location");
        assert!(list.get(3).is_none());

        let oids: Vec<String> = list.oids().map(|o| o.to_string()).collect();
        assert_eq!(
            oids,
            ["1.3.6.1.2.1.1.1.0", "1.3.6.1.2.1.1.5.0", "1.3.6.1.2.1.1.6.0"]
        );
    }

    #[test]
    fn test_find() {
        let list = sample();
        let found = list.find(&oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)).unwrap();
        assert_eq!(found.value().raw(), "name");
        assert!(list.find(&oid!(1, 3, 6, 1, 2, 1, 1, 4, 0)).is_none());
    }

    #[test]
    fn test_group_by_root_without_roots() {
        let list = sample();
        let groups = list.group_by_root();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, None);
        assert_eq!(groups[0].1.len(), 3);
    }

    #[test]
    fn test_group_by_root_keeps_first_seen_order() {
        let a = oid!(1, 3, 6, 1, 2, 1, 2);
        let b = oid!(1, 3, 6, 1, 2, 1, 1);
        let list: VarBindList = vec![
            vb(a.child(1), "a1").with_root_oid(a.clone()),
            vb(b.child(1), "b1").with_root_oid(b.clone()),
            vb(a.child(2), "a2").with_root_oid(a.clone()),
        ]
        .into_iter()
        .collect();

        let groups = list.group_by_root();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, Some(&a));
        let values: Vec<&str> = groups[0].1.iter().map(|vb| vb.value().raw()).collect();
        assert_eq!(values, ["a1", "a2"]);
        assert_eq!(groups[1].0, Some(&b));
    }

    #[test]
    fn test_iterate_borrowed_and_owned() {
        let list = sample();
        let mut count = 0;
        for vb in &list {
            assert!(vb.oid().starts_with(&oid!(1, 3, 6, 1, 2, 1, 1)));
            count += 1;
        }
        assert_eq!(count, 3);
        assert_eq!(list.into_iter().count(), 3);
    }
}
