//! Depth-first, left-to-right traversal of key structures.
//!
//! Traversal visits leaf ("simple") keys only. Composite nodes are descended into in child
//! order, so the visit order of a key is a pure function of its structure.

use alloc::vec::Vec;

use super::Key;

/// Visits every leaf of `key`, depth first and left to right.
pub fn visit_simple_keys<'a, F>(key: &'a Key, visitor: &mut F)
where
    F: FnMut(&'a Key),
{
    if key.is_simple() {
        visitor(key);
        return;
    }

    for child in key.children() {
        visit_simple_keys(child, visitor);
    }
}

/// Visits every leaf of every key in `keys`, in order.
pub fn visit_all_simple_keys<'a, I, F>(keys: I, visitor: &mut F)
where
    I: IntoIterator<Item = &'a Key>,
    F: FnMut(&'a Key),
{
    for key in keys {
        visit_simple_keys(key, visitor);
    }
}

/// Returns the number of leaves in `key`.
pub fn count_simple_keys(key: &Key) -> usize {
    let mut count = 0;
    visit_simple_keys(key, &mut |_| count += 1);
    count
}

/// Returns the number of leaves across all of `keys`.
pub fn count_all_simple_keys<'a, I>(keys: I) -> usize
where
    I: IntoIterator<Item = &'a Key>,
{
    keys.into_iter().map(count_simple_keys).sum()
}

/// Collects the leaves of `key` in visit order.
pub fn simple_keys(key: &Key) -> Vec<&Key> {
    let mut leaves = Vec::new();
    visit_simple_keys(key, &mut |leaf| leaves.push(leaf));
    leaves
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::{
        entity::ContractId,
        key::{KeyList, ThresholdKey},
    };

    fn leaf(byte: u8) -> Key {
        Key::Ed25519(vec![byte; 32])
    }

    #[test]
    fn visits_leaves_depth_first_left_to_right() {
        let key: Key = KeyList::new(vec![
            leaf(1),
            ThresholdKey::new(1, KeyList::new(vec![leaf(2), KeyList::new(vec![leaf(3)]).into()]))
                .into(),
            Key::ContractId(ContractId::from_num(4)),
        ])
        .into();

        let leaves = simple_keys(&key);

        assert_eq!(
            leaves,
            vec![&leaf(1), &leaf(2), &leaf(3), &Key::ContractId(ContractId::from_num(4))]
        );
    }

    #[test]
    fn counts_leaves_across_keys() {
        let keys = [
            leaf(1),
            KeyList::new(vec![leaf(2), leaf(3)]).into(),
            KeyList::empty().into(),
        ];

        assert_eq!(count_simple_keys(&keys[1]), 2);
        assert_eq!(count_all_simple_keys(&keys), 3);
    }
}
