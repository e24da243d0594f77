//! The recursive key model.
//!
//! A [`Key`] is either a leaf, carrying raw public key material (or, for the contract variant,
//! a reference to the contract that controls it), or a composite made of child keys. A
//! [`KeyList`] is active when the required number of its children are active, which by default
//! is all of them; a [`ThresholdKey`] is active when at least its threshold of children are.
//!
//! Key equality is structural: two keys are equal when they have the same variant, the same
//! key material and the same children in the same order. This is the "equal up to
//! decodability" comparison used when deciding whether a candidate key list is a file's
//! current access-control list.

pub mod traversal;

use alloc::vec::Vec;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{entity::ContractId, sig_map::SignatureKind};

#[cfg(feature = "serde")]
use crate::with_serde;

/// Length in bytes of an Ed25519 public key.
pub const ED25519_KEY_LEN: usize = 32;

/// Length in bytes of a SEC1 compressed ECDSA P-384 public key.
pub const ECDSA_P384_COMPRESSED_LEN: usize = 49;

/// Length in bytes of a SEC1 uncompressed ECDSA P-384 public key.
pub const ECDSA_P384_UNCOMPRESSED_LEN: usize = 97;

/// An authorization key, either a leaf or a composite of child keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum Key {
    /// A 32-byte Ed25519 public key.
    Ed25519(#[cfg_attr(feature = "serde", serde(with = "with_serde::hex_bytes"))] Vec<u8>),

    /// A SEC1-encoded ECDSA public key on curve P-384.
    EcdsaP384(#[cfg_attr(feature = "serde", serde(with = "with_serde::hex_bytes"))] Vec<u8>),

    /// A DER-encoded RSA-3072 public key.
    Rsa3072(#[cfg_attr(feature = "serde", serde(with = "with_serde::hex_bytes"))] Vec<u8>),

    /// A key controlled by a smart contract rather than by any signature.
    ContractId(ContractId),

    /// A list of keys, all of which must be active by default.
    KeyList(KeyList),

    /// A threshold of keys, at least `threshold` of which must be active.
    Threshold(ThresholdKey),
}

/// An ordered list of child keys.
///
/// Order does not affect activation, but it is part of the key's identity when two lists are
/// compared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct KeyList(Vec<Key>);

/// A threshold key: `threshold` of the child keys must be active.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThresholdKey {
    threshold: u32,
    keys: KeyList,
}

impl Key {
    /// Returns `true` for leaf keys.
    pub fn is_simple(&self) -> bool {
        !matches!(self, Self::KeyList(_) | Self::Threshold(_))
    }

    /// Returns `true` if this key has no usable material anywhere in its structure.
    ///
    /// A leaf is empty when its material is empty (for a contract key, when it references the
    /// sentinel id). A composite is empty when it has no children or all of them are empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Ed25519(bz) | Self::EcdsaP384(bz) | Self::Rsa3072(bz) => bz.is_empty(),
            Self::ContractId(id) => id.is_missing(),
            Self::KeyList(list) => list.is_empty(),
            Self::Threshold(threshold) => threshold.is_empty(),
        }
    }

    /// Returns `true` if this key is well formed.
    ///
    /// Leaves must carry material of the expected shape for their variant; composites must be
    /// non-empty with every child valid, and threshold keys must satisfy
    /// `1 <= threshold <= children`.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Ed25519(bz) => bz.len() == ED25519_KEY_LEN,
            Self::EcdsaP384(bz) => is_sec1_p384(bz),
            Self::Rsa3072(bz) => !bz.is_empty(),
            Self::ContractId(id) => !id.is_missing(),
            Self::KeyList(list) => list.is_valid(),
            Self::Threshold(threshold) => threshold.is_valid(),
        }
    }

    /// Returns the raw public key material of a cryptographic leaf.
    ///
    /// Contract keys and composites have no public key material.
    pub fn primitive_key(&self) -> Option<&[u8]> {
        match self {
            Self::Ed25519(bz) | Self::EcdsaP384(bz) | Self::Rsa3072(bz) => Some(bz),
            _ => None,
        }
    }

    /// Returns the signature scheme of a leaf key, or `None` for composites.
    pub fn signature_kind(&self) -> Option<SignatureKind> {
        match self {
            Self::Ed25519(_) => Some(SignatureKind::Ed25519),
            Self::EcdsaP384(_) => Some(SignatureKind::EcdsaP384),
            Self::Rsa3072(_) => Some(SignatureKind::Rsa3072),
            Self::ContractId(_) => Some(SignatureKind::Contract),
            Self::KeyList(_) | Self::Threshold(_) => None,
        }
    }

    /// Returns the child keys of a composite, or an empty slice for leaves.
    pub fn children(&self) -> &[Key] {
        match self {
            Self::KeyList(list) => list.keys(),
            Self::Threshold(threshold) => threshold.keys().keys(),
            _ => &[],
        }
    }

    /// Returns the key list if this key is one.
    pub fn as_key_list(&self) -> Option<&KeyList> {
        match self {
            Self::KeyList(list) => Some(list),
            _ => None,
        }
    }

    /// Returns the threshold key if this key is one.
    pub fn as_threshold_key(&self) -> Option<&ThresholdKey> {
        match self {
            Self::Threshold(threshold) => Some(threshold),
            _ => None,
        }
    }
}

impl KeyList {
    /// Creates a key list from its children.
    pub fn new(keys: Vec<Key>) -> Self {
        Self(keys)
    }

    /// Creates a key list without children.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Returns the child keys in order.
    pub fn keys(&self) -> &[Key] {
        &self.0
    }

    /// Returns the number of direct children.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the list has no children or every child is empty.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Key::is_empty)
    }

    /// Returns `true` if the list is non-empty and every child is valid.
    pub fn is_valid(&self) -> bool {
        !self.is_empty() && self.0.iter().all(Key::is_valid)
    }

    /// Returns an iterator over the child keys.
    pub fn iter(&self) -> core::slice::Iter<'_, Key> {
        self.0.iter()
    }

    /// Consumes the list, returning its children.
    pub fn into_inner(self) -> Vec<Key> {
        self.0
    }
}

impl ThresholdKey {
    /// Creates a threshold key.
    ///
    /// The threshold is not checked here; use [`is_valid`](Self::is_valid) to enforce
    /// `1 <= threshold <= children`, since transaction bodies may carry malformed keys that
    /// must still be represented.
    pub fn new(threshold: u32, keys: KeyList) -> Self {
        Self { threshold, keys }
    }

    /// Returns the required number of active children.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Returns the child keys.
    pub fn keys(&self) -> &KeyList {
        &self.keys
    }

    /// Returns `true` if the child list is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns `true` if the child list is valid and the threshold is within its bounds.
    pub fn is_valid(&self) -> bool {
        // a u32 threshold always fits a usize on supported targets
        let threshold = self.threshold as usize;
        !self.is_empty() && threshold >= 1 && threshold <= self.keys.len() && self.keys.is_valid()
    }
}

impl From<KeyList> for Key {
    fn from(list: KeyList) -> Self {
        Self::KeyList(list)
    }
}

impl From<ThresholdKey> for Key {
    fn from(threshold: ThresholdKey) -> Self {
        Self::Threshold(threshold)
    }
}

impl FromIterator<Key> for KeyList {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a KeyList {
    type Item = &'a Key;
    type IntoIter = core::slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519(bz) => write!(f, "ed25519:{}", hex::encode(bz)),
            Self::EcdsaP384(bz) => write!(f, "ecdsa_p384:{}", hex::encode(bz)),
            Self::Rsa3072(bz) => write!(f, "rsa_3072:{}", hex::encode(bz)),
            Self::ContractId(id) => write!(f, "contract:{id}"),
            Self::KeyList(list) => write!(f, "{list}"),
            Self::Threshold(threshold) => write!(f, "{threshold}"),
        }
    }
}

impl fmt::Display for KeyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (idx, key) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}")?;
        }
        f.write_str("]")
    }
}

impl fmt::Display for ThresholdKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}of{}", self.threshold, self.keys)
    }
}

fn is_sec1_p384(bz: &[u8]) -> bool {
    match (bz.len(), bz.first()) {
        (ECDSA_P384_COMPRESSED_LEN, Some(0x02 | 0x03)) => true,
        (ECDSA_P384_UNCOMPRESSED_LEN, Some(0x04)) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec};

    use proptest::prelude::*;

    use super::*;

    fn ed25519(byte: u8) -> Key {
        Key::Ed25519(vec![byte; ED25519_KEY_LEN])
    }

    #[test]
    fn key_list_of_empty_leaves_is_empty() {
        let list = KeyList::new(vec![Key::Ed25519(vec![]), Key::Rsa3072(vec![])]);

        assert!(list.is_empty());
        assert!(!list.is_valid());
    }

    #[test]
    fn key_list_with_one_material_leaf_is_not_empty() {
        let list = KeyList::new(vec![Key::Ed25519(vec![]), ed25519(1)]);

        assert!(!list.is_empty());
        // the empty leaf is still invalid
        assert!(!list.is_valid());
    }

    #[test]
    fn emptiness_is_recursive() {
        let nested = KeyList::new(vec![
            KeyList::empty().into(),
            ThresholdKey::new(1, KeyList::new(vec![Key::Ed25519(vec![])])).into(),
        ]);

        assert!(nested.is_empty());
    }

    #[test]
    fn leaf_validity_depends_on_shape() {
        assert!(ed25519(7).is_valid());
        assert!(!Key::Ed25519(vec![7; 31]).is_valid());

        let mut compressed = vec![0u8; ECDSA_P384_COMPRESSED_LEN];
        compressed[0] = 0x03;
        assert!(Key::EcdsaP384(compressed.clone()).is_valid());
        compressed[0] = 0x04;
        assert!(!Key::EcdsaP384(compressed).is_valid());

        let mut uncompressed = vec![0u8; ECDSA_P384_UNCOMPRESSED_LEN];
        uncompressed[0] = 0x04;
        assert!(Key::EcdsaP384(uncompressed).is_valid());

        assert!(Key::Rsa3072(vec![1, 2, 3]).is_valid());
        assert!(Key::ContractId(ContractId::from_num(9)).is_valid());
        assert!(!Key::ContractId(ContractId::MISSING).is_valid());
    }

    #[test]
    fn threshold_validity_bounds() {
        let children = KeyList::new(vec![ed25519(1), ed25519(2), ed25519(3)]);

        assert!(!ThresholdKey::new(0, children.clone()).is_valid());
        assert!(ThresholdKey::new(1, children.clone()).is_valid());
        assert!(ThresholdKey::new(3, children.clone()).is_valid());
        assert!(!ThresholdKey::new(4, children).is_valid());
    }

    #[test]
    fn equality_is_structural_and_order_sensitive() {
        let a = KeyList::new(vec![ed25519(1), ed25519(2)]);
        let b = KeyList::new(vec![ed25519(1), ed25519(2)]);
        let c = KeyList::new(vec![ed25519(2), ed25519(1)]);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn displays_nested_structure() {
        let key: Key = ThresholdKey::new(
            1,
            KeyList::new(vec![Key::ContractId(ContractId::from_num(4)), Key::Rsa3072(vec![0xab])]),
        )
        .into();

        assert_eq!(key.to_string(), "1of[contract:0.0.4, rsa_3072:ab]");
    }

    fn arb_leaf() -> impl Strategy<Value = Key> {
        prop_oneof![
            prop::collection::vec(any::<u8>(), 0..=ED25519_KEY_LEN).prop_map(Key::Ed25519),
            prop::collection::vec(any::<u8>(), 0..4).prop_map(Key::Rsa3072),
            (0u64..3).prop_map(|num| Key::ContractId(ContractId::from_num(num))),
        ]
    }

    fn arb_key() -> impl Strategy<Value = Key> {
        arb_leaf().prop_recursive(3, 16, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4)
                    .prop_map(|keys| Key::KeyList(KeyList::new(keys))),
                (0u32..5, prop::collection::vec(inner, 0..4))
                    .prop_map(|(t, keys)| Key::Threshold(ThresholdKey::new(t, KeyList::new(keys)))),
            ]
        })
    }

    proptest! {
        #[test]
        fn composite_is_invalid_whenever_a_child_is_invalid(keys in prop::collection::vec(arb_key(), 1..5)) {
            let list = KeyList::new(keys);
            if list.iter().any(|k| !k.is_valid()) {
                prop_assert!(!list.is_valid());
            }
        }

        #[test]
        fn composite_is_empty_iff_all_children_are_empty(keys in prop::collection::vec(arb_key(), 0..5)) {
            let list = KeyList::new(keys);
            prop_assert_eq!(list.is_empty(), list.iter().all(Key::is_empty));
        }

        #[test]
        fn valid_keys_are_never_empty(key in arb_key()) {
            if key.is_valid() {
                prop_assert!(!key.is_empty());
            }
        }
    }
}
