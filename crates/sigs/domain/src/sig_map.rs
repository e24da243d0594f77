//! Signatures attached to a transaction.
//!
//! A [`SignatureMap`] is a list of (public key prefix, signature) pairs. The prefix only has
//! to be long enough to tell the signing keys of one transaction apart; an empty prefix is
//! legal when the map carries a single signature.

use alloc::vec::Vec;

use bon::Builder;
use dissolve_derive::Dissolve;
use strum::{Display, EnumString, IntoStaticStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The signature scheme of a leaf key or of an attached signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum SignatureKind {
    /// Ed25519 over the signed bytes.
    Ed25519,
    /// ECDSA over curve P-384.
    EcdsaP384,
    /// RSA-3072.
    Rsa3072,
    /// A contract "signature", which can never be satisfied by signature bytes.
    Contract,
}

/// A single signature with the prefix of the public key that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Dissolve)]
#[cfg_attr(feature = "serde", serde_with::serde_as, derive(Serialize, Deserialize))]
pub struct SignaturePair {
    /// Leading bytes of the signing public key.
    #[cfg_attr(feature = "serde", serde_as(as = "serde_with::hex::Hex"))]
    pub_key_prefix: Vec<u8>,

    /// The scheme the signature was produced with.
    kind: SignatureKind,

    /// The signature bytes.
    #[cfg_attr(feature = "serde", serde_as(as = "serde_with::hex::Hex"))]
    signature: Vec<u8>,
}

/// All signatures attached to a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct SignatureMap(Vec<SignaturePair>);

impl SignaturePair {
    /// Returns the public key prefix.
    pub fn pub_key_prefix(&self) -> &[u8] {
        &self.pub_key_prefix
    }

    /// Returns the signature scheme.
    pub fn kind(&self) -> SignatureKind {
        self.kind
    }

    /// Returns the signature bytes.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Returns `true` if this pair's prefix is a prefix of `pub_key`.
    pub fn matches(&self, pub_key: &[u8]) -> bool {
        pub_key.starts_with(&self.pub_key_prefix)
    }
}

impl SignatureMap {
    /// Creates a signature map from its pairs.
    pub fn new(pairs: Vec<SignaturePair>) -> Self {
        Self(pairs)
    }

    /// Returns the signature pairs in attachment order.
    pub fn pairs(&self) -> &[SignaturePair] {
        &self.0
    }

    /// Returns the number of attached signatures.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no signatures are attached.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends a signature pair.
    pub fn push(&mut self, pair: SignaturePair) {
        self.0.push(pair);
    }
}

impl FromIterator<SignaturePair> for SignatureMap {
    fn from_iter<I: IntoIterator<Item = SignaturePair>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
