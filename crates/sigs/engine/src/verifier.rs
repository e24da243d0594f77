//! Leaf-signature verification.
//!
//! The activation checker hands every leaf signature of a transaction to a [`SyncVerifier`] in
//! one call and folds the verdicts afterwards. A verifier may parallelize internally, but the
//! call itself returns only once every verdict is known, in input order.

use core::num::NonZeroUsize;

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use ledger_sigs_domain::SignatureKind;
use rayon::prelude::*;
use strum::{Display, IntoStaticStr};

/// One leaf signature to verify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSignature<'a> {
    kind: SignatureKind,
    public_key: &'a [u8],
    signature: Vec<u8>,
    message: &'a [u8],
}

/// The verdict on one leaf signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum VerificationStatus {
    /// The signature is valid for the public key and message.
    Valid,
    /// The signature is not valid, or uses an unsupported scheme.
    Invalid,
    /// No verdict was reached.
    Unknown,
}

/// Verifies a batch of leaf signatures synchronously.
pub trait SyncVerifier {
    /// Returns one verdict per entry of `batch`, in the same order.
    fn verify_sync(&self, batch: &[TransactionSignature<'_>]) -> Vec<VerificationStatus>;
}

/// Verifies a single leaf signature. Implementations must be usable from several threads.
pub trait LeafVerifier: Sync {
    /// Returns the verdict on `signature`.
    fn verify(&self, signature: &TransactionSignature<'_>) -> VerificationStatus;
}

impl<'a> TransactionSignature<'a> {
    /// Creates a batch entry.
    pub fn new(
        kind: SignatureKind,
        public_key: &'a [u8],
        signature: Vec<u8>,
        message: &'a [u8],
    ) -> Self {
        Self { kind, public_key, signature, message }
    }

    /// Returns the signature scheme.
    pub fn kind(&self) -> SignatureKind {
        self.kind
    }

    /// Returns the public key.
    pub fn public_key(&self) -> &[u8] {
        self.public_key
    }

    /// Returns the candidate signature bytes.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Returns the signed bytes.
    pub fn message(&self) -> &[u8] {
        self.message
    }
}

/// Verifies Ed25519 signatures. Other schemes are reported [`VerificationStatus::Invalid`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl Ed25519Verifier {
    fn verify_ed25519(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        let Ok(key) = VerifyingKey::try_from(public_key) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };

        key.verify(message, &signature).is_ok()
    }
}

impl LeafVerifier for Ed25519Verifier {
    fn verify(&self, signature: &TransactionSignature<'_>) -> VerificationStatus {
        match signature.kind() {
            SignatureKind::Ed25519 => {
                if Self::verify_ed25519(
                    signature.public_key(),
                    signature.message(),
                    signature.signature(),
                ) {
                    VerificationStatus::Valid
                } else {
                    VerificationStatus::Invalid
                }
            },
            SignatureKind::EcdsaP384 | SignatureKind::Rsa3072 => VerificationStatus::Invalid,
            // contract keys are never satisfied by signature bytes
            SignatureKind::Contract => VerificationStatus::Unknown,
        }
    }
}

impl SyncVerifier for Ed25519Verifier {
    fn verify_sync(&self, batch: &[TransactionSignature<'_>]) -> Vec<VerificationStatus> {
        batch.iter().map(|signature| self.verify(signature)).collect()
    }
}

/// Verifies batches with a [`LeafVerifier`], fanning out across the rayon thread pool once a
/// batch reaches `parallel_threshold` entries.
#[derive(Debug, Clone)]
pub struct ParallelVerifier<L> {
    inner: L,
    parallel_threshold: NonZeroUsize,
}

impl<L> ParallelVerifier<L> {
    /// Creates a verifier.
    pub fn new(inner: L, parallel_threshold: NonZeroUsize) -> Self {
        Self { inner, parallel_threshold }
    }
}

impl<L> SyncVerifier for ParallelVerifier<L>
where
    L: LeafVerifier,
{
    fn verify_sync(&self, batch: &[TransactionSignature<'_>]) -> Vec<VerificationStatus> {
        if batch.len() < self.parallel_threshold.get() {
            return batch.iter().map(|signature| self.inner.verify(signature)).collect();
        }

        tracing::trace!(batch_size = batch.len(), "verifying batch in parallel");
        batch.par_iter().map(|signature| self.inner.verify(signature)).collect()
    }
}
