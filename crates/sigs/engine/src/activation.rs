//! Signature activation.
//!
//! [`SignatureActivationChecker`] decides whether the signatures attached to a transaction
//! activate a list of required keys. Every distinct leaf across the keys is verified in one
//! [`SyncVerifier::verify_sync`] call; only once all verdicts are in are they folded up each
//! key tree, asking the [`KeyActivationCharacteristics`] how many active children each
//! composite node needs.

pub mod characteristics;
pub mod sig_bytes;

use std::collections::{BTreeMap, BTreeSet};

use ledger_sigs_domain::{ContractId, Key, SignatureKind, key::traversal};

pub use self::{
    characteristics::{
        CharacteristicsFactory, DefaultActivationCharacteristics, InferredCharacteristics,
        KeyActivationCharacteristics, RevocationServiceCharacteristics,
    },
    sig_bytes::{PubKeyToSigBytes, SigMapPubKeyToSigBytes},
};
use crate::verifier::{SyncVerifier, TransactionSignature, VerificationStatus};

/// Errors that prevent an activation check from reaching a verdict.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActivationError {
    /// More than one attached signature matches a public key.
    #[error("more than one signature prefix matches public key {0}")]
    KeyPrefixMismatch(String),

    /// The verifier did not return one verdict per submitted signature.
    #[error("verifier returned {actual} verdicts for {expected} signatures")]
    BatchSizeMismatch {
        /// Signatures submitted.
        expected: usize,
        /// Verdicts returned.
        actual: usize,
    },
}

/// Identifies a leaf by its scheme and public key material.
type LeafId<'k> = (SignatureKind, &'k [u8]);

/// Checks whether attached signatures activate required keys.
#[derive(Debug)]
pub struct SignatureActivationChecker<'a, V: ?Sized> {
    verifier: &'a V,
    active_contract: Option<ContractId>,
}

impl<V: ?Sized> Clone for SignatureActivationChecker<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V: ?Sized> Copy for SignatureActivationChecker<'_, V> {}

impl<'a, V> SignatureActivationChecker<'a, V>
where
    V: SyncVerifier + ?Sized,
{
    /// Creates a checker verifying leaves with `verifier`.
    pub fn new(verifier: &'a V) -> Self {
        Self { verifier, active_contract: None }
    }

    /// Treats contract keys referencing `contract` as active, for checks made while that
    /// contract is executing.
    pub fn with_active_contract(mut self, contract: ContractId) -> Self {
        self.active_contract = Some(contract);
        self
    }

    /// Returns `true` if every key in `keys` is active.
    ///
    /// An ambiguous signature map or a misbehaving verifier fails the check.
    #[tracing::instrument(skip_all, fields(num_keys = keys.len()))]
    pub fn all_required_keys_active<P, C>(
        &self,
        keys: &[Key],
        signed_bytes: &[u8],
        sig_bytes: &P,
        characteristics: &C,
    ) -> bool
    where
        P: PubKeyToSigBytes + ?Sized,
        C: KeyActivationCharacteristics + ?Sized,
    {
        match self.try_all_required_keys_active(keys, signed_bytes, sig_bytes, characteristics) {
            Ok(active) => {
                if !active {
                    tracing::debug!("required keys are not active");
                }
                active
            },
            Err(error) => {
                tracing::warn!(%error, "activation check failed");
                false
            },
        }
    }

    /// Returns whether every key in `keys` is active.
    ///
    /// # Errors
    ///
    /// If the signature map is ambiguous for one of the leaves, or the verifier does not
    /// return one verdict per signature.
    pub fn try_all_required_keys_active<P, C>(
        &self,
        keys: &[Key],
        signed_bytes: &[u8],
        sig_bytes: &P,
        characteristics: &C,
    ) -> Result<bool, ActivationError>
    where
        P: PubKeyToSigBytes + ?Sized,
        C: KeyActivationCharacteristics + ?Sized,
    {
        let verdicts = self.verify_leaves(keys, signed_bytes, sig_bytes)?;

        Ok(keys.iter().all(|key| self.is_active(key, &verdicts, characteristics)))
    }

    /// Returns the scheduled keys the attached signatures activate, in input order.
    ///
    /// # Errors
    ///
    /// As for [`Self::try_all_required_keys_active`].
    #[tracing::instrument(skip_all, fields(num_keys = scheduled_keys.len()))]
    pub fn active_scheduled_keys<'k, P, C>(
        &self,
        scheduled_keys: &'k [Key],
        signed_bytes: &[u8],
        sig_bytes: &P,
        characteristics: &C,
    ) -> Result<Vec<&'k Key>, ActivationError>
    where
        P: PubKeyToSigBytes + ?Sized,
        C: KeyActivationCharacteristics + ?Sized,
    {
        let verdicts = self.verify_leaves(scheduled_keys, signed_bytes, sig_bytes)?;

        let active: Vec<_> = scheduled_keys
            .iter()
            .filter(|key| self.is_active(key, &verdicts, characteristics))
            .collect();
        tracing::trace!(num_active = active.len(), "evaluated scheduled keys");

        Ok(active)
    }

    /// Verifies every distinct cryptographic leaf of `keys` in a single batch.
    ///
    /// Leaves without an attached signature are absent from the returned map.
    fn verify_leaves<'k, P>(
        &self,
        keys: &'k [Key],
        signed_bytes: &'k [u8],
        sig_bytes: &P,
    ) -> Result<BTreeMap<LeafId<'k>, VerificationStatus>, ActivationError>
    where
        P: PubKeyToSigBytes + ?Sized,
    {
        let mut leaves = Vec::new();
        traversal::visit_all_simple_keys(keys, &mut |leaf: &'k Key| {
            if let (Some(kind), Some(material)) = (leaf.signature_kind(), leaf.primitive_key()) {
                leaves.push((kind, material));
            }
        });

        let mut seen = BTreeSet::new();
        let mut ids = Vec::new();
        let mut batch = Vec::new();
        for (kind, material) in leaves {
            if !seen.insert((kind, material)) {
                continue;
            }
            if let Some(signature) = sig_bytes.sig_bytes_for(kind, material)? {
                ids.push((kind, material));
                batch.push(TransactionSignature::new(kind, material, signature, signed_bytes));
            }
        }

        if batch.is_empty() {
            return Ok(BTreeMap::new());
        }

        tracing::trace!(num_leaves = seen.len(), batch_size = batch.len(), "verifying leaf signatures");
        let verdicts = self.verifier.verify_sync(&batch);
        if verdicts.len() != batch.len() {
            return Err(ActivationError::BatchSizeMismatch {
                expected: batch.len(),
                actual: verdicts.len(),
            });
        }

        Ok(ids.into_iter().zip(verdicts).collect())
    }

    fn is_active<C>(
        &self,
        key: &Key,
        verdicts: &BTreeMap<LeafId<'_>, VerificationStatus>,
        characteristics: &C,
    ) -> bool
    where
        C: KeyActivationCharacteristics + ?Sized,
    {
        let count_active = |children: &[Key]| {
            children
                .iter()
                .filter(|child| self.is_active(child, verdicts, characteristics))
                .count()
        };

        match key {
            Key::KeyList(list) => {
                count_active(list.keys()) >= characteristics.sigs_needed_by_list(list)
            },
            Key::Threshold(threshold) => {
                count_active(threshold.keys().keys())
                    >= characteristics.sigs_needed_by_threshold(threshold)
            },
            Key::ContractId(id) => self.active_contract == Some(*id),
            Key::Ed25519(_) | Key::EcdsaP384(_) | Key::Rsa3072(_) => {
                match (key.signature_kind(), key.primitive_key()) {
                    (Some(kind), Some(material)) => {
                        verdicts.get(&(kind, material)) == Some(&VerificationStatus::Valid)
                    },
                    _ => false,
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use ed25519_dalek::{Signer, SigningKey};
    use ledger_sigs_domain::{KeyList, SignaturePair, ThresholdKey};
    use proptest::prelude::*;

    use super::*;
    use crate::verifier::Ed25519Verifier;

    const MESSAGE: &[u8] = b"signed body bytes";

    fn signing_key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    fn key_of(signer: &SigningKey) -> Key {
        Key::Ed25519(signer.verifying_key().to_bytes().to_vec())
    }

    fn sig_map(signers: &[&SigningKey]) -> ledger_sigs_domain::SignatureMap {
        signers
            .iter()
            .map(|signer| {
                SignaturePair::builder()
                    .pub_key_prefix(signer.verifying_key().to_bytes().to_vec())
                    .kind(SignatureKind::Ed25519)
                    .signature(signer.sign(MESSAGE).to_bytes().to_vec())
                    .build()
            })
            .collect()
    }

    /// Counts batches and their sizes while delegating to ed25519 verification.
    #[derive(Default)]
    struct RecordingVerifier {
        batches: RefCell<Vec<usize>>,
    }

    impl SyncVerifier for RecordingVerifier {
        fn verify_sync(&self, batch: &[TransactionSignature<'_>]) -> Vec<VerificationStatus> {
            self.batches.borrow_mut().push(batch.len());
            Ed25519Verifier.verify_sync(batch)
        }
    }

    struct TruncatingVerifier;

    impl SyncVerifier for TruncatingVerifier {
        fn verify_sync(&self, batch: &[TransactionSignature<'_>]) -> Vec<VerificationStatus> {
            vec![VerificationStatus::Valid; batch.len().saturating_sub(1)]
        }
    }

    #[test]
    fn key_list_needs_every_child_by_default() {
        let signers: Vec<_> = (1..=4).map(signing_key).collect();
        let payer = key_of(&signers[0]);
        let list = Key::from(KeyList::new(signers[1..].iter().map(key_of).collect()));
        let keys = [payer, list];
        let checker = SignatureActivationChecker::new(&Ed25519Verifier);

        let partial = sig_map(&[&signers[0], &signers[1], &signers[2]]);
        assert!(!checker.all_required_keys_active(
            &keys,
            MESSAGE,
            &SigMapPubKeyToSigBytes::new(&partial),
            &DefaultActivationCharacteristics,
        ));

        let full = sig_map(&signers.iter().collect::<Vec<_>>());
        assert!(checker.all_required_keys_active(
            &keys,
            MESSAGE,
            &SigMapPubKeyToSigBytes::new(&full),
            &DefaultActivationCharacteristics,
        ));
    }

    #[test]
    fn leaves_are_verified_once_in_a_single_batch() {
        let signers: Vec<_> = (1..=3).map(signing_key).collect();
        let shared = key_of(&signers[0]);
        let keys = [
            shared.clone(),
            Key::from(KeyList::new(vec![shared.clone(), key_of(&signers[1])])),
            Key::from(ThresholdKey::new(1, KeyList::new(vec![shared, key_of(&signers[2])]))),
        ];
        let sigs = sig_map(&signers.iter().collect::<Vec<_>>());
        let verifier = RecordingVerifier::default();

        assert!(SignatureActivationChecker::new(&verifier).all_required_keys_active(
            &keys,
            MESSAGE,
            &SigMapPubKeyToSigBytes::new(&sigs),
            &DefaultActivationCharacteristics,
        ));
        assert_eq!(*verifier.batches.borrow(), vec![3]);
    }

    #[test]
    fn unsigned_keys_skip_verification() {
        let keys = [key_of(&signing_key(1))];
        let verifier = RecordingVerifier::default();
        let empty = ledger_sigs_domain::SignatureMap::default();

        assert!(!SignatureActivationChecker::new(&verifier).all_required_keys_active(
            &keys,
            MESSAGE,
            &SigMapPubKeyToSigBytes::new(&empty),
            &DefaultActivationCharacteristics,
        ));
        assert!(verifier.batches.borrow().is_empty());
    }

    #[test]
    fn signatures_over_other_bytes_do_not_activate() {
        let signer = signing_key(1);
        let sigs = sig_map(&[&signer]);

        assert!(!SignatureActivationChecker::new(&Ed25519Verifier).all_required_keys_active(
            &[key_of(&signer)],
            b"different bytes",
            &SigMapPubKeyToSigBytes::new(&sigs),
            &DefaultActivationCharacteristics,
        ));
    }

    #[test]
    fn ambiguous_signature_map_fails_the_check() {
        let signer = signing_key(1);
        let mut sigs = sig_map(&[&signer]);
        sigs.push(
            SignaturePair::builder()
                .pub_key_prefix(Vec::new())
                .kind(SignatureKind::Ed25519)
                .signature(vec![0; 64])
                .build(),
        );
        let checker = SignatureActivationChecker::new(&Ed25519Verifier);
        let provider = SigMapPubKeyToSigBytes::new(&sigs);
        let keys = [key_of(&signer)];

        assert!(matches!(
            checker.try_all_required_keys_active(
                &keys,
                MESSAGE,
                &provider,
                &DefaultActivationCharacteristics
            ),
            Err(ActivationError::KeyPrefixMismatch(_))
        ));
        assert!(!checker.all_required_keys_active(
            &keys,
            MESSAGE,
            &provider,
            &DefaultActivationCharacteristics
        ));
    }

    #[test]
    fn short_verdict_batches_are_rejected() {
        let signer = signing_key(1);
        let sigs = sig_map(&[&signer]);

        assert_eq!(
            SignatureActivationChecker::new(&TruncatingVerifier).try_all_required_keys_active(
                &[key_of(&signer)],
                MESSAGE,
                &SigMapPubKeyToSigBytes::new(&sigs),
                &DefaultActivationCharacteristics,
            ),
            Err(ActivationError::BatchSizeMismatch { expected: 1, actual: 0 })
        );
    }

    #[test]
    fn contract_keys_activate_only_for_the_executing_contract() {
        let contract = ContractId::from_num(1001);
        let keys = [Key::ContractId(contract)];
        let empty = ledger_sigs_domain::SignatureMap::default();
        let provider = SigMapPubKeyToSigBytes::new(&empty);
        let checker = SignatureActivationChecker::new(&Ed25519Verifier);

        assert!(!checker.all_required_keys_active(
            &keys,
            MESSAGE,
            &provider,
            &DefaultActivationCharacteristics
        ));
        assert!(checker.with_active_contract(contract).all_required_keys_active(
            &keys,
            MESSAGE,
            &provider,
            &DefaultActivationCharacteristics
        ));
        assert!(!checker
            .with_active_contract(ContractId::from_num(1002))
            .all_required_keys_active(&keys, MESSAGE, &provider, &DefaultActivationCharacteristics));
    }

    #[test]
    fn revocation_relaxes_only_the_matching_list() {
        let signers: Vec<_> = (1..=3).map(signing_key).collect();
        let wacl = KeyList::new(signers.iter().map(key_of).collect());
        let reordered = KeyList::new(signers.iter().rev().map(key_of).collect());
        let sigs = sig_map(&[&signers[0]]);
        let provider = SigMapPubKeyToSigBytes::new(&sigs);
        let checker = SignatureActivationChecker::new(&Ed25519Verifier);
        let revocation = RevocationServiceCharacteristics::new(wacl.clone());

        assert!(checker.all_required_keys_active(&[Key::from(wacl)], MESSAGE, &provider, &revocation));
        assert!(!checker.all_required_keys_active(
            &[Key::from(reordered)],
            MESSAGE,
            &provider,
            &revocation
        ));
    }

    #[test]
    fn active_scheduled_keys_reports_each_key() {
        let signers: Vec<_> = (1..=3).map(signing_key).collect();
        let keys: Vec<_> = signers.iter().map(key_of).collect();
        let sigs = sig_map(&[&signers[0], &signers[2]]);

        let active = SignatureActivationChecker::new(&Ed25519Verifier)
            .active_scheduled_keys(
                &keys,
                MESSAGE,
                &SigMapPubKeyToSigBytes::new(&sigs),
                &DefaultActivationCharacteristics,
            )
            .unwrap();

        assert_eq!(active, vec![&keys[0], &keys[2]]);
    }

    proptest! {
        #[test]
        fn threshold_is_active_iff_enough_children_sign(
            (n, t, signed) in (1usize..6).prop_flat_map(|n| (Just(n), 0..=n, 0..=n)),
        ) {
            let signers: Vec<_> = (0..n).map(|idx| signing_key(idx as u8 + 1)).collect();
            let threshold = ThresholdKey::new(
                u32::try_from(t).unwrap(),
                KeyList::new(signers.iter().map(key_of).collect()),
            );
            let sigs = sig_map(&signers.iter().take(signed).collect::<Vec<_>>());

            let active = SignatureActivationChecker::new(&Ed25519Verifier).all_required_keys_active(
                &[Key::from(threshold)],
                MESSAGE,
                &SigMapPubKeyToSigBytes::new(&sigs),
                &DefaultActivationCharacteristics,
            );

            prop_assert_eq!(active, signed >= t);
        }
    }
}
