//! Sourcing candidate signature bytes for leaf keys.

use ledger_sigs_domain::{SignatureKind, SignatureMap};

use super::ActivationError;

/// Supplies the candidate signature for a public key.
pub trait PubKeyToSigBytes {
    /// Returns the `kind` signature attached for `pub_key`, or `None` if nothing matches.
    ///
    /// # Errors
    ///
    /// [`ActivationError::KeyPrefixMismatch`] if more than one attached signature matches.
    fn sig_bytes_for(
        &self,
        kind: SignatureKind,
        pub_key: &[u8],
    ) -> Result<Option<Vec<u8>>, ActivationError>;
}

/// Reads signatures from a transaction's [`SignatureMap`], matching pairs by signature kind
/// and public key prefix.
#[derive(Debug, Clone, Copy)]
pub struct SigMapPubKeyToSigBytes<'a> {
    sig_map: &'a SignatureMap,
}

impl<'a> SigMapPubKeyToSigBytes<'a> {
    /// Creates a provider over `sig_map`.
    pub fn new(sig_map: &'a SignatureMap) -> Self {
        Self { sig_map }
    }
}

impl PubKeyToSigBytes for SigMapPubKeyToSigBytes<'_> {
    fn sig_bytes_for(
        &self,
        kind: SignatureKind,
        pub_key: &[u8],
    ) -> Result<Option<Vec<u8>>, ActivationError> {
        let mut matching = self
            .sig_map
            .pairs()
            .iter()
            .filter(|pair| pair.kind() == kind && pair.matches(pub_key));

        let Some(pair) = matching.next() else {
            return Ok(None);
        };
        if matching.next().is_some() {
            return Err(ActivationError::KeyPrefixMismatch(hex::encode(pub_key)));
        }

        Ok(Some(pair.signature().to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use ledger_sigs_domain::SignaturePair;

    use super::*;

    const ED25519: SignatureKind = SignatureKind::Ed25519;

    fn pair(prefix: &[u8], signature: &[u8]) -> SignaturePair {
        pair_of(ED25519, prefix, signature)
    }

    fn pair_of(kind: SignatureKind, prefix: &[u8], signature: &[u8]) -> SignaturePair {
        SignaturePair::builder()
            .pub_key_prefix(prefix.to_vec())
            .kind(kind)
            .signature(signature.to_vec())
            .build()
    }

    #[test]
    fn unique_prefix_match_yields_its_signature() {
        let sig_map = SignatureMap::new(vec![pair(&[0xaa], &[1]), pair(&[0xbb], &[2])]);
        let provider = SigMapPubKeyToSigBytes::new(&sig_map);

        assert_eq!(provider.sig_bytes_for(ED25519, &[0xbb, 0x01]).unwrap(), Some(vec![2]));
        assert_eq!(provider.sig_bytes_for(ED25519, &[0xcc, 0x01]).unwrap(), None);
    }

    #[test]
    fn empty_prefix_matches_every_key() {
        let sig_map = SignatureMap::new(vec![pair(&[], &[7])]);
        let provider = SigMapPubKeyToSigBytes::new(&sig_map);

        assert_eq!(provider.sig_bytes_for(ED25519, &[0x01]).unwrap(), Some(vec![7]));
        assert_eq!(provider.sig_bytes_for(ED25519, &[0x02]).unwrap(), Some(vec![7]));
    }

    #[test]
    fn ambiguous_prefixes_are_rejected() {
        let sig_map = SignatureMap::new(vec![pair(&[0xaa], &[1]), pair(&[0xaa, 0xbb], &[2])]);
        let provider = SigMapPubKeyToSigBytes::new(&sig_map);

        assert!(matches!(
            provider.sig_bytes_for(ED25519, &[0xaa, 0xbb, 0xcc]),
            Err(ActivationError::KeyPrefixMismatch(key)) if key == "aabbcc"
        ));
        assert_eq!(provider.sig_bytes_for(ED25519, &[0xaa, 0x00]).unwrap(), Some(vec![1]));
    }

    #[test]
    fn pairs_of_another_kind_are_ignored() {
        let sig_map = SignatureMap::new(vec![
            pair_of(SignatureKind::EcdsaP384, &[0xaa], &[1]),
            pair(&[0xaa, 0xbb], &[2]),
            pair_of(SignatureKind::Rsa3072, &[0xcc], &[3]),
        ]);
        let provider = SigMapPubKeyToSigBytes::new(&sig_map);

        assert_eq!(provider.sig_bytes_for(ED25519, &[0xaa, 0xbb, 0x01]).unwrap(), Some(vec![2]));
        assert_eq!(provider.sig_bytes_for(ED25519, &[0xcc, 0x01]).unwrap(), None);
        assert_eq!(
            provider.sig_bytes_for(SignatureKind::EcdsaP384, &[0xaa, 0xbb, 0x01]).unwrap(),
            Some(vec![1])
        );
    }
}
