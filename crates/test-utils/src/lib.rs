//! Test utilities for the ledger signing-requirements crates.
//!
//! This crate provides deterministic Ed25519 signers, helpers to build and sign transactions,
//! and a ready-made [`LedgerSnapshot`] holding one entity of every kind, for integration tests
//! across this workspace.

use std::sync::Once;

use chrono::{DateTime, Utc};
use ed25519_dalek::{Signer, SigningKey};
use ledger_sigs_domain::{
    AccountId, ContractId, FileId, Key, KeyList, SignatureKind, SignatureMap, SignaturePair,
    ThresholdKey, TokenId, TopicId, Transaction, TransactionBody, TransactionData, TransactionId,
};
use ledger_sigs_store::{AccountRecord, FileRecord, LedgerSnapshot, TokenRecord, TopicRecord};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

// TRACING
// ================================================================================================

static INIT_TRACING: Once = Once::new();

/// Installs a global `fmt` subscriber filtered by `RUST_LOG`, defaulting to `info`.
///
/// Safe to call from every test; only the first call has an effect.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = Registry::default()
            .with(tracing_subscriber::fmt::layer().with_test_writer().with_target(false))
            .with(env_filter);

        // another harness may already have installed a subscriber
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

// SIGNERS
// ================================================================================================

/// A deterministic Ed25519 key pair.
#[derive(Debug, Clone)]
pub struct TestSigner {
    signing_key: SigningKey,
}

impl TestSigner {
    /// Derives a signer from `seed`. Equal seeds give equal signers.
    pub fn from_seed(seed: u64) -> Self {
        let secret: [u8; 32] = StdRng::seed_from_u64(seed).random();
        Self { signing_key: SigningKey::from_bytes(&secret) }
    }

    /// Returns the raw public key.
    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Returns the public key as a leaf [`Key`].
    pub fn key(&self) -> Key {
        Key::Ed25519(self.public_key().to_vec())
    }

    /// Signs `message`, identifying the key by its full public key.
    pub fn sign(&self, message: &[u8]) -> SignaturePair {
        self.sign_with_prefix(message, 32)
    }

    /// Signs `message`, identifying the key by the first `prefix_len` bytes of its public key.
    pub fn sign_with_prefix(&self, message: &[u8], prefix_len: usize) -> SignaturePair {
        let public_key = self.public_key();

        SignaturePair::builder()
            .pub_key_prefix(public_key[..prefix_len.min(public_key.len())].to_vec())
            .kind(SignatureKind::Ed25519)
            .signature(self.signing_key.sign(message).to_bytes().to_vec())
            .build()
    }
}

/// Returns the signer seeded with `seeds[i]` for every `i`.
pub fn signers(seeds: impl IntoIterator<Item = u64>) -> Vec<TestSigner> {
    seeds.into_iter().map(TestSigner::from_seed).collect()
}

/// Returns a key list of the signers' keys, in order.
pub fn key_list(signers: &[TestSigner]) -> KeyList {
    KeyList::new(signers.iter().map(TestSigner::key).collect())
}

/// Signs `message` with each signer, in order.
pub fn sig_map<'a>(signers: impl IntoIterator<Item = &'a TestSigner>, message: &[u8]) -> SignatureMap {
    signers.into_iter().map(|signer| signer.sign(message)).collect()
}

// TRANSACTIONS
// ================================================================================================

/// The valid start of every fixture transaction.
pub fn valid_start() -> DateTime<Utc> {
    DateTime::from_timestamp(1_600_000_000, 0).unwrap_or_default()
}

/// Returns a transaction id paid for by `payer`.
pub fn txn_id(payer: AccountId) -> TransactionId {
    TransactionId::builder().payer(payer).valid_start(valid_start()).build()
}

/// Returns a body paid for by `payer`.
pub fn body(payer: AccountId, data: TransactionData) -> TransactionBody {
    TransactionBody::builder().transaction_id(txn_id(payer)).data(data).build()
}

/// Returns the bytes fixture transactions are signed over.
///
/// Wire encoding is out of scope here, so the body's debug form stands in for it.
pub fn body_bytes(body: &TransactionBody) -> Vec<u8> {
    format!("{body:?}").into_bytes()
}

/// Returns `body` signed by every signer.
pub fn signed_txn<'a>(
    body: TransactionBody,
    signers: impl IntoIterator<Item = &'a TestSigner>,
) -> Transaction {
    let bytes = body_bytes(&body);
    let sig_map = sig_map(signers, &bytes);

    Transaction::builder().body(body).body_bytes(bytes).sig_map(sig_map).build()
}

// LEDGER
// ================================================================================================

/// The payer of fixture transactions.
pub const PAYER: AccountId = AccountId::from_num(2);
/// An account requiring receiver signatures.
pub const RECEIVER_SIG_REQUIRED: AccountId = AccountId::from_num(1001);
/// An account not requiring receiver signatures.
pub const NO_RECEIVER_SIG_REQUIRED: AccountId = AccountId::from_num(1002);
/// An account keyed by a 2-of-3 threshold key, requiring receiver signatures.
pub const THRESHOLD_ACCOUNT: AccountId = AccountId::from_num(1003);
/// A contract with an admin key.
pub const MUTABLE_CONTRACT: ContractId = ContractId::from_num(1101);
/// A contract without an admin key.
pub const IMMUTABLE_CONTRACT: ContractId = ContractId::from_num(1102);
/// A file whose wacl lists three keys.
pub const WACL_FILE: FileId = FileId::from_num(150);
/// A topic with admin and submit keys.
pub const TOPIC: TopicId = TopicId::from_num(200);
/// A token with admin and supply keys, whose treasury is [`PAYER`].
pub const TOKEN: TokenId = TokenId::from_num(300);
/// An account id no fixture ledger holds.
pub const MISSING_ACCOUNT: AccountId = AccountId::from_num(9999);
/// A contract id no fixture ledger holds.
pub const MISSING_CONTRACT: ContractId = ContractId::from_num(9998);

/// The signer of a fixture account's simple key.
pub fn account_signer(account: AccountId) -> TestSigner {
    TestSigner::from_seed(account.num())
}

/// The signers behind [`THRESHOLD_ACCOUNT`]'s key.
pub fn threshold_signers() -> Vec<TestSigner> {
    signers(10_031..=10_033)
}

/// The signers behind [`WACL_FILE`]'s wacl.
pub fn wacl_signers() -> Vec<TestSigner> {
    signers(1_501..=1_503)
}

/// The signer of [`MUTABLE_CONTRACT`]'s admin key.
pub fn contract_admin() -> TestSigner {
    TestSigner::from_seed(1_101)
}

/// The signers of [`TOPIC`]'s admin and submit keys.
pub fn topic_signers() -> (TestSigner, TestSigner) {
    (TestSigner::from_seed(2_001), TestSigner::from_seed(2_002))
}

/// The signers of [`TOKEN`]'s admin and supply keys.
pub fn token_signers() -> (TestSigner, TestSigner) {
    (TestSigner::from_seed(3_001), TestSigner::from_seed(3_002))
}

/// Builds a ledger holding every fixture entity.
///
/// # Errors
///
/// If an entity cannot be stored.
pub fn standard_ledger() -> anyhow::Result<LedgerSnapshot> {
    let mut ledger = LedgerSnapshot::new();

    ledger.insert_account(PAYER, AccountRecord::builder().key(account_signer(PAYER).key()).build())?;
    ledger.insert_account(
        RECEIVER_SIG_REQUIRED,
        AccountRecord::builder()
            .key(account_signer(RECEIVER_SIG_REQUIRED).key())
            .receiver_sig_required(true)
            .build(),
    )?;
    ledger.insert_account(
        NO_RECEIVER_SIG_REQUIRED,
        AccountRecord::builder().key(account_signer(NO_RECEIVER_SIG_REQUIRED).key()).build(),
    )?;
    ledger.insert_account(
        THRESHOLD_ACCOUNT,
        AccountRecord::builder()
            .key(ThresholdKey::new(2, key_list(&threshold_signers())).into())
            .receiver_sig_required(true)
            .build(),
    )?;
    ledger.insert_account(
        MUTABLE_CONTRACT.into(),
        AccountRecord::builder().key(contract_admin().key()).smart_contract(true).build(),
    )?;
    ledger.insert_account(
        IMMUTABLE_CONTRACT.into(),
        AccountRecord::builder().smart_contract(true).build(),
    )?;

    ledger.insert_file(WACL_FILE, FileRecord::builder().wacl(key_list(&wacl_signers())).build())?;

    let (topic_admin, topic_submit) = topic_signers();
    ledger.insert_topic(
        TOPIC,
        TopicRecord::builder().admin_key(topic_admin.key()).submit_key(topic_submit.key()).build(),
    )?;

    let (token_admin, token_supply) = token_signers();
    ledger.insert_token(
        TOKEN,
        TokenRecord::builder()
            .treasury(PAYER)
            .admin_key(token_admin.key())
            .supply_key(token_supply.key())
            .build(),
    )?;

    Ok(ledger)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signers_are_deterministic() {
        assert_eq!(TestSigner::from_seed(7).public_key(), TestSigner::from_seed(7).public_key());
        assert_ne!(TestSigner::from_seed(7).public_key(), TestSigner::from_seed(8).public_key());
    }

    #[test]
    fn standard_ledger_builds() {
        standard_ledger().unwrap();
    }
}
