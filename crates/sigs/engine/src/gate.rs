//! Signature checks made during contract execution.
//!
//! A contract call may move value out of accounts it touches. Those accounts' keys must be
//! active on the enclosing transaction when they require receiver signatures and are not
//! themselves contracts.

use std::collections::BTreeSet;

use ledger_sigs_domain::{AccountId, ContractId, Transaction, TransactionId};

use crate::{
    activation::{DefaultActivationCharacteristics, SigMapPubKeyToSigBytes, SignatureActivationChecker},
    lookup::AccountSigMetaLookup,
    verifier::SyncVerifier,
};

/// The transaction a contract is executing within.
pub trait TransactionContext {
    /// The account paying for the transaction.
    fn active_payer(&self) -> AccountId;

    /// The transaction being handled.
    fn accessor(&self) -> &Transaction;

    /// The id of the transaction being handled.
    fn txn_id(&self) -> &TransactionId {
        self.accessor().transaction_id()
    }
}

impl TransactionContext for Transaction {
    fn active_payer(&self) -> AccountId {
        self.payer()
    }

    fn accessor(&self) -> &Transaction {
        self
    }
}

/// Checks the keys of accounts touched by a contract against the enclosing transaction's
/// signatures.
#[derive(bon::Builder)]
pub struct TxnAwareContractSigsVerifier<'a, A: ?Sized, V: ?Sized, X: ?Sized> {
    /// Account lookup.
    accounts: &'a A,

    /// Leaf-signature verifier.
    verifier: &'a V,

    /// The enclosing transaction.
    context: &'a X,

    /// The contract being executed, whose contract keys count as active.
    active_contract: Option<ContractId>,
}

impl<A, V, X> TxnAwareContractSigsVerifier<'_, A, V, X>
where
    A: AccountSigMetaLookup + ?Sized,
    V: SyncVerifier + ?Sized,
    X: TransactionContext + ?Sized,
{
    /// Returns `true` if every touched account that requires a receiver signature has an
    /// active key. The payer and contract accounts are not checked, and an account that does
    /// not resolve fails the check.
    #[tracing::instrument(
        skip_all,
        fields(txn_id = %self.context.txn_id(), num_touched = touched.len()),
    )]
    pub fn all_required_keys_are_active(&self, touched: &BTreeSet<AccountId>) -> bool {
        let payer = self.context.active_payer();

        let mut keys = Vec::new();
        for &account in touched.iter().filter(|&&account| account != payer) {
            let metadata = match self.accounts.safe_lookup(account).into_result() {
                Ok(metadata) => metadata,
                Err(failure) => {
                    tracing::debug!(%account, %failure, "touched account did not resolve");
                    return false;
                },
            };
            if metadata.is_smart_contract() || !metadata.receiver_sig_required() {
                continue;
            }
            match metadata.key() {
                Some(key) => keys.push(key.clone()),
                None => {
                    tracing::debug!(%account, "touched account requires a signature but has no key");
                    return false;
                },
            }
        }

        if keys.is_empty() {
            return true;
        }

        let txn = self.context.accessor();
        let mut checker = SignatureActivationChecker::new(self.verifier);
        if let Some(contract) = self.active_contract {
            checker = checker.with_active_contract(contract);
        }

        checker.all_required_keys_active(
            &keys,
            txn.body_bytes(),
            &SigMapPubKeyToSigBytes::new(txn.sig_map()),
            &DefaultActivationCharacteristics,
        )
    }
}
