//! Translation of resolution failures into caller-defined reports.
//!
//! The resolver never decides how a failure is surfaced. It calls exactly one method of a
//! [`SigningOrderResultFactory`] per failure and returns whatever report that method builds.

use ledger_sigs_domain::{
    AccountId, ContractId, FileId, ScheduleId, TokenId, TopicId, TransactionBody, TransactionId,
};

use super::{OrderedKeys, SigningOrderResult};
use crate::lookup::KeyOrderingFailure;

/// Builds signing-order results, one method per failure kind.
///
/// Implementations must be pure functions of their arguments: the same failure always yields
/// the same report.
pub trait SigningOrderResultFactory {
    /// The caller-defined error report.
    type Report;

    /// Wraps a successfully resolved key order.
    fn for_valid_order(&self, keys: OrderedKeys) -> SigningOrderResult<Self::Report> {
        SigningOrderResult::Keys(keys)
    }

    /// An account id that can never resolve, or a missing payer.
    fn for_invalid_account(
        &self,
        account: AccountId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<Self::Report>;

    /// The payer exists but cannot authorize anything.
    fn for_general_payer_error(
        &self,
        payer: AccountId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<Self::Report>;

    /// The transaction is structurally malformed.
    fn for_general_error(&self, txn_id: &TransactionId) -> SigningOrderResult<Self::Report>;

    #[allow(missing_docs)]
    fn for_missing_account(
        &self,
        account: AccountId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<Self::Report>;

    #[allow(missing_docs)]
    fn for_missing_file(&self, file: FileId, txn_id: &TransactionId)
    -> SigningOrderResult<Self::Report>;

    /// The contract is absent, deleted or not a contract.
    fn for_invalid_contract(
        &self,
        contract: ContractId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<Self::Report>;

    /// The contract has no externally controllable key.
    fn for_immutable_contract(
        &self,
        contract: ContractId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<Self::Report>;

    #[allow(missing_docs)]
    fn for_missing_topic(
        &self,
        topic: TopicId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<Self::Report>;

    #[allow(missing_docs)]
    fn for_invalid_auto_renew_account(
        &self,
        account: AccountId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<Self::Report>;

    #[allow(missing_docs)]
    fn for_missing_token(
        &self,
        token: TokenId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<Self::Report>;

    #[allow(missing_docs)]
    fn for_missing_token_treasury(
        &self,
        treasury: AccountId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<Self::Report>;

    #[allow(missing_docs)]
    fn for_missing_schedule(
        &self,
        schedule: ScheduleId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<Self::Report>;

    /// The required signers of a scheduled transaction could not be resolved.
    ///
    /// `inner_report` is the report produced while resolving `scheduled`.
    fn for_unresolvable_required_signers(
        &self,
        scheduled: &TransactionBody,
        txn_id: &TransactionId,
        inner_report: Self::Report,
    ) -> SigningOrderResult<Self::Report>;

    /// The wrapped operation may not be scheduled.
    fn for_unschedulable_txn(&self, txn_id: &TransactionId) -> SigningOrderResult<Self::Report>;
}

/// The bare failure kind behind a signing-order error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// An entity lookup failed.
    Lookup(KeyOrderingFailure),
    /// The payer cannot authorize anything.
    GeneralPayerError,
    /// The transaction is malformed.
    GeneralError,
    /// The wrapped operation may not be scheduled.
    UnschedulableTransaction,
    /// The scheduled transaction's own signers failed to resolve.
    UnresolvableRequiredSigners(Box<FailureKind>),
}

impl FailureKind {
    /// Returns the lookup failure, if this is one.
    pub fn lookup_failure(&self) -> Option<KeyOrderingFailure> {
        match self {
            Self::Lookup(failure) => Some(*failure),
            _ => None,
        }
    }
}

/// Reports failures as their bare [`FailureKind`], discarding ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailureKindOrderResultFactory;

impl FailureKindOrderResultFactory {
    fn lookup(failure: KeyOrderingFailure) -> SigningOrderResult<FailureKind> {
        SigningOrderResult::Error(FailureKind::Lookup(failure))
    }
}

impl SigningOrderResultFactory for FailureKindOrderResultFactory {
    type Report = FailureKind;

    fn for_invalid_account(&self, _: AccountId, _: &TransactionId) -> SigningOrderResult<FailureKind> {
        Self::lookup(KeyOrderingFailure::InvalidAccount)
    }

    fn for_general_payer_error(
        &self,
        _: AccountId,
        _: &TransactionId,
    ) -> SigningOrderResult<FailureKind> {
        SigningOrderResult::Error(FailureKind::GeneralPayerError)
    }

    fn for_general_error(&self, _: &TransactionId) -> SigningOrderResult<FailureKind> {
        SigningOrderResult::Error(FailureKind::GeneralError)
    }

    fn for_missing_account(&self, _: AccountId, _: &TransactionId) -> SigningOrderResult<FailureKind> {
        Self::lookup(KeyOrderingFailure::MissingAccount)
    }

    fn for_missing_file(&self, _: FileId, _: &TransactionId) -> SigningOrderResult<FailureKind> {
        Self::lookup(KeyOrderingFailure::MissingFile)
    }

    fn for_invalid_contract(
        &self,
        _: ContractId,
        _: &TransactionId,
    ) -> SigningOrderResult<FailureKind> {
        Self::lookup(KeyOrderingFailure::InvalidContract)
    }

    fn for_immutable_contract(
        &self,
        _: ContractId,
        _: &TransactionId,
    ) -> SigningOrderResult<FailureKind> {
        Self::lookup(KeyOrderingFailure::ImmutableContract)
    }

    fn for_missing_topic(&self, _: TopicId, _: &TransactionId) -> SigningOrderResult<FailureKind> {
        Self::lookup(KeyOrderingFailure::InvalidTopic)
    }

    fn for_invalid_auto_renew_account(
        &self,
        _: AccountId,
        _: &TransactionId,
    ) -> SigningOrderResult<FailureKind> {
        Self::lookup(KeyOrderingFailure::MissingAutorenewAccount)
    }

    fn for_missing_token(&self, _: TokenId, _: &TransactionId) -> SigningOrderResult<FailureKind> {
        Self::lookup(KeyOrderingFailure::MissingToken)
    }

    fn for_missing_token_treasury(
        &self,
        _: AccountId,
        _: &TransactionId,
    ) -> SigningOrderResult<FailureKind> {
        Self::lookup(KeyOrderingFailure::MissingTokenTreasury)
    }

    fn for_missing_schedule(
        &self,
        _: ScheduleId,
        _: &TransactionId,
    ) -> SigningOrderResult<FailureKind> {
        Self::lookup(KeyOrderingFailure::MissingSchedule)
    }

    fn for_unresolvable_required_signers(
        &self,
        _: &TransactionBody,
        _: &TransactionId,
        inner_report: FailureKind,
    ) -> SigningOrderResult<FailureKind> {
        SigningOrderResult::Error(FailureKind::UnresolvableRequiredSigners(Box::new(inner_report)))
    }

    fn for_unschedulable_txn(&self, _: &TransactionId) -> SigningOrderResult<FailureKind> {
        SigningOrderResult::Error(FailureKind::UnschedulableTransaction)
    }
}
