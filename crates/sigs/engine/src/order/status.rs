//! Signature-status reports, the order-result factory used by the transaction pipeline.

use core::fmt;

use ledger_sigs_domain::{
    AccountId, ContractId, FileId, ScheduleId, TokenId, TopicId, TransactionBody, TransactionId,
};
use strum::{Display, EnumString, IntoStaticStr};

use super::{SigningOrderResult, factory::SigningOrderResultFactory};

/// Why signing requirements could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum SignatureStatusCode {
    InvalidAccountId,
    GeneralPayerError,
    GeneralError,
    InvalidFileId,
    InvalidContractId,
    ImmutableContract,
    InvalidTopicId,
    InvalidAutoRenewAccountId,
    InvalidTokenId,
    InvalidTreasuryAccountId,
    InvalidScheduleId,
    UnresolvableRequiredSigners,
    UnschedulableTransaction,
}

/// The client-visible rejection code a failure maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum ResponseCode {
    InvalidAccountId,
    InvalidSignature,
    AccountIdDoesNotExist,
    InvalidFileId,
    InvalidContractId,
    ModifyingImmutableContract,
    InvalidTopicId,
    InvalidAutorenewAccount,
    InvalidTokenId,
    InvalidTreasuryAccountForToken,
    InvalidScheduleId,
    UnresolvableRequiredSigners,
    UnschedulableTransaction,
    InvalidPayerAccountId,
    PayerAccountNotFound,
}

/// The entity, or nested report, a status refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum StatusContext {
    None,
    Payer(AccountId),
    Account(AccountId),
    File(FileId),
    Contract(ContractId),
    Topic(TopicId),
    Token(TokenId),
    Schedule(ScheduleId),
    /// The failure happened while resolving a scheduled transaction's own signers.
    Scheduled {
        inner: Box<TransactionBody>,
        report: Box<SignatureStatus>,
    },
}

/// A failed signing-order resolution, as reported to the transaction pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureStatus {
    code: SignatureStatusCode,
    response_code: ResponseCode,
    handling_txn: bool,
    txn_id: TransactionId,
    context: StatusContext,
}

impl SignatureStatus {
    /// Returns the status code.
    pub fn code(&self) -> SignatureStatusCode {
        self.code
    }

    /// Returns the client-visible rejection code.
    ///
    /// Payer account failures map to a code that depends on whether the failure happened while
    /// handling the transaction or prior to consensus.
    pub fn response_code(&self) -> ResponseCode {
        match (&self.context, self.code) {
            (StatusContext::Payer(_), SignatureStatusCode::InvalidAccountId) => {
                if self.handling_txn {
                    ResponseCode::InvalidPayerAccountId
                } else {
                    ResponseCode::PayerAccountNotFound
                }
            },
            _ => self.response_code,
        }
    }

    /// Returns `true` if the failure happened while handling the transaction at consensus.
    pub fn is_handling_txn(&self) -> bool {
        self.handling_txn
    }

    /// Returns the id of the transaction being resolved.
    pub fn txn_id(&self) -> &TransactionId {
        &self.txn_id
    }

    /// Returns what the status refers to.
    pub fn context(&self) -> &StatusContext {
        &self.context
    }
}

impl fmt::Display for SignatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.handling_txn {
            write!(f, "In handling of txn {}: ", self.txn_id)?;
        } else {
            write!(f, "Prior to consensus, txn {}: ", self.txn_id)?;
        }

        match &self.context {
            StatusContext::None => write!(f, "{}", self.code),
            StatusContext::Payer(id) => write!(f, "{} for payer {id}", self.code),
            StatusContext::Account(id) => write!(f, "{} for account {id}", self.code),
            StatusContext::File(id) => write!(f, "{} for file {id}", self.code),
            StatusContext::Contract(id) => write!(f, "{} for contract {id}", self.code),
            StatusContext::Topic(id) => write!(f, "{} for topic {id}", self.code),
            StatusContext::Token(id) => write!(f, "{} for token {id}", self.code),
            StatusContext::Schedule(id) => write!(f, "{} for schedule {id}", self.code),
            StatusContext::Scheduled { inner, report } => write!(
                f,
                "{} for scheduled {} ({report})",
                self.code,
                inner.functionality()
            ),
        }
    }
}

impl core::error::Error for SignatureStatus {}

/// Builds [`SignatureStatus`] reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct SigStatusOrderResultFactory {
    in_handle_txn_dynamic_context: bool,
}

impl SigStatusOrderResultFactory {
    /// Creates a factory; `in_handle_txn_dynamic_context` is `true` when resolving while
    /// handling a transaction at consensus.
    pub fn new(in_handle_txn_dynamic_context: bool) -> Self {
        Self { in_handle_txn_dynamic_context }
    }

    fn error(
        &self,
        code: SignatureStatusCode,
        response_code: ResponseCode,
        txn_id: &TransactionId,
        context: StatusContext,
    ) -> SigningOrderResult<SignatureStatus> {
        SigningOrderResult::Error(SignatureStatus {
            code,
            response_code,
            handling_txn: self.in_handle_txn_dynamic_context,
            txn_id: txn_id.clone(),
            context,
        })
    }
}

impl SigningOrderResultFactory for SigStatusOrderResultFactory {
    type Report = SignatureStatus;

    fn for_invalid_account(
        &self,
        account: AccountId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<SignatureStatus> {
        let context = if account == txn_id.payer() {
            StatusContext::Payer(account)
        } else {
            StatusContext::Account(account)
        };

        self.error(
            SignatureStatusCode::InvalidAccountId,
            ResponseCode::InvalidAccountId,
            txn_id,
            context,
        )
    }

    fn for_general_payer_error(
        &self,
        payer: AccountId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<SignatureStatus> {
        self.error(
            SignatureStatusCode::GeneralPayerError,
            ResponseCode::InvalidSignature,
            txn_id,
            StatusContext::Payer(payer),
        )
    }

    fn for_general_error(&self, txn_id: &TransactionId) -> SigningOrderResult<SignatureStatus> {
        self.error(
            SignatureStatusCode::GeneralError,
            ResponseCode::InvalidSignature,
            txn_id,
            StatusContext::None,
        )
    }

    fn for_missing_account(
        &self,
        account: AccountId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<SignatureStatus> {
        self.error(
            SignatureStatusCode::InvalidAccountId,
            ResponseCode::AccountIdDoesNotExist,
            txn_id,
            StatusContext::Account(account),
        )
    }

    fn for_missing_file(
        &self,
        file: FileId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<SignatureStatus> {
        self.error(
            SignatureStatusCode::InvalidFileId,
            ResponseCode::InvalidFileId,
            txn_id,
            StatusContext::File(file),
        )
    }

    fn for_invalid_contract(
        &self,
        contract: ContractId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<SignatureStatus> {
        self.error(
            SignatureStatusCode::InvalidContractId,
            ResponseCode::InvalidContractId,
            txn_id,
            StatusContext::Contract(contract),
        )
    }

    fn for_immutable_contract(
        &self,
        contract: ContractId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<SignatureStatus> {
        self.error(
            SignatureStatusCode::ImmutableContract,
            ResponseCode::ModifyingImmutableContract,
            txn_id,
            StatusContext::Contract(contract),
        )
    }

    fn for_missing_topic(
        &self,
        topic: TopicId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<SignatureStatus> {
        self.error(
            SignatureStatusCode::InvalidTopicId,
            ResponseCode::InvalidTopicId,
            txn_id,
            StatusContext::Topic(topic),
        )
    }

    fn for_invalid_auto_renew_account(
        &self,
        account: AccountId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<SignatureStatus> {
        self.error(
            SignatureStatusCode::InvalidAutoRenewAccountId,
            ResponseCode::InvalidAutorenewAccount,
            txn_id,
            StatusContext::Account(account),
        )
    }

    fn for_missing_token(
        &self,
        token: TokenId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<SignatureStatus> {
        self.error(
            SignatureStatusCode::InvalidTokenId,
            ResponseCode::InvalidTokenId,
            txn_id,
            StatusContext::Token(token),
        )
    }

    fn for_missing_token_treasury(
        &self,
        treasury: AccountId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<SignatureStatus> {
        self.error(
            SignatureStatusCode::InvalidTreasuryAccountId,
            ResponseCode::InvalidTreasuryAccountForToken,
            txn_id,
            StatusContext::Account(treasury),
        )
    }

    fn for_missing_schedule(
        &self,
        schedule: ScheduleId,
        txn_id: &TransactionId,
    ) -> SigningOrderResult<SignatureStatus> {
        self.error(
            SignatureStatusCode::InvalidScheduleId,
            ResponseCode::InvalidScheduleId,
            txn_id,
            StatusContext::Schedule(schedule),
        )
    }

    fn for_unresolvable_required_signers(
        &self,
        scheduled: &TransactionBody,
        txn_id: &TransactionId,
        inner_report: SignatureStatus,
    ) -> SigningOrderResult<SignatureStatus> {
        self.error(
            SignatureStatusCode::UnresolvableRequiredSigners,
            ResponseCode::UnresolvableRequiredSigners,
            txn_id,
            StatusContext::Scheduled {
                inner: Box::new(scheduled.clone()),
                report: Box::new(inner_report),
            },
        )
    }

    fn for_unschedulable_txn(&self, txn_id: &TransactionId) -> SigningOrderResult<SignatureStatus> {
        self.error(
            SignatureStatusCode::UnschedulableTransaction,
            ResponseCode::UnschedulableTransaction,
            txn_id,
            StatusContext::None,
        )
    }
}
