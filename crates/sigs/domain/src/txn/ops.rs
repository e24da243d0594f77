//! Operation-specific transaction fields.
//!
//! Only the fields that bear on signing requirements are modelled. Keys carried here are the
//! *new* keys a transaction proposes; they may be empty or malformed, and it is up to the
//! signing-order resolver to decide what that means.

use alloc::{boxed::Box, string::String, vec::Vec};

use bon::Builder;
use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::TransactionData;
use crate::{
    entity::{AccountId, ContractId, FileId, ScheduleId, TokenId, TopicId},
    key::{Key, KeyList},
};

/// A signed change to one account's balance. Negative amounts are debits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AccountAmount {
    /// The account whose balance changes.
    pub account: AccountId,
    /// The signed change in the smallest denomination.
    pub amount: i64,
}

/// Balance changes of one token.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TokenTransferList {
    /// The token being transferred.
    pub token: TokenId,
    /// The balance changes, in body order.
    #[builder(default)]
    pub transfers: Vec<AccountAmount>,
}

/// Creates a crypto account.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CryptoCreate {
    /// The new account's key.
    pub key: Key,
    /// Whether credits to the new account require its signature.
    #[builder(default)]
    pub receiver_sig_required: bool,
    /// The initial balance moved from the payer.
    #[builder(default)]
    pub initial_balance: u64,
}

/// Transfers hbar and tokens between accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CryptoTransfer {
    /// Hbar balance changes, in body order.
    #[builder(default)]
    pub hbar_transfers: Vec<AccountAmount>,
    /// Token balance changes, in body order.
    #[builder(default)]
    pub token_transfers: Vec<TokenTransferList>,
}

/// Updates a crypto account.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CryptoUpdate {
    /// The account to update.
    pub target: AccountId,
    /// A replacement key.
    pub key: Option<Key>,
    /// A replacement receiver-signature-required flag.
    pub receiver_sig_required: Option<bool>,
    /// A new expiration time.
    pub expiration_time: Option<DateTime<Utc>>,
}

/// Deletes a crypto account, moving its balance to a beneficiary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CryptoDelete {
    /// The account to delete.
    pub target: AccountId,
    /// The account receiving the remaining balance.
    pub beneficiary: AccountId,
}

/// Creates a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FileCreate {
    /// The new file's access-control list.
    pub keys: Option<KeyList>,
}

/// Appends to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FileAppend {
    /// The file to append to.
    pub target: FileId,
}

/// Updates a file's contents or access-control list.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FileUpdate {
    /// The file to update.
    pub target: FileId,
    /// A replacement access-control list.
    pub keys: Option<KeyList>,
}

/// Deletes a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FileDelete {
    /// The file to delete.
    pub target: FileId,
}

/// The entity a privileged system delete or undelete acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
#[allow(missing_docs)]
pub enum SystemTarget {
    File(FileId),
    Contract(ContractId),
}

/// Privileged deletion of a file or contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SystemDelete {
    /// The entity to delete.
    pub target: SystemTarget,
}

/// Privileged restoration of a deleted file or contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SystemUndelete {
    /// The entity to restore.
    pub target: SystemTarget,
}

/// Creates a smart contract.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContractCreate {
    /// The new contract's admin key.
    pub admin_key: Option<Key>,
    /// The account funding auto-renewal.
    pub auto_renew_account: Option<AccountId>,
    /// The initial balance moved from the payer.
    #[builder(default)]
    pub initial_balance: u64,
}

/// Updates a smart contract.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContractUpdate {
    /// The contract to update.
    pub target: ContractId,
    /// A replacement admin key.
    pub admin_key: Option<Key>,
    /// A replacement auto-renew account.
    pub auto_renew_account: Option<AccountId>,
    /// A new expiration time.
    pub expiration_time: Option<DateTime<Utc>>,
    /// A replacement memo.
    pub memo: Option<String>,
}

/// The entity receiving a deleted contract's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
#[allow(missing_docs)]
pub enum ContractBeneficiary {
    Account(AccountId),
    Contract(ContractId),
}

/// Deletes a smart contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContractDelete {
    /// The contract to delete.
    pub target: ContractId,
    /// The entity receiving the remaining balance.
    pub beneficiary: Option<ContractBeneficiary>,
}

/// Calls a smart contract function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContractCall {
    /// The contract being called.
    pub target: ContractId,
    /// The value sent with the call.
    #[builder(default)]
    pub amount: u64,
}

/// Creates a consensus topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConsensusCreateTopic {
    /// The new topic's admin key.
    pub admin_key: Option<Key>,
    /// The new topic's submit key.
    pub submit_key: Option<Key>,
    /// The account funding auto-renewal.
    pub auto_renew_account: Option<AccountId>,
}

/// Updates a consensus topic.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConsensusUpdateTopic {
    /// The topic to update.
    pub target: TopicId,
    /// A replacement admin key.
    pub admin_key: Option<Key>,
    /// A replacement submit key.
    pub submit_key: Option<Key>,
    /// A replacement auto-renew account.
    pub auto_renew_account: Option<AccountId>,
    /// A new expiration time.
    pub expiration_time: Option<DateTime<Utc>>,
    /// A replacement memo.
    pub memo: Option<String>,
}

/// Deletes a consensus topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConsensusDeleteTopic {
    /// The topic to delete.
    pub target: TopicId,
}

/// Submits a message to a consensus topic.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConsensusSubmitMessage {
    /// The topic to submit to.
    pub target: TopicId,
    /// The message payload.
    #[builder(default)]
    pub message: Vec<u8>,
}

/// Creates a token.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TokenCreate {
    /// The account holding the initial supply.
    pub treasury: AccountId,
    /// The admin key.
    pub admin_key: Option<Key>,
    /// The KYC key.
    pub kyc_key: Option<Key>,
    /// The freeze key.
    pub freeze_key: Option<Key>,
    /// The wipe key.
    pub wipe_key: Option<Key>,
    /// The supply key.
    pub supply_key: Option<Key>,
    /// The account funding auto-renewal.
    pub auto_renew_account: Option<AccountId>,
}

/// Updates a token.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TokenUpdate {
    /// The token to update.
    pub token: TokenId,
    /// A replacement treasury account.
    pub treasury: Option<AccountId>,
    /// A replacement admin key.
    pub admin_key: Option<Key>,
    /// A replacement auto-renew account.
    pub auto_renew_account: Option<AccountId>,
    /// A new expiration time.
    pub expiration_time: Option<DateTime<Utc>>,
}

/// Deletes a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TokenDelete {
    /// The token to delete.
    pub token: TokenId,
}

/// Mints or burns token supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TokenAmountOp {
    /// The token whose supply changes.
    pub token: TokenId,
    /// The amount minted or burned.
    pub amount: u64,
}

/// Wipes tokens from an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TokenWipe {
    /// The token to wipe.
    pub token: TokenId,
    /// The account to wipe from.
    pub account: AccountId,
    /// The amount wiped.
    pub amount: u64,
}

/// Freezes, unfreezes, grants KYC to or revokes KYC from an account for a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TokenAccountOp {
    /// The token.
    pub token: TokenId,
    /// The affected account.
    pub account: AccountId,
}

/// Associates tokens with, or dissociates tokens from, an account.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TokenAssociation {
    /// The account being (dis)associated.
    pub account: AccountId,
    /// The tokens.
    #[builder(default)]
    pub tokens: Vec<TokenId>,
}

/// Creates a schedule wrapping a transaction to execute once enough keys have signed.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleCreate {
    /// The schedule's admin key.
    pub admin_key: Option<Key>,
    /// The account that pays for the scheduled transaction; defaults to the creator.
    pub payer: Option<AccountId>,
    /// The operation to schedule.
    pub scheduled: Box<TransactionData>,
}

/// Adds signatures to a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleSign {
    /// The schedule to sign.
    pub schedule: ScheduleId,
}

/// Deletes a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleDelete {
    /// The schedule to delete.
    pub schedule: ScheduleId,
}

/// Schedules a network freeze.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Freeze {
    /// The time the freeze starts.
    pub start_time: Option<DateTime<Utc>>,
}

impl AccountAmount {
    /// Creates a balance change.
    pub fn new(account: AccountId, amount: i64) -> Self {
        Self { account, amount }
    }

    /// Returns `true` if the change debits the account.
    pub fn is_debit(&self) -> bool {
        self.amount < 0
    }
}

impl ContractUpdate {
    /// Returns `true` if only the expiration time changes.
    ///
    /// Extending a contract's life needs no admin signature.
    pub fn is_expiry_only(&self) -> bool {
        self.expiration_time.is_some()
            && self.admin_key.is_none()
            && self.auto_renew_account.is_none()
            && self.memo.is_none()
    }
}

impl ConsensusUpdateTopic {
    /// Returns `true` if only the expiration time changes.
    pub fn is_expiry_only(&self) -> bool {
        self.expiration_time.is_some()
            && self.admin_key.is_none()
            && self.submit_key.is_none()
            && self.auto_renew_account.is_none()
            && self.memo.is_none()
    }
}
