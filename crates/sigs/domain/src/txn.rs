//! Transactions, their ids and bodies.

pub mod ops;

use alloc::{string::String, vec::Vec};
use core::fmt;

use bon::Builder;
use chrono::{DateTime, Utc};
use dissolve_derive::Dissolve;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use self::ops::{
    ConsensusCreateTopic, ConsensusDeleteTopic, ConsensusSubmitMessage, ConsensusUpdateTopic,
    ContractCall, ContractCreate, ContractDelete, ContractUpdate, CryptoCreate, CryptoDelete,
    CryptoTransfer, CryptoUpdate, FileAppend, FileCreate, FileDelete, FileUpdate, Freeze,
    ScheduleCreate, ScheduleDelete, ScheduleSign, SystemDelete, SystemUndelete, TokenAccountOp,
    TokenAmountOp, TokenAssociation, TokenCreate, TokenDelete, TokenUpdate, TokenWipe,
};
use crate::{entity::AccountId, sig_map::SignatureMap};

/// The kind of operation a transaction performs.
///
/// The string forms (`crypto_transfer`, `token_mint`, ...) are what configuration uses, e.g.
/// in the schedulable-operation whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Display, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
#[allow(missing_docs)]
pub enum Functionality {
    CryptoCreate,
    CryptoTransfer,
    CryptoUpdate,
    CryptoDelete,
    FileCreate,
    FileAppend,
    FileUpdate,
    FileDelete,
    SystemDelete,
    SystemUndelete,
    ContractCreate,
    ContractUpdate,
    ContractDelete,
    ContractCall,
    ConsensusCreateTopic,
    ConsensusUpdateTopic,
    ConsensusDeleteTopic,
    ConsensusSubmitMessage,
    TokenCreate,
    TokenUpdate,
    TokenDelete,
    TokenMint,
    TokenBurn,
    TokenWipe,
    TokenFreeze,
    TokenUnfreeze,
    TokenGrantKyc,
    TokenRevokeKyc,
    TokenAssociate,
    TokenDissociate,
    ScheduleCreate,
    ScheduleSign,
    ScheduleDelete,
    Freeze,
}

/// Identifies a transaction: the paying account plus the start of its validity window.
///
/// The `scheduled` flag marks the id of a transaction that executes as part of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TransactionId {
    /// The account paying for the transaction.
    payer: AccountId,

    /// The consensus time from which the transaction is valid.
    valid_start: DateTime<Utc>,

    /// Whether the transaction is the scheduled child of a schedule.
    #[builder(default)]
    #[cfg_attr(feature = "serde", serde(default))]
    scheduled: bool,
}

/// The operation a transaction performs, with its operation-specific fields.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
#[allow(missing_docs)]
pub enum TransactionData {
    CryptoCreate(CryptoCreate),
    CryptoTransfer(CryptoTransfer),
    CryptoUpdate(CryptoUpdate),
    CryptoDelete(CryptoDelete),
    FileCreate(FileCreate),
    FileAppend(FileAppend),
    FileUpdate(FileUpdate),
    FileDelete(FileDelete),
    SystemDelete(SystemDelete),
    SystemUndelete(SystemUndelete),
    ContractCreate(ContractCreate),
    ContractUpdate(ContractUpdate),
    ContractDelete(ContractDelete),
    ContractCall(ContractCall),
    ConsensusCreateTopic(ConsensusCreateTopic),
    ConsensusUpdateTopic(ConsensusUpdateTopic),
    ConsensusDeleteTopic(ConsensusDeleteTopic),
    ConsensusSubmitMessage(ConsensusSubmitMessage),
    TokenCreate(TokenCreate),
    TokenUpdate(TokenUpdate),
    TokenDelete(TokenDelete),
    TokenMint(TokenAmountOp),
    TokenBurn(TokenAmountOp),
    TokenWipe(TokenWipe),
    TokenFreeze(TokenAccountOp),
    TokenUnfreeze(TokenAccountOp),
    TokenGrantKyc(TokenAccountOp),
    TokenRevokeKyc(TokenAccountOp),
    TokenAssociate(TokenAssociation),
    TokenDissociate(TokenAssociation),
    ScheduleCreate(ScheduleCreate),
    ScheduleSign(ScheduleSign),
    ScheduleDelete(ScheduleDelete),
    Freeze(Freeze),
}

/// The signed content of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Dissolve)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TransactionBody {
    /// The transaction id, which names the payer.
    transaction_id: TransactionId,

    /// A free-form memo.
    #[builder(default)]
    #[cfg_attr(feature = "serde", serde(default))]
    memo: String,

    /// The operation.
    data: TransactionData,
}

/// A transaction as delivered to the node: its body, the exact bytes that were signed, and
/// the attached signatures.
#[derive(Debug, Clone, Builder, Dissolve)]
#[cfg_attr(feature = "serde", serde_with::serde_as, derive(Serialize, Deserialize))]
pub struct Transaction {
    /// The parsed body.
    body: TransactionBody,

    /// The bytes the signatures were produced over.
    #[cfg_attr(feature = "serde", serde_as(as = "serde_with::hex::Hex"))]
    body_bytes: Vec<u8>,

    /// The attached signatures.
    #[builder(default)]
    #[cfg_attr(feature = "serde", serde(default))]
    sig_map: SignatureMap,
}

impl TransactionId {
    /// Returns the paying account.
    pub fn payer(&self) -> AccountId {
        self.payer
    }

    /// Returns the start of the validity window.
    pub fn valid_start(&self) -> DateTime<Utc> {
        self.valid_start
    }

    /// Returns `true` for the id of a scheduled child transaction.
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Returns the id a scheduled child of this transaction carries, paid for by `payer`.
    pub fn scheduled_for(&self, payer: AccountId) -> Self {
        Self { payer, valid_start: self.valid_start, scheduled: true }
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}.{:09}",
            self.payer,
            self.valid_start.timestamp(),
            self.valid_start.timestamp_subsec_nanos()
        )?;

        if self.scheduled {
            f.write_str("?scheduled")?;
        }

        Ok(())
    }
}

impl TransactionData {
    /// Returns the operation kind.
    pub fn functionality(&self) -> Functionality {
        match self {
            Self::CryptoCreate(_) => Functionality::CryptoCreate,
            Self::CryptoTransfer(_) => Functionality::CryptoTransfer,
            Self::CryptoUpdate(_) => Functionality::CryptoUpdate,
            Self::CryptoDelete(_) => Functionality::CryptoDelete,
            Self::FileCreate(_) => Functionality::FileCreate,
            Self::FileAppend(_) => Functionality::FileAppend,
            Self::FileUpdate(_) => Functionality::FileUpdate,
            Self::FileDelete(_) => Functionality::FileDelete,
            Self::SystemDelete(_) => Functionality::SystemDelete,
            Self::SystemUndelete(_) => Functionality::SystemUndelete,
            Self::ContractCreate(_) => Functionality::ContractCreate,
            Self::ContractUpdate(_) => Functionality::ContractUpdate,
            Self::ContractDelete(_) => Functionality::ContractDelete,
            Self::ContractCall(_) => Functionality::ContractCall,
            Self::ConsensusCreateTopic(_) => Functionality::ConsensusCreateTopic,
            Self::ConsensusUpdateTopic(_) => Functionality::ConsensusUpdateTopic,
            Self::ConsensusDeleteTopic(_) => Functionality::ConsensusDeleteTopic,
            Self::ConsensusSubmitMessage(_) => Functionality::ConsensusSubmitMessage,
            Self::TokenCreate(_) => Functionality::TokenCreate,
            Self::TokenUpdate(_) => Functionality::TokenUpdate,
            Self::TokenDelete(_) => Functionality::TokenDelete,
            Self::TokenMint(_) => Functionality::TokenMint,
            Self::TokenBurn(_) => Functionality::TokenBurn,
            Self::TokenWipe(_) => Functionality::TokenWipe,
            Self::TokenFreeze(_) => Functionality::TokenFreeze,
            Self::TokenUnfreeze(_) => Functionality::TokenUnfreeze,
            Self::TokenGrantKyc(_) => Functionality::TokenGrantKyc,
            Self::TokenRevokeKyc(_) => Functionality::TokenRevokeKyc,
            Self::TokenAssociate(_) => Functionality::TokenAssociate,
            Self::TokenDissociate(_) => Functionality::TokenDissociate,
            Self::ScheduleCreate(_) => Functionality::ScheduleCreate,
            Self::ScheduleSign(_) => Functionality::ScheduleSign,
            Self::ScheduleDelete(_) => Functionality::ScheduleDelete,
            Self::Freeze(_) => Functionality::Freeze,
        }
    }
}

impl TransactionBody {
    /// Returns the transaction id.
    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    /// Returns the paying account.
    pub fn payer(&self) -> AccountId {
        self.transaction_id.payer
    }

    /// Returns the memo.
    pub fn memo(&self) -> &str {
        &self.memo
    }

    /// Returns the operation.
    pub fn data(&self) -> &TransactionData {
        &self.data
    }

    /// Returns the operation kind.
    pub fn functionality(&self) -> Functionality {
        self.data.functionality()
    }
}

impl Transaction {
    /// Returns the parsed body.
    pub fn body(&self) -> &TransactionBody {
        &self.body
    }

    /// Returns the signed bytes.
    pub fn body_bytes(&self) -> &[u8] {
        &self.body_bytes
    }

    /// Returns the attached signatures.
    pub fn sig_map(&self) -> &SignatureMap {
        &self.sig_map
    }

    /// Returns the transaction id.
    pub fn transaction_id(&self) -> &TransactionId {
        self.body.transaction_id()
    }

    /// Returns the paying account.
    pub fn payer(&self) -> AccountId {
        self.body.payer()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use core::str::FromStr;

    use super::*;

    fn txn_id(scheduled: bool) -> TransactionId {
        TransactionId::builder()
            .payer(AccountId::from_num(2))
            .valid_start(DateTime::from_timestamp(1_600_000_000, 42).unwrap())
            .scheduled(scheduled)
            .build()
    }

    #[test]
    fn displays_payer_and_valid_start() {
        assert_eq!(txn_id(false).to_string(), "0.0.2@1600000000.000000042");
        assert_eq!(txn_id(true).to_string(), "0.0.2@1600000000.000000042?scheduled");
    }

    #[test]
    fn scheduled_id_keeps_valid_start() {
        let scheduled = txn_id(false).scheduled_for(AccountId::from_num(7));

        assert!(scheduled.is_scheduled());
        assert_eq!(scheduled.payer(), AccountId::from_num(7));
        assert_eq!(scheduled.valid_start(), txn_id(false).valid_start());
    }

    #[test]
    fn functionality_round_trips_through_its_config_name() {
        assert_eq!(Functionality::ConsensusSubmitMessage.to_string(), "consensus_submit_message");
        assert_eq!(Functionality::from_str("token_mint"), Ok(Functionality::TokenMint));
        assert!(Functionality::from_str("not_an_op").is_err());
    }
}
