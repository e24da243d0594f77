use bon::Builder;
use ledger_sigs_domain::{AccountId, Key, KeyList, TransactionBody};

/// Signing view of a crypto account.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct AccountSigningMetadata {
    /// The account's key; `None` for accounts without one (keyless contracts).
    key: Option<Key>,

    #[builder(default)]
    receiver_sig_required: bool,

    #[builder(default)]
    smart_contract: bool,
}

/// Signing view of a smart contract that has an externally controllable key.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct ContractSigningMetadata {
    key: Key,

    #[builder(default)]
    receiver_sig_required: bool,
}

/// Signing view of a file: its access-control list.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct FileSigningMetadata {
    wacl: KeyList,
}

/// Signing view of a consensus topic. Both keys are independently optional.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct TopicSigningMetadata {
    admin_key: Option<Key>,
    submit_key: Option<Key>,
}

/// Signing view of a token.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct TokenSigningMetadata {
    treasury: AccountId,
    admin_key: Option<Key>,
    kyc_key: Option<Key>,
    freeze_key: Option<Key>,
    wipe_key: Option<Key>,
    supply_key: Option<Key>,
}

/// Signing view of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct ScheduleSigningMetadata {
    admin_key: Option<Key>,

    /// The account paying for the scheduled transaction, if not the schedule's creator.
    designated_payer: Option<AccountId>,

    /// The scheduled transaction.
    scheduled_txn: TransactionBody,
}

impl AccountSigningMetadata {
    /// Returns the account's key.
    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    /// Returns `true` if the account must sign transactions that credit it.
    pub fn receiver_sig_required(&self) -> bool {
        self.receiver_sig_required
    }

    /// Returns `true` if the account is a smart contract.
    pub fn is_smart_contract(&self) -> bool {
        self.smart_contract
    }
}

impl ContractSigningMetadata {
    /// Returns the contract's admin key.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Returns `true` if the contract must sign transactions that credit it.
    pub fn receiver_sig_required(&self) -> bool {
        self.receiver_sig_required
    }
}

impl FileSigningMetadata {
    /// Returns the file's access-control list.
    pub fn wacl(&self) -> &KeyList {
        &self.wacl
    }
}

impl TopicSigningMetadata {
    #[allow(missing_docs)]
    pub fn admin_key(&self) -> Option<&Key> {
        self.admin_key.as_ref()
    }

    #[allow(missing_docs)]
    pub fn submit_key(&self) -> Option<&Key> {
        self.submit_key.as_ref()
    }
}

#[allow(missing_docs)]
impl TokenSigningMetadata {
    pub fn treasury(&self) -> AccountId {
        self.treasury
    }

    pub fn admin_key(&self) -> Option<&Key> {
        self.admin_key.as_ref()
    }

    pub fn kyc_key(&self) -> Option<&Key> {
        self.kyc_key.as_ref()
    }

    pub fn freeze_key(&self) -> Option<&Key> {
        self.freeze_key.as_ref()
    }

    pub fn wipe_key(&self) -> Option<&Key> {
        self.wipe_key.as_ref()
    }

    pub fn supply_key(&self) -> Option<&Key> {
        self.supply_key.as_ref()
    }
}

impl ScheduleSigningMetadata {
    /// Returns the schedule's admin key.
    pub fn admin_key(&self) -> Option<&Key> {
        self.admin_key.as_ref()
    }

    /// Returns the designated payer of the scheduled transaction.
    pub fn designated_payer(&self) -> Option<AccountId> {
        self.designated_payer
    }

    /// Returns the scheduled transaction.
    pub fn scheduled_txn(&self) -> &TransactionBody {
        &self.scheduled_txn
    }
}
