use bon::Builder;
use dissolve_derive::Dissolve;
use ledger_sigs_domain::{AccountId, Key, KeyList, TransactionBody};

/// A crypto account as held by the ledger. Smart contracts are accounts with
/// `smart_contract` set.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Dissolve)]
pub struct AccountRecord {
    /// The account's key. Contracts created without an admin key have none.
    key: Option<Key>,

    /// Whether the account must co-sign transactions that credit it.
    #[builder(default)]
    receiver_sig_required: bool,

    #[builder(default)]
    deleted: bool,

    /// Whether the account is a smart contract.
    #[builder(default)]
    smart_contract: bool,
}

/// A file in the ledger's file service. Only its access-control list matters here.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Dissolve)]
pub struct FileRecord {
    /// The keys that must sign changes to the file.
    wacl: KeyList,

    #[builder(default)]
    deleted: bool,
}

/// A consensus topic.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Dissolve)]
pub struct TopicRecord {
    admin_key: Option<Key>,
    submit_key: Option<Key>,

    #[builder(default)]
    deleted: bool,
}

/// A token and its management keys.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Dissolve)]
pub struct TokenRecord {
    /// The account holding the token's treasury.
    treasury: AccountId,
    admin_key: Option<Key>,
    kyc_key: Option<Key>,
    freeze_key: Option<Key>,
    wipe_key: Option<Key>,
    supply_key: Option<Key>,

    #[builder(default)]
    deleted: bool,
}

/// A schedule wrapping a transaction that executes once enough of its required signers
/// have signed.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Dissolve)]
pub struct ScheduleRecord {
    admin_key: Option<Key>,

    /// The account paying for the scheduled transaction, when not the schedule's creator.
    designated_payer: Option<AccountId>,

    /// The body of the scheduled transaction, carrying its scheduled transaction id.
    scheduled_txn: TransactionBody,

    #[builder(default)]
    executed: bool,

    #[builder(default)]
    deleted: bool,
}

impl AccountRecord {
    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    pub fn receiver_sig_required(&self) -> bool {
        self.receiver_sig_required
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn is_smart_contract(&self) -> bool {
        self.smart_contract
    }
}

impl FileRecord {
    pub fn wacl(&self) -> &KeyList {
        &self.wacl
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

impl TopicRecord {
    pub fn admin_key(&self) -> Option<&Key> {
        self.admin_key.as_ref()
    }

    pub fn submit_key(&self) -> Option<&Key> {
        self.submit_key.as_ref()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

impl TokenRecord {
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

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

impl ScheduleRecord {
    pub fn admin_key(&self) -> Option<&Key> {
        self.admin_key.as_ref()
    }

    pub fn designated_payer(&self) -> Option<AccountId> {
        self.designated_payer
    }

    pub fn scheduled_txn(&self) -> &TransactionBody {
        &self.scheduled_txn
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}
