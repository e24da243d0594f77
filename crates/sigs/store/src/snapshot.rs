use std::collections::BTreeMap;

use ledger_sigs_domain::{AccountId, FileId, ScheduleId, TokenId, TopicId};

use crate::{
    AccountStore, FileStore, ScheduleStore, TokenStore, TopicStore,
    error::{LedgerStoreError, Result},
    record::{AccountRecord, FileRecord, ScheduleRecord, TokenRecord, TopicRecord},
};

/// An immutable-once-built, in-memory view of ledger state.
///
/// Entities are kept in ordered maps so that iteration, and anything derived from it, is the
/// same on every node.
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    accounts: BTreeMap<AccountId, AccountRecord>,
    files: BTreeMap<FileId, FileRecord>,
    topics: BTreeMap<TopicId, TopicRecord>,
    tokens: BTreeMap<TokenId, TokenRecord>,
    schedules: BTreeMap<ScheduleId, ScheduleRecord>,
}

impl LedgerSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an account.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is the sentinel missing id or is already stored.
    #[tracing::instrument(skip_all, fields(%id))]
    pub fn insert_account(&mut self, id: AccountId, record: AccountRecord) -> Result<()> {
        if id.is_missing() {
            return Err(LedgerStoreError::InvalidId(format!("account {id}").into()));
        }
        if self.accounts.contains_key(&id) {
            return Err(LedgerStoreError::AlreadyExists(format!("account {id}").into()));
        }

        tracing::trace!(smart_contract = record.is_smart_contract(), "stored account");
        self.accounts.insert(id, record);
        Ok(())
    }

    /// Stores a file.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is the sentinel missing id or is already stored.
    #[tracing::instrument(skip_all, fields(%id))]
    pub fn insert_file(&mut self, id: FileId, record: FileRecord) -> Result<()> {
        if id.is_missing() {
            return Err(LedgerStoreError::InvalidId(format!("file {id}").into()));
        }
        if self.files.contains_key(&id) {
            return Err(LedgerStoreError::AlreadyExists(format!("file {id}").into()));
        }

        tracing::trace!(wacl_len = record.wacl().len(), "stored file");
        self.files.insert(id, record);
        Ok(())
    }

    /// Stores a topic.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is the sentinel missing id or is already stored.
    #[tracing::instrument(skip_all, fields(%id))]
    pub fn insert_topic(&mut self, id: TopicId, record: TopicRecord) -> Result<()> {
        if id.is_missing() {
            return Err(LedgerStoreError::InvalidId(format!("topic {id}").into()));
        }
        if self.topics.contains_key(&id) {
            return Err(LedgerStoreError::AlreadyExists(format!("topic {id}").into()));
        }

        tracing::trace!("stored topic");
        self.topics.insert(id, record);
        Ok(())
    }

    /// Stores a token.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is the sentinel missing id or is already stored.
    #[tracing::instrument(skip_all, fields(%id))]
    pub fn insert_token(&mut self, id: TokenId, record: TokenRecord) -> Result<()> {
        if id.is_missing() {
            return Err(LedgerStoreError::InvalidId(format!("token {id}").into()));
        }
        if self.tokens.contains_key(&id) {
            return Err(LedgerStoreError::AlreadyExists(format!("token {id}").into()));
        }

        tracing::trace!(treasury = %record.treasury(), "stored token");
        self.tokens.insert(id, record);
        Ok(())
    }

    /// Stores a schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is the sentinel missing id or is already stored, or if the
    /// wrapped transaction does not carry a scheduled transaction id.
    #[tracing::instrument(skip_all, fields(%id))]
    pub fn insert_schedule(&mut self, id: ScheduleId, record: ScheduleRecord) -> Result<()> {
        if id.is_missing() {
            return Err(LedgerStoreError::InvalidId(format!("schedule {id}").into()));
        }
        if self.schedules.contains_key(&id) {
            return Err(LedgerStoreError::AlreadyExists(format!("schedule {id}").into()));
        }
        if !record.scheduled_txn().transaction_id().is_scheduled() {
            return Err(LedgerStoreError::other(format!(
                "schedule {id} wraps a transaction without a scheduled id"
            )));
        }

        tracing::trace!(txn_id = %record.scheduled_txn().transaction_id(), "stored schedule");
        self.schedules.insert(id, record);
        Ok(())
    }
}

impl AccountStore for LedgerSnapshot {
    fn contains_account(&self, id: AccountId) -> bool {
        self.accounts.contains_key(&id)
    }

    fn get_account(&self, id: AccountId) -> Option<AccountRecord> {
        self.accounts.get(&id).cloned()
    }
}

impl FileStore for LedgerSnapshot {
    fn contains_file(&self, id: FileId) -> bool {
        self.files.contains_key(&id)
    }

    fn get_file(&self, id: FileId) -> Option<FileRecord> {
        self.files.get(&id).cloned()
    }
}

impl TopicStore for LedgerSnapshot {
    fn contains_topic(&self, id: TopicId) -> bool {
        self.topics.contains_key(&id)
    }

    fn get_topic(&self, id: TopicId) -> Option<TopicRecord> {
        self.topics.get(&id).cloned()
    }
}

impl TokenStore for LedgerSnapshot {
    fn resolve_token(&self, id: TokenId) -> TokenId {
        if self.tokens.contains_key(&id) { id } else { TokenId::MISSING }
    }

    fn get_token(&self, id: TokenId) -> Option<TokenRecord> {
        self.tokens.get(&id).cloned()
    }
}

impl ScheduleStore for LedgerSnapshot {
    // executed and deleted schedules are no longer signable
    fn resolve_schedule(&self, id: ScheduleId) -> ScheduleId {
        match self.schedules.get(&id) {
            Some(schedule) if !schedule.is_executed() && !schedule.is_deleted() => id,
            _ => ScheduleId::MISSING,
        }
    }

    fn get_schedule(&self, id: ScheduleId) -> Option<ScheduleRecord> {
        self.schedules.get(&id).cloned()
    }
}
