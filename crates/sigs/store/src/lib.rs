//! Read-only views of the ledger entities that carry signing requirements.
//!
//! This crate defines the records the signing-requirements engine reads (accounts, files,
//! topics, tokens and schedules) and one store trait per entity kind. The engine never
//! mutates ledger state, so the traits only expose membership checks, indirect-reference
//! resolution and read accessors.
//!
//! # Main Components
//!
//! - [`AccountStore`], [`FileStore`], [`TopicStore`], [`TokenStore`], [`ScheduleStore`] - the
//!   per-kind read interfaces
//! - [`LedgerStore`] - every per-kind interface at once, implemented for any type providing
//!   them all
//! - [`LedgerSnapshot`] - a deterministic in-memory store
//! - [`LedgerStoreError`] - errors raised while building a snapshot
//!
//! # Usage
//!
//! ```ignore
//! let mut snapshot = LedgerSnapshot::new();
//! snapshot.insert_account(AccountId::from_num(2), AccountRecord::builder().key(key).build())?;
//!
//! assert!(snapshot.contains_account(AccountId::from_num(2)));
//! ```

mod error;
mod record;
mod snapshot;

pub use self::{
    error::{LedgerStoreError, Result},
    record::{
        AccountRecord, AccountRecordDissolved, FileRecord, FileRecordDissolved, ScheduleRecord,
        ScheduleRecordDissolved, TokenRecord, TokenRecordDissolved, TopicRecord,
        TopicRecordDissolved,
    },
    snapshot::LedgerSnapshot,
};

use ledger_sigs_domain::{AccountId, FileId, ScheduleId, TokenId, TopicId};

/// Read access to crypto accounts, smart contracts included.
pub trait AccountStore {
    /// Returns `true` if an account with this id exists, deleted or not.
    fn contains_account(&self, id: AccountId) -> bool;

    /// Returns the stored account.
    fn get_account(&self, id: AccountId) -> Option<AccountRecord>;
}

/// Read access to files.
pub trait FileStore {
    /// Returns `true` if a file with this id exists, deleted or not.
    fn contains_file(&self, id: FileId) -> bool;

    /// Returns the stored file.
    fn get_file(&self, id: FileId) -> Option<FileRecord>;
}

/// Read access to consensus topics.
pub trait TopicStore {
    /// Returns `true` if a topic with this id exists, deleted or not.
    fn contains_topic(&self, id: TopicId) -> bool;

    /// Returns the stored topic.
    fn get_topic(&self, id: TopicId) -> Option<TopicRecord>;
}

/// Read access to tokens.
pub trait TokenStore {
    /// Resolves a token reference, returning [`TokenId::MISSING`] if it does not name a
    /// usable token.
    fn resolve_token(&self, id: TokenId) -> TokenId;

    /// Returns the stored token.
    fn get_token(&self, id: TokenId) -> Option<TokenRecord>;
}

/// Read access to schedules.
pub trait ScheduleStore {
    /// Resolves a schedule reference, returning [`ScheduleId::MISSING`] if it does not name a
    /// pending schedule.
    fn resolve_schedule(&self, id: ScheduleId) -> ScheduleId;

    /// Returns the stored schedule.
    fn get_schedule(&self, id: ScheduleId) -> Option<ScheduleRecord>;
}

/// A store providing every entity kind.
pub trait LedgerStore: AccountStore + FileStore + TopicStore + TokenStore + ScheduleStore {}

impl<T> LedgerStore for T where T: AccountStore + FileStore + TopicStore + TokenStore + ScheduleStore
{}
