//! Entity metadata lookups.
//!
//! Each lookup projects one ledger entity onto the keys and flags that bear on signing
//! requirements, or reports exactly one [`KeyOrderingFailure`]. Lookups are pure reads; the
//! resolver may call the same lookup several times while resolving one transaction.

mod metadata;
mod store_backed;

pub use self::{
    metadata::{
        AccountSigningMetadata, ContractSigningMetadata, FileSigningMetadata,
        ScheduleSigningMetadata, TokenSigningMetadata, TopicSigningMetadata,
    },
    store_backed::{
        StoreAccountLookup, StoreContractLookup, StoreFileLookup, StoreScheduleLookup,
        StoreTokenLookup, StoreTopicLookup,
    },
};

use ledger_sigs_domain::{AccountId, ContractId, FileId, ScheduleId, TokenId, TopicId};
use ledger_sigs_store::LedgerStore;
use strum::{Display, EnumString, IntoStaticStr};

/// Why an entity's signing metadata could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum KeyOrderingFailure {
    None,
    MissingFile,
    MissingAccount,
    InvalidAccount,
    InvalidContract,
    ImmutableContract,
    MissingAutorenewAccount,
    MissingToken,
    MissingTokenTreasury,
    InvalidTopic,
    MissingSchedule,
}

/// The outcome of a single lookup: signing metadata, or the reason there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SafeLookupResult<T> {
    /// The entity resolved.
    Found(T),
    /// The entity is missing or unusable.
    Failed(KeyOrderingFailure),
}

impl<T> SafeLookupResult<T> {
    /// Returns `true` if the lookup produced metadata.
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns the metadata of a successful lookup.
    pub fn metadata(&self) -> Option<&T> {
        match self {
            Self::Found(metadata) => Some(metadata),
            Self::Failed(_) => None,
        }
    }

    /// Returns the failure, or [`KeyOrderingFailure::None`] on success.
    pub fn failure_if_any(&self) -> KeyOrderingFailure {
        match self {
            Self::Found(_) => KeyOrderingFailure::None,
            Self::Failed(failure) => *failure,
        }
    }

    /// Converts into a `Result` so failures can be propagated with `?`.
    pub fn into_result(self) -> Result<T, KeyOrderingFailure> {
        match self {
            Self::Found(metadata) => Ok(metadata),
            Self::Failed(failure) => Err(failure),
        }
    }

    /// Maps the metadata of a successful lookup.
    pub fn map<U, F>(self, f: F) -> SafeLookupResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Found(metadata) => SafeLookupResult::Found(f(metadata)),
            Self::Failed(failure) => SafeLookupResult::Failed(failure),
        }
    }
}

/// Resolves accounts.
pub trait AccountSigMetaLookup {
    /// Looks up the signing metadata of `id`.
    fn safe_lookup(&self, id: AccountId) -> SafeLookupResult<AccountSigningMetadata>;
}

/// Resolves smart contracts.
pub trait ContractSigMetaLookup {
    /// Looks up the signing metadata of `id`.
    fn safe_lookup(&self, id: ContractId) -> SafeLookupResult<ContractSigningMetadata>;
}

/// Resolves files.
pub trait FileSigMetaLookup {
    /// Looks up the signing metadata of `id`.
    fn safe_lookup(&self, id: FileId) -> SafeLookupResult<FileSigningMetadata>;
}

/// Resolves consensus topics.
pub trait TopicSigMetaLookup {
    /// Looks up the signing metadata of `id`.
    fn safe_lookup(&self, id: TopicId) -> SafeLookupResult<TopicSigningMetadata>;
}

/// Resolves tokens.
pub trait TokenSigMetaLookup {
    /// Looks up the signing metadata of `id`.
    fn safe_lookup(&self, id: TokenId) -> SafeLookupResult<TokenSigningMetadata>;
}

/// Resolves schedules.
pub trait ScheduleSigMetaLookup {
    /// Looks up the signing metadata of `id`.
    fn safe_lookup(&self, id: ScheduleId) -> SafeLookupResult<ScheduleSigningMetadata>;
}

/// Every lookup the signing-order resolver needs.
pub trait SigMetadataLookup {
    /// Looks up an account.
    fn account_signing_meta_for(&self, id: AccountId) -> SafeLookupResult<AccountSigningMetadata>;

    /// Looks up a smart contract.
    fn contract_signing_meta_for(
        &self,
        id: ContractId,
    ) -> SafeLookupResult<ContractSigningMetadata>;

    /// Looks up a file.
    fn file_signing_meta_for(&self, id: FileId) -> SafeLookupResult<FileSigningMetadata>;

    /// Looks up a consensus topic.
    fn topic_signing_meta_for(&self, id: TopicId) -> SafeLookupResult<TopicSigningMetadata>;

    /// Looks up a token.
    fn token_signing_meta_for(&self, id: TokenId) -> SafeLookupResult<TokenSigningMetadata>;

    /// Looks up a schedule.
    fn schedule_signing_meta_for(
        &self,
        id: ScheduleId,
    ) -> SafeLookupResult<ScheduleSigningMetadata>;
}

/// A [`SigMetadataLookup`] assembled from one lookup per entity kind.
///
/// Any kind can be replaced independently, which is how tests inject fakes for a single
/// entity kind.
pub struct DelegatingSigMetadataLookup<'a> {
    accounts: Box<dyn AccountSigMetaLookup + 'a>,
    contracts: Box<dyn ContractSigMetaLookup + 'a>,
    files: Box<dyn FileSigMetaLookup + 'a>,
    topics: Box<dyn TopicSigMetaLookup + 'a>,
    tokens: Box<dyn TokenSigMetaLookup + 'a>,
    schedules: Box<dyn ScheduleSigMetaLookup + 'a>,
}

#[bon::bon]
impl<'a> DelegatingSigMetadataLookup<'a> {
    /// Creates a lookup from one lookup per entity kind.
    #[builder]
    pub fn new<A, C, F, T, K, S>(
        accounts: A,
        contracts: C,
        files: F,
        topics: T,
        tokens: K,
        schedules: S,
    ) -> Self
    where
        A: AccountSigMetaLookup + 'a,
        C: ContractSigMetaLookup + 'a,
        F: FileSigMetaLookup + 'a,
        T: TopicSigMetaLookup + 'a,
        K: TokenSigMetaLookup + 'a,
        S: ScheduleSigMetaLookup + 'a,
    {
        Self {
            accounts: Box::new(accounts),
            contracts: Box::new(contracts),
            files: Box::new(files),
            topics: Box::new(topics),
            tokens: Box::new(tokens),
            schedules: Box::new(schedules),
        }
    }

    /// Creates a lookup reading every entity kind from `store`.
    pub fn backed_by<L>(store: &'a L) -> Self
    where
        L: LedgerStore + ?Sized,
    {
        Self::builder()
            .accounts(StoreAccountLookup::new(store))
            .contracts(StoreContractLookup::new(store))
            .files(StoreFileLookup::new(store))
            .topics(StoreTopicLookup::new(store))
            .tokens(StoreTokenLookup::new(store))
            .schedules(StoreScheduleLookup::new(store))
            .build()
    }

    /// Replaces the account lookup.
    pub fn with_accounts<A>(mut self, accounts: A) -> Self
    where
        A: AccountSigMetaLookup + 'a,
    {
        self.accounts = Box::new(accounts);
        self
    }

    /// Replaces the contract lookup.
    pub fn with_contracts<C>(mut self, contracts: C) -> Self
    where
        C: ContractSigMetaLookup + 'a,
    {
        self.contracts = Box::new(contracts);
        self
    }
}

impl SigMetadataLookup for DelegatingSigMetadataLookup<'_> {
    fn account_signing_meta_for(&self, id: AccountId) -> SafeLookupResult<AccountSigningMetadata> {
        self.accounts.safe_lookup(id)
    }

    fn contract_signing_meta_for(
        &self,
        id: ContractId,
    ) -> SafeLookupResult<ContractSigningMetadata> {
        self.contracts.safe_lookup(id)
    }

    fn file_signing_meta_for(&self, id: FileId) -> SafeLookupResult<FileSigningMetadata> {
        self.files.safe_lookup(id)
    }

    fn topic_signing_meta_for(&self, id: TopicId) -> SafeLookupResult<TopicSigningMetadata> {
        self.topics.safe_lookup(id)
    }

    fn token_signing_meta_for(&self, id: TokenId) -> SafeLookupResult<TokenSigningMetadata> {
        self.tokens.safe_lookup(id)
    }

    fn schedule_signing_meta_for(
        &self,
        id: ScheduleId,
    ) -> SafeLookupResult<ScheduleSigningMetadata> {
        self.schedules.safe_lookup(id)
    }
}

impl<F> AccountSigMetaLookup for F
where
    F: Fn(AccountId) -> SafeLookupResult<AccountSigningMetadata>,
{
    fn safe_lookup(&self, id: AccountId) -> SafeLookupResult<AccountSigningMetadata> {
        self(id)
    }
}

impl<F> ContractSigMetaLookup for F
where
    F: Fn(ContractId) -> SafeLookupResult<ContractSigningMetadata>,
{
    fn safe_lookup(&self, id: ContractId) -> SafeLookupResult<ContractSigningMetadata> {
        self(id)
    }
}

#[cfg(test)]
mod tests;
