use ledger_sigs_domain::{AccountId, ContractId, FileId, Key, ScheduleId, TokenId, TopicId};
use ledger_sigs_store::{
    AccountRecordDissolved, AccountStore, FileStore, ScheduleRecordDissolved, ScheduleStore,
    TokenRecordDissolved, TokenStore, TopicStore,
};

use super::{
    AccountSigMetaLookup, AccountSigningMetadata, ContractSigMetaLookup, ContractSigningMetadata,
    FileSigMetaLookup, FileSigningMetadata, KeyOrderingFailure, SafeLookupResult,
    ScheduleSigMetaLookup, ScheduleSigningMetadata, TokenSigMetaLookup, TokenSigningMetadata,
    TopicSigMetaLookup, TopicSigningMetadata,
};

macro_rules! store_lookup {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name<'a, S: ?Sized> {
            store: &'a S,
        }

        impl<'a, S: ?Sized> $name<'a, S> {
            /// Creates a lookup reading from `store`.
            pub fn new(store: &'a S) -> Self {
                Self { store }
            }
        }

        impl<S: ?Sized> Clone for $name<'_, S> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<S: ?Sized> Copy for $name<'_, S> {}
    };
}

store_lookup!(
    /// Looks accounts up in an [`AccountStore`].
    StoreAccountLookup
);

store_lookup!(
    /// Looks smart contracts up in an [`AccountStore`].
    StoreContractLookup
);

store_lookup!(
    /// Looks files up in a [`FileStore`].
    StoreFileLookup
);

store_lookup!(
    /// Looks topics up in a [`TopicStore`].
    StoreTopicLookup
);

store_lookup!(
    /// Looks tokens up in a [`TokenStore`], resolving the reference first.
    StoreTokenLookup
);

store_lookup!(
    /// Looks schedules up in a [`ScheduleStore`], resolving the reference first.
    StoreScheduleLookup
);

impl<S> AccountSigMetaLookup for StoreAccountLookup<'_, S>
where
    S: AccountStore + ?Sized,
{
    fn safe_lookup(&self, id: AccountId) -> SafeLookupResult<AccountSigningMetadata> {
        if id.is_missing() {
            return SafeLookupResult::Failed(KeyOrderingFailure::InvalidAccount);
        }

        let Some(account) = self.store.get_account(id) else {
            return SafeLookupResult::Failed(KeyOrderingFailure::MissingAccount);
        };

        let AccountRecordDissolved { key, receiver_sig_required, smart_contract, .. } =
            account.dissolve();

        SafeLookupResult::Found(
            AccountSigningMetadata::builder()
                .maybe_key(key)
                .receiver_sig_required(receiver_sig_required)
                .smart_contract(smart_contract)
                .build(),
        )
    }
}

impl<S> ContractSigMetaLookup for StoreContractLookup<'_, S>
where
    S: AccountStore + ?Sized,
{
    fn safe_lookup(&self, id: ContractId) -> SafeLookupResult<ContractSigningMetadata> {
        let account = match self.store.get_account(id.into()) {
            Some(account) if !account.is_deleted() && account.is_smart_contract() => account,
            _ => return SafeLookupResult::Failed(KeyOrderingFailure::InvalidContract),
        };

        let AccountRecordDissolved { key, receiver_sig_required, .. } = account.dissolve();

        match key {
            // without a key no signature can ever modify the contract
            None => SafeLookupResult::Failed(KeyOrderingFailure::ImmutableContract),
            Some(key) if key.is_empty() || matches!(key, Key::ContractId(_)) => {
                SafeLookupResult::Failed(KeyOrderingFailure::ImmutableContract)
            },
            Some(key) => SafeLookupResult::Found(
                ContractSigningMetadata::builder()
                    .key(key)
                    .receiver_sig_required(receiver_sig_required)
                    .build(),
            ),
        }
    }
}

impl<S> FileSigMetaLookup for StoreFileLookup<'_, S>
where
    S: FileStore + ?Sized,
{
    fn safe_lookup(&self, id: FileId) -> SafeLookupResult<FileSigningMetadata> {
        match self.store.get_file(id) {
            Some(file) => SafeLookupResult::Found(
                FileSigningMetadata::builder().wacl(file.wacl().clone()).build(),
            ),
            None => SafeLookupResult::Failed(KeyOrderingFailure::MissingFile),
        }
    }
}

impl<S> TopicSigMetaLookup for StoreTopicLookup<'_, S>
where
    S: TopicStore + ?Sized,
{
    fn safe_lookup(&self, id: TopicId) -> SafeLookupResult<TopicSigningMetadata> {
        match self.store.get_topic(id) {
            Some(topic) if !topic.is_deleted() => SafeLookupResult::Found(
                TopicSigningMetadata::builder()
                    .maybe_admin_key(topic.admin_key().cloned())
                    .maybe_submit_key(topic.submit_key().cloned())
                    .build(),
            ),
            _ => SafeLookupResult::Failed(KeyOrderingFailure::InvalidTopic),
        }
    }
}

impl<S> TokenSigMetaLookup for StoreTokenLookup<'_, S>
where
    S: TokenStore + ?Sized,
{
    fn safe_lookup(&self, id: TokenId) -> SafeLookupResult<TokenSigningMetadata> {
        let resolved = self.store.resolve_token(id);
        if resolved.is_missing() {
            return SafeLookupResult::Failed(KeyOrderingFailure::MissingToken);
        }

        let Some(token) = self.store.get_token(resolved) else {
            return SafeLookupResult::Failed(KeyOrderingFailure::MissingToken);
        };

        let TokenRecordDissolved {
            treasury, admin_key, kyc_key, freeze_key, wipe_key, supply_key, ..
        } = token.dissolve();

        SafeLookupResult::Found(
            TokenSigningMetadata::builder()
                .treasury(treasury)
                .maybe_admin_key(admin_key)
                .maybe_kyc_key(kyc_key)
                .maybe_freeze_key(freeze_key)
                .maybe_wipe_key(wipe_key)
                .maybe_supply_key(supply_key)
                .build(),
        )
    }
}

impl<S> ScheduleSigMetaLookup for StoreScheduleLookup<'_, S>
where
    S: ScheduleStore + ?Sized,
{
    fn safe_lookup(&self, id: ScheduleId) -> SafeLookupResult<ScheduleSigningMetadata> {
        let resolved = self.store.resolve_schedule(id);
        if resolved.is_missing() {
            return SafeLookupResult::Failed(KeyOrderingFailure::MissingSchedule);
        }

        let Some(schedule) = self.store.get_schedule(resolved) else {
            return SafeLookupResult::Failed(KeyOrderingFailure::MissingSchedule);
        };

        let ScheduleRecordDissolved { admin_key, designated_payer, scheduled_txn, .. } =
            schedule.dissolve();

        SafeLookupResult::Found(
            ScheduleSigningMetadata::builder()
                .maybe_admin_key(admin_key)
                .maybe_designated_payer(designated_payer)
                .scheduled_txn(scheduled_txn)
                .build(),
        )
    }
}
