use chrono::DateTime;
use ledger_sigs_domain::{
    AccountId, ContractId, FileId, Key, KeyList, ScheduleId, TokenId, TopicId, TransactionBody,
    TransactionData, TransactionId, txn::ops::TokenAmountOp,
};
use ledger_sigs_store::{
    AccountRecord, FileRecord, LedgerSnapshot, ScheduleRecord, TokenRecord, TopicRecord,
};

use super::*;

fn key(byte: u8) -> Key {
    Key::Ed25519(vec![byte; 32])
}

fn snapshot() -> LedgerSnapshot {
    let mut snapshot = LedgerSnapshot::new();

    snapshot
        .insert_account(
            AccountId::from_num(2),
            AccountRecord::builder().key(key(2)).receiver_sig_required(true).build(),
        )
        .unwrap();
    snapshot
        .insert_account(
            AccountId::from_num(1001),
            AccountRecord::builder().key(key(11)).smart_contract(true).build(),
        )
        .unwrap();
    snapshot
        .insert_account(AccountId::from_num(1002), AccountRecord::builder().smart_contract(true).build())
        .unwrap();
    snapshot
        .insert_account(
            AccountId::from_num(1003),
            AccountRecord::builder()
                .key(Key::ContractId(ContractId::from_num(1003)))
                .smart_contract(true)
                .build(),
        )
        .unwrap();
    snapshot
        .insert_account(
            AccountId::from_num(1004),
            AccountRecord::builder().key(key(14)).smart_contract(true).deleted(true).build(),
        )
        .unwrap();
    snapshot
        .insert_account(
            AccountId::from_num(1005),
            AccountRecord::builder().key(KeyList::empty().into()).smart_contract(true).build(),
        )
        .unwrap();
    snapshot
        .insert_file(
            FileId::from_num(150),
            FileRecord::builder().wacl(KeyList::new(vec![key(3), key(4)])).build(),
        )
        .unwrap();
    snapshot
        .insert_topic(TopicId::from_num(77), TopicRecord::builder().submit_key(key(5)).build())
        .unwrap();
    snapshot
        .insert_topic(
            TopicId::from_num(78),
            TopicRecord::builder().admin_key(key(6)).deleted(true).build(),
        )
        .unwrap();
    snapshot
        .insert_token(
            TokenId::from_num(500),
            TokenRecord::builder().treasury(AccountId::from_num(2)).supply_key(key(7)).build(),
        )
        .unwrap();

    let scheduled_txn = TransactionBody::builder()
        .transaction_id(
            TransactionId::builder()
                .payer(AccountId::from_num(2))
                .valid_start(DateTime::from_timestamp(1_600_000_000, 0).unwrap())
                .scheduled(true)
                .build(),
        )
        .data(TransactionData::TokenMint(
            TokenAmountOp::builder().token(TokenId::from_num(500)).amount(10).build(),
        ))
        .build();
    snapshot
        .insert_schedule(
            ScheduleId::from_num(900),
            ScheduleRecord::builder().scheduled_txn(scheduled_txn.clone()).build(),
        )
        .unwrap();
    snapshot
        .insert_schedule(
            ScheduleId::from_num(901),
            ScheduleRecord::builder().scheduled_txn(scheduled_txn).executed(true).build(),
        )
        .unwrap();

    snapshot
}

#[test]
fn account_lookup_reports_key_and_flags() {
    let snapshot = snapshot();
    let lookup = DelegatingSigMetadataLookup::backed_by(&snapshot);

    let result = lookup.account_signing_meta_for(AccountId::from_num(2));

    assert!(result.succeeded());
    assert_eq!(result.failure_if_any(), KeyOrderingFailure::None);
    let metadata = result.metadata().unwrap();
    assert_eq!(metadata.key(), Some(&key(2)));
    assert!(metadata.receiver_sig_required());
    assert!(!metadata.is_smart_contract());
}

#[test]
fn account_lookup_failures() {
    let snapshot = snapshot();
    let lookup = DelegatingSigMetadataLookup::backed_by(&snapshot);

    assert_eq!(
        lookup.account_signing_meta_for(AccountId::from_num(3)).failure_if_any(),
        KeyOrderingFailure::MissingAccount
    );
    assert_eq!(
        lookup.account_signing_meta_for(AccountId::MISSING).failure_if_any(),
        KeyOrderingFailure::InvalidAccount
    );
}

#[test]
fn contract_lookup_distinguishes_invalid_from_immutable() {
    let snapshot = snapshot();
    let lookup = DelegatingSigMetadataLookup::backed_by(&snapshot);
    let failure = |num| lookup.contract_signing_meta_for(ContractId::from_num(num)).failure_if_any();

    assert_eq!(failure(1001), KeyOrderingFailure::None);
    // absent
    assert_eq!(failure(1999), KeyOrderingFailure::InvalidContract);
    // not a contract
    assert_eq!(failure(2), KeyOrderingFailure::InvalidContract);
    // deleted
    assert_eq!(failure(1004), KeyOrderingFailure::InvalidContract);
    // no key, self-referencing key and empty key
    assert_eq!(failure(1002), KeyOrderingFailure::ImmutableContract);
    assert_eq!(failure(1003), KeyOrderingFailure::ImmutableContract);
    assert_eq!(failure(1005), KeyOrderingFailure::ImmutableContract);
}

#[test]
fn file_and_topic_lookups() {
    let snapshot = snapshot();
    let lookup = DelegatingSigMetadataLookup::backed_by(&snapshot);

    let file = lookup.file_signing_meta_for(FileId::from_num(150)).into_result().unwrap();
    assert_eq!(file.wacl(), &KeyList::new(vec![key(3), key(4)]));
    assert_eq!(
        lookup.file_signing_meta_for(FileId::from_num(151)).failure_if_any(),
        KeyOrderingFailure::MissingFile
    );

    let topic = lookup.topic_signing_meta_for(TopicId::from_num(77)).into_result().unwrap();
    assert_eq!(topic.admin_key(), None);
    assert_eq!(topic.submit_key(), Some(&key(5)));
    assert_eq!(
        lookup.topic_signing_meta_for(TopicId::from_num(78)).failure_if_any(),
        KeyOrderingFailure::InvalidTopic
    );
    assert_eq!(
        lookup.topic_signing_meta_for(TopicId::from_num(79)).failure_if_any(),
        KeyOrderingFailure::InvalidTopic
    );
}

#[test]
fn token_and_schedule_lookups_resolve_references_first() {
    let snapshot = snapshot();
    let lookup = DelegatingSigMetadataLookup::backed_by(&snapshot);

    let token = lookup.token_signing_meta_for(TokenId::from_num(500)).into_result().unwrap();
    assert_eq!(token.supply_key(), Some(&key(7)));
    assert_eq!(token.treasury(), AccountId::from_num(2));
    assert_eq!(
        lookup.token_signing_meta_for(TokenId::from_num(501)).failure_if_any(),
        KeyOrderingFailure::MissingToken
    );

    assert!(lookup.schedule_signing_meta_for(ScheduleId::from_num(900)).succeeded());
    // the executed schedule is stored but resolves to the sentinel id
    assert_eq!(
        lookup.schedule_signing_meta_for(ScheduleId::from_num(901)).failure_if_any(),
        KeyOrderingFailure::MissingSchedule
    );
    assert_eq!(
        lookup.schedule_signing_meta_for(ScheduleId::from_num(902)).failure_if_any(),
        KeyOrderingFailure::MissingSchedule
    );
}

#[test]
fn lookups_are_idempotent() {
    let snapshot = snapshot();
    let lookup = DelegatingSigMetadataLookup::backed_by(&snapshot);

    assert_eq!(
        lookup.account_signing_meta_for(AccountId::from_num(2)),
        lookup.account_signing_meta_for(AccountId::from_num(2))
    );
}

#[test]
fn single_entity_kind_can_be_replaced() {
    let snapshot = snapshot();
    let lookup = DelegatingSigMetadataLookup::backed_by(&snapshot).with_accounts(|_: AccountId| {
        SafeLookupResult::<AccountSigningMetadata>::Failed(KeyOrderingFailure::InvalidAccount)
    });

    assert_eq!(
        lookup.account_signing_meta_for(AccountId::from_num(2)).failure_if_any(),
        KeyOrderingFailure::InvalidAccount
    );
    assert!(lookup.file_signing_meta_for(FileId::from_num(150)).succeeded());
}

#[test]
fn failure_names_are_stable() {
    assert_eq!(KeyOrderingFailure::MissingAutorenewAccount.to_string(), "MISSING_AUTORENEW_ACCOUNT");
    assert_eq!(KeyOrderingFailure::ImmutableContract.to_string(), "IMMUTABLE_CONTRACT");
}
