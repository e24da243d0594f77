//! Schedules and contract execution: whitelisting, scheduled signers and the contract-call
//! signature gate.

use std::collections::BTreeSet;

use ledger_sigs_domain::{
    Functionality, TransactionData,
    txn::ops::{AccountAmount, ContractCall, CryptoCreate, CryptoTransfer, ScheduleCreate},
};
use ledger_sigs_engine::{
    DelegatingSigMetadataLookup, ResolutionMode, SigMapPubKeyToSigBytes, SigRequirements,
    SignatureActivationChecker, SigsConfig, TxnAwareContractSigsVerifier,
    activation::DefaultActivationCharacteristics,
    lookup::StoreAccountLookup,
    order::status::{SigStatusOrderResultFactory, SignatureStatusCode, StatusContext},
};
use ledger_sigs_test_utils::{
    MISSING_ACCOUNT, MUTABLE_CONTRACT, NO_RECEIVER_SIG_REQUIRED, PAYER, RECEIVER_SIG_REQUIRED,
    THRESHOLD_ACCOUNT, TestSigner, account_signer, body, init_tracing, signed_txn,
    standard_ledger, threshold_signers,
};

fn config(whitelist: &str) -> anyhow::Result<SigsConfig> {
    let vars: config::Map<String, String> =
        [("LEDGERSIGS_SCHEDULING__WHITELIST".to_owned(), whitelist.to_owned())].into_iter().collect();

    Ok(SigsConfig::load(SigsConfig::environment().source(Some(vars)))?)
}

fn schedule(scheduled: TransactionData) -> TransactionData {
    TransactionData::ScheduleCreate(
        ScheduleCreate::builder().admin_key(TestSigner::from_seed(77).key()).scheduled(Box::new(scheduled)).build(),
    )
}

fn crypto_create() -> TransactionData {
    TransactionData::CryptoCreate(CryptoCreate::builder().key(TestSigner::from_seed(78).key()).build())
}

fn debit(account: ledger_sigs_domain::AccountId) -> TransactionData {
    TransactionData::CryptoTransfer(CryptoTransfer {
        hbar_transfers: vec![AccountAmount::new(account, -10), AccountAmount::new(PAYER, 10)],
        token_transfers: Vec::new(),
    })
}

#[test]
fn operations_outside_the_whitelist_cannot_be_scheduled() -> anyhow::Result<()> {
    init_tracing();
    let ledger = standard_ledger()?;
    let factory = SigStatusOrderResultFactory::new(false);
    let txn = body(PAYER, schedule(crypto_create()));

    let default = SigRequirements::builder()
        .lookup(DelegatingSigMetadataLookup::backed_by(&ledger))
        .whitelist(config("crypto_transfer")?.whitelist()?)
        .build();
    let status = default
        .resolve(&txn, ResolutionMode::OtherParties, &factory)
        .into_result()
        .expect_err("unschedulable operation resolved");
    assert_eq!(status.code(), SignatureStatusCode::UnschedulableTransaction);

    let widened = SigRequirements::builder()
        .lookup(DelegatingSigMetadataLookup::backed_by(&ledger))
        .whitelist(config("crypto_transfer,crypto_create")?.whitelist()?)
        .build();
    assert!(widened.is_schedulable(Functionality::CryptoCreate));
    let ordered = widened.resolve(&txn, ResolutionMode::OtherParties, &factory).into_result()?;
    assert_eq!(ordered.keys(), [TestSigner::from_seed(77).key()]);
    assert_eq!(ordered.scheduled_keys(), [account_signer(PAYER).key(), TestSigner::from_seed(78).key()]);

    Ok(())
}

#[test]
fn unresolvable_scheduled_signers_are_reported_with_the_inner_failure() -> anyhow::Result<()> {
    init_tracing();
    let ledger = standard_ledger()?;
    let requirements =
        SigRequirements::builder().lookup(DelegatingSigMetadataLookup::backed_by(&ledger)).build();

    let status = requirements
        .resolve(
            &body(PAYER, schedule(debit(MISSING_ACCOUNT))),
            ResolutionMode::OtherParties,
            &SigStatusOrderResultFactory::new(true),
        )
        .into_result()
        .expect_err("missing scheduled signer resolved");

    assert_eq!(status.code(), SignatureStatusCode::UnresolvableRequiredSigners);
    let StatusContext::Scheduled { report, .. } = status.context() else {
        anyhow::bail!("expected a scheduled context, got {:?}", status.context());
    };
    assert_eq!(report.code(), SignatureStatusCode::InvalidAccountId);

    Ok(())
}

#[test]
fn scheduled_signatures_are_collected_per_key() -> anyhow::Result<()> {
    init_tracing();
    let ledger = standard_ledger()?;
    let requirements =
        SigRequirements::builder().lookup(DelegatingSigMetadataLookup::backed_by(&ledger)).build();
    let members = threshold_signers();
    let txn = signed_txn(
        body(PAYER, schedule(debit(THRESHOLD_ACCOUNT))),
        [&account_signer(PAYER), &members[0], &members[1]],
    );

    let ordered = requirements
        .resolve(txn.body(), ResolutionMode::OtherParties, &SigStatusOrderResultFactory::new(false))
        .into_result()?;
    let verifier = config("crypto_transfer")?.verifier();
    let active = SignatureActivationChecker::new(&verifier).active_scheduled_keys(
        ordered.scheduled_keys(),
        txn.body_bytes(),
        &SigMapPubKeyToSigBytes::new(txn.sig_map()),
        &DefaultActivationCharacteristics,
    )?;

    assert_eq!(ordered.scheduled_keys().len(), 2);
    assert_eq!(active.len(), 2);

    Ok(())
}

#[test]
fn contract_calls_check_touched_receiver_sig_accounts() -> anyhow::Result<()> {
    init_tracing();
    let ledger = standard_ledger()?;
    let accounts = StoreAccountLookup::new(&ledger);
    let verifier = config("crypto_transfer")?.verifier();
    let call = body(PAYER, TransactionData::ContractCall(ContractCall { target: MUTABLE_CONTRACT, amount: 0 }));
    let touched: BTreeSet<_> =
        [PAYER, NO_RECEIVER_SIG_REQUIRED, MUTABLE_CONTRACT.into()].into_iter().collect();

    let unsigned = signed_txn(call.clone(), [&account_signer(PAYER)]);
    let gate = TxnAwareContractSigsVerifier::builder()
        .accounts(&accounts)
        .verifier(&verifier)
        .context(&unsigned)
        .active_contract(MUTABLE_CONTRACT)
        .build();
    assert!(gate.all_required_keys_are_active(&touched));

    let mut touched_receiver = touched.clone();
    touched_receiver.insert(RECEIVER_SIG_REQUIRED);
    assert!(!gate.all_required_keys_are_active(&touched_receiver));

    let signed = signed_txn(call, [&account_signer(PAYER), &account_signer(RECEIVER_SIG_REQUIRED)]);
    let gate = TxnAwareContractSigsVerifier::builder()
        .accounts(&accounts)
        .verifier(&verifier)
        .context(&signed)
        .build();
    assert!(gate.all_required_keys_are_active(&touched_receiver));

    touched_receiver.insert(MISSING_ACCOUNT);
    assert!(!gate.all_required_keys_are_active(&touched_receiver));

    Ok(())
}
