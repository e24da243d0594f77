use ledger_sigs_domain::{
    AccountId, ContractId, FileId, Key, ScheduleId, TokenId, TopicId, TransactionBody,
    TransactionData, TransactionId,
    txn::ops::{AccountAmount, ContractBeneficiary, ScheduleCreate, ScheduleSign},
};

use super::{
    OrderedKeys, OrderedKeysDissolved, SigRequirements, SigningOrderResult,
    factory::SigningOrderResultFactory,
};
use crate::lookup::{
    AccountSigningMetadata, ContractSigningMetadata, KeyOrderingFailure, ScheduleSigningMetadata,
    SigMetadataLookup, TokenSigningMetadata, TopicSigningMetadata,
};

type Step<T, F> = Result<T, SigningOrderResult<<F as SigningOrderResultFactory>::Report>>;

/// What an account is to the operation, which decides how a failed lookup is reported.
#[derive(Debug, Clone, Copy)]
enum AccountRole {
    Party,
    AutoRenew,
    Treasury,
}

/// One resolution pass over one transaction body.
pub(super) struct Resolution<'r, L, F> {
    requirements: &'r SigRequirements<L>,
    factory: &'r F,
    txn_id: &'r TransactionId,
    payer: AccountId,
    keys: Vec<Key>,
    scheduled_keys: Vec<Key>,
}

impl<'r, L, F> Resolution<'r, L, F>
where
    L: SigMetadataLookup,
    F: SigningOrderResultFactory,
{
    pub(super) fn new(
        requirements: &'r SigRequirements<L>,
        txn: &'r TransactionBody,
        factory: &'r F,
    ) -> Self {
        Self {
            requirements,
            factory,
            txn_id: txn.transaction_id(),
            payer: txn.payer(),
            keys: Vec::new(),
            scheduled_keys: Vec::new(),
        }
    }

    pub(super) fn finish(self) -> OrderedKeys {
        OrderedKeys::with_scheduled(self.keys, self.scheduled_keys)
    }

    pub(super) fn payer_key(&self) -> Step<Key, F> {
        self.paying_account_key(self.payer)
    }

    fn paying_account_key(&self, payer: AccountId) -> Step<Key, F> {
        match self.lookup().account_signing_meta_for(payer).into_result() {
            Ok(metadata) => match metadata.key() {
                Some(key) if !key.is_empty() => Ok(key.clone()),
                _ => Err(self.factory.for_general_payer_error(payer, self.txn_id)),
            },
            Err(KeyOrderingFailure::MissingAccount | KeyOrderingFailure::InvalidAccount) => {
                Err(self.factory.for_invalid_account(payer, self.txn_id))
            },
            Err(_) => Err(self.factory.for_general_payer_error(payer, self.txn_id)),
        }
    }

    pub(super) fn other_parties(&mut self, txn: &TransactionBody) -> Step<(), F> {
        match txn.data() {
            TransactionData::CryptoCreate(op) => {
                if op.receiver_sig_required {
                    self.require_new_key(&op.key)?;
                }
            },
            TransactionData::CryptoTransfer(op) => {
                let token_adjustments = op.token_transfers.iter().flat_map(|list| &list.transfers);
                for adjustment in op.hbar_transfers.iter().chain(token_adjustments) {
                    self.transfer_party(adjustment)?;
                }
            },
            TransactionData::CryptoUpdate(op) => {
                self.require_account(op.target, AccountRole::Party)?;
                if let Some(key) = &op.key {
                    self.require_new_key(key)?;
                }
            },
            TransactionData::CryptoDelete(op) => {
                self.require_account(op.target, AccountRole::Party)?;
                self.require_account_if_receiver_sig(op.beneficiary)?;
            },
            TransactionData::FileCreate(op) => {
                if let Some(wacl) = &op.keys {
                    self.require_new_key(&wacl.clone().into())?;
                }
            },
            TransactionData::FileAppend(op) => self.require_wacl(op.target)?,
            TransactionData::FileUpdate(op) => {
                self.require_wacl(op.target)?;
                if let Some(wacl) = &op.keys {
                    self.require_new_key(&wacl.clone().into())?;
                }
            },
            TransactionData::FileDelete(op) => self.require_wacl(op.target)?,
            TransactionData::ContractCreate(op) => {
                if let Some(admin_key) = &op.admin_key {
                    self.require_new_admin_key(admin_key)?;
                }
                self.require_auto_renew(op.auto_renew_account)?;
            },
            TransactionData::ContractUpdate(op) => {
                if !op.is_expiry_only() {
                    let contract = self.contract(op.target)?;
                    self.keys.push(contract.key().clone());
                }
                if let Some(admin_key) = &op.admin_key {
                    self.require_new_admin_key(admin_key)?;
                }
                self.require_auto_renew(op.auto_renew_account)?;
            },
            TransactionData::ContractDelete(op) => {
                let contract = self.contract(op.target)?;
                self.keys.push(contract.key().clone());
                match op.beneficiary {
                    Some(ContractBeneficiary::Account(account)) => {
                        self.require_account_if_receiver_sig(account)?;
                    },
                    Some(ContractBeneficiary::Contract(contract)) => {
                        self.require_account_if_receiver_sig(contract.into())?;
                    },
                    None => {},
                }
            },
            TransactionData::ContractCall(op) => {
                if op.amount > 0 {
                    self.contract_call_receiver(op.target)?;
                }
            },
            TransactionData::ConsensusCreateTopic(op) => {
                if let Some(admin_key) = &op.admin_key {
                    self.require_new_key(admin_key)?;
                }
                self.require_auto_renew(op.auto_renew_account)?;
            },
            TransactionData::ConsensusUpdateTopic(op) => {
                if !op.is_expiry_only() {
                    let topic = self.topic(op.target)?;
                    self.require_existing(topic.admin_key());
                }
                if let Some(admin_key) = &op.admin_key {
                    self.require_new_key(admin_key)?;
                }
                self.require_auto_renew(op.auto_renew_account)?;
            },
            TransactionData::ConsensusDeleteTopic(op) => {
                let topic = self.topic(op.target)?;
                self.require_existing(topic.admin_key());
            },
            TransactionData::ConsensusSubmitMessage(op) => {
                let topic = self.topic(op.target)?;
                self.require_existing(topic.submit_key());
            },
            TransactionData::TokenCreate(op) => {
                self.require_account(op.treasury, AccountRole::Treasury)?;
                if let Some(admin_key) = &op.admin_key {
                    self.require_new_key(admin_key)?;
                }
                self.require_auto_renew(op.auto_renew_account)?;
            },
            TransactionData::TokenUpdate(op) => {
                let token = self.token(op.token)?;
                self.require_existing(token.admin_key());
                if let Some(treasury) = op.treasury {
                    self.require_account(treasury, AccountRole::Treasury)?;
                }
                if let Some(admin_key) = &op.admin_key {
                    self.require_new_key(admin_key)?;
                }
                self.require_auto_renew(op.auto_renew_account)?;
            },
            TransactionData::TokenDelete(op) => {
                let token = self.token(op.token)?;
                self.require_existing(token.admin_key());
            },
            TransactionData::TokenMint(op) | TransactionData::TokenBurn(op) => {
                let token = self.token(op.token)?;
                self.require_existing(token.supply_key());
            },
            TransactionData::TokenWipe(op) => {
                let token = self.token(op.token)?;
                self.require_existing(token.wipe_key());
            },
            TransactionData::TokenFreeze(op) | TransactionData::TokenUnfreeze(op) => {
                let token = self.token(op.token)?;
                self.require_existing(token.freeze_key());
            },
            TransactionData::TokenGrantKyc(op) | TransactionData::TokenRevokeKyc(op) => {
                let token = self.token(op.token)?;
                self.require_existing(token.kyc_key());
            },
            TransactionData::TokenAssociate(op) | TransactionData::TokenDissociate(op) => {
                self.require_account(op.account, AccountRole::Party)?;
            },
            TransactionData::ScheduleCreate(op) => self.schedule_create(op)?,
            TransactionData::ScheduleSign(op) => self.schedule_sign(op)?,
            TransactionData::ScheduleDelete(op) => {
                let schedule = self.schedule(op.schedule)?;
                self.require_existing(schedule.admin_key());
            },
            TransactionData::SystemDelete(_)
            | TransactionData::SystemUndelete(_)
            | TransactionData::Freeze(_) => {},
        }

        Ok(())
    }

    fn lookup(&self) -> &L {
        self.requirements.lookup()
    }

    fn require_existing(&mut self, key: Option<&Key>) {
        if let Some(key) = key {
            self.keys.push(key.clone());
        }
    }

    /// Requires a key proposed by the body. Empty keys require nothing; malformed ones make
    /// the whole transaction malformed.
    fn require_new_key(&mut self, key: &Key) -> Step<(), F> {
        if key.is_empty() {
            return Ok(());
        }
        if !key.is_valid() {
            return Err(self.factory.for_general_error(self.txn_id));
        }

        self.keys.push(key.clone());
        Ok(())
    }

    /// Like [`require_new_key`](Self::require_new_key), but a contract-id key can never sign
    /// and is skipped.
    fn require_new_admin_key(&mut self, key: &Key) -> Step<(), F> {
        if matches!(key, Key::ContractId(_)) {
            return Ok(());
        }

        self.require_new_key(key)
    }

    fn account(&self, id: AccountId, role: AccountRole) -> Step<AccountSigningMetadata, F> {
        self.lookup().account_signing_meta_for(id).into_result().map_err(|failure| {
            match (failure, role) {
                (KeyOrderingFailure::MissingAccount, AccountRole::Party) => {
                    self.factory.for_missing_account(id, self.txn_id)
                },
                (KeyOrderingFailure::MissingAccount, AccountRole::AutoRenew) => {
                    self.factory.for_invalid_auto_renew_account(id, self.txn_id)
                },
                (KeyOrderingFailure::MissingAccount, AccountRole::Treasury) => {
                    self.factory.for_missing_token_treasury(id, self.txn_id)
                },
                _ => self.factory.for_invalid_account(id, self.txn_id),
            }
        })
    }

    fn push_account_key(&mut self, id: AccountId, metadata: &AccountSigningMetadata) -> Step<(), F> {
        match metadata.key() {
            Some(key) => {
                self.keys.push(key.clone());
                Ok(())
            },
            None => Err(self.factory.for_invalid_account(id, self.txn_id)),
        }
    }

    fn require_account(&mut self, id: AccountId, role: AccountRole) -> Step<(), F> {
        let metadata = self.account(id, role)?;
        self.push_account_key(id, &metadata)
    }

    fn require_account_if_receiver_sig(&mut self, id: AccountId) -> Step<(), F> {
        if id == self.payer {
            return Ok(());
        }

        let metadata = self.account(id, AccountRole::Party)?;
        if metadata.receiver_sig_required() {
            self.push_account_key(id, &metadata)?;
        }

        Ok(())
    }

    // the sentinel id clears an auto-renew account rather than naming one
    fn require_auto_renew(&mut self, id: Option<AccountId>) -> Step<(), F> {
        match id {
            Some(id) if !id.is_missing() => self.require_account(id, AccountRole::AutoRenew),
            _ => Ok(()),
        }
    }

    fn transfer_party(&mut self, adjustment: &AccountAmount) -> Step<(), F> {
        if adjustment.account == self.payer {
            return Ok(());
        }

        let metadata = self.account(adjustment.account, AccountRole::Party)?;
        if adjustment.is_debit() || metadata.receiver_sig_required() {
            self.push_account_key(adjustment.account, &metadata)?;
        }

        Ok(())
    }

    fn contract(&self, id: ContractId) -> Step<ContractSigningMetadata, F> {
        self.lookup().contract_signing_meta_for(id).into_result().map_err(|failure| match failure {
            KeyOrderingFailure::ImmutableContract => {
                self.factory.for_immutable_contract(id, self.txn_id)
            },
            _ => self.factory.for_invalid_contract(id, self.txn_id),
        })
    }

    /// Calls only need the target's signature when value flows into a contract that demands
    /// receiver signatures; keyless contracts remain callable.
    fn contract_call_receiver(&mut self, id: ContractId) -> Step<(), F> {
        let account = AccountId::from(id);
        if account == self.payer {
            return Ok(());
        }

        let metadata = match self.lookup().account_signing_meta_for(account).into_result() {
            Ok(metadata) if metadata.is_smart_contract() => metadata,
            _ => return Err(self.factory.for_invalid_contract(id, self.txn_id)),
        };

        if metadata.receiver_sig_required() {
            match metadata.key() {
                Some(key) if !key.is_empty() && !matches!(key, Key::ContractId(_)) => {
                    self.keys.push(key.clone());
                },
                _ => return Err(self.factory.for_immutable_contract(id, self.txn_id)),
            }
        }

        Ok(())
    }

    fn require_wacl(&mut self, id: FileId) -> Step<(), F> {
        let file = self
            .lookup()
            .file_signing_meta_for(id)
            .into_result()
            .map_err(|_| self.factory.for_missing_file(id, self.txn_id))?;

        if !file.wacl().is_empty() {
            self.keys.push(file.wacl().clone().into());
        }

        Ok(())
    }

    fn topic(&self, id: TopicId) -> Step<TopicSigningMetadata, F> {
        self.lookup()
            .topic_signing_meta_for(id)
            .into_result()
            .map_err(|_| self.factory.for_missing_topic(id, self.txn_id))
    }

    fn token(&self, id: TokenId) -> Step<TokenSigningMetadata, F> {
        self.lookup()
            .token_signing_meta_for(id)
            .into_result()
            .map_err(|_| self.factory.for_missing_token(id, self.txn_id))
    }

    fn schedule(&self, id: ScheduleId) -> Step<ScheduleSigningMetadata, F> {
        self.lookup()
            .schedule_signing_meta_for(id)
            .into_result()
            .map_err(|_| self.factory.for_missing_schedule(id, self.txn_id))
    }

    fn schedule_create(&mut self, op: &ScheduleCreate) -> Step<(), F> {
        if let Some(admin_key) = &op.admin_key {
            self.require_new_key(admin_key)?;
        }

        let scheduled = op.scheduled.as_ref();
        if !self.requirements.is_schedulable(scheduled.functionality()) {
            tracing::debug!(scheduled = %scheduled.functionality(), "operation is not schedulable");
            return Err(self.factory.for_unschedulable_txn(self.txn_id));
        }

        let payer = op.payer.unwrap_or(self.payer);
        let inner = TransactionBody::builder()
            .transaction_id(self.txn_id.scheduled_for(payer))
            .data(scheduled.clone())
            .build();

        self.require_scheduled_signers(&inner, Some(payer))
    }

    fn schedule_sign(&mut self, op: &ScheduleSign) -> Step<(), F> {
        let schedule = self.schedule(op.schedule)?;
        let inner = schedule.scheduled_txn();

        if !self.requirements.is_schedulable(inner.functionality()) {
            tracing::debug!(scheduled = %inner.functionality(), "operation is not schedulable");
            return Err(self.factory.for_unschedulable_txn(self.txn_id));
        }

        self.require_scheduled_signers(inner, schedule.designated_payer())
    }

    /// Resolves the signers of a scheduled transaction into the scheduled scope, wrapping any
    /// failure in an unresolvable-signers report.
    fn require_scheduled_signers(
        &mut self,
        inner: &TransactionBody,
        payer: Option<AccountId>,
    ) -> Step<(), F> {
        let mut nested = Resolution::new(self.requirements, inner, self.factory);

        match nested.all_signers(inner, payer) {
            Ok(()) => {
                let OrderedKeysDissolved { keys, .. } = nested.finish().dissolve();
                self.scheduled_keys.extend(keys);
                Ok(())
            },
            Err(SigningOrderResult::Error(report)) => {
                Err(self.factory.for_unresolvable_required_signers(inner, self.txn_id, report))
            },
            Err(other) => Err(other),
        }
    }

    /// Requires `payer`'s key, when given, ahead of the other parties of `txn`.
    fn all_signers(&mut self, txn: &TransactionBody, payer: Option<AccountId>) -> Step<(), F> {
        if let Some(payer) = payer {
            let key = self.paying_account_key(payer)?;
            self.keys.push(key);
        }

        self.other_parties(txn)
    }
}
