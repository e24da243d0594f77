//! Signing-order resolution.
//!
//! [`SigRequirements`] maps a transaction to the ordered keys that must be active for it to be
//! authorized. Resolution runs in one of two modes: [`ResolutionMode::PayerOnly`] yields the
//! payer's key, [`ResolutionMode::OtherParties`] the keys of every other entity the operation
//! references, in an order fixed per operation. Resolution stops at the first failure and
//! reports it through a [`SigningOrderResultFactory`].

pub mod factory;
pub mod status;

mod resolver;

use bon::Builder;
use dissolve_derive::Dissolve;
use ledger_sigs_domain::{Functionality, Key, TransactionBody, key::traversal};
use strum::{Display, EnumString, IntoStaticStr};

use self::{factory::SigningOrderResultFactory, resolver::Resolution};
use crate::{config::SchedulingWhitelist, lookup::SigMetadataLookup};

/// Which keys a resolution produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionMode {
    /// Only the payer's key.
    PayerOnly,
    /// Every key other than the payer's.
    OtherParties,
}

/// The keys a transaction requires, in canonical order.
///
/// `keys` must be active for the transaction itself. `scheduled_keys` are the required signers
/// of a scheduled transaction created or signed by it: their signatures are collected by the
/// schedule rather than required up front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Dissolve)]
pub struct OrderedKeys {
    keys: Vec<Key>,
    scheduled_keys: Vec<Key>,
}

impl OrderedKeys {
    /// Creates an order without scheduled keys.
    pub fn new(keys: Vec<Key>) -> Self {
        Self { keys, scheduled_keys: Vec::new() }
    }

    /// Creates an order with scheduled keys.
    pub fn with_scheduled(keys: Vec<Key>, scheduled_keys: Vec<Key>) -> Self {
        Self { keys, scheduled_keys }
    }

    /// Returns the keys required by the transaction itself.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Returns the required signers of a scheduled transaction.
    pub fn scheduled_keys(&self) -> &[Key] {
        &self.scheduled_keys
    }

    /// Returns the first key. In a payer resolution this is the payer's key.
    pub fn payer_key(&self) -> Option<&Key> {
        self.keys.first()
    }

    /// Returns `true` if no key is required at all.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.scheduled_keys.is_empty()
    }

    /// Returns the number of leaf keys across both scopes, i.e. the number of signatures a
    /// fully signed transaction carries.
    pub fn num_simple_keys(&self) -> usize {
        traversal::count_all_simple_keys(self.keys.iter().chain(&self.scheduled_keys))
    }
}

/// Either the ordered keys a transaction requires or exactly one error report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningOrderResult<E> {
    /// Resolution succeeded.
    Keys(OrderedKeys),
    /// Resolution failed.
    Error(E),
}

impl<E> SigningOrderResult<E> {
    /// A successful result requiring no keys.
    pub fn no_known_keys() -> Self {
        Self::Keys(OrderedKeys::default())
    }

    /// Returns `true` if resolution failed.
    pub fn has_error_report(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns the error report of a failed resolution.
    pub fn error_report(&self) -> Option<&E> {
        match self {
            Self::Error(report) => Some(report),
            Self::Keys(_) => None,
        }
    }

    /// Returns the keys of a successful resolution.
    pub fn ordered_keys(&self) -> Option<&OrderedKeys> {
        match self {
            Self::Keys(keys) => Some(keys),
            Self::Error(_) => None,
        }
    }

    /// Returns the payer's key of a successful payer resolution.
    pub fn payer_key(&self) -> Option<&Key> {
        self.ordered_keys().and_then(OrderedKeys::payer_key)
    }

    /// Converts into a `Result`.
    pub fn into_result(self) -> Result<OrderedKeys, E> {
        match self {
            Self::Keys(keys) => Ok(keys),
            Self::Error(report) => Err(report),
        }
    }
}

/// Resolves the keys a transaction requires.
#[derive(Builder)]
pub struct SigRequirements<L> {
    /// The entity lookups.
    lookup: L,

    /// Operations that may be wrapped in a schedule.
    #[builder(default)]
    whitelist: SchedulingWhitelist,
}

impl<L> SigRequirements<L>
where
    L: SigMetadataLookup,
{
    /// Resolves `txn` in the given mode.
    #[tracing::instrument(
        skip_all,
        fields(
            txn_id = %txn.transaction_id(),
            functionality = %txn.functionality(),
            %mode,
        ),
    )]
    pub fn resolve<F>(
        &self,
        txn: &TransactionBody,
        mode: ResolutionMode,
        factory: &F,
    ) -> SigningOrderResult<F::Report>
    where
        F: SigningOrderResultFactory,
    {
        let result = match mode {
            ResolutionMode::PayerOnly => self.key_for_payer(txn, factory),
            ResolutionMode::OtherParties => self.keys_for_other_parties(txn, factory),
        };

        match result.ordered_keys() {
            Some(keys) => tracing::trace!(
                num_keys = keys.keys().len(),
                num_scheduled_keys = keys.scheduled_keys().len(),
                "resolved signing order"
            ),
            None => tracing::debug!("signing order did not resolve"),
        }

        result
    }

    /// Resolves the payer's key. On success the payer's key is the only, and so the first,
    /// key.
    pub fn key_for_payer<F>(&self, txn: &TransactionBody, factory: &F) -> SigningOrderResult<F::Report>
    where
        F: SigningOrderResultFactory,
    {
        let resolution = Resolution::new(self, txn, factory);
        match resolution.payer_key() {
            Ok(key) => factory.for_valid_order(OrderedKeys::new(vec![key])),
            Err(error) => error,
        }
    }

    /// Resolves the keys of every party other than the payer.
    pub fn keys_for_other_parties<F>(
        &self,
        txn: &TransactionBody,
        factory: &F,
    ) -> SigningOrderResult<F::Report>
    where
        F: SigningOrderResultFactory,
    {
        let mut resolution = Resolution::new(self, txn, factory);
        match resolution.other_parties(txn) {
            Ok(()) => factory.for_valid_order(resolution.finish()),
            Err(error) => error,
        }
    }

    /// Returns `true` if `functionality` may be wrapped in a schedule.
    pub fn is_schedulable(&self, functionality: Functionality) -> bool {
        !matches!(
            functionality,
            Functionality::ScheduleCreate | Functionality::ScheduleSign | Functionality::ScheduleDelete
        ) && self.whitelist.contains(functionality)
    }

    pub(crate) fn lookup(&self) -> &L {
        &self.lookup
    }
}
