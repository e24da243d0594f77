//! Signing requirements and signature activation for ledger transactions.
//!
//! Authorizing a transaction takes two steps. First the [`SigRequirements`] resolver maps the
//! transaction onto the ordered keys that must be active, reading entity metadata through the
//! [`lookup`] traits and reporting the first failure through a
//! [`SigningOrderResultFactory`](order::factory::SigningOrderResultFactory). Then the
//! [`SignatureActivationChecker`] verifies the attached signatures in a single batch and
//! folds the verdicts through each key.
//!
//! # Main Components
//!
//! - [`lookup`] - per-entity signing metadata, with failures as data
//! - [`order`] - the signing-order resolver and its result factories
//! - [`activation`] - activation characteristics, signature sourcing and the checker
//! - [`verifier`] - leaf-signature verifiers, sequential and rayon-backed
//! - [`gate`] - the check applied to accounts touched during contract execution
//! - [`config`] - the scheduling whitelist and verification settings
//!
//! # Usage
//!
//! ```ignore
//! let config = get_configuration()?;
//! let requirements = SigRequirements::builder()
//!     .lookup(DelegatingSigMetadataLookup::backed_by(&snapshot))
//!     .whitelist(config.whitelist()?)
//!     .build();
//! let factory = SigStatusOrderResultFactory::new(false);
//!
//! let payer = requirements.resolve(txn.body(), ResolutionMode::PayerOnly, &factory).into_result()?;
//! let verifier = config.verifier();
//! let authorized = SignatureActivationChecker::new(&verifier).all_required_keys_active(
//!     payer.keys(),
//!     txn.body_bytes(),
//!     &SigMapPubKeyToSigBytes::new(txn.sig_map()),
//!     &CharacteristicsFactory::new(&snapshot).inferred_for(txn.body()),
//! );
//! ```

pub mod activation;
pub mod config;
pub mod gate;
pub mod lookup;
pub mod order;
pub mod verifier;

mod error;

pub use self::{
    activation::{
        ActivationError, CharacteristicsFactory, KeyActivationCharacteristics,
        SigMapPubKeyToSigBytes, SignatureActivationChecker,
    },
    config::{SchedulingWhitelist, SigsConfig, get_configuration},
    error::{Result, SigsEngineError},
    gate::{TransactionContext, TxnAwareContractSigsVerifier},
    lookup::{DelegatingSigMetadataLookup, KeyOrderingFailure, SafeLookupResult, SigMetadataLookup},
    order::{OrderedKeys, ResolutionMode, SigRequirements, SigningOrderResult},
    verifier::{Ed25519Verifier, ParallelVerifier, SyncVerifier, VerificationStatus},
};
