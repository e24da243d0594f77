//! Domain types for the ledger signing-requirements core.
//!
//! This crate provides the value types shared by every other crate in the workspace: entity
//! ids, the recursive [`Key`](key::Key) authorization primitive and its traversal, signature
//! maps attached to transactions, and the transaction bodies whose signing requirements are
//! resolved by the engine.
//!
//! Everything here is an immutable value created fresh per transaction. Nothing in this crate
//! reads or mutates ledger state.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod entity;
pub mod key;
pub mod sig_map;
pub mod txn;

#[cfg(feature = "serde")]
mod with_serde;

pub use self::{
    entity::{AccountId, ContractId, EntityIdParseError, FileId, ScheduleId, TokenId, TopicId},
    key::{Key, KeyList, ThresholdKey},
    sig_map::{SignatureKind, SignatureMap, SignaturePair},
    txn::{Functionality, Transaction, TransactionBody, TransactionData, TransactionId},
};
