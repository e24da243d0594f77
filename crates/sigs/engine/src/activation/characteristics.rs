//! Activation characteristics: how many children of a composite key must be active.

use ledger_sigs_domain::{KeyList, ThresholdKey, TransactionBody, TransactionData};
use ledger_sigs_store::FileStore;

/// Decides, per composite node, how many active children make it active.
pub trait KeyActivationCharacteristics {
    /// Required active children of a key list.
    fn sigs_needed_by_list(&self, list: &KeyList) -> usize;

    /// Required active children of a threshold key.
    fn sigs_needed_by_threshold(&self, threshold: &ThresholdKey) -> usize;
}

/// Every child of a list, and the stored threshold of a threshold key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultActivationCharacteristics;

impl KeyActivationCharacteristics for DefaultActivationCharacteristics {
    fn sigs_needed_by_list(&self, list: &KeyList) -> usize {
        list.len()
    }

    fn sigs_needed_by_threshold(&self, threshold: &ThresholdKey) -> usize {
        // a u32 threshold always fits a usize on supported targets
        threshold.threshold() as usize
    }
}

/// Lets any single key of a file's current access-control list authorize its deletion.
///
/// Only a candidate list equal to `wacl` is relaxed; any other list, and every threshold key,
/// keeps the default rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationServiceCharacteristics {
    wacl: KeyList,
}

impl RevocationServiceCharacteristics {
    /// Creates characteristics relaxing `wacl`.
    pub fn new(wacl: KeyList) -> Self {
        Self { wacl }
    }
}

impl KeyActivationCharacteristics for RevocationServiceCharacteristics {
    fn sigs_needed_by_list(&self, list: &KeyList) -> usize {
        if *list == self.wacl { 1 } else { DefaultActivationCharacteristics.sigs_needed_by_list(list) }
    }

    fn sigs_needed_by_threshold(&self, threshold: &ThresholdKey) -> usize {
        DefaultActivationCharacteristics.sigs_needed_by_threshold(threshold)
    }
}

/// The characteristics selected for one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferredCharacteristics {
    /// The default rule.
    Default(DefaultActivationCharacteristics),
    /// The revocation override for a file deletion.
    Revocation(RevocationServiceCharacteristics),
}

impl KeyActivationCharacteristics for InferredCharacteristics {
    fn sigs_needed_by_list(&self, list: &KeyList) -> usize {
        match self {
            Self::Default(characteristics) => characteristics.sigs_needed_by_list(list),
            Self::Revocation(characteristics) => characteristics.sigs_needed_by_list(list),
        }
    }

    fn sigs_needed_by_threshold(&self, threshold: &ThresholdKey) -> usize {
        match self {
            Self::Default(characteristics) => characteristics.sigs_needed_by_threshold(threshold),
            Self::Revocation(characteristics) => {
                characteristics.sigs_needed_by_threshold(threshold)
            },
        }
    }
}

/// Selects the activation characteristics of a transaction.
#[derive(Debug)]
pub struct CharacteristicsFactory<'a, S: ?Sized> {
    files: &'a S,
}

impl<'a, S> CharacteristicsFactory<'a, S>
where
    S: FileStore + ?Sized,
{
    /// Creates a selector reading files from `files`.
    pub fn new(files: &'a S) -> Self {
        Self { files }
    }

    /// Returns the revocation override for the deletion of an existing file, and the default
    /// characteristics otherwise.
    pub fn inferred_for(&self, txn: &TransactionBody) -> InferredCharacteristics {
        let TransactionData::FileDelete(op) = txn.data() else {
            return InferredCharacteristics::Default(DefaultActivationCharacteristics);
        };

        match self.files.get_file(op.target) {
            Some(file) => {
                tracing::trace!(file = %op.target, "relaxing activation of the current wacl");
                InferredCharacteristics::Revocation(RevocationServiceCharacteristics::new(
                    file.wacl().clone(),
                ))
            },
            None => InferredCharacteristics::Default(DefaultActivationCharacteristics),
        }
    }
}
