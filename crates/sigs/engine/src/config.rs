//! Configuration of the signing-requirements engine.
//!
//! Configuration is loaded from the embedded base configuration (`base_config.ron`) and then
//! overridden by environment variables with the prefix `LEDGERSIGS_`. Nested keys are
//! separated by double underscores and lists by commas, for example:
//!
//! ```bash
//! export LEDGERSIGS_SCHEDULING__WHITELIST="crypto_transfer,token_mint"
//! export LEDGERSIGS_VERIFICATION__PARALLEL_THRESHOLD="32"
//! ```

use core::num::NonZeroUsize;
use std::collections::BTreeSet;

use config::{Environment, File, FileFormat};
use ledger_sigs_domain::Functionality;
use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::{
    error::{Result, SigsEngineError},
    verifier::{Ed25519Verifier, ParallelVerifier},
};

/// Loads the configuration from the base configuration and the process environment.
///
/// # Errors
///
/// If the configuration could not be loaded or parsed.
pub fn get_configuration() -> Result<SigsConfig> {
    SigsConfig::load(SigsConfig::environment())
}

/// Root configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SigsConfig {
    /// Scheduling settings.
    pub scheduling: SchedulingConfig,

    /// Signature verification settings.
    pub verification: VerificationConfig,
}

/// Scheduling settings.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulingConfig {
    /// Operations that may be wrapped in a schedule, by name (e.g. `crypto_transfer`).
    #[serde_as(as = "Vec<DisplayFromStr>")]
    pub whitelist: Vec<Functionality>,
}

/// Signature verification settings.
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationConfig {
    /// The batch size from which leaf signatures are verified in parallel.
    pub parallel_threshold: NonZeroUsize,
}

impl SigsConfig {
    const CONFIG_ENV_PREFIX: &str = "LEDGERSIGS";

    /// Returns the environment source the configuration is overridden from.
    pub fn environment() -> Environment {
        Environment::with_prefix(Self::CONFIG_ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("scheduling.whitelist")
            .try_parsing(true)
    }

    /// Loads the base configuration overridden by `environment`.
    ///
    /// # Errors
    ///
    /// If the configuration could not be loaded or parsed.
    pub fn load(environment: Environment) -> Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(File::from_str(include_str!("base_config.ron"), FileFormat::Ron))
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        tracing::debug!(
            whitelist = config.scheduling.whitelist.len(),
            parallel_threshold = config.verification.parallel_threshold.get(),
            "loaded configuration"
        );

        Ok(config)
    }

    /// Returns the schedulable-operation whitelist.
    ///
    /// # Errors
    ///
    /// If the whitelist names a schedule operation, since schedules cannot be nested.
    pub fn whitelist(&self) -> Result<SchedulingWhitelist> {
        SchedulingWhitelist::try_from(&self.scheduling)
    }

    /// Returns the Ed25519 batch verifier tuned by the verification settings.
    pub fn verifier(&self) -> ParallelVerifier<Ed25519Verifier> {
        ParallelVerifier::new(Ed25519Verifier, self.verification.parallel_threshold)
    }
}

/// The set of operations that may be wrapped in a schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingWhitelist(BTreeSet<Functionality>);

impl SchedulingWhitelist {
    /// Returns `true` if `functionality` is whitelisted.
    pub fn contains(&self, functionality: Functionality) -> bool {
        self.0.contains(&functionality)
    }

    /// Returns the whitelisted operations in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = Functionality> + '_ {
        self.0.iter().copied()
    }
}

impl Default for SchedulingWhitelist {
    fn default() -> Self {
        [
            Functionality::CryptoTransfer,
            Functionality::ConsensusSubmitMessage,
            Functionality::TokenMint,
            Functionality::TokenBurn,
        ]
        .into_iter()
        .collect()
    }
}

impl FromIterator<Functionality> for SchedulingWhitelist {
    fn from_iter<I: IntoIterator<Item = Functionality>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl TryFrom<&SchedulingConfig> for SchedulingWhitelist {
    type Error = SigsEngineError;

    fn try_from(config: &SchedulingConfig) -> Result<Self> {
        let nested = config.whitelist.iter().find(|functionality| {
            matches!(
                functionality,
                Functionality::ScheduleCreate
                    | Functionality::ScheduleSign
                    | Functionality::ScheduleDelete
            )
        });

        if let Some(functionality) = nested {
            return Err(SigsEngineError::invalid_config(format!(
                "{functionality} cannot be scheduled"
            )));
        }

        Ok(config.whitelist.iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<SigsConfig> {
        let vars: config::Map<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();

        SigsConfig::load(SigsConfig::environment().source(Some(vars)))
    }

    #[test]
    fn base_config_matches_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.whitelist().unwrap(), SchedulingWhitelist::default());
        assert_eq!(config.verification.parallel_threshold.get(), 8);
    }

    #[test]
    fn environment_overrides_base_config() {
        let config = load(&[
            ("LEDGERSIGS_SCHEDULING__WHITELIST", "crypto_create,file_update"),
            ("LEDGERSIGS_VERIFICATION__PARALLEL_THRESHOLD", "32"),
        ])
        .unwrap();

        let whitelist = config.whitelist().unwrap();
        assert_eq!(
            whitelist.iter().collect::<Vec<_>>(),
            vec![Functionality::CryptoCreate, Functionality::FileUpdate]
        );
        assert_eq!(config.verification.parallel_threshold.get(), 32);
    }

    #[test]
    fn unknown_operation_names_are_rejected() {
        let result = load(&[("LEDGERSIGS_SCHEDULING__WHITELIST", "crypto_transfer,not_an_op")]);

        let Err(SigsEngineError::Config(error)) = result else {
            panic!("unknown operation accepted: {result:?}");
        };
        assert!(error.to_string().contains("Matching variant not found"));
    }

    #[test]
    fn schedule_operations_cannot_be_whitelisted() {
        let config = load(&[("LEDGERSIGS_SCHEDULING__WHITELIST", "schedule_sign")]).unwrap();

        assert!(matches!(config.whitelist(), Err(SigsEngineError::InvalidConfig(_))));
    }
}
