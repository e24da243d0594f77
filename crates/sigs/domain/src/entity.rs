//! Ledger entity identifiers.
//!
//! Every entity kind is addressed by a `shard.realm.num` triple. The triple `0.0.0` is reserved
//! as the sentinel "missing" id that stores hand back when an indirect reference fails to
//! resolve.

use core::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an entity id from its `shard.realm.num` form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityIdParseError {
    /// The input did not have exactly three dot-separated parts.
    #[error("expected shard.realm.num")]
    Malformed,

    /// One of the parts was not an unsigned integer.
    #[error("invalid numeric part")]
    InvalidNumber,
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $name {
            shard: u64,
            realm: u64,
            num: u64,
        }

        impl $name {
            /// The sentinel id reported when a reference does not resolve.
            pub const MISSING: Self = Self { shard: 0, realm: 0, num: 0 };

            /// Creates an id from its three components.
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self { shard, realm, num }
            }

            /// Creates an id in shard 0, realm 0.
            pub const fn from_num(num: u64) -> Self {
                Self::new(0, 0, num)
            }

            /// Returns the shard number.
            pub const fn shard(&self) -> u64 {
                self.shard
            }

            /// Returns the realm number.
            pub const fn realm(&self) -> u64 {
                self.realm
            }

            /// Returns the entity number.
            pub const fn num(&self) -> u64 {
                self.num
            }

            /// Returns `true` if this is the sentinel missing id.
            pub const fn is_missing(&self) -> bool {
                self.num == 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
            }
        }

        impl FromStr for $name {
            type Err = EntityIdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let (shard, realm, num) = parse_triple(s)?;
                Ok(Self::new(shard, realm, num))
            }
        }
    };
}

entity_id!(
    /// Identifies a crypto account. Smart contracts are also accounts.
    AccountId
);

entity_id!(
    /// Identifies a smart contract.
    ContractId
);

entity_id!(
    /// Identifies a file in the ledger's file service.
    FileId
);

entity_id!(
    /// Identifies a consensus topic.
    TopicId
);

entity_id!(
    /// Identifies a token.
    TokenId
);

entity_id!(
    /// Identifies a scheduled transaction.
    ScheduleId
);

impl From<ContractId> for AccountId {
    /// A contract shares its number space with the account that backs it.
    fn from(id: ContractId) -> Self {
        Self::new(id.shard, id.realm, id.num)
    }
}

impl From<AccountId> for ContractId {
    fn from(id: AccountId) -> Self {
        Self::new(id.shard, id.realm, id.num)
    }
}

fn parse_triple(s: &str) -> Result<(u64, u64, u64), EntityIdParseError> {
    let mut parts = s.split('.');

    let mut next = || -> Result<u64, EntityIdParseError> {
        parts
            .next()
            .ok_or(EntityIdParseError::Malformed)?
            .parse()
            .map_err(|_| EntityIdParseError::InvalidNumber)
    };

    let triple = (next()?, next()?, next()?);

    if parts.next().is_some() {
        return Err(EntityIdParseError::Malformed);
    }

    Ok(triple)
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn parses_and_displays_dotted_triples() {
        let id: AccountId = "1.2.1234".parse().unwrap();

        assert_eq!(id, AccountId::new(1, 2, 1234));
        assert_eq!(id.to_string(), "1.2.1234");
    }

    #[test]
    fn rejects_malformed_ids() {
        assert_eq!("1.2".parse::<FileId>(), Err(EntityIdParseError::Malformed));
        assert_eq!("1.2.3.4".parse::<FileId>(), Err(EntityIdParseError::Malformed));
        assert_eq!("1.x.3".parse::<FileId>(), Err(EntityIdParseError::InvalidNumber));
    }

    #[test]
    fn contract_and_account_ids_share_numbers() {
        let contract = ContractId::from_num(1001);

        assert_eq!(AccountId::from(contract), AccountId::from_num(1001));
        assert_eq!(ContractId::from(AccountId::from(contract)), contract);
    }

    #[test]
    fn zero_num_is_the_missing_sentinel() {
        assert!(TokenId::MISSING.is_missing());
        assert!(!TokenId::from_num(5).is_missing());
    }
}
