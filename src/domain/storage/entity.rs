//! Storage entity traits

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

/// Trait for types that can be used as storage keys
pub trait StorageKey: Clone + Debug + Send + Sync + Eq + std::hash::Hash {
    /// Returns the key as a string for backends keyed by strings
    fn as_str(&self) -> &str;
}

/// Trait for types that can be stored
pub trait StorageEntity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    /// The key type for this entity
    type Key: StorageKey;

    /// Returns the entity's key
    fn key(&self) -> &Self::Key;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    struct BadgeNumber(String);

    impl StorageKey for BadgeNumber {
        fn as_str(&self) -> &str {
            &self.0
        }
    }

    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
    struct Badge {
        number: BadgeNumber,
        holder: String,
    }

    impl StorageEntity for Badge {
        type Key = BadgeNumber;

        fn key(&self) -> &Self::Key {
            &self.number
        }
    }

    #[test]
    fn test_entity_exposes_its_key() {
        let badge = Badge {
            number: BadgeNumber("B-204".to_string()),
            holder: "Suman".to_string(),
        };
        assert_eq!(badge.key().as_str(), "B-204");
    }
}
