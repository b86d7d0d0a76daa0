use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Ids issued by the identity provider.
macro_rules! define_uuid_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn parse(s: &str) -> Result<Self, DomainError> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|_| DomainError::InvalidId(stringify!($name).into()))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

/// Ids assigned by the store on insert.
macro_rules! define_serial_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub fn new(value: i64) -> Result<Self, DomainError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(DomainError::InvalidId(stringify!($name).into()))
                }
            }

            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_uuid_id!(UserId);
define_serial_id!(GoalId);
define_serial_id!(AllocationId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_uuid_succeeds() {
        let id = UserId::new();
        let parsed = UserId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_invalid_uuid_fails() {
        let result = UserId::parse("not-a-uuid");
        assert_eq!(result, Err(DomainError::InvalidId("UserId".into())));
    }

    #[test]
    fn serial_ids_must_be_positive() {
        assert_eq!(GoalId::new(7).unwrap().get(), 7);
        assert_eq!(
            GoalId::new(0),
            Err(DomainError::InvalidId("GoalId".into()))
        );
        assert_eq!(
            AllocationId::new(-3),
            Err(DomainError::InvalidId("AllocationId".into()))
        );
    }

    #[test]
    fn serial_ids_serialize_as_plain_integers() {
        let id = AllocationId::new(42).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let back: AllocationId = serde_json::from_str("42").unwrap();
        assert_eq!(back, id);
    }
}
