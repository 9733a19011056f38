use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned integer identity. Values are only ever produced by the
/// persistence layer (SQLite rowid assignment), never synthesized in
/// domain logic.
macro_rules! entity_id {
    ($name:ident) => {
        #[derive(
            Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub fn from_raw(raw: i64) -> Self {
                Self(raw)
            }

            pub fn as_i64(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

entity_id!(CollegeId);
entity_id!(StudentId);
entity_id!(EventId);
entity_id!(RegId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_preserves_value() {
        let id = CollegeId::from_raw(42);
        assert_eq!(id.as_i64(), 42);
    }

    #[test]
    fn display_is_plain_integer() {
        let id = EventId::from_raw(7);
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn serde_roundtrip_is_transparent() {
        let id = StudentId::from_raw(3);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "3");
        let parsed: StudentId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn ids_order_by_value() {
        let a = RegId::from_raw(1);
        let b = RegId::from_raw(2);
        assert!(a < b);
    }
}
