//! Newtype wrappers for entity identifiers.
//!
//! Identifiers are assigned by the database in increasing order and never
//! change after insert.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }
    };
}

entity_id!(
    /// Identifies a registered account.
    UserId
);
entity_id!(
    /// Identifies an employee profile.
    EmployeeId
);
entity_id!(
    /// Identifies a support ticket.
    TicketId
);
entity_id!(
    /// Identifies a training or certification record.
    TrainingRecordId
);
entity_id!(
    /// Identifies an uploaded document.
    DocumentId
);
entity_id!(
    /// Identifies an internal message.
    MessageId
);
