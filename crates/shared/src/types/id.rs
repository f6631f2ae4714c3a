//! Newtype ids for ledger rows that cross the core/db boundary.
//!
//! Pure logic in `sgbooks-core` works on these instead of bare `Uuid`s, so
//! an account id cannot be passed where a journal entry id is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! ledger_ids {
    ($($(#[$meta:meta])* $name:ident;)+) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Fresh time-ordered (v7) id.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wraps a database key.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// The database key.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    )+};
}

ledger_ids! {
    /// Chart of accounts row.
    AccountId;
    /// Journal entry header.
    JournalEntryId;
    /// Fiscal year.
    FiscalYearId;
    /// Fiscal period within a year.
    FiscalPeriodId;
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
