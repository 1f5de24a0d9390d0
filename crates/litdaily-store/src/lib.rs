//! Content store: at most one [`DailyBundle`] per calendar date
//!
//! The uniqueness of `date` is what keeps concurrent generators from
//! persisting two bundles for the same day; callers treat
//! [`InsertOutcome::Conflict`] as "someone else got there first".

use async_trait::async_trait;
use chrono::NaiveDate;
use litdaily_content::DailyBundle;
use litdaily_utils::StoreError;

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use sqlite::migrations::latest_version;

/// Result of an insert-if-absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A bundle for that date already exists; nothing was written
    Conflict,
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Bundle stored for `date`, if any.
    async fn find_by_date(&self, date: NaiveDate) -> Result<Option<DailyBundle>, StoreError>;

    /// Store `bundle` unless its date is already taken.
    ///
    /// A bundle with an empty required field is rejected with
    /// `StoreError::Rejected` before anything is written.
    async fn insert(&self, bundle: &DailyBundle) -> Result<InsertOutcome, StoreError>;
}

/// Refuse bundles that could not be read back.
pub(crate) fn ensure_storable(bundle: &DailyBundle) -> Result<(), StoreError> {
    match bundle.blank_field() {
        Some(field) => Err(StoreError::Rejected {
            date: bundle.date.to_string(),
            reason: format!("{field} is empty"),
        }),
        None => Ok(()),
    }
}
