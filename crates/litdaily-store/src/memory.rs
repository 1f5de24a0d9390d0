use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use async_trait::async_trait;
use chrono::NaiveDate;
use litdaily_content::DailyBundle;
use litdaily_utils::StoreError;
use tokio::sync::RwLock;

use crate::{ContentStore, InsertOutcome, ensure_storable};

/// Process-local store, used for previews and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    bundles: RwLock<BTreeMap<NaiveDate, DailyBundle>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn find_by_date(&self, date: NaiveDate) -> Result<Option<DailyBundle>, StoreError> {
        Ok(self.bundles.read().await.get(&date).cloned())
    }

    async fn insert(&self, bundle: &DailyBundle) -> Result<InsertOutcome, StoreError> {
        ensure_storable(bundle)?;
        match self.bundles.write().await.entry(bundle.date) {
            Entry::Occupied(_) => Ok(InsertOutcome::Conflict),
            Entry::Vacant(slot) => {
                slot.insert(bundle.clone());
                Ok(InsertOutcome::Inserted)
            }
        }
    }
}
