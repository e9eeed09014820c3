//! Recounts that bring category counts back in line after post writes.

use uuid::Uuid;

use super::CategoryLedger;
use crate::error::DomainError;

/// Recounts categories after post writes that may change which published
/// posts they hold.
#[derive(Clone)]
pub struct ConsistencyCoordinator {
    ledger: CategoryLedger,
}

impl ConsistencyCoordinator {
    pub fn new(ledger: CategoryLedger) -> Self {
        Self { ledger }
    }

    pub async fn sync_category(&self, category_id: Uuid) -> Result<(), DomainError> {
        self.ledger.recompute_count(category_id).await.map(|_| ())
    }

    /// Sync each distinct category once, in the order given.
    pub async fn sync_categories(&self, category_ids: &[Uuid]) -> Result<(), DomainError> {
        let mut seen = Vec::with_capacity(category_ids.len());
        for id in category_ids {
            if !seen.contains(id) {
                seen.push(*id);
                self.sync_category(*id).await?;
            }
        }
        Ok(())
    }
}
