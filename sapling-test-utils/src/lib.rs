//! Sapling Test Utilities
//!
//! Centralized test infrastructure for the sapling workspace:
//! - `InMemoryStore`: a `FulfillmentStore` implementation backed by
//!   plain vectors behind a mutex, for exercising the workflow without
//!   a database
//! - Fixture constructors for common entity shapes

use std::sync::Mutex;

use async_trait::async_trait;

use sapling_api::error::{ApiError, ApiResult};
use sapling_api::services::FulfillmentStore;
use sapling_core::{
    Day, Partner, RecordId, RequestItem, RequestStatus, Seedling, SeedlingRequest,
};

// ============================================================================
// FIXTURES
// ============================================================================

/// A partner with only the required field set.
pub fn sample_partner(id: RecordId, name: &str) -> Partner {
    Partner {
        id,
        name: name.to_string(),
        contact: None,
        address: None,
        note: None,
    }
}

/// A seedling stock line with the given count and no batch or zone.
pub fn sample_seedling(id: RecordId, species: &str, count: i64) -> Seedling {
    Seedling {
        id,
        species: species.to_string(),
        height_range: "10-15".to_string(),
        count,
        survived_count: None,
        dead_count: None,
        batch_id: None,
        zone_id: None,
    }
}

/// A fixed calendar date for deterministic tests.
pub fn sample_date() -> Day {
    // Known-valid constant.
    Day::from_ymd_opt(2024, 6, 15).unwrap()
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

#[derive(Debug, Default)]
struct StoreInner {
    partners: Vec<Partner>,
    seedlings: Vec<Seedling>,
    requests: Vec<SeedlingRequest>,
    items: Vec<RequestItem>,
    next_id: RecordId,
}

/// In-memory `FulfillmentStore` for workflow tests.
///
/// Mirrors the store's semantics where the workflow depends on them:
/// generated integer ids, conditional stock decrement, items returned
/// in id order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                next_id: 1,
                ..StoreInner::default()
            }),
        }
    }

    fn lock(&self) -> ApiResult<std::sync::MutexGuard<'_, StoreInner>> {
        self.inner
            .lock()
            .map_err(|_| ApiError::internal_error("test store mutex poisoned"))
    }

    /// Seed a partner, assigning the next id. Returns the stored row.
    pub fn add_partner(&self, name: &str) -> Partner {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        let partner = sample_partner(id, name);
        inner.partners.push(partner.clone());
        partner
    }

    /// Seed a seedling stock line, assigning the next id.
    pub fn add_seedling(&self, species: &str, count: i64) -> Seedling {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        let seedling = sample_seedling(id, species, count);
        inner.seedlings.push(seedling.clone());
        seedling
    }

    /// Current stock for a seeded seedling.
    pub fn stock(&self, seedling_id: RecordId) -> Option<i64> {
        let inner = self.inner.lock().unwrap();
        inner
            .seedlings
            .iter()
            .find(|s| s.id == seedling_id)
            .map(|s| s.count)
    }

    /// All stored items for a request, id order.
    pub fn items_for(&self, request_id: RecordId) -> Vec<RequestItem> {
        let inner = self.inner.lock().unwrap();
        let mut items: Vec<_> = inner
            .items
            .iter()
            .filter(|i| i.request_id == request_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.id);
        items
    }
}

#[async_trait]
impl FulfillmentStore for InMemoryStore {
    async fn partner_get(&self, id: RecordId) -> ApiResult<Option<Partner>> {
        let inner = self.lock()?;
        Ok(inner.partners.iter().find(|p| p.id == id).cloned())
    }

    async fn seedling_get(&self, id: RecordId) -> ApiResult<Option<Seedling>> {
        let inner = self.lock()?;
        Ok(inner.seedlings.iter().find(|s| s.id == id).cloned())
    }

    async fn request_get(&self, id: RecordId) -> ApiResult<Option<SeedlingRequest>> {
        let inner = self.lock()?;
        Ok(inner.requests.iter().find(|r| r.id == id).cloned())
    }

    async fn request_insert(
        &self,
        partner_id: RecordId,
        request_date: Day,
        note: Option<&str>,
    ) -> ApiResult<SeedlingRequest> {
        let mut inner = self.lock()?;
        let id = inner.next_id;
        inner.next_id += 1;
        let request = SeedlingRequest {
            id,
            partner_id,
            request_date,
            note: note.map(str::to_string),
            status: RequestStatus::Pending,
        };
        inner.requests.push(request.clone());
        Ok(request)
    }

    async fn request_item_insert(
        &self,
        request_id: RecordId,
        seedling_id: RecordId,
        quantity: i64,
    ) -> ApiResult<RequestItem> {
        let mut inner = self.lock()?;
        let id = inner.next_id;
        inner.next_id += 1;
        let item = RequestItem {
            id,
            request_id,
            seedling_id,
            quantity,
        };
        inner.items.push(item.clone());
        Ok(item)
    }

    async fn request_items(&self, request_id: RecordId) -> ApiResult<Vec<RequestItem>> {
        let inner = self.lock()?;
        let mut items: Vec<_> = inner
            .items
            .iter()
            .filter(|i| i.request_id == request_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }

    async fn stock_decrement(&self, seedling_id: RecordId, quantity: i64) -> ApiResult<bool> {
        let mut inner = self.lock()?;
        match inner
            .seedlings
            .iter_mut()
            .find(|s| s.id == seedling_id && s.count >= quantity)
        {
            Some(seedling) => {
                seedling.count -= quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn request_set_status(
        &self,
        id: RecordId,
        status: RequestStatus,
    ) -> ApiResult<SeedlingRequest> {
        let mut inner = self.lock()?;
        let request = inner
            .requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ApiError::request_not_found(id))?;
        request.status = status;
        Ok(request.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stock_decrement_respects_floor() {
        let store = InMemoryStore::new();
        let seedling = store.add_seedling("Afzelia xylocarpa", 3);

        assert!(store.stock_decrement(seedling.id, 2).await.unwrap());
        assert_eq!(store.stock(seedling.id), Some(1));

        // Insufficient stock leaves the count untouched.
        assert!(!store.stock_decrement(seedling.id, 2).await.unwrap());
        assert_eq!(store.stock(seedling.id), Some(1));
    }

    #[tokio::test]
    async fn test_ids_are_unique_across_entities() {
        let store = InMemoryStore::new();
        let partner = store.add_partner("Forest restoration group");
        let seedling = store.add_seedling("Dipterocarpus alatus", 10);
        let request = store
            .request_insert(partner.id, sample_date(), None)
            .await
            .unwrap();

        assert_ne!(partner.id, seedling.id);
        assert_ne!(seedling.id, request.id);
    }
}
