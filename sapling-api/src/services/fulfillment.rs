//! Request Fulfillment Workflow
//!
//! The one multi-step state transition in the system:
//! create request -> approve (decrement stock) -> delivery note.
//!
//! Every step is a sequence of independent store round-trips with no
//! wrapping transaction. Creation can leave partial state if an item
//! insert fails mid-loop; that is accepted and surfaced as the failing
//! call's error. Approval avoids the classic read-then-write stock
//! race by pushing each decrement into one conditional update, so
//! stock can never go negative even under concurrent approvals.

use async_trait::async_trait;

use sapling_core::{
    Day, DeliveryLine, DeliveryNote, Partner, RecordId, RequestItem, RequestStatus, Seedling,
    SeedlingRequest,
};

use crate::db::DbClient;
use crate::error::{ApiError, ApiResult};
use crate::types::{ApproveOutcome, CreateFulfillmentRequest, RequestDetail, SkippedItem};

// ============================================================================
// STORE SEAM
// ============================================================================

/// The store operations the workflow needs. `DbClient` is the
/// production implementation; tests run against an in-memory one.
#[async_trait]
pub trait FulfillmentStore: Send + Sync {
    async fn partner_get(&self, id: RecordId) -> ApiResult<Option<Partner>>;
    async fn seedling_get(&self, id: RecordId) -> ApiResult<Option<Seedling>>;
    async fn request_get(&self, id: RecordId) -> ApiResult<Option<SeedlingRequest>>;
    async fn request_insert(
        &self,
        partner_id: RecordId,
        request_date: Day,
        note: Option<&str>,
    ) -> ApiResult<SeedlingRequest>;
    async fn request_item_insert(
        &self,
        request_id: RecordId,
        seedling_id: RecordId,
        quantity: i64,
    ) -> ApiResult<RequestItem>;
    async fn request_items(&self, request_id: RecordId) -> ApiResult<Vec<RequestItem>>;
    /// Atomically decrement stock if at least `quantity` remains.
    /// Returns false (and changes nothing) otherwise.
    async fn stock_decrement(&self, seedling_id: RecordId, quantity: i64) -> ApiResult<bool>;
    async fn request_set_status(
        &self,
        id: RecordId,
        status: RequestStatus,
    ) -> ApiResult<SeedlingRequest>;
}

#[async_trait]
impl FulfillmentStore for DbClient {
    async fn partner_get(&self, id: RecordId) -> ApiResult<Option<Partner>> {
        DbClient::partner_get(self, id).await
    }

    async fn seedling_get(&self, id: RecordId) -> ApiResult<Option<Seedling>> {
        DbClient::seedling_get(self, id).await
    }

    async fn request_get(&self, id: RecordId) -> ApiResult<Option<SeedlingRequest>> {
        DbClient::request_get(self, id).await
    }

    async fn request_insert(
        &self,
        partner_id: RecordId,
        request_date: Day,
        note: Option<&str>,
    ) -> ApiResult<SeedlingRequest> {
        DbClient::request_insert(self, partner_id, request_date, note).await
    }

    async fn request_item_insert(
        &self,
        request_id: RecordId,
        seedling_id: RecordId,
        quantity: i64,
    ) -> ApiResult<RequestItem> {
        DbClient::request_item_insert(self, request_id, seedling_id, quantity).await
    }

    async fn request_items(&self, request_id: RecordId) -> ApiResult<Vec<RequestItem>> {
        DbClient::request_items(self, request_id).await
    }

    async fn stock_decrement(&self, seedling_id: RecordId, quantity: i64) -> ApiResult<bool> {
        DbClient::stock_decrement(self, seedling_id, quantity).await
    }

    async fn request_set_status(
        &self,
        id: RecordId,
        status: RequestStatus,
    ) -> ApiResult<SeedlingRequest> {
        DbClient::request_set_status(self, id, status).await
    }
}

// ============================================================================
// WORKFLOW OPERATIONS
// ============================================================================

/// Validate and persist a new fulfillment request with its line items.
///
/// One request row first, then one item row per line, sequentially.
/// If the request insert fails nothing else is attempted. An item
/// insert failure leaves the request and earlier items in place and
/// surfaces the error; there is no rollback. Stock is not touched at
/// creation time.
pub async fn create_request(
    store: &dyn FulfillmentStore,
    req: &CreateFulfillmentRequest,
) -> ApiResult<RequestDetail> {
    if req.items.is_empty() {
        return Err(ApiError::missing_field("items"));
    }
    for item in &req.items {
        if item.quantity < 1 {
            return Err(ApiError::invalid_range("quantity", ">= 1"));
        }
    }

    store
        .partner_get(req.partner_id)
        .await?
        .ok_or_else(|| ApiError::partner_not_found(req.partner_id))?;

    // Validate every seedling reference up front so a typo'd id fails
    // the whole request instead of failing mid-insert.
    for item in &req.items {
        store
            .seedling_get(item.seedling_id)
            .await?
            .ok_or_else(|| ApiError::seedling_not_found(item.seedling_id))?;
    }

    let request = store
        .request_insert(req.partner_id, req.request_date, req.note.as_deref())
        .await?;

    let mut items = Vec::with_capacity(req.items.len());
    for item in &req.items {
        let inserted = store
            .request_item_insert(request.id, item.seedling_id, item.quantity)
            .await?;
        items.push(inserted);
    }

    tracing::info!(
        request_id = request.id,
        partner_id = request.partner_id,
        items = items.len(),
        "Fulfillment request created"
    );

    Ok(RequestDetail { request, items })
}

/// Approve a pending request, decrementing stock best-effort.
///
/// Per item, in list order: one conditional decrement. Items whose
/// stock is below the requested quantity are skipped and reported, not
/// reverted or blocked on. After the pass the request is marked
/// approved unconditionally; the pending -> approved transition is
/// one-way.
pub async fn approve_request(
    store: &dyn FulfillmentStore,
    request_id: RecordId,
) -> ApiResult<ApproveOutcome> {
    let request = store
        .request_get(request_id)
        .await?
        .ok_or_else(|| ApiError::request_not_found(request_id))?;

    if request.status != RequestStatus::Pending {
        return Err(ApiError::state_conflict(format!(
            "Request {} is {}, only pending requests can be approved",
            request_id, request.status
        )));
    }

    let items = store.request_items(request_id).await?;

    let mut fulfilled = Vec::new();
    let mut skipped = Vec::new();
    for item in &items {
        if store.stock_decrement(item.seedling_id, item.quantity).await? {
            fulfilled.push(item.seedling_id);
        } else {
            skipped.push(SkippedItem {
                seedling_id: item.seedling_id,
                requested: item.quantity,
            });
        }
    }

    let request = store
        .request_set_status(request_id, RequestStatus::Approved)
        .await?;

    if skipped.is_empty() {
        tracing::info!(request_id, items = items.len(), "Request approved");
    } else {
        tracing::warn!(
            request_id,
            skipped = skipped.len(),
            "Request approved with insufficient stock on some items"
        );
    }

    Ok(ApproveOutcome {
        request,
        fulfilled,
        skipped,
    })
}

/// Resolve the delivery-note content for an approved request: partner
/// name, date, note, one line per item joined to species and height
/// range.
pub async fn delivery_note(
    store: &dyn FulfillmentStore,
    request_id: RecordId,
) -> ApiResult<DeliveryNote> {
    let request = store
        .request_get(request_id)
        .await?
        .ok_or_else(|| ApiError::request_not_found(request_id))?;

    if request.status != RequestStatus::Approved {
        return Err(ApiError::state_conflict(format!(
            "Request {} is {}, delivery notes exist only for approved requests",
            request_id, request.status
        )));
    }

    let partner = store
        .partner_get(request.partner_id)
        .await?
        .ok_or_else(|| ApiError::partner_not_found(request.partner_id))?;

    let items = store.request_items(request_id).await?;
    let mut lines = Vec::with_capacity(items.len());
    for item in &items {
        let seedling = store
            .seedling_get(item.seedling_id)
            .await?
            .ok_or_else(|| ApiError::seedling_not_found(item.seedling_id))?;
        lines.push(DeliveryLine {
            species: seedling.species,
            height_range: seedling.height_range,
            quantity: item.quantity,
        });
    }

    Ok(DeliveryNote {
        partner_name: partner.name,
        request_date: request.request_date,
        note: request.note,
        lines,
    })
}
