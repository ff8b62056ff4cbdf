//! Database Connection Pool Module
//!
//! PostgreSQL connection pooling via deadpool-postgres plus a thin
//! client exposing one method per store operation. All statements are
//! parameterized; the relations match the original dashboard's tables
//! (`seedlings`, `batches`, `partners`, `nursery_logs`,
//! `nursery_zones`, `seedling_requests`, `seedling_request_items`,
//! `project_status`).

use std::time::Duration;

use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use tokio_postgres::{NoTls, Row};

use sapling_core::{
    Batch, Day, NurseryLog, Partner, ProjectStatus, RecordId, RequestItem, RequestStatus,
    Seedling, SeedlingRequest, Zone,
};

use crate::error::{ApiError, ApiResult};
use crate::types::{
    CreateBatchRequest, CreateLogRequest, CreatePartnerRequest, CreateSeedlingRequest,
    UpdateSeedlingRequest,
};

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub max_size: usize,
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "sapling".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("SAPLING_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("SAPLING_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("SAPLING_DB_NAME").unwrap_or_else(|_| "sapling".to_string()),
            user: std::env::var("SAPLING_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("SAPLING_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("SAPLING_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            timeout: Duration::from_secs(
                std::env::var("SAPLING_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// ROW MAPPERS
// ============================================================================

fn seedling_from_row(row: &Row) -> Seedling {
    Seedling {
        id: row.get("id"),
        species: row.get("species"),
        height_range: row.get("height_range"),
        count: row.get("count"),
        survived_count: row.get("survived_count"),
        dead_count: row.get("dead_count"),
        batch_id: row.get("batch_id"),
        zone_id: row.get("zone_id"),
    }
}

fn batch_from_row(row: &Row) -> Batch {
    Batch {
        id: row.get("id"),
        batch_code: row.get("batch_code"),
        collected_at: row.get("collected_at"),
        source_name: row.get("source_name"),
        gps_latitude: row.get("gps_latitude"),
        gps_longitude: row.get("gps_longitude"),
        note: row.get("note"),
    }
}

fn partner_from_row(row: &Row) -> Partner {
    Partner {
        id: row.get("id"),
        name: row.get("name"),
        contact: row.get("contact"),
        address: row.get("address"),
        note: row.get("note"),
    }
}

fn log_from_row(row: &Row) -> NurseryLog {
    NurseryLog {
        id: row.get("id"),
        log_date: row.get("log_date"),
        activity: row.get("activity"),
        batch_id: row.get("batch_id"),
        zone_id: row.get("zone_id"),
        note: row.get("note"),
    }
}

fn zone_from_row(row: &Row) -> Zone {
    Zone {
        id: row.get("id"),
        zone_code: row.get("zone_code"),
    }
}

fn request_from_row(row: &Row) -> ApiResult<SeedlingRequest> {
    let status: String = row.get("status");
    Ok(SeedlingRequest {
        id: row.get("id"),
        partner_id: row.get("partner_id"),
        request_date: row.get("request_date"),
        note: row.get("note"),
        status: status.parse::<RequestStatus>()?,
    })
}

fn item_from_row(row: &Row) -> RequestItem {
    RequestItem {
        id: row.get("id"),
        request_id: row.get("request_id"),
        seedling_id: row.get("seedling_id"),
        quantity: row.get("quantity"),
    }
}

fn project_status_from_row(row: &Row) -> ApiResult<ProjectStatus> {
    let stage: String = row.get("current_stage");
    Ok(ProjectStatus {
        id: row.get("id"),
        current_stage: stage.parse()?,
    })
}

// ============================================================================
// DATABASE CLIENT
// ============================================================================

/// Database client wrapping the connection pool.
#[derive(Clone)]
pub struct DbClient {
    pool: Pool,
}

impl DbClient {
    /// Create a new database client with the given pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new database client from configuration.
    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Get the current pool size for observability.
    pub fn pool_size(&self) -> usize {
        self.pool.status().size
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> ApiResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(ApiError::from)
    }

    /// Round-trip liveness probe.
    pub async fn ping(&self) -> ApiResult<()> {
        let conn = self.get_conn().await?;
        conn.query_one("SELECT 1", &[]).await?;
        Ok(())
    }

    // ========================================================================
    // SEEDLING OPERATIONS
    // ========================================================================

    pub async fn seedling_list(&self) -> ApiResult<Vec<Seedling>> {
        let conn = self.get_conn().await?;
        let rows = conn
            .query(
                "SELECT id, species, height_range, count, survived_count, dead_count, \
                        batch_id, zone_id \
                 FROM seedlings ORDER BY id",
                &[],
            )
            .await?;
        Ok(rows.iter().map(seedling_from_row).collect())
    }

    pub async fn seedling_get(&self, id: RecordId) -> ApiResult<Option<Seedling>> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_opt(
                "SELECT id, species, height_range, count, survived_count, dead_count, \
                        batch_id, zone_id \
                 FROM seedlings WHERE id = $1",
                &[&id],
            )
            .await?;
        Ok(row.as_ref().map(seedling_from_row))
    }

    pub async fn seedling_create(&self, req: &CreateSeedlingRequest) -> ApiResult<Seedling> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_one(
                "INSERT INTO seedlings \
                     (species, height_range, count, survived_count, dead_count, batch_id, zone_id) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) \
                 RETURNING id, species, height_range, count, survived_count, dead_count, \
                           batch_id, zone_id",
                &[
                    &req.species,
                    &req.height_range,
                    &req.count,
                    &req.survived_count,
                    &req.dead_count,
                    &req.batch_id,
                    &req.zone_id,
                ],
            )
            .await?;
        Ok(seedling_from_row(&row))
    }

    /// Partial edit. Omitted fields keep their stored value; this
    /// endpoint cannot null a column out.
    pub async fn seedling_update(
        &self,
        id: RecordId,
        req: &UpdateSeedlingRequest,
    ) -> ApiResult<Option<Seedling>> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_opt(
                "UPDATE seedlings SET \
                     species = COALESCE($2, species), \
                     height_range = COALESCE($3, height_range), \
                     count = COALESCE($4, count), \
                     survived_count = COALESCE($5, survived_count), \
                     dead_count = COALESCE($6, dead_count), \
                     batch_id = COALESCE($7, batch_id), \
                     zone_id = COALESCE($8, zone_id) \
                 WHERE id = $1 \
                 RETURNING id, species, height_range, count, survived_count, dead_count, \
                           batch_id, zone_id",
                &[
                    &id,
                    &req.species,
                    &req.height_range,
                    &req.count,
                    &req.survived_count,
                    &req.dead_count,
                    &req.batch_id,
                    &req.zone_id,
                ],
            )
            .await?;
        Ok(row.as_ref().map(seedling_from_row))
    }

    pub async fn seedling_delete(&self, id: RecordId) -> ApiResult<bool> {
        let conn = self.get_conn().await?;
        let affected = conn
            .execute("DELETE FROM seedlings WHERE id = $1", &[&id])
            .await?;
        Ok(affected == 1)
    }

    /// Conditional atomic stock decrement. Matches zero rows when the
    /// current stock is below the requested quantity, which keeps
    /// `count >= 0` without a read-then-write race.
    pub async fn stock_decrement(&self, seedling_id: RecordId, quantity: i64) -> ApiResult<bool> {
        let conn = self.get_conn().await?;
        let affected = conn
            .execute(
                "UPDATE seedlings SET count = count - $2 \
                 WHERE id = $1 AND count >= $2",
                &[&seedling_id, &quantity],
            )
            .await?;
        Ok(affected == 1)
    }

    // ========================================================================
    // BATCH OPERATIONS
    // ========================================================================

    pub async fn batch_list(&self) -> ApiResult<Vec<Batch>> {
        let conn = self.get_conn().await?;
        let rows = conn
            .query(
                "SELECT id, batch_code, collected_at, source_name, gps_latitude, \
                        gps_longitude, note \
                 FROM batches ORDER BY collected_at DESC",
                &[],
            )
            .await?;
        Ok(rows.iter().map(batch_from_row).collect())
    }

    pub async fn batch_get(&self, id: RecordId) -> ApiResult<Option<Batch>> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_opt(
                "SELECT id, batch_code, collected_at, source_name, gps_latitude, \
                        gps_longitude, note \
                 FROM batches WHERE id = $1",
                &[&id],
            )
            .await?;
        Ok(row.as_ref().map(batch_from_row))
    }

    pub async fn batch_create(&self, req: &CreateBatchRequest) -> ApiResult<Batch> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_one(
                "INSERT INTO batches \
                     (batch_code, collected_at, source_name, gps_latitude, gps_longitude, note) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 RETURNING id, batch_code, collected_at, source_name, gps_latitude, \
                           gps_longitude, note",
                &[
                    &req.batch_code,
                    &req.collected_at,
                    &req.source_name,
                    &req.gps_latitude,
                    &req.gps_longitude,
                    &req.note,
                ],
            )
            .await?;
        Ok(batch_from_row(&row))
    }

    // ========================================================================
    // PARTNER OPERATIONS
    // ========================================================================

    pub async fn partner_list(&self) -> ApiResult<Vec<Partner>> {
        let conn = self.get_conn().await?;
        let rows = conn
            .query(
                "SELECT id, name, contact, address, note FROM partners ORDER BY name",
                &[],
            )
            .await?;
        Ok(rows.iter().map(partner_from_row).collect())
    }

    pub async fn partner_get(&self, id: RecordId) -> ApiResult<Option<Partner>> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_opt(
                "SELECT id, name, contact, address, note FROM partners WHERE id = $1",
                &[&id],
            )
            .await?;
        Ok(row.as_ref().map(partner_from_row))
    }

    pub async fn partner_create(&self, req: &CreatePartnerRequest) -> ApiResult<Partner> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_one(
                "INSERT INTO partners (name, contact, address, note) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING id, name, contact, address, note",
                &[&req.name, &req.contact, &req.address, &req.note],
            )
            .await?;
        Ok(partner_from_row(&row))
    }

    pub async fn partner_delete(&self, id: RecordId) -> ApiResult<bool> {
        let conn = self.get_conn().await?;
        let affected = conn
            .execute("DELETE FROM partners WHERE id = $1", &[&id])
            .await?;
        Ok(affected == 1)
    }

    // ========================================================================
    // LOGBOOK OPERATIONS
    // ========================================================================

    pub async fn log_list(&self) -> ApiResult<Vec<NurseryLog>> {
        let conn = self.get_conn().await?;
        let rows = conn
            .query(
                "SELECT id, log_date, activity, batch_id, zone_id, note \
                 FROM nursery_logs ORDER BY log_date DESC",
                &[],
            )
            .await?;
        Ok(rows.iter().map(log_from_row).collect())
    }

    pub async fn log_create(&self, req: &CreateLogRequest) -> ApiResult<NurseryLog> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_one(
                "INSERT INTO nursery_logs (log_date, activity, batch_id, zone_id, note) \
                 VALUES ($1, $2, $3, $4, $5) \
                 RETURNING id, log_date, activity, batch_id, zone_id, note",
                &[
                    &req.log_date,
                    &req.activity,
                    &req.batch_id,
                    &req.zone_id,
                    &req.note,
                ],
            )
            .await?;
        Ok(log_from_row(&row))
    }

    // ========================================================================
    // ZONE OPERATIONS (read-only reference data)
    // ========================================================================

    pub async fn zone_list(&self) -> ApiResult<Vec<Zone>> {
        let conn = self.get_conn().await?;
        let rows = conn
            .query(
                "SELECT id, zone_code FROM nursery_zones ORDER BY zone_code",
                &[],
            )
            .await?;
        Ok(rows.iter().map(zone_from_row).collect())
    }

    // ========================================================================
    // FULFILLMENT REQUEST OPERATIONS
    // ========================================================================

    pub async fn request_list(&self) -> ApiResult<Vec<SeedlingRequest>> {
        let conn = self.get_conn().await?;
        let rows = conn
            .query(
                "SELECT id, partner_id, request_date, note, status \
                 FROM seedling_requests ORDER BY request_date DESC",
                &[],
            )
            .await?;
        rows.iter().map(request_from_row).collect()
    }

    pub async fn request_get(&self, id: RecordId) -> ApiResult<Option<SeedlingRequest>> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_opt(
                "SELECT id, partner_id, request_date, note, status \
                 FROM seedling_requests WHERE id = $1",
                &[&id],
            )
            .await?;
        row.as_ref().map(request_from_row).transpose()
    }

    pub async fn request_insert(
        &self,
        partner_id: RecordId,
        request_date: Day,
        note: Option<&str>,
    ) -> ApiResult<SeedlingRequest> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_one(
                "INSERT INTO seedling_requests (partner_id, request_date, note, status) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING id, partner_id, request_date, note, status",
                &[
                    &partner_id,
                    &request_date,
                    &note,
                    &RequestStatus::Pending.as_str(),
                ],
            )
            .await?;
        request_from_row(&row)
    }

    pub async fn request_item_insert(
        &self,
        request_id: RecordId,
        seedling_id: RecordId,
        quantity: i64,
    ) -> ApiResult<RequestItem> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_one(
                "INSERT INTO seedling_request_items (request_id, seedling_id, quantity) \
                 VALUES ($1, $2, $3) \
                 RETURNING id, request_id, seedling_id, quantity",
                &[&request_id, &seedling_id, &quantity],
            )
            .await?;
        Ok(item_from_row(&row))
    }

    pub async fn request_items(&self, request_id: RecordId) -> ApiResult<Vec<RequestItem>> {
        let conn = self.get_conn().await?;
        let rows = conn
            .query(
                "SELECT id, request_id, seedling_id, quantity \
                 FROM seedling_request_items WHERE request_id = $1 ORDER BY id",
                &[&request_id],
            )
            .await?;
        Ok(rows.iter().map(item_from_row).collect())
    }

    pub async fn request_set_status(
        &self,
        id: RecordId,
        status: RequestStatus,
    ) -> ApiResult<SeedlingRequest> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_opt(
                "UPDATE seedling_requests SET status = $2 WHERE id = $1 \
                 RETURNING id, partner_id, request_date, note, status",
                &[&id, &status.as_str()],
            )
            .await?;
        match row {
            Some(row) => request_from_row(&row),
            None => Err(ApiError::request_not_found(id)),
        }
    }

    /// Delete a request and its items. Items go first so a request row
    /// never outlives deletion while still owning children; the store
    /// exposes no transactions, so the two statements are sequential.
    pub async fn request_delete(&self, id: RecordId) -> ApiResult<bool> {
        let conn = self.get_conn().await?;
        conn.execute(
            "DELETE FROM seedling_request_items WHERE request_id = $1",
            &[&id],
        )
        .await?;
        let affected = conn
            .execute("DELETE FROM seedling_requests WHERE id = $1", &[&id])
            .await?;
        Ok(affected == 1)
    }

    // ========================================================================
    // PROJECT STATUS OPERATIONS (single-row contract)
    // ========================================================================

    /// Read the single project_status row. Absence is an
    /// initialization error, not a default.
    pub async fn project_status_get(&self) -> ApiResult<ProjectStatus> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_opt(
                "SELECT id, current_stage FROM project_status WHERE id = 1",
                &[],
            )
            .await?;
        match row {
            Some(row) => project_status_from_row(&row),
            None => Err(ApiError::project_status_missing()),
        }
    }

    pub async fn project_status_update(
        &self,
        stage: sapling_core::Stage,
    ) -> ApiResult<ProjectStatus> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_opt(
                "UPDATE project_status SET current_stage = $1 WHERE id = 1 \
                 RETURNING id, current_stage",
                &[&stage.as_str()],
            )
            .await?;
        match row {
            Some(row) => project_status_from_row(&row),
            None => Err(ApiError::project_status_missing()),
        }
    }
}
