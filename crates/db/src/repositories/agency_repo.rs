//! Repositories for the `agencies` and `agency_services` tables.

use planform_core::types::DbId;
use sqlx::PgPool;

use crate::models::agency::{Agency, AgencyService, CreateAgency, CreateAgencyService};

const AGENCY_COLUMNS: &str = "id, owner_user_id, name, logo_url, primary_color, secondary_color, \
                               website_url, contact_email, api_key_hash, api_key_prefix, \
                               created_at, updated_at";

const SERVICE_COLUMNS: &str = "id, agency_id, name, description, price_cents, is_active, \
                                sort_order, created_at, updated_at";

/// Provides operations for agencies.
pub struct AgencyRepo;

impl AgencyRepo {
    /// Insert a new agency (without an API key), returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAgency) -> Result<Agency, sqlx::Error> {
        let query = format!(
            "INSERT INTO agencies
                (owner_user_id, name, logo_url, primary_color, secondary_color,
                 website_url, contact_email)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {AGENCY_COLUMNS}"
        );
        sqlx::query_as::<_, Agency>(&query)
            .bind(input.owner_user_id)
            .bind(&input.name)
            .bind(&input.logo_url)
            .bind(&input.primary_color)
            .bind(&input.secondary_color)
            .bind(&input.website_url)
            .bind(&input.contact_email)
            .fetch_one(pool)
            .await
    }

    /// Find an agency by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Agency>, sqlx::Error> {
        let query = format!("SELECT {AGENCY_COLUMNS} FROM agencies WHERE id = $1");
        sqlx::query_as::<_, Agency>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the agency whose API key hashes to `key_hash`.
    pub async fn find_by_api_key_hash(
        pool: &PgPool,
        key_hash: &str,
    ) -> Result<Option<Agency>, sqlx::Error> {
        let query = format!("SELECT {AGENCY_COLUMNS} FROM agencies WHERE api_key_hash = $1");
        sqlx::query_as::<_, Agency>(&query)
            .bind(key_hash)
            .fetch_optional(pool)
            .await
    }

    /// Replace an agency's API key. The previous key stops working immediately.
    ///
    /// Returns `true` if the row was updated.
    pub async fn set_api_key(
        pool: &PgPool,
        id: DbId,
        key_hash: &str,
        key_prefix: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE agencies SET api_key_hash = $2, api_key_prefix = $3 WHERE id = $1")
                .bind(id)
                .bind(key_hash)
                .bind(key_prefix)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Provides operations for the services an agency offers.
pub struct AgencyServiceRepo;

impl AgencyServiceRepo {
    /// Insert a service for an agency.
    pub async fn create(
        pool: &PgPool,
        agency_id: DbId,
        input: &CreateAgencyService,
    ) -> Result<AgencyService, sqlx::Error> {
        let query = format!(
            "INSERT INTO agency_services
                (agency_id, name, description, price_cents, is_active, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {SERVICE_COLUMNS}"
        );
        sqlx::query_as::<_, AgencyService>(&query)
            .bind(agency_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price_cents)
            .bind(input.is_active)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    /// List an agency's active services in display order.
    pub async fn list_active_by_agency(
        pool: &PgPool,
        agency_id: DbId,
    ) -> Result<Vec<AgencyService>, sqlx::Error> {
        let query = format!(
            "SELECT {SERVICE_COLUMNS} FROM agency_services
             WHERE agency_id = $1 AND is_active = true
             ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, AgencyService>(&query)
            .bind(agency_id)
            .fetch_all(pool)
            .await
    }
}
