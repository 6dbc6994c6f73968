//! Agency and agency service models.

use planform_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `agencies` table.
///
/// `api_key_hash` is never serialized; external output goes through
/// [`AgencyPublic`].
#[derive(Debug, Clone, FromRow)]
pub struct Agency {
    pub id: DbId,
    pub owner_user_id: Option<DbId>,
    pub name: String,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub website_url: Option<String>,
    pub contact_email: Option<String>,
    pub api_key_hash: Option<String>,
    pub api_key_prefix: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Branding fields safe to expose to dashboards and embedding partner sites.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyPublic {
    pub id: DbId,
    pub name: String,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub website_url: Option<String>,
    pub contact_email: Option<String>,
}

impl From<Agency> for AgencyPublic {
    fn from(agency: Agency) -> Self {
        Self {
            id: agency.id,
            name: agency.name,
            logo_url: agency.logo_url,
            primary_color: agency.primary_color,
            secondary_color: agency.secondary_color,
            website_url: agency.website_url,
            contact_email: agency.contact_email,
        }
    }
}

/// DTO for creating an agency.
#[derive(Debug, Clone, Default)]
pub struct CreateAgency {
    pub owner_user_id: Option<DbId>,
    pub name: String,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub website_url: Option<String>,
    pub contact_email: Option<String>,
}

/// A row from the `agency_services` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyService {
    pub id: DbId,
    pub agency_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an agency service.
#[derive(Debug, Clone)]
pub struct CreateAgencyService {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub is_active: bool,
    pub sort_order: i32,
}
