//! Handlers for agencies and their embeddable service listings.

use axum::extract::{Path, Query, State};
use axum::Json;
use planform_core::api_keys::{generate_api_key, hash_api_key};
use planform_core::error::CoreError;
use planform_core::types::DbId;
use planform_db::models::agency::{AgencyPublic, AgencyService};
use planform_db::repositories::{AgencyRepo, AgencyServiceRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /services`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicesQuery {
    pub api_key: Option<String>,
}

/// Response for API key rotation. The plaintext key is shown only here.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotatedApiKey {
    pub api_key: String,
    pub prefix: String,
}

/// GET /api/agencies/{id}
///
/// Public branding only; key material is never part of the response.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<AgencyPublic>> {
    let agency = AgencyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Agency",
            id,
        }))?;
    Ok(Json(AgencyPublic::from(agency)))
}

/// GET /api/services?apiKey=...
///
/// Active services of the agency owning the key. An unknown key is a 404,
/// never an empty list.
pub async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<ServicesQuery>,
) -> AppResult<Json<DataResponse<Vec<AgencyService>>>> {
    let api_key = query
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("API key is required".into())))?;

    let agency = AgencyRepo::find_by_api_key_hash(&state.pool, &hash_api_key(api_key))
        .await?
        .ok_or_else(|| AppError::NotFound("No agency matches this API key".into()))?;

    let services = AgencyServiceRepo::list_active_by_agency(&state.pool, agency.id).await?;
    Ok(Json(DataResponse { data: services }))
}

/// POST /api/agencies/{id}/api-key
///
/// Issue a new API key for the agency. The previous key stops working.
pub async fn rotate_api_key(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<RotatedApiKey>> {
    let agency = AgencyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Agency",
            id,
        }))?;

    if agency.owner_user_id != Some(auth.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the agency owner can manage API keys".into(),
        )));
    }

    let key = generate_api_key();
    if !AgencyRepo::set_api_key(&state.pool, id, &key.hash, &key.prefix).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Agency",
            id,
        }));
    }

    tracing::info!(agency_id = id, prefix = %key.prefix, "Agency API key rotated");
    Ok(Json(RotatedApiKey {
        api_key: key.plaintext,
        prefix: key.prefix,
    }))
}
