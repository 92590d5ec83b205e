//! Player-facing balance endpoints.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    Json,
};

use chipledger_core::{parse_integer, Username};
use chipledger_wallet::validate_balance;

use crate::app::dto::{self, OkResponse, ProfileResponse, QueryPairs, SaveProfileRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::extract::LenientJson;

/// GET /api/profile?username= - current balance (creates the player on first sight)
pub async fn get_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<QueryPairs>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let username = dto::query_username(&query)?;
    let balance = services.ledger().profile(&username);

    Ok(Json(ProfileResponse {
        ok: true,
        username,
        balance,
    }))
}

/// POST /api/profile/save - overwrite the balance from a client session
pub async fn save_profile(
    Extension(services): Extension<Arc<AppServices>>,
    LenientJson(body): LenientJson<SaveProfileRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let username = Username::from_value(body.username.as_ref())?;
    let balance = validate_balance(parse_integer(body.balance.as_ref()))?;

    services.ledger().save_session(&username, balance)?;
    Ok(Json(OkResponse::new()))
}
