//! Operator endpoints over all players.
//!
//! Unauthenticated: the service is meant for a trusted prototype network.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    routing::{get, post},
    Json, Router,
};

use chipledger_core::{parse_integer, Username};
use chipledger_wallet::validate_balance;

use crate::app::dto::{
    self, BalanceResponse, DeleteUserRequest, OkResponse, QueryPairs, SetBalanceRequest,
    UserDetailResponse, UsersResponse,
};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::extract::LenientJson;

pub fn router() -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/user-detail", get(user_detail))
        .route("/set-balance", post(set_balance))
        .route("/delete-user", post(delete_user))
}

/// GET /api/admin/users - every player with their balance
pub async fn list_users(Extension(services): Extension<Arc<AppServices>>) -> Json<UsersResponse> {
    Json(UsersResponse {
        ok: true,
        users: services.ledger().list_players(),
    })
}

/// GET /api/admin/user-detail?username= - balance plus full history
pub async fn user_detail(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<QueryPairs>,
) -> Result<Json<UserDetailResponse>, ApiError> {
    let username = dto::query_username(&query)?;

    Ok(Json(UserDetailResponse {
        ok: true,
        detail: services.ledger().player_detail(&username),
    }))
}

/// POST /api/admin/set-balance - override a balance, recording the delta
pub async fn set_balance(
    Extension(services): Extension<Arc<AppServices>>,
    LenientJson(body): LenientJson<SetBalanceRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let username = Username::from_value(body.username.as_ref())?;
    let balance = validate_balance(parse_integer(body.balance.as_ref()))?;
    let note = dto::text_field(body.note.as_ref());

    let balance = services.ledger().set_balance(&username, balance, note)?;
    Ok(Json(BalanceResponse::new(balance)))
}

/// POST /api/admin/delete-user - remove a player (absent players are fine)
pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    LenientJson(body): LenientJson<DeleteUserRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let username = Username::from_value(body.username.as_ref())?;
    services.ledger().delete_player(&username);
    Ok(Json(OkResponse::new()))
}
