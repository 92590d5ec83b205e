//! Game-driven balance movements: wagers and winnings.

use std::sync::Arc;

use axum::{extract::Extension, routing::post, Json, Router};

use chipledger_core::{parse_integer, GameName, Username};
use chipledger_wallet::WagerKind;

use crate::app::dto::{self, BalanceResponse, WagerRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::extract::LenientJson;

pub fn router() -> Router {
    Router::new()
        .route("/charge", post(charge))
        .route("/payout", post(payout))
}

/// POST /api/game/charge - take a wager
pub async fn charge(
    Extension(services): Extension<Arc<AppServices>>,
    LenientJson(body): LenientJson<WagerRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    wager(&services, body, WagerKind::Charge)
}

/// POST /api/game/payout - credit winnings
pub async fn payout(
    Extension(services): Extension<Arc<AppServices>>,
    LenientJson(body): LenientJson<WagerRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    wager(&services, body, WagerKind::Payout)
}

fn wager(
    services: &AppServices,
    body: WagerRequest,
    kind: WagerKind,
) -> Result<Json<BalanceResponse>, ApiError> {
    // Order matters: username, then game, then amount.
    let username = Username::from_value(body.username.as_ref())?;
    let game = GameName::from_value(body.game.as_ref())?;
    let amount = kind.validate_amount(parse_integer(body.amount.as_ref()))?;
    let desc = dto::text_field(body.desc.as_ref());

    let ledger = services.ledger();
    let balance = match kind {
        WagerKind::Charge => ledger.charge(&username, &game, amount, desc)?,
        WagerKind::Payout => ledger.payout(&username, &game, amount, desc)?,
    };

    Ok(Json(BalanceResponse::new(balance)))
}
