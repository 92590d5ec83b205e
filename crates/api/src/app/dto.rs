use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use chipledger_core::{DomainError, Username};
use chipledger_infra::PlayerDetail;
use chipledger_wallet::PlayerSummary;

// -------------------------
// Request DTOs
// -------------------------
//
// Fields stay raw JSON so validation can report the precise domain error
// (a numeric username is INVALID_USERNAME, not a deserialization failure).
// A present `null` is kept as `Some(Value::Null)`; absent fields are `None`.

fn keep_null<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(d).map(Some)
}

/// Raw query pairs. Reading the query as pairs never fails, so a repeated
/// `username` reaches validation instead of being rejected by the extractor.
pub type QueryPairs = Vec<(String, String)>;

/// The single `username` query parameter; absent or repeated is invalid.
pub fn query_username(pairs: &[(String, String)]) -> Result<Username, DomainError> {
    let mut values = pairs.iter().filter(|(k, _)| k == "username").map(|(_, v)| v);
    match (values.next(), values.next()) {
        (Some(v), None) => Username::parse(v),
        _ => Err(DomainError::InvalidUsername),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SaveProfileRequest {
    #[serde(default, deserialize_with = "keep_null")]
    pub username: Option<Value>,
    #[serde(default, deserialize_with = "keep_null")]
    pub balance: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WagerRequest {
    #[serde(default, deserialize_with = "keep_null")]
    pub username: Option<Value>,
    #[serde(default, deserialize_with = "keep_null")]
    pub game: Option<Value>,
    #[serde(default, deserialize_with = "keep_null")]
    pub amount: Option<Value>,
    #[serde(default, deserialize_with = "keep_null")]
    pub desc: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SetBalanceRequest {
    #[serde(default, deserialize_with = "keep_null")]
    pub username: Option<Value>,
    #[serde(default, deserialize_with = "keep_null")]
    pub balance: Option<Value>,
    #[serde(default, deserialize_with = "keep_null")]
    pub note: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteUserRequest {
    #[serde(default, deserialize_with = "keep_null")]
    pub username: Option<Value>,
}

/// String content of an optional text field; anything else reads as `""`.
pub fn text_field(value: Option<&Value>) -> &str {
    match value {
        Some(Value::String(s)) => s,
        _ => "",
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn new() -> Self {
        Self { ok: true }
    }
}

impl Default for OkResponse {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub ok: bool,
    pub balance: i64,
}

impl BalanceResponse {
    pub fn new(balance: i64) -> Self {
        Self { ok: true, balance }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub ok: bool,
    pub username: Username,
    pub balance: i64,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub ok: bool,
    pub users: Vec<PlayerSummary>,
}

#[derive(Debug, Serialize)]
pub struct UserDetailResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub detail: PlayerDetail,
}
