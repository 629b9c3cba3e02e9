use serde::{Deserialize, Serialize};

// Wire envelope: `{"success": true, "data": ...}` or `{"success": false}`.
// The boolean shape is what existing clients parse; error kinds are only
// distinguished by HTTP status.

#[derive(Serialize, Deserialize)]
pub struct ApiSuccess<T> {
    pub success: bool,
    pub data: T,
}

#[derive(Serialize, Deserialize)]
pub struct ApiFailure {
    pub success: bool,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    pub id: u64,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub deleted: bool,
}

// Request parameters arrive as key-value strings from the query string or
// an urlencoded body; everything is optional at the wire level and checked
// by the handlers.

#[derive(Deserialize)]
pub struct AddParams {
    pub name: Option<String>,
    pub email: Option<String>,
    pub nonce: Option<String>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub nonce: Option<String>,
}

#[derive(Deserialize)]
pub struct GetParams {
    pub id: Option<String>,
    pub nonce: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateParams {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub nonce: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteParams {
    pub id: Option<String>,
    pub nonce: Option<String>,
}
