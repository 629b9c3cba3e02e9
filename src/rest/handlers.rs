use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::SecondsFormat;
use serde::Serialize;

use crate::{
    sanitize::{parse_id, sanitize_email, sanitize_name},
    storage::{Record, Storage},
};

use super::{
    models::{
        AddParams, ApiFailure, ApiSuccess, CreatedResponse, DeleteParams, DeletedResponse,
        GetParams, HealthResponse, ListParams, RecordResponse, UpdateParams,
    },
    AppState,
};

fn accept<T: Serialize>(data: T) -> Response {
    Json(ApiSuccess {
        success: true,
        data,
    })
    .into_response()
}

fn reject(status: StatusCode) -> Response {
    (status, Json(ApiFailure { success: false })).into_response()
}

fn record_to_response(record: Record) -> RecordResponse {
    RecordResponse {
        id: record.id,
        name: record.name,
        email: record.email,
        created_at: record
            .created_at
            .to_rfc3339_opts(SecondsFormat::Micros, true),
        updated_at: record
            .updated_at
            .to_rfc3339_opts(SecondsFormat::Micros, true),
    }
}

pub async fn health<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            uptime_secs,
        }),
    )
}

pub async fn add_record<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Form(params): Form<AddParams>,
) -> impl IntoResponse {
    if !state.token.verify(params.nonce.as_deref()) {
        return reject(StatusCode::FORBIDDEN);
    }

    let name = match sanitize_name(params.name.as_deref().unwrap_or_default()) {
        Ok(name) => name,
        Err(err) => {
            log::warn!("Rejected record create, bad name: {}", err);
            return reject(StatusCode::BAD_REQUEST);
        }
    };
    let email = match sanitize_email(params.email.as_deref().unwrap_or_default()) {
        Ok(email) => email,
        Err(err) => {
            log::warn!("Rejected record create, bad email: {}", err);
            return reject(StatusCode::BAD_REQUEST);
        }
    };

    match state.storage.insert_record(&name, &email) {
        Ok(id) => accept(CreatedResponse {
            id,
            message: "record created".to_string(),
        }),
        Err(err) => {
            log::error!("Failed to insert record: {:?}", err);
            reject(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn list_records<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    if !state.token.verify(params.nonce.as_deref()) {
        return reject(StatusCode::FORBIDDEN);
    }

    match state.storage.list_records() {
        // An empty table stays an error envelope; existing clients key off
        // the failure to render their empty state.
        Ok(records) if records.is_empty() => reject(StatusCode::NOT_FOUND),
        Ok(records) => accept(
            records
                .into_iter()
                .map(record_to_response)
                .collect::<Vec<_>>(),
        ),
        Err(err) => {
            log::error!("Failed to list records: {:?}", err);
            reject(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn get_record<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<GetParams>,
) -> impl IntoResponse {
    if !state.token.verify(params.nonce.as_deref()) {
        return reject(StatusCode::FORBIDDEN);
    }

    let id = match parse_id(params.id.as_deref().unwrap_or_default()) {
        Ok(id) => id,
        Err(err) => {
            log::warn!("Rejected record read: {}", err);
            return reject(StatusCode::BAD_REQUEST);
        }
    };

    match state.storage.load_record(id) {
        Ok(Some(record)) => accept(record_to_response(record)),
        Ok(None) => reject(StatusCode::NOT_FOUND),
        Err(err) => {
            log::error!("Failed to load record {}: {:?}", id, err);
            reject(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn update_record<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Form(params): Form<UpdateParams>,
) -> impl IntoResponse {
    if !state.token.verify(params.nonce.as_deref()) {
        return reject(StatusCode::FORBIDDEN);
    }

    let id = match parse_id(params.id.as_deref().unwrap_or_default()) {
        Ok(id) => id,
        Err(err) => {
            log::warn!("Rejected record update: {}", err);
            return reject(StatusCode::BAD_REQUEST);
        }
    };

    // Unlike create, absent or unusable fields become empty strings here.
    // Legacy clients send partial forms and expect the write to go through.
    let name = match params.name.as_deref() {
        Some(raw) => sanitize_name(raw).unwrap_or_default(),
        None => String::new(),
    };
    let email = match params.email.as_deref() {
        Some(raw) => sanitize_email(raw).unwrap_or_default(),
        None => String::new(),
    };

    match state.storage.update_record(id, &name, &email) {
        Ok(Some(record)) => accept(record_to_response(record)),
        Ok(None) => reject(StatusCode::NOT_FOUND),
        Err(err) => {
            log::error!("Failed to update record {}: {:?}", id, err);
            reject(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn delete_record<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Form(params): Form<DeleteParams>,
) -> impl IntoResponse {
    if !state.token.verify(params.nonce.as_deref()) {
        return reject(StatusCode::FORBIDDEN);
    }

    let id = match parse_id(params.id.as_deref().unwrap_or_default()) {
        Ok(id) => id,
        Err(err) => {
            log::warn!("Rejected record delete: {}", err);
            return reject(StatusCode::BAD_REQUEST);
        }
    };

    match state.storage.delete_record(id) {
        Ok(deleted) => accept(DeletedResponse { deleted }),
        Err(err) => {
            log::error!("Failed to delete record {}: {:?}", id, err);
            reject(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn not_found() -> impl IntoResponse {
    reject(StatusCode::NOT_FOUND)
}
