//! User listing and creation handlers.
//!
//! The listing speaks the `_page`/`_limit` query convention and reports the
//! unpaged total in `X-Total-Count`, which is what the roster client derives
//! its page math from.
use crate::api::error::{ApiError, api_validation_error, from_store_error};
use crate::app::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::AppendHeaders;
use roster_common::ids::UserId;
use roster_common::{Record, RecordDraft, validate};
use serde::Deserialize;

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(rename = "_page")]
    page: Option<u32>,
    #[serde(rename = "_limit")]
    limit: Option<u32>,
}

/// `GET /users?_page={n}&_limit={l}`: one page of rows as a bare JSON array,
/// total in the header. Page defaults to 1, limit to the configured page
/// size, capped at the configured maximum.
pub(crate) async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<(AppendHeaders<[(&'static str, String); 1]>, Json<Vec<Record>>), ApiError> {
    let page_number = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(state.default_page_limit)
        .clamp(1, state.max_page_limit);

    let page = state
        .store
        .page(page_number, limit)
        .await
        .map_err(from_store_error)?;
    metrics::counter!("userd_list_requests_total").increment(1);
    tracing::debug!(page_number, limit, total = page.total, "listed users");

    Ok((
        AppendHeaders([(TOTAL_COUNT_HEADER, page.total.to_string())]),
        Json(page.users),
    ))
}

/// `GET /users/{id}`: single row lookup.
pub(crate) async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<Record>, ApiError> {
    let record = state.store.get(&id).await.map_err(from_store_error)?;
    Ok(Json(record))
}

/// `POST /users`: validate the draft, synthesize the record server-side, and
/// insert it at the end of the listing order.
pub(crate) async fn create_user(
    State(state): State<AppState>,
    Json(draft): Json<RecordDraft>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    validate::validate_draft(&draft).map_err(api_validation_error)?;

    let record = Record::from_draft(&draft);
    let created = state
        .store
        .insert(record)
        .await
        .map_err(from_store_error)?;
    tracing::info!(id = %created.id, "created user");
    Ok((StatusCode::CREATED, Json(created)))
}
