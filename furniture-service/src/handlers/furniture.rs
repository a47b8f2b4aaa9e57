use crate::models::{
    FurnitureInput, FurnitureQuery, FurnitureRecord, RecordId, FURNITURE_COLLECTION,
};
use crate::services::Filter;
use crate::startup::AppState;
use crate::utils::{item_not_found, ItemPath, QueryParams, ValidatedJson};
use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use service_core::error::AppError;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: RecordId,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// An id that cannot name any document is reported the same as an absent one.
fn parse_id(raw: &str) -> Result<RecordId, AppError> {
    raw.parse().map_err(|e| {
        tracing::debug!(error = %e, "Rejected furniture id");
        item_not_found()
    })
}

/// Writes fail fast when no database handle exists.
fn ensure_connected(state: &AppState) -> Result<(), AppError> {
    if state.store.is_connected() {
        Ok(())
    } else {
        Err(AppError::StoreUnavailable)
    }
}

#[tracing::instrument(skip_all)]
pub async fn create_furniture(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<FurnitureInput>,
) -> Result<Json<CreatedResponse>, AppError> {
    let document = input.to_insert_document(Utc::now())?;
    let id = state.store.insert(FURNITURE_COLLECTION, document).await?;

    tracing::info!(furniture_id = %id, "Furniture created");
    Ok(Json(CreatedResponse { id }))
}

#[tracing::instrument(skip(state))]
pub async fn list_furniture(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<FurnitureQuery>,
) -> Result<Json<Vec<FurnitureRecord>>, AppError> {
    let documents = state
        .store
        .find(FURNITURE_COLLECTION, &query.to_filter(), None)
        .await?;

    let records = documents
        .into_iter()
        .map(FurnitureRecord::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(records))
}

#[tracing::instrument(skip(state))]
pub async fn get_furniture(
    State(state): State<AppState>,
    ItemPath(item_id): ItemPath,
) -> Result<Json<FurnitureRecord>, AppError> {
    let id = parse_id(&item_id)?;

    let document = state
        .store
        .find(FURNITURE_COLLECTION, &Filter::by_id(id), Some(1))
        .await?
        .into_iter()
        .next()
        .ok_or_else(item_not_found)?;

    Ok(Json(FurnitureRecord::try_from(document)?))
}

#[tracing::instrument(skip_all, fields(item_id = %item_id))]
pub async fn update_furniture(
    State(state): State<AppState>,
    ItemPath(item_id): ItemPath,
    ValidatedJson(input): ValidatedJson<FurnitureInput>,
) -> Result<Json<StatusResponse>, AppError> {
    ensure_connected(&state)?;
    let id = parse_id(&item_id)?;

    let set = input.to_update_document(Utc::now())?;
    state
        .store
        .update_one(FURNITURE_COLLECTION, &Filter::by_id(id), set)
        .await?
        .ok_or_else(item_not_found)?;

    tracing::info!(furniture_id = %id, "Furniture updated");
    Ok(Json(StatusResponse { status: "ok" }))
}

#[tracing::instrument(skip(state))]
pub async fn delete_furniture(
    State(state): State<AppState>,
    ItemPath(item_id): ItemPath,
) -> Result<Json<StatusResponse>, AppError> {
    ensure_connected(&state)?;
    let id = parse_id(&item_id)?;

    let deleted = state
        .store
        .delete_one(FURNITURE_COLLECTION, &Filter::by_id(id))
        .await?;
    if deleted == 0 {
        return Err(item_not_found());
    }

    tracing::info!(furniture_id = %id, "Furniture deleted");
    Ok(Json(StatusResponse { status: "deleted" }))
}
