//! Handlers shared by every resource family.
//!
//! Each handler is generic over a repository and is mounted once per
//! resource in [`crate::build_router`]. Request bodies, path keys and query
//! filters are validated by the extractors before a connection is acquired,
//! so a rejected request never touches the pool.

use axum::{extract::State, http::StatusCode, Json};
use tracing::Instrument;

use crate::{
    errors::{AppError, Result},
    extractors::{ValidatedJson, ValidatedPath, ValidatedQuery},
    repository::{CreateRepository, DeleteRepository, ListRepository, UpdateRepository},
    state::AppState,
};

fn record_operation(resource: &'static str, operation: &'static str) {
    metrics::counter!(
        "resource_operations_total",
        "resource" => resource,
        "operation" => operation
    )
    .increment(1);
}

pub async fn list<R: ListRepository>(
    State(state): State<AppState>,
    ValidatedQuery(filter): ValidatedQuery<R::Filter>,
) -> Result<Json<Vec<R::Record>>> {
    let span = tracing::info_span!("list", resource = R::RESOURCE);

    async move {
        let mut conn = state.db.acquire().await?;
        let records = R::list(&mut *conn, &filter).await?;

        tracing::debug!(?filter, count = records.len(), "Listed rows");
        record_operation(R::RESOURCE, "list");

        Ok(Json(records))
    }
    .instrument(span)
    .await
}

pub async fn create<R: CreateRepository>(
    State(state): State<AppState>,
    ValidatedJson(draft): ValidatedJson<R::Draft>,
) -> Result<(StatusCode, Json<R::Record>)> {
    let span = tracing::info_span!("create", resource = R::RESOURCE);

    async move {
        let mut conn = state.db.acquire().await?;
        let record = R::create(&mut *conn, &draft).await?;

        tracing::info!("Row created");
        record_operation(R::RESOURCE, "create");

        Ok((StatusCode::CREATED, Json(record)))
    }
    .instrument(span)
    .await
}

pub async fn update<R: UpdateRepository>(
    State(state): State<AppState>,
    ValidatedPath(key): ValidatedPath<R::Key>,
    ValidatedJson(draft): ValidatedJson<R::Draft>,
) -> Result<Json<R::Record>> {
    let span = tracing::info_span!("update", resource = R::RESOURCE, %key);

    async move {
        let mut conn = state.db.acquire().await?;
        let record = R::update(&mut *conn, &key, &draft)
            .await?
            .ok_or_else(|| {
                tracing::debug!("No row matched the key");
                AppError::not_found(R::RESOURCE, &key)
            })?;

        tracing::info!("Row updated");
        record_operation(R::RESOURCE, "update");

        Ok(Json(record))
    }
    .instrument(span)
    .await
}

/// Idempotent: a key with no row still answers 204.
pub async fn remove<R: DeleteRepository>(
    State(state): State<AppState>,
    ValidatedPath(key): ValidatedPath<R::Key>,
) -> Result<StatusCode> {
    let span = tracing::info_span!("delete", resource = R::RESOURCE, %key);

    async move {
        let mut conn = state.db.acquire().await?;
        let removed = R::delete(&mut *conn, &key).await?;

        tracing::info!(removed, "Delete executed");
        record_operation(R::RESOURCE, "delete");

        Ok(StatusCode::NO_CONTENT)
    }
    .instrument(span)
    .await
}
