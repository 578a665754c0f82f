use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    api::state::AppState,
    domain::{Announcement, CreateAnnouncementRequest, UpdateAnnouncementRequest},
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct ListAnnouncementsQuery {
    pub category: Option<String>,
    pub limit: Option<usize>,
}

/// Public listing. Only published, unexpired announcements appear, newest
/// publish date first.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListAnnouncementsQuery>,
) -> Result<Json<Vec<Announcement>>> {
    let announcements = state
        .service_context
        .announcement_service
        .list_visible(Utc::now(), params.category.as_deref(), params.limit)
        .await?;

    Ok(Json(announcements))
}

/// Direct lookup by id. No visibility filter: drafts and expired records
/// are reachable here, soft-deleted ones are not.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Announcement>> {
    let announcement = state.service_context.announcement_service.get(id).await?;

    Ok(Json(announcement))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<Announcement>)> {
    let announcement = state
        .service_context
        .announcement_service
        .create(request)
        .await?;

    Ok((StatusCode::CREATED, Json(announcement)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateAnnouncementRequest>,
) -> Result<Json<Announcement>> {
    let announcement = state
        .service_context
        .announcement_service
        .update(id, request)
        .await?;

    Ok(Json(announcement))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.service_context.announcement_service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
