use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    api::{middleware::auth::CurrentFarmer, state::AppState},
    domain::{Farmer, FarmerRole, UpdateFarmerRequest},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct ListFarmersQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListFarmersQuery>,
) -> Result<Json<Vec<Farmer>>> {
    let limit = params.limit.unwrap_or(50).min(200);
    let offset = params.offset.unwrap_or(0);

    let farmers = state.service_context.farmer_repo.list(limit, offset).await?;

    Ok(Json(farmers))
}

fn check_admin_or_self(user: &CurrentFarmer, id: i64) -> Result<()> {
    if user.farmer.role != FarmerRole::Admin && user.farmer.id != id {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(user): Extension<CurrentFarmer>,
) -> Result<Json<Farmer>> {
    check_admin_or_self(&user, id)?;

    let farmer = state
        .service_context
        .farmer_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Farmer not found".to_string()))?;

    Ok(Json(farmer))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(user): Extension<CurrentFarmer>,
    Json(request): Json<UpdateFarmerRequest>,
) -> Result<Json<Farmer>> {
    check_admin_or_self(&user, id)?;

    let farmer = state.service_context.farmer_repo.update(id, request).await?;

    Ok(Json(farmer))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state
        .service_context
        .farmer_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Farmer not found".to_string()))?;

    state.service_context.farmer_repo.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
