use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::{
    api::{middleware::auth::CurrentFarmer, state::AppState},
    domain::{
        CreateProgramRequest, Program, ProgramApplication, UpdateApplicationRequest,
        UpdateProgramRequest,
    },
    error::Result,
};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Program>>> {
    let programs = state.service_context.program_service.list().await?;

    Ok(Json(programs))
}

pub async fn list_active(State(state): State<AppState>) -> Result<Json<Vec<Program>>> {
    let programs = state.service_context.program_service.list_active().await?;

    Ok(Json(programs))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Program>> {
    let program = state.service_context.program_service.get(id).await?;

    Ok(Json(program))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateProgramRequest>,
) -> Result<(StatusCode, Json<Program>)> {
    let program = state.service_context.program_service.create(request).await?;

    Ok((StatusCode::CREATED, Json(program)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateProgramRequest>,
) -> Result<Json<Program>> {
    let program = state.service_context.program_service.update(id, request).await?;

    Ok(Json(program))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.service_context.program_service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Apply the logged-in farmer to a program.
pub async fn apply(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(user): Extension<CurrentFarmer>,
) -> Result<(StatusCode, Json<ProgramApplication>)> {
    let application = state
        .service_context
        .program_service
        .apply(id, user.farmer.id)
        .await?;

    Ok((StatusCode::CREATED, Json(application)))
}

pub async fn list_applications(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ProgramApplication>>> {
    let applications = state
        .service_context
        .program_service
        .list_applications(id)
        .await?;

    Ok(Json(applications))
}

pub async fn update_application(
    State(state): State<AppState>,
    Path((id, application_id)): Path<(i64, i64)>,
    Json(request): Json<UpdateApplicationRequest>,
) -> Result<Json<ProgramApplication>> {
    let application = state
        .service_context
        .program_service
        .update_application(id, application_id, request.status)
        .await?;

    Ok(Json(application))
}
