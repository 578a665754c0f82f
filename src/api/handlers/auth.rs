use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use validator::Validate;

use crate::{
    api::{middleware::auth::CurrentFarmer, state::AppState},
    auth,
    domain::{Farmer, RegisterFarmerRequest},
    error::{AppError, Result},
};

#[derive(Debug, serde::Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterFarmerRequest>,
) -> Result<(StatusCode, Json<Farmer>)> {
    request.validate()?;

    let password_hash = auth::AuthService::hash_password(&request.password).await?;

    let farmer = state
        .service_context
        .farmer_repo
        .create(request, password_hash)
        .await
        .map_err(|e| match e {
            AppError::Database(msg) if msg.contains("UNIQUE") => {
                AppError::Conflict("Email already registered".to_string())
            }
            other => other,
        })?;

    Ok((StatusCode::CREATED, Json(farmer)))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    // Get password hash from database
    let password_hash = auth::get_password_hash(&state.service_context.db_pool, &req.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    // Verify password
    if !auth::AuthService::verify_password(&req.password, &password_hash).await? {
        return Err(AppError::Unauthorized);
    }

    let farmer = state
        .service_context
        .farmer_repo
        .find_by_email(&req.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let (_session, token) = state
        .service_context
        .auth_service
        .create_session(farmer.id, state.settings.auth.session_duration_hours)
        .await?;

    let cookie = state
        .service_context
        .auth_service
        .create_session_cookie(&token, state.settings.auth.secure_cookies);

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            message: "Login successful".to_string(),
        }),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode)> {
    if let Some(session_cookie) = jar.get("session") {
        // Invalidate session in database
        let _ = state
            .service_context
            .auth_service
            .invalidate_session(session_cookie.value())
            .await;
    }

    // Remove cookie
    let jar = jar.add(auth::AuthService::create_logout_cookie());

    Ok((jar, StatusCode::NO_CONTENT))
}

pub async fn me(Extension(user): Extension<CurrentFarmer>) -> Result<Json<Farmer>> {
    Ok(Json(user.farmer))
}
