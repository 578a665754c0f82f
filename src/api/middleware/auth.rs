use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    api::state::AppState,
    domain::{Farmer, FarmerRole},
    error::AppError,
    repository::FarmerRepository,
};

/// The authenticated caller, resolved from the session cookie and carried
/// through request extensions rather than any ambient state.
#[derive(Clone)]
pub struct CurrentFarmer {
    pub farmer: Farmer,
}

async fn resolve_farmer(state: &AppState, jar: &CookieJar) -> Result<Farmer, AppError> {
    let session_cookie = jar.get("session").ok_or(AppError::Unauthorized)?;

    let session = state
        .service_context
        .auth_service
        .validate_session(session_cookie.value())
        .await?
        .ok_or(AppError::Unauthorized)?;

    state
        .service_context
        .farmer_repo
        .find_by_id(session.farmer_id)
        .await?
        .ok_or(AppError::Unauthorized)
}

pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let farmer = resolve_farmer(&state, &jar).await?;

    request.extensions_mut().insert(CurrentFarmer { farmer });

    Ok(next.run(request).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let farmer = resolve_farmer(&state, &jar).await?;

    if farmer.role != FarmerRole::Admin {
        return Err(AppError::Forbidden);
    }

    request.extensions_mut().insert(CurrentFarmer { farmer });

    Ok(next.run(request).await)
}
