use std::sync::Arc;

use agrihub::{
    api,
    auth::AuthService,
    config::Settings,
    domain::{AnnouncementStatus, CreateAnnouncementRequest},
    repository::{
        AnnouncementRepository, SqliteAnnouncementRepository, SqliteFarmerRepository,
        SqliteProgramRepository,
    },
    service::ServiceContext,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

async fn test_app() -> anyhow::Result<(Router, SqlitePool)> {
    let pool = SqlitePool::connect(":memory:").await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let auth_service = Arc::new(AuthService::new(pool.clone()));
    let farmer_repo = Arc::new(SqliteFarmerRepository::new(pool.clone()));
    let announcement_repo = Arc::new(SqliteAnnouncementRepository::new(pool.clone()));
    let program_repo = Arc::new(SqliteProgramRepository::new(pool.clone()));

    let service_context = Arc::new(ServiceContext::new(
        farmer_repo,
        announcement_repo,
        program_repo,
        auth_service,
        pool.clone(),
    ));

    let app = api::create_app(service_context, Arc::new(Settings::default()));

    Ok((app, pool))
}

async fn body_json(response: axum::response::Response) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Register a farmer and log in, returning the session cookie value.
async fn login_session(app: &Router) -> anyhow::Result<String> {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            json!({
                "first_name": "Juan",
                "last_name": "Dela Cruz",
                "email": "juan@example.com",
                "password": "password123"
            }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({
                "email": "juan@example.com",
                "password": "password123"
            }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()?
        .to_string();

    // "session=<token>; Path=/; ..." -> "session=<token>"
    let cookie = set_cookie
        .split(';')
        .next()
        .expect("cookie value")
        .to_string();

    Ok(cookie)
}

#[tokio::test]
async fn test_public_listing_applies_visibility_filter() -> anyhow::Result<()> {
    let (app, pool) = test_app().await?;
    let repo = SqliteAnnouncementRepository::new(pool);

    let now = Utc::now();

    repo.create(CreateAnnouncementRequest {
        title: "Draft".to_string(),
        content: "Body".to_string(),
        category: None,
        status: AnnouncementStatus::Draft,
        image_url: None,
        published_at: Some(now),
        expires_at: None,
    })
    .await?;
    repo.create(CreateAnnouncementRequest {
        title: "Expired".to_string(),
        content: "Body".to_string(),
        category: None,
        status: AnnouncementStatus::Published,
        image_url: None,
        published_at: Some(now - Duration::hours(2)),
        expires_at: Some(now - Duration::hours(1)),
    })
    .await?;
    repo.create(CreateAnnouncementRequest {
        title: "Live".to_string(),
        content: "Body".to_string(),
        category: None,
        status: AnnouncementStatus::Published,
        image_url: None,
        published_at: Some(now),
        expires_at: None,
    })
    .await?;

    let response = app
        .clone()
        .oneshot(Request::get("/api/announcements").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    let items = body.as_array().expect("array body");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Live");
    assert_eq!(items[0]["status"], "published");

    Ok(())
}

#[tokio::test]
async fn test_get_by_id_skips_visibility_filter() -> anyhow::Result<()> {
    let (app, pool) = test_app().await?;
    let repo = SqliteAnnouncementRepository::new(pool);

    let draft = repo
        .create(CreateAnnouncementRequest {
            title: "Draft".to_string(),
            content: "Body".to_string(),
            category: None,
            status: AnnouncementStatus::Draft,
            image_url: None,
            published_at: None,
            expires_at: None,
        })
        .await?;

    let response = app
        .clone()
        .oneshot(Request::get(format!("/api/announcements/{}", draft.id)).body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    assert_eq!(body["status"], "draft");

    let response = app
        .clone()
        .oneshot(Request::get("/api/announcements/9999").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_write_paths_require_auth() -> anyhow::Result<()> {
    let (app, _pool) = test_app().await?;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/announcements",
            json!({
                "title": "T",
                "content": "C",
                "status": "draft"
            }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_create_update_delete_roundtrip() -> anyhow::Result<()> {
    let (app, _pool) = test_app().await?;
    let cookie = login_session(&app).await?;

    let mut request = json_request(
        "POST",
        "/api/announcements",
        json!({
            "title": "Road repair advisory",
            "content": "Farm-to-market road closed next week.",
            "category": "Advisory",
            "status": "published",
            "published_at": Utc::now().to_rfc3339()
        }),
    );
    request.headers_mut().insert(header::COOKIE, cookie.parse()?);
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await?;
    let id = created["id"].as_i64().expect("id");
    assert_eq!(created["category"], "Advisory");

    // Partial update flips it back to draft.
    let mut request = json_request(
        "PUT",
        &format!("/api/announcements/{}", id),
        json!({ "status": "draft" }),
    );
    request.headers_mut().insert(header::COOKIE, cookie.parse()?);
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await?;
    assert_eq!(updated["status"], "draft");
    assert_eq!(updated["title"], "Road repair advisory");

    // Drafts disappear from the public listing.
    let response = app
        .clone()
        .oneshot(Request::get("/api/announcements").body(Body::empty())?)
        .await?;
    let body = body_json(response).await?;
    assert_eq!(body.as_array().unwrap().len(), 0);

    // Soft delete, then the record is gone from by-id reads too.
    let mut request = Request::delete(format!("/api/announcements/{}", id)).body(Body::empty())?;
    request.headers_mut().insert(header::COOKIE, cookie.parse()?);
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(Request::get(format!("/api/announcements/{}", id)).body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_validation_failure_names_fields() -> anyhow::Result<()> {
    let (app, _pool) = test_app().await?;
    let cookie = login_session(&app).await?;

    let now = Utc::now();
    let mut request = json_request(
        "POST",
        "/api/announcements",
        json!({
            "title": "Bad dates",
            "content": "Body",
            "status": "published",
            "published_at": now.to_rfc3339(),
            "expires_at": (now - Duration::hours(1)).to_rfc3339()
        }),
    );
    request.headers_mut().insert(header::COOKIE, cookie.parse()?);
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await?;
    assert!(body["fields"]["expires_at"].is_array());

    let mut request = json_request(
        "POST",
        "/api/announcements",
        json!({
            "title": "",
            "content": "Body",
            "status": "draft",
            "image_url": "not a url"
        }),
    );
    request.headers_mut().insert(header::COOKIE, cookie.parse()?);
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await?;
    assert!(body["fields"]["title"].is_array());
    assert!(body["fields"]["image_url"].is_array());

    Ok(())
}

#[tokio::test]
async fn test_admin_routes_reject_plain_farmers() -> anyhow::Result<()> {
    let (app, _pool) = test_app().await?;
    let cookie = login_session(&app).await?;

    let mut request = Request::get("/api/farmers").body(Body::empty())?;
    request.headers_mut().insert(header::COOKIE, cookie.parse()?);
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let mut request = json_request(
        "POST",
        "/api/programs",
        json!({
            "title": "P",
            "description": "D",
            "status": "active"
        }),
    );
    request.headers_mut().insert(header::COOKIE, cookie.parse()?);
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn test_me_returns_current_farmer() -> anyhow::Result<()> {
    let (app, _pool) = test_app().await?;
    let cookie = login_session(&app).await?;

    let mut request = Request::get("/auth/me").body(Body::empty())?;
    request.headers_mut().insert(header::COOKIE, cookie.parse()?);
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    assert_eq!(body["email"], "juan@example.com");
    assert_eq!(body["role"], "farmer");
    assert!(body.get("password_hash").is_none());

    // Logged out sessions stop working.
    let mut request = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .body(Body::empty())?;
    request.headers_mut().insert(header::COOKIE, cookie.parse()?);
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let mut request = Request::get("/auth/me").body(Body::empty())?;
    request.headers_mut().insert(header::COOKIE, cookie.parse()?);
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
