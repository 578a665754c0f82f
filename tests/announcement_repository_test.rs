use agrihub::{
    domain::{AnnouncementStatus, CreateAnnouncementRequest, UpdateAnnouncementRequest},
    repository::{AnnouncementRepository, SqliteAnnouncementRepository},
    service::announcement_service::AnnouncementService,
};
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

async fn setup() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePool::connect(":memory:").await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

fn request(
    title: &str,
    status: AnnouncementStatus,
    published_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
) -> CreateAnnouncementRequest {
    CreateAnnouncementRequest {
        title: title.to_string(),
        content: "Body".to_string(),
        category: None,
        status,
        image_url: None,
        published_at,
        expires_at,
    }
}

#[tokio::test]
async fn test_announcement_crud() -> anyhow::Result<()> {
    let pool = setup().await?;
    let repo = SqliteAnnouncementRepository::new(pool.clone());

    let now = Utc::now();
    let created = repo
        .create(request("First", AnnouncementStatus::Draft, Some(now), None))
        .await?;
    assert_eq!(created.title, "First");
    assert_eq!(created.status, AnnouncementStatus::Draft);

    let found = repo.find_by_id(created.id).await?;
    assert!(found.is_some());
    assert_eq!(found.unwrap().id, created.id);

    let mut updated = created.clone();
    updated.status = AnnouncementStatus::Published;
    updated.title = "First (published)".to_string();
    let updated = repo.update(created.id, updated).await?;
    assert_eq!(updated.status, AnnouncementStatus::Published);
    assert_eq!(updated.title, "First (published)");

    repo.soft_delete(created.id).await?;
    let deleted = repo.find_by_id(created.id).await?;
    assert!(deleted.is_none());

    Ok(())
}

#[tokio::test]
async fn test_listing_excludes_drafts_and_expired() -> anyhow::Result<()> {
    let pool = setup().await?;
    let repo = Arc::new(SqliteAnnouncementRepository::new(pool.clone()));
    let service = AnnouncementService::new(repo.clone());

    let now = Utc::now();

    repo.create(request("Draft", AnnouncementStatus::Draft, Some(now), None))
        .await?;
    repo.create(request(
        "Expired",
        AnnouncementStatus::Published,
        Some(now - Duration::hours(2)),
        Some(now - Duration::hours(1)),
    ))
    .await?;
    let live = repo
        .create(request("Live", AnnouncementStatus::Published, Some(now), None))
        .await?;
    let future_expiry = repo
        .create(request(
            "Live with expiry",
            AnnouncementStatus::Published,
            Some(now - Duration::hours(1)),
            Some(now + Duration::hours(1)),
        ))
        .await?;

    let visible = service.list_visible(now, None, None).await?;
    let ids: Vec<i64> = visible.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![live.id, future_expiry.id]);

    Ok(())
}

#[tokio::test]
async fn test_listing_order_is_publish_date_desc_nulls_last() -> anyhow::Result<()> {
    let pool = setup().await?;
    let repo = Arc::new(SqliteAnnouncementRepository::new(pool.clone()));
    let service = AnnouncementService::new(repo.clone());

    let now = Utc::now();
    let t0 = now - Duration::hours(3);

    let older = repo
        .create(request("Older", AnnouncementStatus::Published, Some(t0), None))
        .await?;
    let newer = repo
        .create(request(
            "Newer",
            AnnouncementStatus::Published,
            Some(now - Duration::hours(1)),
            None,
        ))
        .await?;
    // Same publish time as `older`: ties keep insertion order.
    let tied = repo
        .create(request("Tied", AnnouncementStatus::Published, Some(t0), None))
        .await?;
    // No publish date at all sorts as oldest.
    let unscheduled = repo
        .create(request("Unscheduled", AnnouncementStatus::Published, None, None))
        .await?;

    let visible = service.list_visible(now, None, None).await?;
    let ids: Vec<i64> = visible.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![newer.id, older.id, tied.id, unscheduled.id]);

    Ok(())
}

#[tokio::test]
async fn test_category_and_limit_filters() -> anyhow::Result<()> {
    let pool = setup().await?;
    let repo = Arc::new(SqliteAnnouncementRepository::new(pool.clone()));
    let service = AnnouncementService::new(repo.clone());

    let now = Utc::now();
    for (title, category) in [
        ("A", Some("Workshop")),
        ("B", Some("Guide")),
        ("C", Some("Workshop")),
    ] {
        let mut req = request(title, AnnouncementStatus::Published, Some(now), None);
        req.category = category.map(String::from);
        repo.create(req).await?;
    }

    let workshops = service.list_visible(now, Some("Workshop"), None).await?;
    assert_eq!(workshops.len(), 2);
    assert!(workshops.iter().all(|a| a.category.as_deref() == Some("Workshop")));

    let limited = service.list_visible(now, None, Some(1)).await?;
    assert_eq!(limited.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_create_rejects_expiry_before_publish() -> anyhow::Result<()> {
    let pool = setup().await?;
    let repo = Arc::new(SqliteAnnouncementRepository::new(pool.clone()));
    let service = AnnouncementService::new(repo);

    let now = Utc::now();
    let result = service
        .create(request(
            "Bad dates",
            AnnouncementStatus::Published,
            Some(now),
            Some(now - Duration::seconds(1)),
        ))
        .await;

    match result {
        Err(agrihub::error::AppError::Validation(errors)) => {
            assert!(errors.field_errors().contains_key("expires_at"));
        }
        other => panic!("expected validation error, got {:?}", other.map(|a| a.id)),
    }

    Ok(())
}

#[tokio::test]
async fn test_update_validates_merged_record() -> anyhow::Result<()> {
    let pool = setup().await?;
    let repo = Arc::new(SqliteAnnouncementRepository::new(pool.clone()));
    let service = AnnouncementService::new(repo);

    let now = Utc::now();
    let created = service
        .create(request(
            "Scheduled",
            AnnouncementStatus::Published,
            Some(now),
            Some(now + Duration::days(1)),
        ))
        .await?;

    // Pushing published_at past the stored expires_at must fail even though
    // the request itself carries only one of the two fields.
    let result = service
        .update(
            created.id,
            UpdateAnnouncementRequest {
                published_at: Some(Some(now + Duration::days(2))),
                ..Default::default()
            },
        )
        .await;
    assert!(result.is_err());

    // A consistent update goes through.
    let updated = service
        .update(
            created.id,
            UpdateAnnouncementRequest {
                expires_at: Some(Some(now + Duration::days(3))),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(
        updated.expires_at.map(|dt| dt.timestamp()),
        Some((now + Duration::days(3)).timestamp())
    );

    Ok(())
}

#[tokio::test]
async fn test_soft_delete_hides_from_listing_and_lookup() -> anyhow::Result<()> {
    let pool = setup().await?;
    let repo = Arc::new(SqliteAnnouncementRepository::new(pool.clone()));
    let service = AnnouncementService::new(repo.clone());

    let now = Utc::now();
    let keep = repo
        .create(request("Keep", AnnouncementStatus::Published, Some(now), None))
        .await?;
    let remove = repo
        .create(request("Remove", AnnouncementStatus::Published, Some(now), None))
        .await?;

    service.delete(remove.id).await?;

    let visible = service.list_visible(now, None, None).await?;
    let ids: Vec<i64> = visible.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![keep.id]);

    assert!(service.get(remove.id).await.is_err());

    // Deleting again reports not-found rather than silently succeeding.
    assert!(service.delete(remove.id).await.is_err());

    // Ids keep advancing past the deleted row.
    let next = repo
        .create(request("Next", AnnouncementStatus::Published, Some(now), None))
        .await?;
    assert!(next.id > remove.id);

    Ok(())
}

#[tokio::test]
async fn test_publish_then_expire_scenario() -> anyhow::Result<()> {
    let pool = setup().await?;
    let repo = Arc::new(SqliteAnnouncementRepository::new(pool.clone()));
    let service = AnnouncementService::new(repo);

    let t0 = Utc::now();

    let created = service
        .create(request("A", AnnouncementStatus::Published, Some(t0), None))
        .await?;

    // Visible one second after publication.
    let visible = service.list_visible(t0 + Duration::seconds(1), None, None).await?;
    assert_eq!(visible.len(), 1);

    // Expire it at T0+1s; at T0+2s it is gone.
    service
        .update(
            created.id,
            UpdateAnnouncementRequest {
                expires_at: Some(Some(t0 + Duration::seconds(1))),
                ..Default::default()
            },
        )
        .await?;

    let visible = service.list_visible(t0 + Duration::seconds(2), None, None).await?;
    assert!(visible.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_draft_absent_from_listing_but_fetchable() -> anyhow::Result<()> {
    let pool = setup().await?;
    let repo = Arc::new(SqliteAnnouncementRepository::new(pool.clone()));
    let service = AnnouncementService::new(repo);

    let now = Utc::now();
    let draft = service
        .create(request("Draft", AnnouncementStatus::Draft, Some(now), None))
        .await?;

    let visible = service.list_visible(now + Duration::days(365), None, None).await?;
    assert!(visible.is_empty());

    let fetched = service.get(draft.id).await?;
    assert_eq!(fetched.id, draft.id);
    assert_eq!(fetched.status, AnnouncementStatus::Draft);

    Ok(())
}
