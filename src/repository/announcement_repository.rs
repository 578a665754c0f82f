use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    domain::{Announcement, AnnouncementStatus, CreateAnnouncementRequest},
    error::{AppError, Result},
    repository::AnnouncementRepository,
};

#[derive(FromRow)]
struct AnnouncementRow {
    id: i64,
    title: String,
    content: String,
    category: Option<String>,
    status: String,
    image_url: Option<String>,
    published_at: Option<NaiveDateTime>,
    expires_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteAnnouncementRepository {
    pool: SqlitePool,
}

impl SqliteAnnouncementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_announcement(row: AnnouncementRow) -> Result<Announcement> {
        Ok(Announcement {
            id: row.id,
            title: row.title,
            content: row.content,
            category: row.category,
            status: Self::parse_status(&row.status)?,
            image_url: row.image_url,
            published_at: row.published_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            expires_at: row.expires_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn parse_status(s: &str) -> Result<AnnouncementStatus> {
        match s {
            "draft" => Ok(AnnouncementStatus::Draft),
            "published" => Ok(AnnouncementStatus::Published),
            _ => Err(AppError::Database(format!("Invalid announcement status: {}", s))),
        }
    }

    fn status_to_str(status: AnnouncementStatus) -> &'static str {
        match status {
            AnnouncementStatus::Draft => "draft",
            AnnouncementStatus::Published => "published",
        }
    }
}

#[async_trait]
impl AnnouncementRepository for SqliteAnnouncementRepository {
    async fn create(&self, request: CreateAnnouncementRequest) -> Result<Announcement> {
        let status_str = Self::status_to_str(request.status);
        let published_at_naive = request.published_at.map(|dt| dt.naive_utc());
        let expires_at_naive = request.expires_at.map(|dt| dt.naive_utc());
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            INSERT INTO announcements (
                title, content, category, status, image_url,
                published_at, expires_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.title)
        .bind(&request.content)
        .bind(&request.category)
        .bind(status_str)
        .bind(&request.image_url)
        .bind(published_at_naive)
        .bind(expires_at_naive)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created announcement".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Announcement>> {
        let row = sqlx::query_as::<_, AnnouncementRow>(
            r#"
            SELECT id, title, content, category, status, image_url,
                   published_at, expires_at, created_at, updated_at
            FROM announcements
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_announcement(r)?)),
            None => Ok(None),
        }
    }

    async fn list_published(&self) -> Result<Vec<Announcement>> {
        // Null publish dates sort as oldest; id ascending keeps ties in
        // insertion order.
        let rows = sqlx::query_as::<_, AnnouncementRow>(
            r#"
            SELECT id, title, content, category, status, image_url,
                   published_at, expires_at, created_at, updated_at
            FROM announcements
            WHERE status = 'published' AND deleted_at IS NULL
            ORDER BY published_at IS NULL ASC, published_at DESC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_announcement).collect()
    }

    async fn update(&self, id: i64, announcement: Announcement) -> Result<Announcement> {
        let status_str = Self::status_to_str(announcement.status);
        let published_at_naive = announcement.published_at.map(|dt| dt.naive_utc());
        let expires_at_naive = announcement.expires_at.map(|dt| dt.naive_utc());
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE announcements
            SET title = ?, content = ?, category = ?, status = ?,
                image_url = ?, published_at = ?, expires_at = ?,
                updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(&announcement.title)
        .bind(&announcement.content)
        .bind(&announcement.category)
        .bind(status_str)
        .bind(&announcement.image_url)
        .bind(published_at_naive)
        .bind(expires_at_naive)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated announcement".to_string())
        })
    }

    async fn soft_delete(&self, id: i64) -> Result<()> {
        let now = Utc::now().naive_utc();
        sqlx::query(
            "UPDATE announcements SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
