use std::sync::Arc;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    domain::{Announcement, CreateAnnouncementRequest, UpdateAnnouncementRequest},
    error::{AppError, Result},
    repository::AnnouncementRepository,
};

pub struct AnnouncementService {
    repo: Arc<dyn AnnouncementRepository>,
}

impl AnnouncementService {
    pub fn new(repo: Arc<dyn AnnouncementRepository>) -> Self {
        Self { repo }
    }

    /// Public listing: published, unexpired at `now`, newest publish date
    /// first. An optional category match and limit apply after the filter.
    pub async fn list_visible(
        &self,
        now: DateTime<Utc>,
        category: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Announcement>> {
        let mut announcements = self.repo.list_published().await?;
        announcements.retain(|a| a.is_live(now));

        if let Some(category) = category {
            announcements.retain(|a| a.category.as_deref() == Some(category));
        }

        if let Some(limit) = limit {
            announcements.truncate(limit);
        }

        Ok(announcements)
    }

    /// Lookup by id; no visibility filter, so drafts and expired records are
    /// reachable. Soft-deleted records are not.
    pub async fn get(&self, id: i64) -> Result<Announcement> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))
    }

    pub async fn create(&self, request: CreateAnnouncementRequest) -> Result<Announcement> {
        request.validate()?;
        check_date_order(request.published_at, request.expires_at)?;

        self.repo.create(request).await
    }

    /// Partial update. The merged record is validated, not the payload in
    /// isolation: updating only `published_at` can still trip the date
    /// ordering check against a stored `expires_at`.
    pub async fn update(&self, id: i64, request: UpdateAnnouncementRequest) -> Result<Announcement> {
        let mut announcement = self.get(id).await?;

        if let Some(title) = request.title {
            announcement.title = title;
        }
        if let Some(content) = request.content {
            announcement.content = content;
        }
        if let Some(category) = request.category {
            announcement.category = category;
        }
        if let Some(status) = request.status {
            announcement.status = status;
        }
        if let Some(image_url) = request.image_url {
            announcement.image_url = image_url;
        }
        if let Some(published_at) = request.published_at {
            announcement.published_at = published_at;
        }
        if let Some(expires_at) = request.expires_at {
            announcement.expires_at = expires_at;
        }

        // Re-run the field rules over the merged state.
        let merged = CreateAnnouncementRequest {
            title: announcement.title.clone(),
            content: announcement.content.clone(),
            category: announcement.category.clone(),
            status: announcement.status,
            image_url: announcement.image_url.clone(),
            published_at: announcement.published_at,
            expires_at: announcement.expires_at,
        };
        merged.validate()?;
        check_date_order(announcement.published_at, announcement.expires_at)?;

        self.repo.update(id, announcement).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        // 404 before delete so a repeated delete is not silently a no-op.
        self.get(id).await?;
        self.repo.soft_delete(id).await
    }
}

/// `expires_at` must be strictly after `published_at` when both are set.
fn check_date_order(
    published_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
) -> Result<()> {
    if let (Some(published), Some(expires)) = (published_at, expires_at) {
        if expires <= published {
            return Err(AppError::validation_field(
                "expires_at",
                "after",
                "expires_at must be strictly after published_at",
            ));
        }
    }
    Ok(())
}
