use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub status: AnnouncementStatus,
    pub image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementStatus {
    Draft,
    Published,
}

impl Announcement {
    /// The public visibility predicate: an announcement is live when it is
    /// published and has not expired at the given instant. Drafts are never
    /// live, whatever their dates say.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.status == AnnouncementStatus::Published
            && self.expires_at.map_or(true, |expires| expires > now)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAnnouncementRequest {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
    #[validate(length(max = 50, message = "category must be at most 50 characters"))]
    pub category: Option<String>,
    pub status: AnnouncementStatus,
    #[validate(
        url(message = "image_url must be a well-formed URL"),
        length(max = 2048, message = "image_url must be at most 2048 characters")
    )]
    pub image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update. Outer `None` means "leave unchanged"; for nullable fields
/// an explicit `null` in the body clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAnnouncementRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<Option<String>>,
    pub status: Option<AnnouncementStatus>,
    pub image_url: Option<Option<String>>,
    pub published_at: Option<Option<DateTime<Utc>>>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn announcement(status: AnnouncementStatus, expires_at: Option<DateTime<Utc>>) -> Announcement {
        let now = Utc::now();
        Announcement {
            id: 1,
            title: "Test".to_string(),
            content: "Body".to_string(),
            category: None,
            status,
            image_url: None,
            published_at: Some(now),
            expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn draft_is_never_live() {
        let now = Utc::now();
        let far_future = Some(now + Duration::days(365));
        assert!(!announcement(AnnouncementStatus::Draft, None).is_live(now));
        assert!(!announcement(AnnouncementStatus::Draft, far_future).is_live(now));
    }

    #[test]
    fn published_without_expiry_is_live() {
        let now = Utc::now();
        assert!(announcement(AnnouncementStatus::Published, None).is_live(now));
    }

    #[test]
    fn published_with_future_expiry_is_live() {
        let now = Utc::now();
        let a = announcement(AnnouncementStatus::Published, Some(now + Duration::hours(1)));
        assert!(a.is_live(now));
    }

    #[test]
    fn published_with_past_expiry_is_not_live() {
        let now = Utc::now();
        let a = announcement(AnnouncementStatus::Published, Some(now - Duration::seconds(1)));
        assert!(!a.is_live(now));
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let now = Utc::now();
        let a = announcement(AnnouncementStatus::Published, Some(now));
        assert!(!a.is_live(now));
    }
}
