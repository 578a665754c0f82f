use async_trait::async_trait;
use crate::domain::*;
use crate::error::Result;

pub mod announcement_repository;
pub mod farmer_repository;
pub mod program_repository;

pub use announcement_repository::SqliteAnnouncementRepository;
pub use farmer_repository::SqliteFarmerRepository;
pub use program_repository::SqliteProgramRepository;

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn create(&self, request: CreateAnnouncementRequest) -> Result<Announcement>;
    /// Lookup by id. Soft-deleted rows are invisible here, as everywhere.
    async fn find_by_id(&self, id: i64) -> Result<Option<Announcement>>;
    /// All non-deleted published announcements, newest publish date first,
    /// null publish dates last, ties in insertion order.
    async fn list_published(&self) -> Result<Vec<Announcement>>;
    async fn update(&self, id: i64, announcement: Announcement) -> Result<Announcement>;
    async fn soft_delete(&self, id: i64) -> Result<()>;
}

#[async_trait]
pub trait FarmerRepository: Send + Sync {
    async fn create(&self, request: RegisterFarmerRequest, password_hash: String) -> Result<Farmer>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Farmer>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Farmer>>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Farmer>>;
    async fn update(&self, id: i64, update: UpdateFarmerRequest) -> Result<Farmer>;
    async fn delete(&self, id: i64) -> Result<()>;
}

#[async_trait]
pub trait ProgramRepository: Send + Sync {
    async fn create(&self, request: CreateProgramRequest) -> Result<Program>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Program>>;
    async fn list(&self) -> Result<Vec<Program>>;
    async fn list_active(&self) -> Result<Vec<Program>>;
    async fn update(&self, id: i64, program: Program) -> Result<Program>;
    async fn delete(&self, id: i64) -> Result<()>;
    async fn create_application(&self, program_id: i64, farmer_id: i64) -> Result<ProgramApplication>;
    async fn find_application(&self, program_id: i64, application_id: i64) -> Result<Option<ProgramApplication>>;
    async fn list_applications(&self, program_id: i64) -> Result<Vec<ProgramApplication>>;
    async fn update_application_status(
        &self,
        application_id: i64,
        status: ApplicationStatus,
    ) -> Result<ProgramApplication>;
}
