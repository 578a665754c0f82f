pub mod announcement_service;
pub mod program_service;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::AuthService;
use crate::repository::*;
use announcement_service::AnnouncementService;
use program_service::ProgramService;

pub struct ServiceContext {
    pub farmer_repo: Arc<dyn FarmerRepository>,
    pub announcement_service: Arc<AnnouncementService>,
    pub program_service: Arc<ProgramService>,
    pub auth_service: Arc<AuthService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        farmer_repo: Arc<dyn FarmerRepository>,
        announcement_repo: Arc<dyn AnnouncementRepository>,
        program_repo: Arc<dyn ProgramRepository>,
        auth_service: Arc<AuthService>,
        db_pool: SqlitePool,
    ) -> Self {
        let announcement_service = Arc::new(AnnouncementService::new(announcement_repo));
        let program_service = Arc::new(ProgramService::new(program_repo));

        Self {
            farmer_repo,
            announcement_service,
            program_service,
            auth_service,
            db_pool,
        }
    }
}
