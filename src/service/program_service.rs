use std::sync::Arc;

use validator::Validate;

use crate::{
    domain::{
        ApplicationStatus, CreateProgramRequest, Program, ProgramApplication, ProgramStatus,
        UpdateProgramRequest,
    },
    error::{AppError, Result},
    repository::ProgramRepository,
};

pub struct ProgramService {
    repo: Arc<dyn ProgramRepository>,
}

impl ProgramService {
    pub fn new(repo: Arc<dyn ProgramRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Program>> {
        self.repo.list().await
    }

    pub async fn list_active(&self) -> Result<Vec<Program>> {
        self.repo.list_active().await
    }

    pub async fn get(&self, id: i64) -> Result<Program> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Program not found".to_string()))
    }

    pub async fn create(&self, request: CreateProgramRequest) -> Result<Program> {
        request.validate()?;
        check_schedule(&request.starts_on, &request.ends_on)?;

        self.repo.create(request).await
    }

    pub async fn update(&self, id: i64, request: UpdateProgramRequest) -> Result<Program> {
        let mut program = self.get(id).await?;

        if let Some(title) = request.title {
            program.title = title;
        }
        if let Some(description) = request.description {
            program.description = description;
        }
        if let Some(category) = request.category {
            program.category = category;
        }
        if let Some(status) = request.status {
            program.status = status;
        }
        if let Some(starts_on) = request.starts_on {
            program.starts_on = starts_on;
        }
        if let Some(ends_on) = request.ends_on {
            program.ends_on = ends_on;
        }
        if let Some(location) = request.location {
            program.location = location;
        }
        if let Some(capacity) = request.capacity {
            program.capacity = capacity;
        }

        let merged = CreateProgramRequest {
            title: program.title.clone(),
            description: program.description.clone(),
            category: program.category.clone(),
            status: program.status,
            starts_on: program.starts_on,
            ends_on: program.ends_on,
            location: program.location.clone(),
            capacity: program.capacity,
        };
        merged.validate()?;
        check_schedule(&program.starts_on, &program.ends_on)?;

        self.repo.update(id, program).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.get(id).await?;
        self.repo.delete(id).await
    }

    /// Apply the given farmer to a program. Only active programs accept
    /// applications; one application per farmer per program.
    pub async fn apply(&self, program_id: i64, farmer_id: i64) -> Result<ProgramApplication> {
        let program = self.get(program_id).await?;

        if program.status != ProgramStatus::Active {
            return Err(AppError::validation_field(
                "program_id",
                "not_active",
                "program is not open for applications",
            ));
        }

        self.repo
            .create_application(program_id, farmer_id)
            .await
            .map_err(|e| match e {
                AppError::Database(msg) if msg.contains("UNIQUE") => {
                    AppError::Conflict("Already applied to this program".to_string())
                }
                other => other,
            })
    }

    pub async fn list_applications(&self, program_id: i64) -> Result<Vec<ProgramApplication>> {
        self.get(program_id).await?;
        self.repo.list_applications(program_id).await
    }

    pub async fn update_application(
        &self,
        program_id: i64,
        application_id: i64,
        status: ApplicationStatus,
    ) -> Result<ProgramApplication> {
        self.repo
            .find_application(program_id, application_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

        self.repo.update_application_status(application_id, status).await
    }
}

/// A program may not end before it starts.
fn check_schedule(
    starts_on: &Option<chrono::NaiveDate>,
    ends_on: &Option<chrono::NaiveDate>,
) -> Result<()> {
    if let (Some(start), Some(end)) = (starts_on, ends_on) {
        if end < start {
            return Err(AppError::validation_field(
                "ends_on",
                "after_or_equal",
                "ends_on must not be before starts_on",
            ));
        }
    }
    Ok(())
}
