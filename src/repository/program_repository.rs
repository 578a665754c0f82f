use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    domain::{
        ApplicationStatus, CreateProgramRequest, Program, ProgramApplication, ProgramStatus,
    },
    error::{AppError, Result},
    repository::ProgramRepository,
};

#[derive(FromRow)]
struct ProgramRow {
    id: i64,
    title: String,
    description: String,
    category: Option<String>,
    status: String,
    starts_on: Option<String>,
    ends_on: Option<String>,
    location: Option<String>,
    capacity: Option<i64>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(FromRow)]
struct ApplicationRow {
    id: i64,
    program_id: i64,
    farmer_id: i64,
    status: String,
    applied_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteProgramRepository {
    pool: SqlitePool,
}

impl SqliteProgramRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_program(row: ProgramRow) -> Result<Program> {
        Ok(Program {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            status: Self::parse_status(&row.status)?,
            starts_on: Self::parse_date(row.starts_on, "starts_on")?,
            ends_on: Self::parse_date(row.ends_on, "ends_on")?,
            location: row.location,
            capacity: row.capacity,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn row_to_application(row: ApplicationRow) -> Result<ProgramApplication> {
        Ok(ProgramApplication {
            id: row.id,
            program_id: row.program_id,
            farmer_id: row.farmer_id,
            status: Self::parse_application_status(&row.status)?,
            applied_at: DateTime::from_naive_utc_and_offset(row.applied_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn parse_date(value: Option<String>, field: &str) -> Result<Option<NaiveDate>> {
        value
            .map(|s| {
                NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                    .map_err(|e| AppError::Database(format!("Invalid {}: {}", field, e)))
            })
            .transpose()
    }

    fn parse_status(s: &str) -> Result<ProgramStatus> {
        match s {
            "upcoming" => Ok(ProgramStatus::Upcoming),
            "active" => Ok(ProgramStatus::Active),
            "closed" => Ok(ProgramStatus::Closed),
            _ => Err(AppError::Database(format!("Invalid program status: {}", s))),
        }
    }

    fn status_to_str(status: ProgramStatus) -> &'static str {
        match status {
            ProgramStatus::Upcoming => "upcoming",
            ProgramStatus::Active => "active",
            ProgramStatus::Closed => "closed",
        }
    }

    fn parse_application_status(s: &str) -> Result<ApplicationStatus> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            _ => Err(AppError::Database(format!("Invalid application status: {}", s))),
        }
    }

    fn application_status_to_str(status: ApplicationStatus) -> &'static str {
        match status {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

#[async_trait]
impl ProgramRepository for SqliteProgramRepository {
    async fn create(&self, request: CreateProgramRequest) -> Result<Program> {
        let status_str = Self::status_to_str(request.status);
        let starts_str = request.starts_on.map(|d| d.format("%Y-%m-%d").to_string());
        let ends_str = request.ends_on.map(|d| d.format("%Y-%m-%d").to_string());
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            INSERT INTO programs (
                title, description, category, status, starts_on, ends_on,
                location, capacity, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.category)
        .bind(status_str)
        .bind(&starts_str)
        .bind(&ends_str)
        .bind(&request.location)
        .bind(request.capacity)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created program".to_string()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Program>> {
        let row = sqlx::query_as::<_, ProgramRow>(
            r#"
            SELECT id, title, description, category, status, starts_on, ends_on,
                   location, capacity, created_at, updated_at
            FROM programs
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_program(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Program>> {
        let rows = sqlx::query_as::<_, ProgramRow>(
            r#"
            SELECT id, title, description, category, status, starts_on, ends_on,
                   location, capacity, created_at, updated_at
            FROM programs
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_program).collect()
    }

    async fn list_active(&self) -> Result<Vec<Program>> {
        let rows = sqlx::query_as::<_, ProgramRow>(
            r#"
            SELECT id, title, description, category, status, starts_on, ends_on,
                   location, capacity, created_at, updated_at
            FROM programs
            WHERE status = 'active'
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_program).collect()
    }

    async fn update(&self, id: i64, program: Program) -> Result<Program> {
        let status_str = Self::status_to_str(program.status);
        let starts_str = program.starts_on.map(|d| d.format("%Y-%m-%d").to_string());
        let ends_str = program.ends_on.map(|d| d.format("%Y-%m-%d").to_string());
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE programs
            SET title = ?, description = ?, category = ?, status = ?,
                starts_on = ?, ends_on = ?, location = ?, capacity = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&program.title)
        .bind(&program.description)
        .bind(&program.category)
        .bind(status_str)
        .bind(&starts_str)
        .bind(&ends_str)
        .bind(&program.location)
        .bind(program.capacity)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated program".to_string()))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM programs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn create_application(&self, program_id: i64, farmer_id: i64) -> Result<ProgramApplication> {
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            INSERT INTO program_applications (program_id, farmer_id, status, applied_at, updated_at)
            VALUES (?, ?, 'pending', ?, ?)
            "#,
        )
        .bind(program_id)
        .bind(farmer_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.find_application(program_id, id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created application".to_string()))
    }

    async fn find_application(
        &self,
        program_id: i64,
        application_id: i64,
    ) -> Result<Option<ProgramApplication>> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT id, program_id, farmer_id, status, applied_at, updated_at
            FROM program_applications
            WHERE id = ? AND program_id = ?
            "#,
        )
        .bind(application_id)
        .bind(program_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_application(r)?)),
            None => Ok(None),
        }
    }

    async fn list_applications(&self, program_id: i64) -> Result<Vec<ProgramApplication>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT id, program_id, farmer_id, status, applied_at, updated_at
            FROM program_applications
            WHERE program_id = ?
            ORDER BY applied_at ASC, id ASC
            "#,
        )
        .bind(program_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_application).collect()
    }

    async fn update_application_status(
        &self,
        application_id: i64,
        status: ApplicationStatus,
    ) -> Result<ProgramApplication> {
        let status_str = Self::application_status_to_str(status);
        let now = Utc::now().naive_utc();

        sqlx::query("UPDATE program_applications SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status_str)
            .bind(now)
            .bind(application_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT id, program_id, farmer_id, status, applied_at, updated_at
            FROM program_applications
            WHERE id = ?
            "#,
        )
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Self::row_to_application(r),
            None => Err(AppError::NotFound("Application not found".to_string())),
        }
    }
}
