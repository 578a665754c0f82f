use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    domain::{Farmer, FarmerRole, PreferredContact, RegisterFarmerRequest, UpdateFarmerRequest},
    error::{AppError, Result},
    repository::FarmerRepository,
};

#[derive(FromRow)]
struct FarmerRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: Option<String>,
    date_of_birth: Option<String>,
    gender: Option<String>,
    farm_address: Option<String>,
    farm_size: Option<String>,
    farm_type: Option<String>,
    crops_grown: String,
    farming_experience: Option<String>,
    organization_member: i32,
    organization_name: Option<String>,
    preferred_contact: String,
    role: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteFarmerRepository {
    pool: SqlitePool,
}

impl SqliteFarmerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_farmer(row: FarmerRow) -> Result<Farmer> {
        let date_of_birth = row
            .date_of_birth
            .map(|s| {
                NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                    .map_err(|e| AppError::Database(format!("Invalid date_of_birth: {}", e)))
            })
            .transpose()?;

        let crops_grown: Vec<String> = serde_json::from_str(&row.crops_grown)
            .map_err(|e| AppError::Database(format!("Invalid crops_grown: {}", e)))?;

        Ok(Farmer {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone_number: row.phone_number,
            date_of_birth,
            gender: row.gender,
            farm_address: row.farm_address,
            farm_size: row.farm_size,
            farm_type: row.farm_type,
            crops_grown,
            farming_experience: row.farming_experience,
            organization_member: row.organization_member != 0,
            organization_name: row.organization_name,
            preferred_contact: Self::parse_preferred_contact(&row.preferred_contact)?,
            role: Self::parse_role(&row.role)?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn parse_role(s: &str) -> Result<FarmerRole> {
        match s {
            "farmer" => Ok(FarmerRole::Farmer),
            "admin" => Ok(FarmerRole::Admin),
            _ => Err(AppError::Database(format!("Invalid farmer role: {}", s))),
        }
    }

    fn role_to_str(role: FarmerRole) -> &'static str {
        match role {
            FarmerRole::Farmer => "farmer",
            FarmerRole::Admin => "admin",
        }
    }

    fn parse_preferred_contact(s: &str) -> Result<PreferredContact> {
        match s {
            "email" => Ok(PreferredContact::Email),
            "phone" => Ok(PreferredContact::Phone),
            "sms" => Ok(PreferredContact::Sms),
            _ => Err(AppError::Database(format!("Invalid preferred contact: {}", s))),
        }
    }

    fn preferred_contact_to_str(contact: PreferredContact) -> &'static str {
        match contact {
            PreferredContact::Email => "email",
            PreferredContact::Phone => "phone",
            PreferredContact::Sms => "sms",
        }
    }

    fn crops_to_json(crops: &[String]) -> Result<String> {
        serde_json::to_string(crops)
            .map_err(|e| AppError::Internal(format!("Failed to encode crops_grown: {}", e)))
    }

    const SELECT_COLUMNS: &'static str = r#"
        SELECT id, first_name, last_name, email, phone_number, date_of_birth,
               gender, farm_address, farm_size, farm_type, crops_grown,
               farming_experience, organization_member, organization_name,
               preferred_contact, role, created_at, updated_at
        FROM farmers
    "#;
}

#[async_trait]
impl FarmerRepository for SqliteFarmerRepository {
    async fn create(&self, request: RegisterFarmerRequest, password_hash: String) -> Result<Farmer> {
        let crops_json = Self::crops_to_json(&request.crops_grown)?;
        let dob_str = request.date_of_birth.map(|d| d.format("%Y-%m-%d").to_string());
        let contact_str = Self::preferred_contact_to_str(request.preferred_contact);
        let org_member_int = if request.organization_member { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            INSERT INTO farmers (
                first_name, last_name, email, password_hash, phone_number,
                date_of_birth, gender, farm_address, farm_size, farm_type,
                crops_grown, farming_experience, organization_member,
                organization_name, preferred_contact, role, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'farmer', ?, ?)
            "#,
        )
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(&password_hash)
        .bind(&request.phone_number)
        .bind(&dob_str)
        .bind(&request.gender)
        .bind(&request.farm_address)
        .bind(&request.farm_size)
        .bind(&request.farm_type)
        .bind(&crops_json)
        .bind(&request.farming_experience)
        .bind(org_member_int)
        .bind(&request.organization_name)
        .bind(contact_str)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created farmer".to_string()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Farmer>> {
        let query = format!("{} WHERE id = ?", Self::SELECT_COLUMNS);
        let row = sqlx::query_as::<_, FarmerRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_farmer(r)?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Farmer>> {
        let query = format!("{} WHERE email = ?", Self::SELECT_COLUMNS);
        let row = sqlx::query_as::<_, FarmerRow>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_farmer(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Farmer>> {
        let query = format!("{} ORDER BY created_at DESC LIMIT ? OFFSET ?", Self::SELECT_COLUMNS);
        let rows = sqlx::query_as::<_, FarmerRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_farmer).collect()
    }

    async fn update(&self, id: i64, update: UpdateFarmerRequest) -> Result<Farmer> {
        let mut farmer = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Farmer not found".to_string()))?;

        if let Some(first_name) = update.first_name {
            farmer.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            farmer.last_name = last_name;
        }
        if let Some(phone_number) = update.phone_number {
            farmer.phone_number = phone_number;
        }
        if let Some(date_of_birth) = update.date_of_birth {
            farmer.date_of_birth = date_of_birth;
        }
        if let Some(gender) = update.gender {
            farmer.gender = gender;
        }
        if let Some(farm_address) = update.farm_address {
            farmer.farm_address = farm_address;
        }
        if let Some(farm_size) = update.farm_size {
            farmer.farm_size = farm_size;
        }
        if let Some(farm_type) = update.farm_type {
            farmer.farm_type = farm_type;
        }
        if let Some(crops_grown) = update.crops_grown {
            farmer.crops_grown = crops_grown;
        }
        if let Some(farming_experience) = update.farming_experience {
            farmer.farming_experience = farming_experience;
        }
        if let Some(organization_member) = update.organization_member {
            farmer.organization_member = organization_member;
        }
        if let Some(organization_name) = update.organization_name {
            farmer.organization_name = organization_name;
        }
        if let Some(preferred_contact) = update.preferred_contact {
            farmer.preferred_contact = preferred_contact;
        }

        let crops_json = Self::crops_to_json(&farmer.crops_grown)?;
        let dob_str = farmer.date_of_birth.map(|d| d.format("%Y-%m-%d").to_string());
        let contact_str = Self::preferred_contact_to_str(farmer.preferred_contact);
        let org_member_int = if farmer.organization_member { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE farmers
            SET first_name = ?, last_name = ?, phone_number = ?,
                date_of_birth = ?, gender = ?, farm_address = ?,
                farm_size = ?, farm_type = ?, crops_grown = ?,
                farming_experience = ?, organization_member = ?,
                organization_name = ?, preferred_contact = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&farmer.first_name)
        .bind(&farmer.last_name)
        .bind(&farmer.phone_number)
        .bind(&dob_str)
        .bind(&farmer.gender)
        .bind(&farmer.farm_address)
        .bind(&farmer.farm_size)
        .bind(&farmer.farm_type)
        .bind(&crops_json)
        .bind(&farmer.farming_experience)
        .bind(org_member_int)
        .bind(&farmer.organization_name)
        .bind(contact_str)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated farmer".to_string()))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM farmers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
