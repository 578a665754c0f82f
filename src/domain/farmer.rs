use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A registered farmer account. The password hash never leaves the
/// repository layer, so it is not part of the domain struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Farmer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub farm_address: Option<String>,
    pub farm_size: Option<String>,
    pub farm_type: Option<String>,
    pub crops_grown: Vec<String>,
    pub farming_experience: Option<String>,
    pub organization_member: bool,
    pub organization_name: Option<String>,
    pub preferred_contact: PreferredContact,
    pub role: FarmerRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FarmerRole {
    Farmer,
    Admin,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PreferredContact {
    #[default]
    Email,
    Phone,
    Sms,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterFarmerRequest {
    #[validate(length(min = 1, max = 100, message = "first_name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "last_name must be 1-100 characters"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(max = 30, message = "phone_number must be at most 30 characters"))]
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 20, message = "gender must be at most 20 characters"))]
    pub gender: Option<String>,
    #[validate(length(max = 255, message = "farm_address must be at most 255 characters"))]
    pub farm_address: Option<String>,
    #[validate(length(max = 50, message = "farm_size must be at most 50 characters"))]
    pub farm_size: Option<String>,
    #[validate(length(max = 50, message = "farm_type must be at most 50 characters"))]
    pub farm_type: Option<String>,
    #[serde(default)]
    pub crops_grown: Vec<String>,
    #[validate(length(max = 50, message = "farming_experience must be at most 50 characters"))]
    pub farming_experience: Option<String>,
    #[serde(default)]
    pub organization_member: bool,
    #[validate(length(max = 255, message = "organization_name must be at most 255 characters"))]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub preferred_contact: PreferredContact,
}

/// Partial profile update. Role changes are deliberately excluded; promoting
/// an account to admin is an operational task done directly on the database.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFarmerRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<Option<String>>,
    pub date_of_birth: Option<Option<NaiveDate>>,
    pub gender: Option<Option<String>>,
    pub farm_address: Option<Option<String>>,
    pub farm_size: Option<Option<String>>,
    pub farm_type: Option<Option<String>>,
    pub crops_grown: Option<Vec<String>>,
    pub farming_experience: Option<Option<String>>,
    pub organization_member: Option<bool>,
    pub organization_name: Option<Option<String>>,
    pub preferred_contact: Option<PreferredContact>,
}
