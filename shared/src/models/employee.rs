//! Employees, job positions and access roles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::listing::{Searchable, SortKey, SortValue, Sortable};
use crate::types::{Id, Language};

/// A salon employee. The password is write-only and never deserialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Id,
    pub username: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    pub position: Position,
    pub role: Role,
    pub status: EmployeeStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Job title inside the salon, independent of the access role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    Admin,
    Manager,
    Trainee,
    Hairdresser,
    Stylist,
    Colorist,
    MakeupArtist,
    Masseur,
    NailTechnician,
    Cosmetologist,
    Receptionist,
    Cleaner,
}

impl Position {
    pub const ALL: [Position; 12] = [
        Position::Admin,
        Position::Manager,
        Position::Trainee,
        Position::Hairdresser,
        Position::Stylist,
        Position::Colorist,
        Position::MakeupArtist,
        Position::Masseur,
        Position::NailTechnician,
        Position::Cosmetologist,
        Position::Receptionist,
        Position::Cleaner,
    ];

    pub fn label(&self, lang: Language) -> &'static str {
        match self {
            Position::Admin => lang.pick("Адміністратор", "Administrator"),
            Position::Manager => lang.pick("Менеджер", "Manager"),
            Position::Trainee => lang.pick("Стажер", "Trainee"),
            Position::Hairdresser => lang.pick("Перукар", "Hairdresser"),
            Position::Stylist => lang.pick("Стиліст", "Stylist"),
            Position::Colorist => lang.pick("Колорист", "Colorist"),
            Position::MakeupArtist => lang.pick("Візажист", "Makeup artist"),
            Position::Masseur => lang.pick("Масажист", "Masseur"),
            Position::NailTechnician => lang.pick("Майстер манікюру", "Nail technician"),
            Position::Cosmetologist => lang.pick("Косметолог", "Cosmetologist"),
            Position::Receptionist => lang.pick("Секретар", "Receptionist"),
            Position::Cleaner => lang.pick("Прибиральник", "Cleaner"),
        }
    }
}

/// Access-control role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    pub fn label(&self, lang: Language) -> &'static str {
        match self {
            Role::Admin => lang.pick("Адміністратор", "Administrator"),
            Role::Employee => lang.pick("Робітник", "Employee"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeStatus {
    Active,
    Inactive,
    Deleted,
}

impl EmployeeStatus {
    pub fn label(&self, lang: Language) -> &'static str {
        match self {
            EmployeeStatus::Active => lang.pick("Активний", "Active"),
            EmployeeStatus::Inactive => lang.pick("Тимчасово неактивний", "Temporarily inactive"),
            EmployeeStatus::Deleted => lang.pick("Видалений", "Deleted"),
        }
    }
}

/// Lightweight projection for selection controls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeBrief {
    pub id: Id,
    pub full_name: String,
    pub position: Position,
    pub status: EmployeeStatus,
}

/// Payload for hiring a new employee
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    #[validate(length(min = 1, code = "required"))]
    pub username: String,
    #[validate(length(min = 1, code = "required"))]
    pub full_name: String,
    #[validate(email(code = "email"))]
    pub email: String,
    #[validate(length(min = 6, code = "too_short"))]
    pub password: String,
    #[validate(length(min = 1, code = "required"))]
    pub phone_number: String,
    pub position: Position,
    pub role: Role,
}

/// Contact details an employee can edit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfileUpdate {
    #[validate(length(min = 1, code = "required"))]
    pub username: String,
    #[validate(length(min = 1, code = "required"))]
    pub full_name: String,
    #[validate(email(code = "email"))]
    pub email: String,
    #[validate(length(min = 1, code = "required"))]
    pub phone_number: String,
}

/// Admin-only change of position, role and status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeAccessUpdate {
    pub position: Position,
    pub role: Role,
    pub status: EmployeeStatus,
}

/// Server-side filters of the employees list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EmployeeStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeSortKey {
    CreatedAt,
    UpdatedAt,
}

impl SortKey for EmployeeSortKey {
    fn all() -> &'static [Self] {
        &[EmployeeSortKey::CreatedAt, EmployeeSortKey::UpdatedAt]
    }

    fn value(&self) -> &'static str {
        match self {
            EmployeeSortKey::CreatedAt => "createdAt",
            EmployeeSortKey::UpdatedAt => "updatedAt",
        }
    }

    fn label(&self, lang: Language) -> &'static str {
        match self {
            EmployeeSortKey::CreatedAt => lang.pick("Добавлено", "Added"),
            EmployeeSortKey::UpdatedAt => lang.pick("Востаннє змінено", "Last modified"),
        }
    }
}

impl Searchable for Employee {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.username.as_str(),
            self.full_name.as_str(),
            self.email.as_str(),
        ]
    }
}

impl Sortable for Employee {
    type Key = EmployeeSortKey;

    fn sort_value(&self, key: EmployeeSortKey) -> SortValue {
        match key {
            EmployeeSortKey::CreatedAt => self.created_at.into(),
            EmployeeSortKey::UpdatedAt => self.updated_at.into(),
        }
    }
}
