// src/models/registry.rs

// Cadastros de apoio: cidades, instituições, tutores e veterinários.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{animal::Animal, auth::UserSummary};

// --- CIDADE ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: Uuid,
    #[schema(example = "São Paulo")]
    pub name: String,
    #[schema(example = "SP")]
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCityPayload {
    #[validate(length(min = 1, message = "O nome da cidade é obrigatório."))]
    #[schema(example = "São Paulo")]
    pub name: String,
    #[validate(length(equal = 2, message = "O estado deve ser a sigla com 2 letras."))]
    #[schema(example = "SP")]
    pub state: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCityPayload {
    #[validate(length(min = 1, message = "O nome da cidade é obrigatório."))]
    pub name: Option<String>,
    #[validate(length(equal = 2, message = "O estado deve ser a sigla com 2 letras."))]
    pub state: Option<String>,
}

impl City {
    pub fn apply(&mut self, changes: &UpdateCityPayload) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(state) = &changes.state {
            self.state = state.clone();
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityDetail {
    #[serde(flatten)]
    pub city: City,
    pub tutor_count: i64,
    pub veterinarian_count: i64,
}

// --- INSTITUIÇÃO ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    pub id: Uuid,
    #[schema(example = "Clínica Amigo Fiel")]
    pub name: String,
    #[schema(example = "12345678000190")]
    pub cnpj: String,
    pub address: String,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstitutionPayload {
    #[validate(length(min = 1, message = "O nome da instituição é obrigatório."))]
    #[schema(example = "Clínica Amigo Fiel")]
    pub name: String,
    #[validate(length(min = 14, max = 18, message = "CNPJ inválido."))]
    #[schema(example = "12345678000190")]
    pub cnpj: String,
    #[validate(length(min = 1, message = "O endereço é obrigatório."))]
    #[schema(example = "Rua dos Animais, 123")]
    pub address: String,
    #[validate(length(min = 8, message = "Telefone inválido."))]
    #[schema(example = "(11) 98765-4321")]
    pub phone: String,
    #[validate(length(min = 1, message = "A cidade é obrigatória."))]
    pub city: String,
    #[validate(length(equal = 2, message = "O estado deve ser a sigla com 2 letras."))]
    pub state: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInstitutionPayload {
    #[validate(length(min = 1, message = "O nome da instituição é obrigatório."))]
    pub name: Option<String>,
    #[validate(length(min = 14, max = 18, message = "CNPJ inválido."))]
    pub cnpj: Option<String>,
    pub address: Option<String>,
    #[validate(length(min = 8, message = "Telefone inválido."))]
    pub phone: Option<String>,
    pub city: Option<String>,
    #[validate(length(equal = 2, message = "O estado deve ser a sigla com 2 letras."))]
    pub state: Option<String>,
    pub description: Option<String>,
}

impl Institution {
    pub fn apply(&mut self, changes: &UpdateInstitutionPayload) {
        if let Some(v) = &changes.name {
            self.name = v.clone();
        }
        if let Some(v) = &changes.cnpj {
            self.cnpj = v.clone();
        }
        if let Some(v) = &changes.address {
            self.address = v.clone();
        }
        if let Some(v) = &changes.phone {
            self.phone = v.clone();
        }
        if let Some(v) = &changes.city {
            self.city = v.clone();
        }
        if let Some(v) = &changes.state {
            self.state = v.clone();
        }
        if changes.description.is_some() {
            self.description = changes.description.clone();
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionDetail {
    #[serde(flatten)]
    pub institution: Institution,
    pub animal_count: i64,
    pub donation_count: i64,
    // Só preenchido na busca por ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animals: Option<Vec<Animal>>,
}

// --- TUTOR ---

// Cada usuário tem no máximo um perfil de tutor
pub const TUTOR_ALREADY_EXISTS: &str = "Usuário já possui perfil de tutor";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tutor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub city_id: Uuid,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// O dono do perfil vem do token, não do corpo
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTutorPayload {
    pub city_id: Uuid,
    #[validate(length(min = 8, message = "Telefone inválido."))]
    #[schema(example = "(11) 91234-5678")]
    pub phone: String,
    #[validate(length(min = 1, message = "O endereço é obrigatório."))]
    pub address: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTutorPayload {
    pub city_id: Option<Uuid>,
    #[validate(length(min = 8, message = "Telefone inválido."))]
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "O endereço é obrigatório."))]
    pub address: Option<String>,
}

impl Tutor {
    pub fn apply(&mut self, changes: &UpdateTutorPayload) {
        if let Some(v) = changes.city_id {
            self.city_id = v;
        }
        if let Some(v) = &changes.phone {
            self.phone = v.clone();
        }
        if let Some(v) = &changes.address {
            self.address = v.clone();
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TutorDetail {
    #[serde(flatten)]
    pub tutor: Tutor,
    pub user: Option<UserSummary>,
    pub city: Option<City>,
}

// --- VETERINÁRIO ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Veterinarian {
    pub id: Uuid,
    #[schema(example = "Dra. Ana Souza")]
    pub name: String,
    #[schema(example = "SP-12345")]
    pub crmv: String,
    pub city_id: Uuid,
    pub phone: String,
    pub specialty: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVeterinarianPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(length(min = 3, message = "CRMV inválido."))]
    #[schema(example = "SP-12345")]
    pub crmv: String,
    pub city_id: Uuid,
    #[validate(length(min = 8, message = "Telefone inválido."))]
    pub phone: String,
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVeterinarianPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: Option<String>,
    #[validate(length(min = 3, message = "CRMV inválido."))]
    pub crmv: Option<String>,
    pub city_id: Option<Uuid>,
    #[validate(length(min = 8, message = "Telefone inválido."))]
    pub phone: Option<String>,
    pub specialty: Option<String>,
}

impl Veterinarian {
    pub fn apply(&mut self, changes: &UpdateVeterinarianPayload) {
        if let Some(v) = &changes.name {
            self.name = v.clone();
        }
        if let Some(v) = &changes.crmv {
            self.crmv = v.clone();
        }
        if let Some(v) = changes.city_id {
            self.city_id = v;
        }
        if let Some(v) = &changes.phone {
            self.phone = v.clone();
        }
        if changes.specialty.is_some() {
            self.specialty = changes.specialty.clone();
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VeterinarianDetail {
    #[serde(flatten)]
    pub veterinarian: Veterinarian,
    pub city: Option<City>,
    pub consultation_count: i64,
    pub surgery_count: i64,
}
