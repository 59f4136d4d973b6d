// src/models/clinic.rs

// Atendimentos clínicos: consultas e cirurgias.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    animal::Animal,
    registry::{TutorDetail, Veterinarian},
};

// --- CONSULTA ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub animal_id: Uuid,
    pub veterinarian_id: Uuid,
    pub tutor_id: Option<Uuid>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateConsultationPayload {
    #[schema(example = "2025-03-10T14:00:00Z")]
    pub date: DateTime<Utc>,
    pub animal_id: Uuid,
    pub veterinarian_id: Uuid,
    pub tutor_id: Option<Uuid>,
    #[validate(length(max = 2000, message = "Descrição muito longa."))]
    pub description: Option<String>,
}

// Filtros aceitos na listagem
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ConsultationFilter {
    pub animal_id: Option<Uuid>,
    pub veterinarian_id: Option<Uuid>,
    pub tutor_id: Option<Uuid>,
}

impl ConsultationFilter {
    pub fn matches(&self, c: &Consultation) -> bool {
        self.animal_id.is_none_or(|id| c.animal_id == id)
            && self.veterinarian_id.is_none_or(|id| c.veterinarian_id == id)
            && self.tutor_id.is_none_or(|id| c.tutor_id == Some(id))
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationDetail {
    #[serde(flatten)]
    pub consultation: Consultation,
    pub animal: Option<Animal>,
    pub veterinarian: Option<Veterinarian>,
    pub tutor: Option<TutorDetail>,
}

// --- CIRURGIA ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Surgery {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub animal_id: Uuid,
    pub veterinarian_id: Uuid,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSurgeryPayload {
    #[schema(example = "2025-03-12T09:30:00Z")]
    pub date: DateTime<Utc>,
    pub animal_id: Uuid,
    pub veterinarian_id: Uuid,
    #[validate(length(max = 2000, message = "Descrição muito longa."))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SurgeryFilter {
    pub animal_id: Option<Uuid>,
    pub veterinarian_id: Option<Uuid>,
}

impl SurgeryFilter {
    pub fn matches(&self, s: &Surgery) -> bool {
        self.animal_id.is_none_or(|id| s.animal_id == id)
            && self.veterinarian_id.is_none_or(|id| s.veterinarian_id == id)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurgeryDetail {
    #[serde(flatten)]
    pub surgery: Surgery,
    pub animal: Option<Animal>,
    pub veterinarian: Option<Veterinarian>,
}
