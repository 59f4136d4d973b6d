// src/models/dashboard.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Os cards do painel administrativo. Cada grupo espelha uma tela do frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub animals: AnimalStats,
    pub institutions: TotalOnly,
    pub adoptions: AdoptionStats,
    pub donations: DonationStats,
    pub tutors: TotalOnly,
    pub veterinarians: TotalOnly,
    pub consultations: TotalOnly,
    pub surgeries: TotalOnly,
    pub complaints: ComplaintStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TotalOnly {
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnimalStats {
    pub total: i64,
    pub available: i64,
    pub adopted: i64,
    pub in_treatment: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionStats {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub completed: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationStats {
    pub total: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub delivered: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintStats {
    pub total: i64,
    pub pending: i64,
    pub resolved: i64,
}
