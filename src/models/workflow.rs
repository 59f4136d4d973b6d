// src/models/workflow.rs

// Registros com ciclo de vida: adoções, doações e denúncias.
// Cada status tem sua máquina de estados; a camada de regras a aplica.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    animal::Animal,
    auth::UserSummary,
    registry::{Institution, TutorDetail},
};

/// Um status que só muda por operações de transição dedicadas.
pub trait WorkflowStatus: Copy + PartialEq + Send + Sync + 'static {
    fn as_str(self) -> &'static str;

    /// Transições permitidas a partir de `self` (sem contar a repetição do próprio status).
    fn next_allowed(self) -> &'static [Self];

    fn can_transition_to(self, next: Self) -> bool {
        self == next || self.next_allowed().contains(&next)
    }
}

// --- ADOÇÃO ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "adoption_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdoptionStatus {
    #[default]
    Pendente,
    Aprovada,
    Rejeitada,
    Concluida,
}

impl AdoptionStatus {
    /// Aprovar ou concluir uma adoção significa que o animal saiu do abrigo.
    pub fn marks_animal_adopted(self) -> bool {
        matches!(self, AdoptionStatus::Aprovada | AdoptionStatus::Concluida)
    }
}

impl WorkflowStatus for AdoptionStatus {
    fn as_str(self) -> &'static str {
        match self {
            AdoptionStatus::Pendente => "PENDENTE",
            AdoptionStatus::Aprovada => "APROVADA",
            AdoptionStatus::Rejeitada => "REJEITADA",
            AdoptionStatus::Concluida => "CONCLUIDA",
        }
    }

    fn next_allowed(self) -> &'static [Self] {
        match self {
            AdoptionStatus::Pendente => &[
                AdoptionStatus::Aprovada,
                AdoptionStatus::Rejeitada,
                AdoptionStatus::Concluida,
            ],
            AdoptionStatus::Aprovada => &[AdoptionStatus::Concluida],
            AdoptionStatus::Rejeitada | AdoptionStatus::Concluida => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Adoption {
    pub id: Uuid,
    pub user_id: Uuid,
    pub animal_id: Uuid,
    pub status: AdoptionStatus,
    pub observations: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdoptionPayload {
    pub animal_id: Uuid,
    #[validate(length(max = 2000, message = "Observações muito longas."))]
    pub observations: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionDetail {
    #[serde(flatten)]
    pub adoption: Adoption,
    pub animal: Option<Animal>,
    pub user: Option<UserSummary>,
}

// --- DOAÇÃO ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "donation_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DonationStatus {
    #[default]
    Pendente,
    Confirmada,
    Entregue,
    Cancelada,
}

impl WorkflowStatus for DonationStatus {
    fn as_str(self) -> &'static str {
        match self {
            DonationStatus::Pendente => "PENDENTE",
            DonationStatus::Confirmada => "CONFIRMADA",
            DonationStatus::Entregue => "ENTREGUE",
            DonationStatus::Cancelada => "CANCELADA",
        }
    }

    fn next_allowed(self) -> &'static [Self] {
        match self {
            DonationStatus::Pendente => &[
                DonationStatus::Confirmada,
                DonationStatus::Entregue,
                DonationStatus::Cancelada,
            ],
            DonationStatus::Confirmada => &[DonationStatus::Entregue, DonationStatus::Cancelada],
            DonationStatus::Entregue | DonationStatus::Cancelada => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub institution_id: Uuid,
    #[schema(example = "Ração 10kg")]
    pub item: String,
    pub quantity: i32,
    pub status: DonationStatus,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationPayload {
    pub institution_id: Uuid,
    #[validate(length(min = 1, message = "O item doado é obrigatório."))]
    #[schema(example = "Ração 10kg")]
    pub item: String,
    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    #[schema(example = 2)]
    pub quantity: i32,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationDetail {
    #[serde(flatten)]
    pub donation: Donation,
    pub institution: Option<Institution>,
    pub user: Option<UserSummary>,
}

// --- DENÚNCIA ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "complaint_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
    #[default]
    Pendente,
    Analisando,
    Resolvida,
    Descartada,
}

impl WorkflowStatus for ComplaintStatus {
    fn as_str(self) -> &'static str {
        match self {
            ComplaintStatus::Pendente => "PENDENTE",
            ComplaintStatus::Analisando => "ANALISANDO",
            ComplaintStatus::Resolvida => "RESOLVIDA",
            ComplaintStatus::Descartada => "DESCARTADA",
        }
    }

    fn next_allowed(self) -> &'static [Self] {
        match self {
            ComplaintStatus::Pendente => &[
                ComplaintStatus::Analisando,
                ComplaintStatus::Resolvida,
                ComplaintStatus::Descartada,
            ],
            ComplaintStatus::Analisando => &[ComplaintStatus::Resolvida, ComplaintStatus::Descartada],
            ComplaintStatus::Resolvida | ComplaintStatus::Descartada => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: Uuid,
    // Quem denunciou
    pub user_id: Uuid,
    // Quem foi denunciado
    pub tutor_id: Uuid,
    #[schema(example = "Maus-tratos")]
    pub reason: String,
    pub description: Option<String>,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateComplaintPayload {
    pub tutor_id: Uuid,
    #[validate(length(min = 3, message = "Informe o motivo da denúncia."))]
    #[schema(example = "Maus-tratos")]
    pub reason: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintDetail {
    #[serde(flatten)]
    pub complaint: Complaint,
    pub tutor: Option<TutorDetail>,
    pub user: Option<UserSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_adoption_can_reach_every_outcome() {
        for next in [AdoptionStatus::Aprovada, AdoptionStatus::Rejeitada, AdoptionStatus::Concluida] {
            assert!(AdoptionStatus::Pendente.can_transition_to(next));
        }
    }

    #[test]
    fn approved_adoption_can_only_be_completed() {
        assert!(AdoptionStatus::Aprovada.can_transition_to(AdoptionStatus::Concluida));
        assert!(!AdoptionStatus::Aprovada.can_transition_to(AdoptionStatus::Rejeitada));
        assert!(!AdoptionStatus::Aprovada.can_transition_to(AdoptionStatus::Pendente));
    }

    #[test]
    fn terminal_statuses_only_accept_repeats() {
        assert!(AdoptionStatus::Rejeitada.can_transition_to(AdoptionStatus::Rejeitada));
        assert!(!AdoptionStatus::Rejeitada.can_transition_to(AdoptionStatus::Aprovada));
        assert!(!DonationStatus::Cancelada.can_transition_to(DonationStatus::Entregue));
        assert!(!ComplaintStatus::Descartada.can_transition_to(ComplaintStatus::Resolvida));
    }

    #[test]
    fn only_approval_and_completion_mark_the_animal() {
        assert!(AdoptionStatus::Aprovada.marks_animal_adopted());
        assert!(AdoptionStatus::Concluida.marks_animal_adopted());
        assert!(!AdoptionStatus::Rejeitada.marks_animal_adopted());
        assert!(!AdoptionStatus::Pendente.marks_animal_adopted());
    }

    #[test]
    fn confirmed_donation_moves_forward_only() {
        assert!(DonationStatus::Confirmada.can_transition_to(DonationStatus::Entregue));
        assert!(DonationStatus::Confirmada.can_transition_to(DonationStatus::Cancelada));
        assert!(!DonationStatus::Confirmada.can_transition_to(DonationStatus::Pendente));
    }

    #[test]
    fn complaint_under_analysis_can_be_closed_either_way() {
        assert!(ComplaintStatus::Analisando.can_transition_to(ComplaintStatus::Resolvida));
        assert!(ComplaintStatus::Analisando.can_transition_to(ComplaintStatus::Descartada));
        assert!(!ComplaintStatus::Analisando.can_transition_to(ComplaintStatus::Pendente));
    }
}
