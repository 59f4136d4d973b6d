// src/models/animal.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    clinic::{Consultation, Surgery},
    registry::{Institution, TutorDetail},
};

// --- ENUMS ---

// Mapeia o CREATE TYPE animal_status do banco
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "animal_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnimalStatus {
    #[default]
    Disponivel,
    EmTratamento,
    Adotado,
}

impl AnimalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AnimalStatus::Disponivel => "DISPONIVEL",
            AnimalStatus::EmTratamento => "EM_TRATAMENTO",
            AnimalStatus::Adotado => "ADOTADO",
        }
    }

    /// Só quem está DISPONIVEL muda de status por edição direta.
    /// Repetir o status atual é sempre aceito.
    pub fn can_transition_to(self, next: AnimalStatus) -> bool {
        self == next
            || matches!(
                (self, next),
                (AnimalStatus::Disponivel, AnimalStatus::EmTratamento)
                    | (AnimalStatus::Disponivel, AnimalStatus::Adotado)
            )
    }
}

// --- ANIMAL ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    pub id: Uuid,
    #[schema(example = "Rex")]
    pub name: String,
    #[schema(example = "Cachorro")]
    pub species: String,
    pub breed: Option<String>,
    pub age: Option<i32>,
    #[schema(value_type = Option<f64>, example = 12.5)]
    pub weight: Option<Decimal>,
    pub description: Option<String>,
    pub status: AnimalStatus,
    // URL da foto; upload de arquivo não é tratado aqui
    pub photo: Option<String>,
    pub tutor_id: Option<Uuid>,
    pub institution_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnimalPayload {
    #[validate(length(min = 1, message = "O nome do animal é obrigatório."))]
    #[schema(example = "Rex")]
    pub name: String,
    #[validate(length(min = 1, message = "A espécie é obrigatória."))]
    #[schema(example = "Cachorro")]
    pub species: String,
    pub breed: Option<String>,
    #[validate(range(min = 0, max = 60, message = "Idade inválida."))]
    pub age: Option<i32>,
    #[schema(value_type = Option<f64>)]
    pub weight: Option<Decimal>,
    pub description: Option<String>,
    // Ausente = DISPONIVEL
    pub status: Option<AnimalStatus>,
    #[validate(url(message = "A foto deve ser uma URL válida."))]
    pub photo: Option<String>,
    pub tutor_id: Option<Uuid>,
    pub institution_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnimalPayload {
    #[validate(length(min = 1, message = "O nome do animal é obrigatório."))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "A espécie é obrigatória."))]
    pub species: Option<String>,
    pub breed: Option<String>,
    #[validate(range(min = 0, max = 60, message = "Idade inválida."))]
    pub age: Option<i32>,
    #[schema(value_type = Option<f64>)]
    pub weight: Option<Decimal>,
    pub description: Option<String>,
    pub status: Option<AnimalStatus>,
    #[validate(url(message = "A foto deve ser uma URL válida."))]
    pub photo: Option<String>,
    // Ausente mantém o vínculo; `null` desvincula.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Uuid>, nullable)]
    pub tutor_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Uuid>, nullable)]
    pub institution_id: Option<Option<Uuid>>,
}

// Distingue o campo ausente (`None`) do `null` explícito (`Some(None)`)
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateAnimalPayload {
    /// Referências novas que precisam existir (desvincular não precisa).
    pub fn new_tutor(&self) -> Option<Uuid> {
        self.tutor_id.flatten()
    }

    pub fn new_institution(&self) -> Option<Uuid> {
        self.institution_id.flatten()
    }
}

impl Animal {
    pub fn apply(&mut self, changes: &UpdateAnimalPayload) {
        if let Some(v) = &changes.name {
            self.name = v.clone();
        }
        if let Some(v) = &changes.species {
            self.species = v.clone();
        }
        if changes.breed.is_some() {
            self.breed = changes.breed.clone();
        }
        if changes.age.is_some() {
            self.age = changes.age;
        }
        if changes.weight.is_some() {
            self.weight = changes.weight;
        }
        if changes.description.is_some() {
            self.description = changes.description.clone();
        }
        if let Some(v) = changes.status {
            self.status = v;
        }
        if changes.photo.is_some() {
            self.photo = changes.photo.clone();
        }
        if let Some(v) = changes.tutor_id {
            self.tutor_id = v;
        }
        if let Some(v) = changes.institution_id {
            self.institution_id = v;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnimalDetail {
    #[serde(flatten)]
    pub animal: Animal,
    pub tutor: Option<TutorDetail>,
    pub institution: Option<Institution>,
    // Histórico clínico: só na busca por ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consultations: Option<Vec<Consultation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surgeries: Option<Vec<Surgery>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_reference_keeps_link_and_null_clears_it() {
        let kept: UpdateAnimalPayload = serde_json::from_str(r#"{"name": "Rex"}"#).unwrap();
        assert_eq!(kept.institution_id, None);

        let cleared: UpdateAnimalPayload = serde_json::from_str(r#"{"institutionId": null}"#).unwrap();
        assert_eq!(cleared.institution_id, Some(None));
        assert_eq!(cleared.new_institution(), None);

        let id = Uuid::new_v4();
        let moved: UpdateAnimalPayload = serde_json::from_str(&format!(r#"{{"tutorId": "{id}"}}"#)).unwrap();
        assert_eq!(moved.new_tutor(), Some(id));
    }

    #[test]
    fn available_animal_can_go_to_treatment_or_adopted() {
        assert!(AnimalStatus::Disponivel.can_transition_to(AnimalStatus::EmTratamento));
        assert!(AnimalStatus::Disponivel.can_transition_to(AnimalStatus::Adotado));
    }

    #[test]
    fn other_statuses_are_frozen_except_for_repeats() {
        assert!(!AnimalStatus::EmTratamento.can_transition_to(AnimalStatus::Disponivel));
        assert!(!AnimalStatus::Adotado.can_transition_to(AnimalStatus::Disponivel));
        assert!(!AnimalStatus::Adotado.can_transition_to(AnimalStatus::EmTratamento));
        assert!(AnimalStatus::Adotado.can_transition_to(AnimalStatus::Adotado));
        assert!(AnimalStatus::EmTratamento.can_transition_to(AnimalStatus::EmTratamento));
    }

    #[test]
    fn status_uses_screaming_snake_case_on_the_wire() {
        let json = serde_json::to_string(&AnimalStatus::EmTratamento).unwrap();
        assert_eq!(json, "\"EM_TRATAMENTO\"");
        let parsed: AnimalStatus = serde_json::from_str("\"DISPONIVEL\"").unwrap();
        assert_eq!(parsed, AnimalStatus::Disponivel);
    }
}
