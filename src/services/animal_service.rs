// src/services/animal_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Store, StoreTx},
    models::{
        animal::{Animal, AnimalDetail, AnimalStatus, CreateAnimalPayload, UpdateAnimalPayload},
        auth::Caller,
        clinic::{ConsultationFilter, SurgeryFilter},
        entity::EntityKind,
    },
    rules::{self, found, Guarded},
    services::tutor_service::tutor_detail,
};

/// Anexa tutor e instituição; com `with_history`, também consultas e cirurgias.
async fn animal_detail(
    tx: &mut dyn StoreTx,
    animal: Animal,
    with_history: bool,
) -> Result<AnimalDetail, AppError> {
    let tutor = match animal.tutor_id {
        Some(tutor_id) => match tx.get_tutor(tutor_id).await? {
            Some(tutor) => Some(tutor_detail(tx, tutor).await?),
            None => None,
        },
        None => None,
    };
    let institution = match animal.institution_id {
        Some(institution_id) => tx.get_institution(institution_id).await?,
        None => None,
    };

    let (consultations, surgeries) = if with_history {
        let consultations = tx
            .list_consultations(&ConsultationFilter { animal_id: Some(animal.id), ..Default::default() })
            .await?;
        let surgeries = tx
            .list_surgeries(&SurgeryFilter { animal_id: Some(animal.id), ..Default::default() })
            .await?;
        (Some(consultations), Some(surgeries))
    } else {
        (None, None)
    };

    Ok(AnimalDetail { animal, tutor, institution, consultations, surgeries })
}

#[derive(Clone)]
pub struct AnimalService {
    store: Arc<dyn Store>,
}

impl AnimalService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, caller: &Caller, payload: &CreateAnimalPayload) -> Result<AnimalDetail, AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        rules::require_exists_if_some(&mut *tx, EntityKind::Institution, payload.institution_id).await?;
        rules::require_exists_if_some(&mut *tx, EntityKind::Tutor, payload.tutor_id).await?;

        let animal = tx.insert_animal(payload).await?;
        let detail = animal_detail(&mut *tx, animal, false).await?;
        tx.commit().await?;

        tracing::info!(animal_id = %detail.animal.id, status = detail.animal.status.as_str(), "Animal cadastrado");
        Ok(detail)
    }

    pub async fn list(&self) -> Result<Vec<AnimalDetail>, AppError> {
        self.list_with_status(None).await
    }

    /// Só os animais DISPONIVEL, para a vitrine de adoção.
    pub async fn available(&self) -> Result<Vec<AnimalDetail>, AppError> {
        self.list_with_status(Some(AnimalStatus::Disponivel)).await
    }

    async fn list_with_status(&self, status: Option<AnimalStatus>) -> Result<Vec<AnimalDetail>, AppError> {
        let mut tx = self.store.begin().await?;
        let animals = tx.list_animals(status).await?;
        let mut details = Vec::with_capacity(animals.len());
        for animal in animals {
            details.push(animal_detail(&mut *tx, animal, false).await?);
        }
        Ok(details)
    }

    pub async fn get(&self, id: Uuid) -> Result<AnimalDetail, AppError> {
        let mut tx = self.store.begin().await?;
        let animal = found(tx.get_animal(id).await?, EntityKind::Animal)?;
        animal_detail(&mut *tx, animal, true).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: Uuid,
        payload: &UpdateAnimalPayload,
    ) -> Result<AnimalDetail, AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        let current = found(tx.lock_animal(id).await?, EntityKind::Animal)?;
        rules::require_exists_if_some(&mut *tx, EntityKind::Institution, payload.new_institution()).await?;
        rules::require_exists_if_some(&mut *tx, EntityKind::Tutor, payload.new_tutor()).await?;
        if let Some(next) = payload.status {
            rules::check_animal_transition(current.status, next)?;
        }

        let animal = tx.update_animal(id, payload).await?;
        let detail = animal_detail(&mut *tx, animal, false).await?;
        tx.commit().await?;
        Ok(detail)
    }

    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<(), AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        rules::require_exists(&mut *tx, EntityKind::Animal, id).await?;
        rules::require_no_dependents(
            &mut *tx,
            EntityKind::Animal,
            id,
            Guarded::Delete,
            &[EntityKind::Consultation, EntityKind::Surgery],
        )
        .await?;

        tx.delete(EntityKind::Animal, id).await?;
        tx.commit().await?;
        tracing::info!(animal_id = %id, "Animal removido");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{animal_payload, TestContext};

    #[tokio::test]
    async fn new_animal_defaults_to_available() {
        let ctx = TestContext::new().await;
        let institution = ctx.seed_institution("12345678000190").await;
        let payload = CreateAnimalPayload { institution_id: Some(institution.id), ..animal_payload("Rex") };

        let rex = ctx.state.animal_service.create(&ctx.admin, &payload).await.unwrap();
        assert_eq!(rex.animal.status, AnimalStatus::Disponivel);
        assert_eq!(rex.institution.map(|i| i.id), Some(institution.id));
    }

    #[tokio::test]
    async fn unknown_institution_or_tutor_is_not_found() {
        let ctx = TestContext::new().await;
        let service = &ctx.state.animal_service;

        let payload = CreateAnimalPayload { institution_id: Some(Uuid::new_v4()), ..animal_payload("Rex") };
        let err = service.create(&ctx.admin, &payload).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Instituição não encontrada"));

        let payload = CreateAnimalPayload { tutor_id: Some(Uuid::new_v4()), ..animal_payload("Rex") };
        let err = service.create(&ctx.admin, &payload).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Tutor não encontrado"));
    }

    #[tokio::test]
    async fn available_listing_skips_other_statuses() {
        let ctx = TestContext::new().await;
        ctx.seed_animal("Rex").await;
        let mia = ctx.seed_animal("Mia").await;
        let changes = UpdateAnimalPayload { status: Some(AnimalStatus::EmTratamento), ..Default::default() };
        ctx.state.animal_service.update(&ctx.admin, mia.id, &changes).await.unwrap();

        let available = ctx.state.animal_service.available().await.unwrap();
        let names: Vec<&str> = available.iter().map(|a| a.animal.name.as_str()).collect();
        assert_eq!(names, vec!["Rex"]);
        assert_eq!(ctx.state.animal_service.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn status_cannot_go_back_to_available() {
        let ctx = TestContext::new().await;
        let rex = ctx.seed_animal("Rex").await;
        let service = &ctx.state.animal_service;

        let adopted = UpdateAnimalPayload { status: Some(AnimalStatus::Adotado), ..Default::default() };
        service.update(&ctx.admin, rex.id, &adopted).await.unwrap();

        let back = UpdateAnimalPayload { status: Some(AnimalStatus::Disponivel), ..Default::default() };
        let err = service.update(&ctx.admin, rex.id, &back).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("ADOTADO") && m.contains("DISPONIVEL")));

        // Mesmo status e outros campos seguem editáveis
        let rename = UpdateAnimalPayload {
            name: Some("Rex II".to_string()),
            status: Some(AnimalStatus::Adotado),
            ..Default::default()
        };
        assert_eq!(service.update(&ctx.admin, rex.id, &rename).await.unwrap().animal.name, "Rex II");
    }

    #[tokio::test]
    async fn null_reference_detaches_the_animal() {
        let ctx = TestContext::new().await;
        let institution = ctx.seed_institution("12345678000190").await;
        let rex = ctx.seed_animal_in("Rex", institution.id).await;
        let service = &ctx.state.animal_service;

        // Sem o campo, o vínculo fica como está
        let rename = UpdateAnimalPayload { name: Some("Rex II".to_string()), ..Default::default() };
        let renamed = service.update(&ctx.admin, rex.id, &rename).await.unwrap();
        assert_eq!(renamed.animal.institution_id, Some(institution.id));

        let detach = UpdateAnimalPayload { institution_id: Some(None), ..Default::default() };
        let detached = service.update(&ctx.admin, rex.id, &detach).await.unwrap();
        assert_eq!(detached.animal.institution_id, None);
        assert!(detached.institution.is_none());

        let unknown = UpdateAnimalPayload { tutor_id: Some(Some(Uuid::new_v4())), ..Default::default() };
        let err = service.update(&ctx.admin, rex.id, &unknown).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Tutor não encontrado"));
    }

    #[tokio::test]
    async fn clinical_history_blocks_delete_until_removed() {
        let ctx = TestContext::new().await;
        let vet = ctx.seed_vet("SP-12345").await;
        let rex = ctx.seed_animal("Rex").await;
        let consultation = ctx.seed_consultation(rex.id, vet.id).await;

        let detail = ctx.state.animal_service.get(rex.id).await.unwrap();
        assert_eq!(detail.consultations.map(|c| c.len()), Some(1));
        assert_eq!(detail.surgeries.map(|s| s.len()), Some(0));

        let err = ctx.state.animal_service.delete(&ctx.admin, rex.id).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::BadRequest(ref m) if m == "Não é possível deletar animal que possui consultas vinculadas"
        ));

        ctx.state.clinic_service.delete_consultation(&ctx.admin, consultation.id).await.unwrap();
        ctx.state.animal_service.delete(&ctx.admin, rex.id).await.unwrap();
        assert!(matches!(ctx.state.animal_service.get(rex.id).await, Err(AppError::NotFound(_))));
    }
}
