// src/services/veterinarian_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Store, StoreTx},
    models::{
        auth::Caller,
        entity::{EntityKind, UniqueField},
        registry::{
            CreateVeterinarianPayload, UpdateVeterinarianPayload, Veterinarian, VeterinarianDetail,
        },
    },
    rules::{self, found, Guarded},
};

async fn veterinarian_detail(
    tx: &mut dyn StoreTx,
    veterinarian: Veterinarian,
) -> Result<VeterinarianDetail, AppError> {
    let id = veterinarian.id;
    let city = tx.get_city(veterinarian.city_id).await?;
    let consultation_count = tx
        .count_referencing(EntityKind::Consultation, EntityKind::Veterinarian, id)
        .await?;
    let surgery_count = tx.count_referencing(EntityKind::Surgery, EntityKind::Veterinarian, id).await?;
    Ok(VeterinarianDetail { veterinarian, city, consultation_count, surgery_count })
}

#[derive(Clone)]
pub struct VeterinarianService {
    store: Arc<dyn Store>,
}

impl VeterinarianService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        caller: &Caller,
        payload: &CreateVeterinarianPayload,
    ) -> Result<VeterinarianDetail, AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        rules::require_exists(&mut *tx, EntityKind::City, payload.city_id).await?;
        rules::require_unique(&mut *tx, UniqueField::VeterinarianCrmv, &payload.crmv, None).await?;

        let veterinarian = tx.insert_veterinarian(payload).await?;
        let detail = veterinarian_detail(&mut *tx, veterinarian).await?;
        tx.commit().await?;
        Ok(detail)
    }

    pub async fn list(&self) -> Result<Vec<VeterinarianDetail>, AppError> {
        let mut tx = self.store.begin().await?;
        let veterinarians = tx.list_veterinarians().await?;
        let mut details = Vec::with_capacity(veterinarians.len());
        for veterinarian in veterinarians {
            details.push(veterinarian_detail(&mut *tx, veterinarian).await?);
        }
        Ok(details)
    }

    pub async fn get(&self, id: Uuid) -> Result<VeterinarianDetail, AppError> {
        let mut tx = self.store.begin().await?;
        let veterinarian = found(tx.get_veterinarian(id).await?, EntityKind::Veterinarian)?;
        veterinarian_detail(&mut *tx, veterinarian).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: Uuid,
        payload: &UpdateVeterinarianPayload,
    ) -> Result<VeterinarianDetail, AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        rules::require_exists(&mut *tx, EntityKind::Veterinarian, id).await?;
        rules::require_exists_if_some(&mut *tx, EntityKind::City, payload.city_id).await?;
        if let Some(crmv) = &payload.crmv {
            rules::require_unique(&mut *tx, UniqueField::VeterinarianCrmv, crmv, Some(id)).await?;
        }

        let veterinarian = tx.update_veterinarian(id, payload).await?;
        let detail = veterinarian_detail(&mut *tx, veterinarian).await?;
        tx.commit().await?;
        Ok(detail)
    }

    // Cirurgias também travam a remoção, pela FK obrigatória
    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<(), AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        rules::require_exists(&mut *tx, EntityKind::Veterinarian, id).await?;
        rules::require_no_dependents(
            &mut *tx,
            EntityKind::Veterinarian,
            id,
            Guarded::Delete,
            &[EntityKind::Consultation, EntityKind::Surgery],
        )
        .await?;

        tx.delete(EntityKind::Veterinarian, id).await?;
        tx.commit().await?;
        tracing::info!(veterinarian_id = %id, "Veterinário removido");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{vet_payload, TestContext};

    #[tokio::test]
    async fn duplicate_crmv_is_a_conflict() {
        let ctx = TestContext::new().await;
        let city = ctx.seed_city().await;
        let service = &ctx.state.veterinarian_service;

        service.create(&ctx.admin, &vet_payload("SP-12345", city.id)).await.unwrap();
        let err = service
            .create(&ctx.admin, &vet_payload("SP-12345", city.id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == "CRMV já cadastrado"));
    }

    #[tokio::test]
    async fn unknown_city_is_checked_before_crmv() {
        let ctx = TestContext::new().await;
        let city = ctx.seed_city().await;
        let service = &ctx.state.veterinarian_service;
        service.create(&ctx.admin, &vet_payload("SP-12345", city.id)).await.unwrap();

        let err = service
            .create(&ctx.admin, &vet_payload("SP-12345", Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Cidade não encontrada"));
    }

    #[tokio::test]
    async fn update_keeps_own_crmv_and_checks_new_city() {
        let ctx = TestContext::new().await;
        let city = ctx.seed_city().await;
        let service = &ctx.state.veterinarian_service;
        let vet = service.create(&ctx.admin, &vet_payload("SP-12345", city.id)).await.unwrap();
        let id = vet.veterinarian.id;

        let same = UpdateVeterinarianPayload {
            crmv: Some("SP-12345".to_string()),
            specialty: Some("Ortopedia".to_string()),
            ..Default::default()
        };
        let updated = service.update(&ctx.admin, id, &same).await.unwrap();
        assert_eq!(updated.veterinarian.specialty.as_deref(), Some("Ortopedia"));
        assert_eq!(updated.city.map(|c| c.id), Some(city.id));

        let moved = UpdateVeterinarianPayload { city_id: Some(Uuid::new_v4()), ..Default::default() };
        assert!(matches!(service.update(&ctx.admin, id, &moved).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn regular_user_only_reads() {
        let ctx = TestContext::new().await;
        let vet = ctx.seed_vet("SP-12345").await;
        let service = &ctx.state.veterinarian_service;

        assert!(service.get(vet.id).await.is_ok());
        assert!(matches!(service.delete(&ctx.user, vet.id).await, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn veterinarian_with_consultations_cannot_be_deleted() {
        let ctx = TestContext::new().await;
        let vet = ctx.seed_vet("SP-12345").await;
        let rex = ctx.seed_animal("Rex").await;
        ctx.seed_consultation(rex.id, vet.id).await;

        let err = ctx.state.veterinarian_service.delete(&ctx.admin, vet.id).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::BadRequest(ref m) if m == "Não é possível deletar veterinário que possui consultas vinculadas"
        ));

        let detail = ctx.state.veterinarian_service.get(vet.id).await.unwrap();
        assert_eq!(detail.consultation_count, 1);
    }
}
