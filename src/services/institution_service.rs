// src/services/institution_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Store, StoreTx},
    models::{
        auth::Caller,
        entity::{EntityKind, UniqueField},
        registry::{CreateInstitutionPayload, Institution, InstitutionDetail, UpdateInstitutionPayload},
    },
    rules::{self, found, Guarded},
};

// Doações também bloqueiam: a FK delas é obrigatória
const INSTITUTION_DEPENDENTS: &[EntityKind] = &[EntityKind::Animal, EntityKind::Donation];

async fn institution_detail(
    tx: &mut dyn StoreTx,
    institution: Institution,
    with_animals: bool,
) -> Result<InstitutionDetail, AppError> {
    let id = institution.id;
    let animal_count = tx.count_referencing(EntityKind::Animal, EntityKind::Institution, id).await?;
    let donation_count = tx.count_referencing(EntityKind::Donation, EntityKind::Institution, id).await?;
    let animals = if with_animals {
        Some(tx.list_animals_by_institution(id).await?)
    } else {
        None
    };
    Ok(InstitutionDetail { institution, animal_count, donation_count, animals })
}

#[derive(Clone)]
pub struct InstitutionService {
    store: Arc<dyn Store>,
}

impl InstitutionService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, caller: &Caller, payload: &CreateInstitutionPayload) -> Result<Institution, AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        rules::require_unique(&mut *tx, UniqueField::InstitutionCnpj, &payload.cnpj, None).await?;
        let institution = tx.insert_institution(payload).await?;
        tx.commit().await?;

        tracing::info!(institution_id = %institution.id, "Instituição cadastrada");
        Ok(institution)
    }

    pub async fn list(&self) -> Result<Vec<InstitutionDetail>, AppError> {
        let mut tx = self.store.begin().await?;
        let institutions = tx.list_institutions().await?;
        let mut details = Vec::with_capacity(institutions.len());
        for institution in institutions {
            details.push(institution_detail(&mut *tx, institution, false).await?);
        }
        Ok(details)
    }

    pub async fn get(&self, id: Uuid) -> Result<InstitutionDetail, AppError> {
        let mut tx = self.store.begin().await?;
        let institution = found(tx.get_institution(id).await?, EntityKind::Institution)?;
        institution_detail(&mut *tx, institution, true).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: Uuid,
        payload: &UpdateInstitutionPayload,
    ) -> Result<Institution, AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        rules::require_exists(&mut *tx, EntityKind::Institution, id).await?;
        if let Some(cnpj) = &payload.cnpj {
            rules::require_unique(&mut *tx, UniqueField::InstitutionCnpj, cnpj, Some(id)).await?;
        }

        let institution = tx.update_institution(id, payload).await?;
        tx.commit().await?;
        Ok(institution)
    }

    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<(), AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        rules::require_exists(&mut *tx, EntityKind::Institution, id).await?;
        rules::require_no_dependents(&mut *tx, EntityKind::Institution, id, Guarded::Delete, INSTITUTION_DEPENDENTS)
            .await?;

        tx.delete(EntityKind::Institution, id).await?;
        tx.commit().await?;
        tracing::info!(institution_id = %id, "Instituição removida");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{institution_payload, TestContext};

    #[tokio::test]
    async fn duplicate_cnpj_conflicts_on_create_and_update() {
        let ctx = TestContext::new().await;
        let service = &ctx.state.institution_service;
        service.create(&ctx.admin, &institution_payload("12345678000190")).await.unwrap();
        let second = service.create(&ctx.admin, &institution_payload("98765432000110")).await.unwrap();

        let err = service
            .create(&ctx.admin, &institution_payload("12345678000190"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == "CNPJ já cadastrado"));

        let steal = UpdateInstitutionPayload { cnpj: Some("12345678000190".to_string()), ..Default::default() };
        let err = service.update(&ctx.admin, second.id, &steal).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let keep = UpdateInstitutionPayload { cnpj: Some("98765432000110".to_string()), ..Default::default() };
        service.update(&ctx.admin, second.id, &keep).await.unwrap();
    }

    #[tokio::test]
    async fn get_attaches_animals_and_counts() {
        let ctx = TestContext::new().await;
        let institution = ctx.seed_institution("12345678000190").await;
        ctx.seed_animal_in("Rex", institution.id).await;
        ctx.seed_animal_in("Mia", institution.id).await;

        let detail = ctx.state.institution_service.get(institution.id).await.unwrap();
        assert_eq!(detail.animal_count, 2);
        assert_eq!(detail.donation_count, 0);
        assert_eq!(detail.animals.map(|a| a.len()), Some(2));

        let listed = ctx.state.institution_service.list().await.unwrap();
        assert!(listed[0].animals.is_none());
    }

    #[tokio::test]
    async fn institution_with_animals_cannot_be_deleted() {
        let ctx = TestContext::new().await;
        let institution = ctx.seed_institution("12345678000190").await;
        ctx.seed_animal_in("Rex", institution.id).await;

        let err = ctx.state.institution_service.delete(&ctx.admin, institution.id).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::BadRequest(ref m) if m == "Não é possível deletar instituição que possui animais vinculados"
        ));
    }
}
