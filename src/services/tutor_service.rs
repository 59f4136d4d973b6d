// src/services/tutor_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Store, StoreTx},
    models::{
        auth::Caller,
        entity::EntityKind,
        registry::{CreateTutorPayload, Tutor, TutorDetail, UpdateTutorPayload},
    },
    rules::{self, found, Guarded},
};

/// Anexa o resumo do usuário e a cidade ao tutor.
pub(crate) async fn tutor_detail(tx: &mut dyn StoreTx, tutor: Tutor) -> Result<TutorDetail, AppError> {
    let user = tx.get_user(tutor.user_id).await?.map(|u| u.summary());
    let city = tx.get_city(tutor.city_id).await?;
    Ok(TutorDetail { tutor, user, city })
}

#[derive(Clone)]
pub struct TutorService {
    store: Arc<dyn Store>,
}

impl TutorService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// O perfil é sempre de quem chama; o corpo não escolhe o usuário.
    pub async fn create(&self, caller: &Caller, payload: &CreateTutorPayload) -> Result<TutorDetail, AppError> {
        let mut tx = self.store.begin().await?;
        rules::require_exists(&mut *tx, EntityKind::City, payload.city_id).await?;
        rules::require_no_existing_tutor(&mut *tx, caller.user_id).await?;

        let tutor = tx.insert_tutor(caller.user_id, payload).await?;
        let detail = tutor_detail(&mut *tx, tutor).await?;
        tx.commit().await?;
        Ok(detail)
    }

    pub async fn list(&self) -> Result<Vec<TutorDetail>, AppError> {
        let mut tx = self.store.begin().await?;
        let tutors = tx.list_tutors().await?;
        let mut details = Vec::with_capacity(tutors.len());
        for tutor in tutors {
            details.push(tutor_detail(&mut *tx, tutor).await?);
        }
        Ok(details)
    }

    pub async fn get(&self, id: Uuid) -> Result<TutorDetail, AppError> {
        let mut tx = self.store.begin().await?;
        let tutor = found(tx.get_tutor(id).await?, EntityKind::Tutor)?;
        tutor_detail(&mut *tx, tutor).await
    }

    pub async fn mine(&self, caller: &Caller) -> Result<TutorDetail, AppError> {
        let mut tx = self.store.begin().await?;
        let tutor = found(tx.find_tutor_by_user(caller.user_id).await?, EntityKind::Tutor)?;
        tutor_detail(&mut *tx, tutor).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: Uuid,
        payload: &UpdateTutorPayload,
    ) -> Result<TutorDetail, AppError> {
        let mut tx = self.store.begin().await?;
        let tutor = found(tx.get_tutor(id).await?, EntityKind::Tutor)?;
        rules::require_self_or_admin(caller, tutor.user_id)?;
        rules::require_exists_if_some(&mut *tx, EntityKind::City, payload.city_id).await?;

        let tutor = tx.update_tutor(id, payload).await?;
        let detail = tutor_detail(&mut *tx, tutor).await?;
        tx.commit().await?;
        Ok(detail)
    }

    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;
        let tutor = found(tx.get_tutor(id).await?, EntityKind::Tutor)?;
        rules::require_self_or_admin(caller, tutor.user_id)?;
        rules::require_no_dependents(&mut *tx, EntityKind::Tutor, id, Guarded::Delete, &[EntityKind::Complaint])
            .await?;

        tx.delete(EntityKind::Tutor, id).await?;
        tx.commit().await?;
        tracing::info!(tutor_id = %id, "Tutor removido");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::workflow::CreateComplaintPayload,
        testutils::{tutor_payload, TestContext},
    };

    #[tokio::test]
    async fn user_creates_and_reads_own_profile() {
        let ctx = TestContext::new().await;
        let city = ctx.seed_city().await;
        let service = &ctx.state.tutor_service;

        let created = service.create(&ctx.user, &tutor_payload(city.id)).await.unwrap();
        assert_eq!(created.tutor.user_id, ctx.user.user_id);
        assert_eq!(created.city.as_ref().map(|c| c.id), Some(city.id));

        let mine = service.mine(&ctx.user).await.unwrap();
        assert_eq!(mine.tutor.id, created.tutor.id);
        assert_eq!(mine.user.map(|u| u.id), Some(ctx.user.user_id));
    }

    #[tokio::test]
    async fn second_profile_for_the_same_user_conflicts() {
        let ctx = TestContext::new().await;
        let city = ctx.seed_city().await;
        let service = &ctx.state.tutor_service;

        service.create(&ctx.user, &tutor_payload(city.id)).await.unwrap();
        let err = service.create(&ctx.user, &tutor_payload(city.id)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn unknown_city_is_reported_before_duplicate_profile() {
        let ctx = TestContext::new().await;
        let err = ctx
            .state
            .tutor_service
            .create(&ctx.user, &tutor_payload(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Cidade não encontrada"));
    }

    #[tokio::test]
    async fn only_owner_or_admin_may_edit() {
        let ctx = TestContext::new().await;
        let city = ctx.seed_city().await;
        let service = &ctx.state.tutor_service;
        let tutor = service.create(&ctx.user, &tutor_payload(city.id)).await.unwrap();

        let changes = UpdateTutorPayload { phone: Some("11911112222".to_string()), ..Default::default() };
        let err = service.update(&ctx.other, tutor.tutor.id, &changes).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));

        let updated = service.update(&ctx.admin, tutor.tutor.id, &changes).await.unwrap();
        assert_eq!(updated.tutor.phone, "11911112222");
    }

    #[tokio::test]
    async fn tutor_with_complaints_cannot_be_deleted() {
        let ctx = TestContext::new().await;
        let city = ctx.seed_city().await;
        let tutor = ctx.state.tutor_service.create(&ctx.user, &tutor_payload(city.id)).await.unwrap();
        ctx.state
            .complaint_service
            .create(
                &ctx.other,
                &CreateComplaintPayload {
                    tutor_id: tutor.tutor.id,
                    reason: "Maus-tratos".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();

        let err = ctx.state.tutor_service.delete(&ctx.user, tutor.tutor.id).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::BadRequest(ref m) if m == "Não é possível deletar tutor que possui denúncias vinculadas"
        ));
    }

    #[tokio::test]
    async fn deleting_tutor_releases_its_animals() {
        let ctx = TestContext::new().await;
        let city = ctx.seed_city().await;
        let tutor = ctx.state.tutor_service.create(&ctx.user, &tutor_payload(city.id)).await.unwrap();
        let rex = ctx.seed_animal_with_tutor("Rex", tutor.tutor.id).await;

        ctx.state.tutor_service.delete(&ctx.user, tutor.tutor.id).await.unwrap();

        let rex = ctx.state.animal_service.get(rex.id).await.unwrap();
        assert_eq!(rex.animal.tutor_id, None);
    }
}
