// src/services/complaint_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Store, StoreTx},
    models::{
        auth::Caller,
        entity::EntityKind,
        workflow::{Complaint, ComplaintDetail, ComplaintStatus, CreateComplaintPayload},
    },
    rules::{self, found},
    services::tutor_service::tutor_detail,
};

async fn complaint_detail(tx: &mut dyn StoreTx, complaint: Complaint) -> Result<ComplaintDetail, AppError> {
    let tutor = match tx.get_tutor(complaint.tutor_id).await? {
        Some(tutor) => Some(tutor_detail(tx, tutor).await?),
        None => None,
    };
    let user = tx.get_user(complaint.user_id).await?.map(|u| u.summary());
    Ok(ComplaintDetail { complaint, tutor, user })
}

#[derive(Clone)]
pub struct ComplaintService {
    store: Arc<dyn Store>,
}

impl ComplaintService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Quem chama é registrado como denunciante.
    pub async fn create(&self, caller: &Caller, payload: &CreateComplaintPayload) -> Result<ComplaintDetail, AppError> {
        let mut tx = self.store.begin().await?;
        rules::require_exists(&mut *tx, EntityKind::Tutor, payload.tutor_id).await?;

        let complaint = tx.insert_complaint(caller.user_id, payload).await?;
        let detail = complaint_detail(&mut *tx, complaint).await?;
        tx.commit().await?;

        tracing::info!(complaint_id = %detail.complaint.id, tutor_id = %payload.tutor_id, "Denúncia registrada");
        Ok(detail)
    }

    pub async fn list_all(&self, caller: &Caller) -> Result<Vec<ComplaintDetail>, AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        let complaints = tx.list_complaints().await?;
        let mut details = Vec::with_capacity(complaints.len());
        for complaint in complaints {
            details.push(complaint_detail(&mut *tx, complaint).await?);
        }
        Ok(details)
    }

    pub async fn get(&self, caller: &Caller, id: Uuid) -> Result<ComplaintDetail, AppError> {
        let mut tx = self.store.begin().await?;
        let complaint = found(tx.get_complaint(id).await?, EntityKind::Complaint)?;
        rules::require_self_or_admin(caller, complaint.user_id)?;
        complaint_detail(&mut *tx, complaint).await
    }

    pub async fn analyze(&self, caller: &Caller, id: Uuid) -> Result<ComplaintDetail, AppError> {
        self.transition(caller, id, ComplaintStatus::Analisando).await
    }

    pub async fn resolve(&self, caller: &Caller, id: Uuid) -> Result<ComplaintDetail, AppError> {
        self.transition(caller, id, ComplaintStatus::Resolvida).await
    }

    pub async fn discard(&self, caller: &Caller, id: Uuid) -> Result<ComplaintDetail, AppError> {
        self.transition(caller, id, ComplaintStatus::Descartada).await
    }

    async fn transition(&self, caller: &Caller, id: Uuid, next: ComplaintStatus) -> Result<ComplaintDetail, AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        let complaint = rules::transition_complaint(&mut *tx, id, next).await?;
        let detail = complaint_detail(&mut *tx, complaint).await?;
        tx.commit().await?;
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{tutor_payload, TestContext};

    async fn reported_tutor(ctx: &TestContext) -> Uuid {
        let city = ctx.seed_city().await;
        ctx.state
            .tutor_service
            .create(&ctx.user, &tutor_payload(city.id))
            .await
            .unwrap()
            .tutor
            .id
    }

    fn complaint(tutor_id: Uuid) -> CreateComplaintPayload {
        CreateComplaintPayload {
            tutor_id,
            reason: "Abandono".to_string(),
            description: Some("Animal deixado sem água".to_string()),
        }
    }

    #[tokio::test]
    async fn reporter_is_the_caller() {
        let ctx = TestContext::new().await;
        let tutor_id = reported_tutor(&ctx).await;

        let created = ctx.state.complaint_service.create(&ctx.other, &complaint(tutor_id)).await.unwrap();
        assert_eq!(created.complaint.user_id, ctx.other.user_id);
        assert_eq!(created.complaint.status, ComplaintStatus::Pendente);
        assert_eq!(created.tutor.map(|t| t.tutor.id), Some(tutor_id));
    }

    #[tokio::test]
    async fn unknown_tutor_is_not_found() {
        let ctx = TestContext::new().await;
        let err = ctx
            .state
            .complaint_service
            .create(&ctx.other, &complaint(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Tutor não encontrado"));
    }

    #[tokio::test]
    async fn analysis_then_resolution() {
        let ctx = TestContext::new().await;
        let tutor_id = reported_tutor(&ctx).await;
        let service = &ctx.state.complaint_service;
        let id = service.create(&ctx.other, &complaint(tutor_id)).await.unwrap().complaint.id;

        assert!(matches!(service.analyze(&ctx.other, id).await, Err(AppError::Forbidden)));
        service.analyze(&ctx.admin, id).await.unwrap();
        let resolved = service.resolve(&ctx.admin, id).await.unwrap();
        assert_eq!(resolved.complaint.status, ComplaintStatus::Resolvida);

        assert!(matches!(service.discard(&ctx.admin, id).await, Err(AppError::BadRequest(_))));
        assert_eq!(service.list_all(&ctx.admin).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reported_tutor_cannot_read_the_complaint() {
        let ctx = TestContext::new().await;
        let tutor_id = reported_tutor(&ctx).await;
        let service = &ctx.state.complaint_service;
        let id = service.create(&ctx.other, &complaint(tutor_id)).await.unwrap().complaint.id;

        assert!(service.get(&ctx.other, id).await.is_ok());
        assert!(matches!(service.get(&ctx.user, id).await, Err(AppError::Forbidden)));
    }
}
