// src/services/donation_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Store, StoreTx},
    models::{
        auth::Caller,
        entity::EntityKind,
        workflow::{CreateDonationPayload, Donation, DonationDetail, DonationStatus},
    },
    rules::{self, found},
};

async fn donation_detail(tx: &mut dyn StoreTx, donation: Donation) -> Result<DonationDetail, AppError> {
    let institution = tx.get_institution(donation.institution_id).await?;
    let user = tx.get_user(donation.user_id).await?.map(|u| u.summary());
    Ok(DonationDetail { donation, institution, user })
}

#[derive(Clone)]
pub struct DonationService {
    store: Arc<dyn Store>,
}

impl DonationService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, caller: &Caller, payload: &CreateDonationPayload) -> Result<DonationDetail, AppError> {
        if payload.quantity < 1 {
            return Err(AppError::BadRequest("A quantidade deve ser maior que zero.".to_string()));
        }

        let mut tx = self.store.begin().await?;
        rules::require_exists(&mut *tx, EntityKind::Institution, payload.institution_id).await?;

        let donation = tx.insert_donation(caller.user_id, payload).await?;
        let detail = donation_detail(&mut *tx, donation).await?;
        tx.commit().await?;
        Ok(detail)
    }

    pub async fn list_all(&self, caller: &Caller) -> Result<Vec<DonationDetail>, AppError> {
        rules::require_admin(caller)?;
        self.list_for(None).await
    }

    pub async fn mine(&self, caller: &Caller) -> Result<Vec<DonationDetail>, AppError> {
        self.list_for(Some(caller.user_id)).await
    }

    async fn list_for(&self, user_id: Option<Uuid>) -> Result<Vec<DonationDetail>, AppError> {
        let mut tx = self.store.begin().await?;
        let donations = tx.list_donations(user_id).await?;
        let mut details = Vec::with_capacity(donations.len());
        for donation in donations {
            details.push(donation_detail(&mut *tx, donation).await?);
        }
        Ok(details)
    }

    pub async fn get(&self, caller: &Caller, id: Uuid) -> Result<DonationDetail, AppError> {
        let mut tx = self.store.begin().await?;
        let donation = found(tx.get_donation(id).await?, EntityKind::Donation)?;
        rules::require_self_or_admin(caller, donation.user_id)?;
        donation_detail(&mut *tx, donation).await
    }

    pub async fn confirm(&self, caller: &Caller, id: Uuid) -> Result<DonationDetail, AppError> {
        self.transition(caller, id, DonationStatus::Confirmada).await
    }

    pub async fn deliver(&self, caller: &Caller, id: Uuid) -> Result<DonationDetail, AppError> {
        self.transition(caller, id, DonationStatus::Entregue).await
    }

    pub async fn cancel(&self, caller: &Caller, id: Uuid) -> Result<DonationDetail, AppError> {
        self.transition(caller, id, DonationStatus::Cancelada).await
    }

    async fn transition(&self, caller: &Caller, id: Uuid, next: DonationStatus) -> Result<DonationDetail, AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        let donation = rules::transition_donation(&mut *tx, id, next).await?;
        let detail = donation_detail(&mut *tx, donation).await?;
        tx.commit().await?;
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::TestContext;

    fn ration(institution_id: Uuid, quantity: i32) -> CreateDonationPayload {
        CreateDonationPayload {
            institution_id,
            item: "Ração 10kg".to_string(),
            quantity,
            description: None,
        }
    }

    #[tokio::test]
    async fn donation_starts_pending_for_the_caller() {
        let ctx = TestContext::new().await;
        let institution = ctx.seed_institution("12345678000190").await;

        let donation = ctx.state.donation_service.create(&ctx.user, &ration(institution.id, 2)).await.unwrap();
        assert_eq!(donation.donation.status, DonationStatus::Pendente);
        assert_eq!(donation.donation.user_id, ctx.user.user_id);
        assert_eq!(donation.institution.map(|i| i.id), Some(institution.id));
    }

    #[tokio::test]
    async fn zero_quantity_and_unknown_institution_are_rejected() {
        let ctx = TestContext::new().await;
        let institution = ctx.seed_institution("12345678000190").await;
        let service = &ctx.state.donation_service;

        assert!(matches!(
            service.create(&ctx.user, &ration(institution.id, 0)).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            service.create(&ctx.user, &ration(Uuid::new_v4(), 1)).await,
            Err(AppError::NotFound(ref m)) if m == "Instituição não encontrada"
        ));
    }

    #[tokio::test]
    async fn confirmed_donation_can_be_delivered_but_not_reopened() {
        let ctx = TestContext::new().await;
        let institution = ctx.seed_institution("12345678000190").await;
        let service = &ctx.state.donation_service;
        let donation = service.create(&ctx.user, &ration(institution.id, 1)).await.unwrap();
        let id = donation.donation.id;

        service.confirm(&ctx.admin, id).await.unwrap();
        let delivered = service.deliver(&ctx.admin, id).await.unwrap();
        assert_eq!(delivered.donation.status, DonationStatus::Entregue);

        let err = service.cancel(&ctx.admin, id).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("ENTREGUE") && m.contains("CANCELADA")));
    }

    #[tokio::test]
    async fn donations_are_visible_to_owner_and_admin_only() {
        let ctx = TestContext::new().await;
        let institution = ctx.seed_institution("12345678000190").await;
        let service = &ctx.state.donation_service;
        let donation = service.create(&ctx.user, &ration(institution.id, 1)).await.unwrap();

        assert_eq!(service.mine(&ctx.user).await.unwrap().len(), 1);
        assert!(matches!(service.get(&ctx.other, donation.donation.id).await, Err(AppError::Forbidden)));
        assert!(matches!(service.confirm(&ctx.user, donation.donation.id).await, Err(AppError::Forbidden)));
        assert_eq!(service.list_all(&ctx.admin).await.unwrap().len(), 1);
    }
}
