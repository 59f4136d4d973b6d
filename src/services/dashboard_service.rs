// src/services/dashboard_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::Store,
    models::{
        animal::AnimalStatus,
        auth::Caller,
        dashboard::{AdoptionStats, AnimalStats, ComplaintStats, DashboardStats, DonationStats, TotalOnly},
        entity::EntityKind,
        workflow::{AdoptionStatus, ComplaintStatus, DonationStatus, WorkflowStatus},
    },
    rules,
};

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn Store>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Todas as contagens saem da mesma transação (snapshot consistente).
    pub async fn stats(&self, caller: &Caller) -> Result<DashboardStats, AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;

        let animals = AnimalStats {
            total: tx.count(EntityKind::Animal).await?,
            available: tx.count_with_status(EntityKind::Animal, AnimalStatus::Disponivel.as_str()).await?,
            adopted: tx.count_with_status(EntityKind::Animal, AnimalStatus::Adotado.as_str()).await?,
            in_treatment: tx.count_with_status(EntityKind::Animal, AnimalStatus::EmTratamento.as_str()).await?,
        };

        let adoptions = AdoptionStats {
            total: tx.count(EntityKind::Adoption).await?,
            pending: tx.count_with_status(EntityKind::Adoption, AdoptionStatus::Pendente.as_str()).await?,
            approved: tx.count_with_status(EntityKind::Adoption, AdoptionStatus::Aprovada.as_str()).await?,
            completed: tx.count_with_status(EntityKind::Adoption, AdoptionStatus::Concluida.as_str()).await?,
        };

        let donations = DonationStats {
            total: tx.count(EntityKind::Donation).await?,
            pending: tx.count_with_status(EntityKind::Donation, DonationStatus::Pendente.as_str()).await?,
            confirmed: tx.count_with_status(EntityKind::Donation, DonationStatus::Confirmada.as_str()).await?,
            delivered: tx.count_with_status(EntityKind::Donation, DonationStatus::Entregue.as_str()).await?,
        };

        let complaints = ComplaintStats {
            total: tx.count(EntityKind::Complaint).await?,
            pending: tx.count_with_status(EntityKind::Complaint, ComplaintStatus::Pendente.as_str()).await?,
            resolved: tx.count_with_status(EntityKind::Complaint, ComplaintStatus::Resolvida.as_str()).await?,
        };

        Ok(DashboardStats {
            animals,
            institutions: TotalOnly { total: tx.count(EntityKind::Institution).await? },
            adoptions,
            donations,
            tutors: TotalOnly { total: tx.count(EntityKind::Tutor).await? },
            veterinarians: TotalOnly { total: tx.count(EntityKind::Veterinarian).await? },
            consultations: TotalOnly { total: tx.count(EntityKind::Consultation).await? },
            surgeries: TotalOnly { total: tx.count(EntityKind::Surgery).await? },
            complaints,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::workflow::CreateAdoptionPayload, testutils::TestContext};

    #[tokio::test]
    async fn empty_store_counts_zero() {
        let ctx = TestContext::new().await;
        let stats = ctx.state.dashboard_service.stats(&ctx.admin).await.unwrap();
        assert_eq!(stats.animals.total, 0);
        assert_eq!(stats.adoptions.pending, 0);
        assert_eq!(stats.complaints, ComplaintStats { total: 0, pending: 0, resolved: 0 });
    }

    #[tokio::test]
    async fn adoption_flow_moves_the_counters() {
        let ctx = TestContext::new().await;
        let rex = ctx.seed_animal("Rex").await;
        ctx.seed_animal("Mia").await;
        let adoption = ctx
            .state
            .adoption_service
            .create(&ctx.user, &CreateAdoptionPayload { animal_id: rex.id, observations: None })
            .await
            .unwrap();

        let before = ctx.state.dashboard_service.stats(&ctx.admin).await.unwrap();
        assert_eq!(before.animals, AnimalStats { total: 2, available: 2, adopted: 0, in_treatment: 0 });
        assert_eq!(before.adoptions.pending, 1);

        ctx.state.adoption_service.approve(&ctx.admin, adoption.adoption.id).await.unwrap();

        let after = ctx.state.dashboard_service.stats(&ctx.admin).await.unwrap();
        assert_eq!(after.animals.available, 1);
        assert_eq!(after.animals.adopted, 1);
        assert_eq!(after.adoptions.pending, 0);
        assert_eq!(after.adoptions.approved, 1);
    }

    #[tokio::test]
    async fn dashboard_is_admin_only() {
        let ctx = TestContext::new().await;
        assert!(matches!(ctx.state.dashboard_service.stats(&ctx.user).await, Err(AppError::Forbidden)));
    }
}
