// src/services/clinic_service.rs

// Consultas e cirurgias. Os registros clínicos não são editáveis:
// um lançamento errado é removido e lançado de novo.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Store, StoreTx},
    models::{
        auth::Caller,
        clinic::{
            Consultation, ConsultationDetail, ConsultationFilter, CreateConsultationPayload,
            CreateSurgeryPayload, Surgery, SurgeryDetail, SurgeryFilter,
        },
        entity::EntityKind,
    },
    rules::{self, found},
    services::tutor_service::tutor_detail,
};

async fn consultation_detail(
    tx: &mut dyn StoreTx,
    consultation: Consultation,
) -> Result<ConsultationDetail, AppError> {
    let animal = tx.get_animal(consultation.animal_id).await?;
    let veterinarian = tx.get_veterinarian(consultation.veterinarian_id).await?;
    let tutor = match consultation.tutor_id {
        Some(tutor_id) => match tx.get_tutor(tutor_id).await? {
            Some(tutor) => Some(tutor_detail(tx, tutor).await?),
            None => None,
        },
        None => None,
    };
    Ok(ConsultationDetail { consultation, animal, veterinarian, tutor })
}

async fn surgery_detail(tx: &mut dyn StoreTx, surgery: Surgery) -> Result<SurgeryDetail, AppError> {
    let animal = tx.get_animal(surgery.animal_id).await?;
    let veterinarian = tx.get_veterinarian(surgery.veterinarian_id).await?;
    Ok(SurgeryDetail { surgery, animal, veterinarian })
}

#[derive(Clone)]
pub struct ClinicService {
    store: Arc<dyn Store>,
}

impl ClinicService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    // --- CONSULTAS ---

    pub async fn create_consultation(
        &self,
        caller: &Caller,
        payload: &CreateConsultationPayload,
    ) -> Result<ConsultationDetail, AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        rules::require_exists(&mut *tx, EntityKind::Animal, payload.animal_id).await?;
        rules::require_exists(&mut *tx, EntityKind::Veterinarian, payload.veterinarian_id).await?;
        rules::require_exists_if_some(&mut *tx, EntityKind::Tutor, payload.tutor_id).await?;

        let consultation = tx.insert_consultation(payload).await?;
        let detail = consultation_detail(&mut *tx, consultation).await?;
        tx.commit().await?;
        Ok(detail)
    }

    pub async fn list_consultations(
        &self,
        filter: &ConsultationFilter,
    ) -> Result<Vec<ConsultationDetail>, AppError> {
        let mut tx = self.store.begin().await?;
        let consultations = tx.list_consultations(filter).await?;
        let mut details = Vec::with_capacity(consultations.len());
        for consultation in consultations {
            details.push(consultation_detail(&mut *tx, consultation).await?);
        }
        Ok(details)
    }

    pub async fn get_consultation(&self, id: Uuid) -> Result<ConsultationDetail, AppError> {
        let mut tx = self.store.begin().await?;
        let consultation = found(tx.get_consultation(id).await?, EntityKind::Consultation)?;
        consultation_detail(&mut *tx, consultation).await
    }

    pub async fn delete_consultation(&self, caller: &Caller, id: Uuid) -> Result<(), AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        rules::require_exists(&mut *tx, EntityKind::Consultation, id).await?;
        tx.delete(EntityKind::Consultation, id).await?;
        tx.commit().await?;
        Ok(())
    }

    // --- CIRURGIAS ---

    pub async fn create_surgery(
        &self,
        caller: &Caller,
        payload: &CreateSurgeryPayload,
    ) -> Result<SurgeryDetail, AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        rules::require_exists(&mut *tx, EntityKind::Animal, payload.animal_id).await?;
        rules::require_exists(&mut *tx, EntityKind::Veterinarian, payload.veterinarian_id).await?;

        let surgery = tx.insert_surgery(payload).await?;
        let detail = surgery_detail(&mut *tx, surgery).await?;
        tx.commit().await?;
        Ok(detail)
    }

    pub async fn list_surgeries(&self, filter: &SurgeryFilter) -> Result<Vec<SurgeryDetail>, AppError> {
        let mut tx = self.store.begin().await?;
        let surgeries = tx.list_surgeries(filter).await?;
        let mut details = Vec::with_capacity(surgeries.len());
        for surgery in surgeries {
            details.push(surgery_detail(&mut *tx, surgery).await?);
        }
        Ok(details)
    }

    pub async fn get_surgery(&self, id: Uuid) -> Result<SurgeryDetail, AppError> {
        let mut tx = self.store.begin().await?;
        let surgery = found(tx.get_surgery(id).await?, EntityKind::Surgery)?;
        surgery_detail(&mut *tx, surgery).await
    }

    pub async fn delete_surgery(&self, caller: &Caller, id: Uuid) -> Result<(), AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        rules::require_exists(&mut *tx, EntityKind::Surgery, id).await?;
        tx.delete(EntityKind::Surgery, id).await?;
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::testutils::TestContext;

    fn consultation(animal_id: Uuid, veterinarian_id: Uuid, days_ago: i64) -> CreateConsultationPayload {
        CreateConsultationPayload {
            date: Utc::now() - Duration::days(days_ago),
            animal_id,
            veterinarian_id,
            tutor_id: None,
            description: Some("Check-up".to_string()),
        }
    }

    #[tokio::test]
    async fn consultation_requires_animal_then_veterinarian() {
        let ctx = TestContext::new().await;
        let vet = ctx.seed_vet("SP-12345").await;
        let rex = ctx.seed_animal("Rex").await;
        let service = &ctx.state.clinic_service;

        // Os dois ausentes: o animal é reportado primeiro
        let err = service
            .create_consultation(&ctx.admin, &consultation(Uuid::new_v4(), Uuid::new_v4(), 0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Animal não encontrado"));

        let err = service
            .create_consultation(&ctx.admin, &consultation(rex.id, Uuid::new_v4(), 0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Veterinário não encontrado"));

        let created = service.create_consultation(&ctx.admin, &consultation(rex.id, vet.id, 0)).await.unwrap();
        assert_eq!(created.animal.map(|a| a.name), Some("Rex".to_string()));
        assert_eq!(created.veterinarian.map(|v| v.id), Some(vet.id));
    }

    #[tokio::test]
    async fn consultations_are_listed_newest_first_and_filtered() {
        let ctx = TestContext::new().await;
        let vet = ctx.seed_vet("SP-12345").await;
        let rex = ctx.seed_animal("Rex").await;
        let mia = ctx.seed_animal("Mia").await;
        let service = &ctx.state.clinic_service;

        let old = service.create_consultation(&ctx.admin, &consultation(rex.id, vet.id, 10)).await.unwrap();
        let recent = service.create_consultation(&ctx.admin, &consultation(rex.id, vet.id, 1)).await.unwrap();
        service.create_consultation(&ctx.admin, &consultation(mia.id, vet.id, 5)).await.unwrap();

        let filter = ConsultationFilter { animal_id: Some(rex.id), ..Default::default() };
        let ids: Vec<Uuid> = service
            .list_consultations(&filter)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.consultation.id)
            .collect();
        assert_eq!(ids, vec![recent.consultation.id, old.consultation.id]);
        assert_eq!(service.list_consultations(&ConsultationFilter::default()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn surgery_lifecycle() {
        let ctx = TestContext::new().await;
        let vet = ctx.seed_vet("SP-12345").await;
        let rex = ctx.seed_animal("Rex").await;
        let service = &ctx.state.clinic_service;

        let payload = CreateSurgeryPayload {
            date: Utc::now(),
            animal_id: rex.id,
            veterinarian_id: vet.id,
            description: Some("Castração".to_string()),
        };
        assert!(matches!(service.create_surgery(&ctx.user, &payload).await, Err(AppError::Forbidden)));

        let surgery = service.create_surgery(&ctx.admin, &payload).await.unwrap();
        assert_eq!(service.get_surgery(surgery.surgery.id).await.unwrap().surgery, surgery.surgery);

        service.delete_surgery(&ctx.admin, surgery.surgery.id).await.unwrap();
        assert!(matches!(
            service.get_surgery(surgery.surgery.id).await,
            Err(AppError::NotFound(ref m)) if m == "Cirurgia não encontrada"
        ));
    }
}
