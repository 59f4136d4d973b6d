// src/services/city_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Store, StoreTx},
    models::{
        auth::Caller,
        entity::EntityKind,
        registry::{City, CityDetail, CreateCityPayload, UpdateCityPayload},
    },
    rules::{self, found, Guarded},
};

// Quem impede edição e remoção de uma cidade
const CITY_DEPENDENTS: &[EntityKind] = &[EntityKind::Tutor, EntityKind::Veterinarian];

async fn city_detail(tx: &mut dyn StoreTx, city: City) -> Result<CityDetail, AppError> {
    let tutor_count = tx.count_referencing(EntityKind::Tutor, EntityKind::City, city.id).await?;
    let veterinarian_count = tx
        .count_referencing(EntityKind::Veterinarian, EntityKind::City, city.id)
        .await?;
    Ok(CityDetail { city, tutor_count, veterinarian_count })
}

#[derive(Clone)]
pub struct CityService {
    store: Arc<dyn Store>,
}

impl CityService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, caller: &Caller, payload: &CreateCityPayload) -> Result<City, AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        let city = tx.insert_city(payload).await?;
        tx.commit().await?;
        Ok(city)
    }

    pub async fn list(&self) -> Result<Vec<CityDetail>, AppError> {
        let mut tx = self.store.begin().await?;
        let cities = tx.list_cities().await?;
        let mut details = Vec::with_capacity(cities.len());
        for city in cities {
            details.push(city_detail(&mut *tx, city).await?);
        }
        Ok(details)
    }

    pub async fn get(&self, id: Uuid) -> Result<CityDetail, AppError> {
        let mut tx = self.store.begin().await?;
        let city = found(tx.get_city(id).await?, EntityKind::City)?;
        city_detail(&mut *tx, city).await
    }

    // Cidade com tutores ou veterinários fica congelada
    pub async fn update(&self, caller: &Caller, id: Uuid, payload: &UpdateCityPayload) -> Result<City, AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        rules::require_exists(&mut *tx, EntityKind::City, id).await?;
        rules::require_no_dependents(&mut *tx, EntityKind::City, id, Guarded::Update, CITY_DEPENDENTS).await?;

        let city = tx.update_city(id, payload).await?;
        tx.commit().await?;
        Ok(city)
    }

    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<(), AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        rules::require_exists(&mut *tx, EntityKind::City, id).await?;
        rules::require_no_dependents(&mut *tx, EntityKind::City, id, Guarded::Delete, CITY_DEPENDENTS).await?;

        tx.delete(EntityKind::City, id).await?;
        tx.commit().await?;
        tracing::info!(city_id = %id, "Cidade removida");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{city_payload, vet_payload, TestContext};

    #[tokio::test]
    async fn regular_user_cannot_create_cities() {
        let ctx = TestContext::new().await;
        let err = ctx.state.city_service.create(&ctx.user, &city_payload()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn free_city_can_be_edited_and_deleted() {
        let ctx = TestContext::new().await;
        let service = &ctx.state.city_service;
        let city = service.create(&ctx.admin, &city_payload()).await.unwrap();

        let changes = UpdateCityPayload { name: Some("Campinas".to_string()), state: None };
        let updated = service.update(&ctx.admin, city.id, &changes).await.unwrap();
        assert_eq!(updated.name, "Campinas");
        assert_eq!(updated.state, "SP");

        service.delete(&ctx.admin, city.id).await.unwrap();
        assert!(matches!(service.get(city.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn referenced_city_is_frozen() {
        let ctx = TestContext::new().await;
        let service = &ctx.state.city_service;
        let city = service.create(&ctx.admin, &city_payload()).await.unwrap();
        ctx.state
            .veterinarian_service
            .create(&ctx.admin, &vet_payload("SP-12345", city.id))
            .await
            .unwrap();

        let changes = UpdateCityPayload { name: Some("Campinas".to_string()), state: None };
        let err = service.update(&ctx.admin, city.id, &changes).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.starts_with("Não é possível editar cidade")));

        let err = service.delete(&ctx.admin, city.id).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.starts_with("Não é possível deletar cidade")));

        let detail = service.get(city.id).await.unwrap();
        assert_eq!(detail.city.name, "São Paulo");
        assert_eq!(detail.veterinarian_count, 1);
        assert_eq!(detail.tutor_count, 0);
    }

    #[tokio::test]
    async fn missing_city_is_not_found_on_every_mutation() {
        let ctx = TestContext::new().await;
        let service = &ctx.state.city_service;
        let id = Uuid::new_v4();
        assert!(matches!(
            service.update(&ctx.admin, id, &UpdateCityPayload::default()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(service.delete(&ctx.admin, id).await, Err(AppError::NotFound(_))));
    }
}
