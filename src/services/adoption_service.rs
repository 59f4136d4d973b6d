// src/services/adoption_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Store, StoreTx},
    models::{
        auth::Caller,
        entity::EntityKind,
        workflow::{Adoption, AdoptionDetail, AdoptionStatus, CreateAdoptionPayload},
    },
    rules::{self, found},
};

async fn adoption_detail(tx: &mut dyn StoreTx, adoption: Adoption) -> Result<AdoptionDetail, AppError> {
    let animal = tx.get_animal(adoption.animal_id).await?;
    let user = tx.get_user(adoption.user_id).await?.map(|u| u.summary());
    Ok(AdoptionDetail { adoption, animal, user })
}

#[derive(Clone)]
pub struct AdoptionService {
    store: Arc<dyn Store>,
}

impl AdoptionService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Pedido de adoção em nome de quem chama. O animal fica travado até o commit,
    /// então dois pedidos simultâneos não leem o mesmo status ao mesmo tempo.
    pub async fn create(&self, caller: &Caller, payload: &CreateAdoptionPayload) -> Result<AdoptionDetail, AppError> {
        let mut tx = self.store.begin().await?;
        rules::require_animal_available(&mut *tx, payload.animal_id).await?;

        let adoption = tx.insert_adoption(caller.user_id, payload).await?;
        let detail = adoption_detail(&mut *tx, adoption).await?;
        tx.commit().await?;

        tracing::info!(adoption_id = %detail.adoption.id, animal_id = %payload.animal_id, "Pedido de adoção registrado");
        Ok(detail)
    }

    pub async fn list_all(&self, caller: &Caller) -> Result<Vec<AdoptionDetail>, AppError> {
        rules::require_admin(caller)?;
        self.list_for(None).await
    }

    pub async fn mine(&self, caller: &Caller) -> Result<Vec<AdoptionDetail>, AppError> {
        self.list_for(Some(caller.user_id)).await
    }

    async fn list_for(&self, user_id: Option<Uuid>) -> Result<Vec<AdoptionDetail>, AppError> {
        let mut tx = self.store.begin().await?;
        let adoptions = tx.list_adoptions(user_id).await?;
        let mut details = Vec::with_capacity(adoptions.len());
        for adoption in adoptions {
            details.push(adoption_detail(&mut *tx, adoption).await?);
        }
        Ok(details)
    }

    pub async fn get(&self, caller: &Caller, id: Uuid) -> Result<AdoptionDetail, AppError> {
        let mut tx = self.store.begin().await?;
        let adoption = found(tx.get_adoption(id).await?, EntityKind::Adoption)?;
        rules::require_self_or_admin(caller, adoption.user_id)?;
        adoption_detail(&mut *tx, adoption).await
    }

    pub async fn approve(&self, caller: &Caller, id: Uuid) -> Result<AdoptionDetail, AppError> {
        self.transition(caller, id, AdoptionStatus::Aprovada).await
    }

    pub async fn reject(&self, caller: &Caller, id: Uuid) -> Result<AdoptionDetail, AppError> {
        self.transition(caller, id, AdoptionStatus::Rejeitada).await
    }

    pub async fn complete(&self, caller: &Caller, id: Uuid) -> Result<AdoptionDetail, AppError> {
        self.transition(caller, id, AdoptionStatus::Concluida).await
    }

    async fn transition(&self, caller: &Caller, id: Uuid, next: AdoptionStatus) -> Result<AdoptionDetail, AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        let adoption = rules::transition_adoption(&mut *tx, id, next).await?;
        let detail = adoption_detail(&mut *tx, adoption).await?;
        tx.commit().await?;

        tracing::info!(adoption_id = %id, status = ?next, "Status da adoção atualizado");
        Ok(detail)
    }
}
