// src/db/workflow_repo.rs

// Adoções, doações e denúncias. O status só muda pelos set_*_status;
// quem valida a transição é a camada de regras.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        postgres::{map_db_error, PgTx},
        store::WorkflowStore,
    },
    models::{
        entity::EntityKind,
        workflow::{
            Adoption, AdoptionStatus, Complaint, ComplaintStatus, CreateAdoptionPayload,
            CreateComplaintPayload, CreateDonationPayload, Donation, DonationStatus,
        },
    },
};

#[async_trait]
impl WorkflowStore for PgTx {
    // --- ADOÇÃO ---

    async fn get_adoption(&mut self, id: Uuid) -> Result<Option<Adoption>, AppError> {
        let adoption = sqlx::query_as::<_, Adoption>("SELECT * FROM adoptions WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(adoption)
    }

    async fn list_adoptions(&mut self, user_id: Option<Uuid>) -> Result<Vec<Adoption>, AppError> {
        let adoptions = sqlx::query_as::<_, Adoption>(
            r#"
            SELECT * FROM adoptions
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(adoptions)
    }

    async fn list_adoptions_by_animal(&mut self, animal_id: Uuid) -> Result<Vec<Adoption>, AppError> {
        let adoptions = sqlx::query_as::<_, Adoption>(
            "SELECT * FROM adoptions WHERE animal_id = $1 ORDER BY created_at DESC",
        )
        .bind(animal_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(adoptions)
    }

    async fn insert_adoption(
        &mut self,
        user_id: Uuid,
        adoption: &CreateAdoptionPayload,
    ) -> Result<Adoption, AppError> {
        sqlx::query_as::<_, Adoption>(
            r#"
            INSERT INTO adoptions (user_id, animal_id, status, observations)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(adoption.animal_id)
        .bind(AdoptionStatus::Pendente)
        .bind(&adoption.observations)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn set_adoption_status(&mut self, id: Uuid, status: AdoptionStatus) -> Result<Adoption, AppError> {
        sqlx::query_as::<_, Adoption>(
            "UPDATE adoptions SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| AppError::NotFound(EntityKind::Adoption.not_found_message()))
    }

    // --- DOAÇÃO ---

    async fn get_donation(&mut self, id: Uuid) -> Result<Option<Donation>, AppError> {
        let donation = sqlx::query_as::<_, Donation>("SELECT * FROM donations WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(donation)
    }

    async fn list_donations(&mut self, user_id: Option<Uuid>) -> Result<Vec<Donation>, AppError> {
        let donations = sqlx::query_as::<_, Donation>(
            r#"
            SELECT * FROM donations
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(donations)
    }

    async fn insert_donation(
        &mut self,
        user_id: Uuid,
        donation: &CreateDonationPayload,
    ) -> Result<Donation, AppError> {
        sqlx::query_as::<_, Donation>(
            r#"
            INSERT INTO donations (user_id, institution_id, item, quantity, status, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(donation.institution_id)
        .bind(&donation.item)
        .bind(donation.quantity)
        .bind(DonationStatus::Pendente)
        .bind(&donation.description)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn set_donation_status(&mut self, id: Uuid, status: DonationStatus) -> Result<Donation, AppError> {
        sqlx::query_as::<_, Donation>(
            "UPDATE donations SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| AppError::NotFound(EntityKind::Donation.not_found_message()))
    }

    // --- DENÚNCIA ---

    async fn get_complaint(&mut self, id: Uuid) -> Result<Option<Complaint>, AppError> {
        let complaint = sqlx::query_as::<_, Complaint>("SELECT * FROM complaints WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(complaint)
    }

    async fn list_complaints(&mut self) -> Result<Vec<Complaint>, AppError> {
        let complaints = sqlx::query_as::<_, Complaint>("SELECT * FROM complaints ORDER BY created_at DESC")
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(complaints)
    }

    async fn insert_complaint(
        &mut self,
        user_id: Uuid,
        complaint: &CreateComplaintPayload,
    ) -> Result<Complaint, AppError> {
        sqlx::query_as::<_, Complaint>(
            r#"
            INSERT INTO complaints (user_id, tutor_id, reason, description, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(complaint.tutor_id)
        .bind(&complaint.reason)
        .bind(&complaint.description)
        .bind(ComplaintStatus::Pendente)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn set_complaint_status(
        &mut self,
        id: Uuid,
        status: ComplaintStatus,
    ) -> Result<Complaint, AppError> {
        sqlx::query_as::<_, Complaint>(
            "UPDATE complaints SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| AppError::NotFound(EntityKind::Complaint.not_found_message()))
    }
}
