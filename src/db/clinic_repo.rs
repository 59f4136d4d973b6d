// src/db/clinic_repo.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        postgres::{map_db_error, PgTx},
        store::ClinicStore,
    },
    models::clinic::{
        Consultation, ConsultationFilter, CreateConsultationPayload, CreateSurgeryPayload, Surgery,
        SurgeryFilter,
    },
};

#[async_trait]
impl ClinicStore for PgTx {
    async fn get_consultation(&mut self, id: Uuid) -> Result<Option<Consultation>, AppError> {
        let consultation = sqlx::query_as::<_, Consultation>("SELECT * FROM consultations WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(consultation)
    }

    // Filtros nulos não restringem
    async fn list_consultations(
        &mut self,
        filter: &ConsultationFilter,
    ) -> Result<Vec<Consultation>, AppError> {
        let consultations = sqlx::query_as::<_, Consultation>(
            r#"
            SELECT * FROM consultations
            WHERE ($1::uuid IS NULL OR animal_id = $1)
              AND ($2::uuid IS NULL OR veterinarian_id = $2)
              AND ($3::uuid IS NULL OR tutor_id = $3)
            ORDER BY date DESC
            "#,
        )
        .bind(filter.animal_id)
        .bind(filter.veterinarian_id)
        .bind(filter.tutor_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(consultations)
    }

    async fn insert_consultation(
        &mut self,
        consultation: &CreateConsultationPayload,
    ) -> Result<Consultation, AppError> {
        sqlx::query_as::<_, Consultation>(
            r#"
            INSERT INTO consultations (date, animal_id, veterinarian_id, tutor_id, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(consultation.date)
        .bind(consultation.animal_id)
        .bind(consultation.veterinarian_id)
        .bind(consultation.tutor_id)
        .bind(&consultation.description)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn get_surgery(&mut self, id: Uuid) -> Result<Option<Surgery>, AppError> {
        let surgery = sqlx::query_as::<_, Surgery>("SELECT * FROM surgeries WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(surgery)
    }

    async fn list_surgeries(&mut self, filter: &SurgeryFilter) -> Result<Vec<Surgery>, AppError> {
        let surgeries = sqlx::query_as::<_, Surgery>(
            r#"
            SELECT * FROM surgeries
            WHERE ($1::uuid IS NULL OR animal_id = $1)
              AND ($2::uuid IS NULL OR veterinarian_id = $2)
            ORDER BY date DESC
            "#,
        )
        .bind(filter.animal_id)
        .bind(filter.veterinarian_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(surgeries)
    }

    async fn insert_surgery(&mut self, surgery: &CreateSurgeryPayload) -> Result<Surgery, AppError> {
        sqlx::query_as::<_, Surgery>(
            r#"
            INSERT INTO surgeries (date, animal_id, veterinarian_id, description)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(surgery.date)
        .bind(surgery.animal_id)
        .bind(surgery.veterinarian_id)
        .bind(&surgery.description)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }
}
