// src/db/animal_repo.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        postgres::{map_db_error, PgTx},
        store::AnimalStore,
    },
    models::{
        animal::{Animal, AnimalStatus, CreateAnimalPayload, UpdateAnimalPayload},
        entity::EntityKind,
    },
};

#[async_trait]
impl AnimalStore for PgTx {
    async fn get_animal(&mut self, id: Uuid) -> Result<Option<Animal>, AppError> {
        let animal = sqlx::query_as::<_, Animal>("SELECT * FROM animals WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(animal)
    }

    // Duas adoções simultâneas do mesmo animal se serializam aqui
    async fn lock_animal(&mut self, id: Uuid) -> Result<Option<Animal>, AppError> {
        let animal = sqlx::query_as::<_, Animal>("SELECT * FROM animals WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(animal)
    }

    async fn list_animals(&mut self, status: Option<AnimalStatus>) -> Result<Vec<Animal>, AppError> {
        let animals = sqlx::query_as::<_, Animal>(
            r#"
            SELECT * FROM animals
            WHERE ($1::animal_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(animals)
    }

    async fn list_animals_by_institution(&mut self, institution_id: Uuid) -> Result<Vec<Animal>, AppError> {
        let animals = sqlx::query_as::<_, Animal>(
            "SELECT * FROM animals WHERE institution_id = $1 ORDER BY created_at DESC",
        )
        .bind(institution_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(animals)
    }

    async fn insert_animal(&mut self, animal: &CreateAnimalPayload) -> Result<Animal, AppError> {
        sqlx::query_as::<_, Animal>(
            r#"
            INSERT INTO animals (
                name, species, breed, age, weight, description,
                status, photo, tutor_id, institution_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&animal.name)
        .bind(&animal.species)
        .bind(&animal.breed)
        .bind(animal.age)
        .bind(animal.weight)
        .bind(&animal.description)
        .bind(animal.status.unwrap_or_default())
        .bind(&animal.photo)
        .bind(animal.tutor_id)
        .bind(animal.institution_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn update_animal(&mut self, id: Uuid, changes: &UpdateAnimalPayload) -> Result<Animal, AppError> {
        sqlx::query_as::<_, Animal>(
            r#"
            UPDATE animals
            SET name = COALESCE($2, name),
                species = COALESCE($3, species),
                breed = COALESCE($4, breed),
                age = COALESCE($5, age),
                weight = COALESCE($6, weight),
                description = COALESCE($7, description),
                status = COALESCE($8, status),
                photo = COALESCE($9, photo),
                tutor_id = CASE WHEN $10::boolean THEN $11::uuid ELSE tutor_id END,
                institution_id = CASE WHEN $12::boolean THEN $13::uuid ELSE institution_id END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.species)
        .bind(&changes.breed)
        .bind(changes.age)
        .bind(changes.weight)
        .bind(&changes.description)
        .bind(changes.status)
        .bind(&changes.photo)
        // `Some(None)` desvincula, então aqui não dá para usar COALESCE
        .bind(changes.tutor_id.is_some())
        .bind(changes.new_tutor())
        .bind(changes.institution_id.is_some())
        .bind(changes.new_institution())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| AppError::NotFound(EntityKind::Animal.not_found_message()))
    }

    async fn set_animal_status(&mut self, id: Uuid, status: AnimalStatus) -> Result<Animal, AppError> {
        sqlx::query_as::<_, Animal>(
            "UPDATE animals SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| AppError::NotFound(EntityKind::Animal.not_found_message()))
    }
}
