// src/db/registry_repo.rs

// Cidades, instituições, tutores e veterinários.
// Os UPDATEs usam COALESCE: campo ausente no payload mantém o valor atual.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        postgres::{map_db_error, PgTx},
        store::{CityStore, InstitutionStore, TutorStore, VeterinarianStore},
    },
    models::{
        entity::EntityKind,
        registry::{
            City, CreateCityPayload, CreateInstitutionPayload, CreateTutorPayload,
            CreateVeterinarianPayload, Institution, Tutor, UpdateCityPayload,
            UpdateInstitutionPayload, UpdateTutorPayload, UpdateVeterinarianPayload, Veterinarian,
        },
    },
};

// --- CIDADE ---

#[async_trait]
impl CityStore for PgTx {
    async fn get_city(&mut self, id: Uuid) -> Result<Option<City>, AppError> {
        let city = sqlx::query_as::<_, City>("SELECT * FROM cities WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(city)
    }

    async fn list_cities(&mut self) -> Result<Vec<City>, AppError> {
        let cities = sqlx::query_as::<_, City>("SELECT * FROM cities ORDER BY name")
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(cities)
    }

    async fn insert_city(&mut self, city: &CreateCityPayload) -> Result<City, AppError> {
        sqlx::query_as::<_, City>("INSERT INTO cities (name, state) VALUES ($1, $2) RETURNING *")
            .bind(&city.name)
            .bind(&city.state)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn update_city(&mut self, id: Uuid, changes: &UpdateCityPayload) -> Result<City, AppError> {
        sqlx::query_as::<_, City>(
            r#"
            UPDATE cities
            SET name = COALESCE($2, name),
                state = COALESCE($3, state),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.state)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| AppError::NotFound(EntityKind::City.not_found_message()))
    }
}

// --- INSTITUIÇÃO ---

#[async_trait]
impl InstitutionStore for PgTx {
    async fn get_institution(&mut self, id: Uuid) -> Result<Option<Institution>, AppError> {
        let institution = sqlx::query_as::<_, Institution>("SELECT * FROM institutions WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(institution)
    }

    async fn list_institutions(&mut self) -> Result<Vec<Institution>, AppError> {
        let institutions = sqlx::query_as::<_, Institution>("SELECT * FROM institutions ORDER BY name")
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(institutions)
    }

    async fn insert_institution(
        &mut self,
        institution: &CreateInstitutionPayload,
    ) -> Result<Institution, AppError> {
        sqlx::query_as::<_, Institution>(
            r#"
            INSERT INTO institutions (name, cnpj, address, phone, city, state, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&institution.name)
        .bind(&institution.cnpj)
        .bind(&institution.address)
        .bind(&institution.phone)
        .bind(&institution.city)
        .bind(&institution.state)
        .bind(&institution.description)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn update_institution(
        &mut self,
        id: Uuid,
        changes: &UpdateInstitutionPayload,
    ) -> Result<Institution, AppError> {
        sqlx::query_as::<_, Institution>(
            r#"
            UPDATE institutions
            SET name = COALESCE($2, name),
                cnpj = COALESCE($3, cnpj),
                address = COALESCE($4, address),
                phone = COALESCE($5, phone),
                city = COALESCE($6, city),
                state = COALESCE($7, state),
                description = COALESCE($8, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.cnpj)
        .bind(&changes.address)
        .bind(&changes.phone)
        .bind(&changes.city)
        .bind(&changes.state)
        .bind(&changes.description)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| AppError::NotFound(EntityKind::Institution.not_found_message()))
    }
}

// --- TUTOR ---

#[async_trait]
impl TutorStore for PgTx {
    async fn get_tutor(&mut self, id: Uuid) -> Result<Option<Tutor>, AppError> {
        let tutor = sqlx::query_as::<_, Tutor>("SELECT * FROM tutors WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(tutor)
    }

    async fn find_tutor_by_user(&mut self, user_id: Uuid) -> Result<Option<Tutor>, AppError> {
        let tutor = sqlx::query_as::<_, Tutor>("SELECT * FROM tutors WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(tutor)
    }

    async fn list_tutors(&mut self) -> Result<Vec<Tutor>, AppError> {
        let tutors = sqlx::query_as::<_, Tutor>("SELECT * FROM tutors ORDER BY created_at DESC")
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(tutors)
    }

    async fn insert_tutor(
        &mut self,
        user_id: Uuid,
        tutor: &CreateTutorPayload,
    ) -> Result<Tutor, AppError> {
        sqlx::query_as::<_, Tutor>(
            r#"
            INSERT INTO tutors (user_id, city_id, phone, address)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(tutor.city_id)
        .bind(&tutor.phone)
        .bind(&tutor.address)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn update_tutor(&mut self, id: Uuid, changes: &UpdateTutorPayload) -> Result<Tutor, AppError> {
        sqlx::query_as::<_, Tutor>(
            r#"
            UPDATE tutors
            SET city_id = COALESCE($2, city_id),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.city_id)
        .bind(&changes.phone)
        .bind(&changes.address)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| AppError::NotFound(EntityKind::Tutor.not_found_message()))
    }
}

// --- VETERINÁRIO ---

#[async_trait]
impl VeterinarianStore for PgTx {
    async fn get_veterinarian(&mut self, id: Uuid) -> Result<Option<Veterinarian>, AppError> {
        let vet = sqlx::query_as::<_, Veterinarian>("SELECT * FROM veterinarians WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(vet)
    }

    async fn list_veterinarians(&mut self) -> Result<Vec<Veterinarian>, AppError> {
        let vets = sqlx::query_as::<_, Veterinarian>("SELECT * FROM veterinarians ORDER BY name")
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(vets)
    }

    async fn insert_veterinarian(
        &mut self,
        veterinarian: &CreateVeterinarianPayload,
    ) -> Result<Veterinarian, AppError> {
        sqlx::query_as::<_, Veterinarian>(
            r#"
            INSERT INTO veterinarians (name, crmv, city_id, phone, specialty)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&veterinarian.name)
        .bind(&veterinarian.crmv)
        .bind(veterinarian.city_id)
        .bind(&veterinarian.phone)
        .bind(&veterinarian.specialty)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn update_veterinarian(
        &mut self,
        id: Uuid,
        changes: &UpdateVeterinarianPayload,
    ) -> Result<Veterinarian, AppError> {
        sqlx::query_as::<_, Veterinarian>(
            r#"
            UPDATE veterinarians
            SET name = COALESCE($2, name),
                crmv = COALESCE($3, crmv),
                city_id = COALESCE($4, city_id),
                phone = COALESCE($5, phone),
                specialty = COALESCE($6, specialty),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.crmv)
        .bind(changes.city_id)
        .bind(&changes.phone)
        .bind(&changes.specialty)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| AppError::NotFound(EntityKind::Veterinarian.not_found_message()))
    }
}
