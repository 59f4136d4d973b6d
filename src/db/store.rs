// src/db/store.rs

//! Abstração do banco em termos das operações que os serviços precisam.
//!
//! Todo acesso passa por uma transação (`StoreTx`). Uma transação descartada
//! sem `commit` é desfeita, então uma regra que falha no meio de uma operação
//! nunca deixa escrita parcial para trás.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        animal::{Animal, AnimalStatus, CreateAnimalPayload, UpdateAnimalPayload},
        auth::{NewUser, User},
        clinic::{
            Consultation, ConsultationFilter, CreateConsultationPayload, CreateSurgeryPayload,
            Surgery, SurgeryFilter,
        },
        entity::{EntityKind, UniqueField},
        registry::{
            City, CreateCityPayload, CreateInstitutionPayload, CreateTutorPayload,
            CreateVeterinarianPayload, Institution, Tutor, UpdateCityPayload,
            UpdateInstitutionPayload, UpdateTutorPayload, UpdateVeterinarianPayload, Veterinarian,
        },
        workflow::{
            Adoption, AdoptionStatus, Complaint, ComplaintStatus, CreateAdoptionPayload,
            CreateComplaintPayload, CreateDonationPayload, Donation, DonationStatus,
        },
    },
};

/// Ponto de entrada do store: abre transações.
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError>;
}

/// Operações genéricas sobre qualquer tipo de registro.
#[async_trait]
pub trait Transaction: Send {
    /// Torna permanentes as escritas feitas na transação.
    async fn commit(self: Box<Self>) -> Result<(), AppError>;

    async fn exists(&mut self, kind: EntityKind, id: Uuid) -> Result<bool, AppError>;

    async fn count(&mut self, kind: EntityKind) -> Result<i64, AppError>;

    /// Conta registros de `kind` cujo status (na forma do banco) é `status`.
    async fn count_with_status(&mut self, kind: EntityKind, status: &str) -> Result<i64, AppError>;

    /// Conta registros de `dependent` que apontam para `target` com o `id` dado.
    async fn count_referencing(
        &mut self,
        dependent: EntityKind,
        target: EntityKind,
        id: Uuid,
    ) -> Result<i64, AppError>;

    async fn find_id_by_unique(
        &mut self,
        field: UniqueField,
        value: &str,
    ) -> Result<Option<Uuid>, AppError>;

    /// Remoção definitiva. Referências obrigatórias ainda existentes bloqueiam
    /// com `BadRequest`; as opcionais viram nulas.
    async fn delete(&mut self, kind: EntityKind, id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait UserStore: Send {
    async fn get_user(&mut self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, AppError>;
    async fn list_users(&mut self) -> Result<Vec<User>, AppError>;
    async fn insert_user(&mut self, user: &NewUser) -> Result<User, AppError>;
}

#[async_trait]
pub trait CityStore: Send {
    async fn get_city(&mut self, id: Uuid) -> Result<Option<City>, AppError>;
    async fn list_cities(&mut self) -> Result<Vec<City>, AppError>;
    async fn insert_city(&mut self, city: &CreateCityPayload) -> Result<City, AppError>;
    async fn update_city(&mut self, id: Uuid, changes: &UpdateCityPayload) -> Result<City, AppError>;
}

#[async_trait]
pub trait InstitutionStore: Send {
    async fn get_institution(&mut self, id: Uuid) -> Result<Option<Institution>, AppError>;
    async fn list_institutions(&mut self) -> Result<Vec<Institution>, AppError>;
    async fn insert_institution(
        &mut self,
        institution: &CreateInstitutionPayload,
    ) -> Result<Institution, AppError>;
    async fn update_institution(
        &mut self,
        id: Uuid,
        changes: &UpdateInstitutionPayload,
    ) -> Result<Institution, AppError>;
}

#[async_trait]
pub trait TutorStore: Send {
    async fn get_tutor(&mut self, id: Uuid) -> Result<Option<Tutor>, AppError>;
    async fn find_tutor_by_user(&mut self, user_id: Uuid) -> Result<Option<Tutor>, AppError>;
    async fn list_tutors(&mut self) -> Result<Vec<Tutor>, AppError>;
    async fn insert_tutor(
        &mut self,
        user_id: Uuid,
        tutor: &CreateTutorPayload,
    ) -> Result<Tutor, AppError>;
    async fn update_tutor(&mut self, id: Uuid, changes: &UpdateTutorPayload) -> Result<Tutor, AppError>;
}

#[async_trait]
pub trait VeterinarianStore: Send {
    async fn get_veterinarian(&mut self, id: Uuid) -> Result<Option<Veterinarian>, AppError>;
    async fn list_veterinarians(&mut self) -> Result<Vec<Veterinarian>, AppError>;
    async fn insert_veterinarian(
        &mut self,
        veterinarian: &CreateVeterinarianPayload,
    ) -> Result<Veterinarian, AppError>;
    async fn update_veterinarian(
        &mut self,
        id: Uuid,
        changes: &UpdateVeterinarianPayload,
    ) -> Result<Veterinarian, AppError>;
}

#[async_trait]
pub trait AnimalStore: Send {
    async fn get_animal(&mut self, id: Uuid) -> Result<Option<Animal>, AppError>;

    /// Lê o animal travando a linha até o fim da transação.
    async fn lock_animal(&mut self, id: Uuid) -> Result<Option<Animal>, AppError>;

    async fn list_animals(&mut self, status: Option<AnimalStatus>) -> Result<Vec<Animal>, AppError>;
    async fn list_animals_by_institution(&mut self, institution_id: Uuid) -> Result<Vec<Animal>, AppError>;
    async fn insert_animal(&mut self, animal: &CreateAnimalPayload) -> Result<Animal, AppError>;
    async fn update_animal(&mut self, id: Uuid, changes: &UpdateAnimalPayload) -> Result<Animal, AppError>;
    async fn set_animal_status(&mut self, id: Uuid, status: AnimalStatus) -> Result<Animal, AppError>;
}

#[async_trait]
pub trait ClinicStore: Send {
    async fn get_consultation(&mut self, id: Uuid) -> Result<Option<Consultation>, AppError>;
    async fn list_consultations(
        &mut self,
        filter: &ConsultationFilter,
    ) -> Result<Vec<Consultation>, AppError>;
    async fn insert_consultation(
        &mut self,
        consultation: &CreateConsultationPayload,
    ) -> Result<Consultation, AppError>;

    async fn get_surgery(&mut self, id: Uuid) -> Result<Option<Surgery>, AppError>;
    async fn list_surgeries(&mut self, filter: &SurgeryFilter) -> Result<Vec<Surgery>, AppError>;
    async fn insert_surgery(&mut self, surgery: &CreateSurgeryPayload) -> Result<Surgery, AppError>;
}

#[async_trait]
pub trait WorkflowStore: Send {
    async fn get_adoption(&mut self, id: Uuid) -> Result<Option<Adoption>, AppError>;
    async fn list_adoptions(&mut self, user_id: Option<Uuid>) -> Result<Vec<Adoption>, AppError>;
    async fn list_adoptions_by_animal(&mut self, animal_id: Uuid) -> Result<Vec<Adoption>, AppError>;
    async fn insert_adoption(
        &mut self,
        user_id: Uuid,
        adoption: &CreateAdoptionPayload,
    ) -> Result<Adoption, AppError>;
    async fn set_adoption_status(&mut self, id: Uuid, status: AdoptionStatus) -> Result<Adoption, AppError>;

    async fn get_donation(&mut self, id: Uuid) -> Result<Option<Donation>, AppError>;
    async fn list_donations(&mut self, user_id: Option<Uuid>) -> Result<Vec<Donation>, AppError>;
    async fn insert_donation(
        &mut self,
        user_id: Uuid,
        donation: &CreateDonationPayload,
    ) -> Result<Donation, AppError>;
    async fn set_donation_status(&mut self, id: Uuid, status: DonationStatus) -> Result<Donation, AppError>;

    async fn get_complaint(&mut self, id: Uuid) -> Result<Option<Complaint>, AppError>;
    async fn list_complaints(&mut self) -> Result<Vec<Complaint>, AppError>;
    async fn insert_complaint(
        &mut self,
        user_id: Uuid,
        complaint: &CreateComplaintPayload,
    ) -> Result<Complaint, AppError>;
    async fn set_complaint_status(
        &mut self,
        id: Uuid,
        status: ComplaintStatus,
    ) -> Result<Complaint, AppError>;
}

/// Uma transação com todas as operações de alto nível.
pub trait StoreTx:
    Transaction
    + UserStore
    + CityStore
    + InstitutionStore
    + TutorStore
    + VeterinarianStore
    + AnimalStore
    + ClinicStore
    + WorkflowStore
{
}

impl<T> StoreTx for T where
    T: Transaction
        + UserStore
        + CityStore
        + InstitutionStore
        + TutorStore
        + VeterinarianStore
        + AnimalStore
        + ClinicStore
        + WorkflowStore
{
}
