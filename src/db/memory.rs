// src/db/memory.rs

//! Store em memória com a mesma semântica do Postgres.
//!
//! Uma transação segura o mutex do começo ao fim e trabalha sobre uma cópia
//! das tabelas; o `commit` grava a cópia de volta. Isso serializa as
//! transações (o equivalente ao `FOR UPDATE` do Postgres) e faz o rollback
//! ser simplesmente descartar a cópia.
//!
//! As restrições do banco também são emuladas: unicidade de e-mail, CNPJ,
//! CRMV e tutor por usuário, e as regras de remoção de `RELATIONS`.
//! Usado com `DATABASE_URL=memory` e em todos os testes.

use std::{collections::HashMap, sync::Arc};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{
        AnimalStore, CityStore, ClinicStore, InstitutionStore, Store, StoreTx, Transaction,
        TutorStore, UserStore, VeterinarianStore, WorkflowStore,
    },
    models::{
        animal::{Animal, AnimalStatus, CreateAnimalPayload, UpdateAnimalPayload},
        auth::{NewUser, User},
        clinic::{
            Consultation, ConsultationFilter, CreateConsultationPayload, CreateSurgeryPayload,
            Surgery, SurgeryFilter,
        },
        entity::{relations_between, relations_to, EntityKind, Relation, UniqueField, LINKED_RECORDS},
        registry::{
            City, CreateCityPayload, CreateInstitutionPayload, CreateTutorPayload,
            CreateVeterinarianPayload, Institution, Tutor, UpdateCityPayload,
            UpdateInstitutionPayload, UpdateTutorPayload, UpdateVeterinarianPayload, Veterinarian,
            TUTOR_ALREADY_EXISTS,
        },
        workflow::{
            Adoption, AdoptionStatus, Complaint, ComplaintStatus, CreateAdoptionPayload,
            CreateComplaintPayload, CreateDonationPayload, Donation, DonationStatus, WorkflowStatus,
        },
    },
};

#[derive(Debug, Clone, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    cities: HashMap<Uuid, City>,
    institutions: HashMap<Uuid, Institution>,
    tutors: HashMap<Uuid, Tutor>,
    veterinarians: HashMap<Uuid, Veterinarian>,
    animals: HashMap<Uuid, Animal>,
    consultations: HashMap<Uuid, Consultation>,
    surgeries: HashMap<Uuid, Surgery>,
    adoptions: HashMap<Uuid, Adoption>,
    donations: HashMap<Uuid, Donation>,
    complaints: HashMap<Uuid, Complaint>,
}

impl Tables {
    fn contains(&self, kind: EntityKind, id: Uuid) -> bool {
        match kind {
            EntityKind::User => self.users.contains_key(&id),
            EntityKind::City => self.cities.contains_key(&id),
            EntityKind::Institution => self.institutions.contains_key(&id),
            EntityKind::Tutor => self.tutors.contains_key(&id),
            EntityKind::Veterinarian => self.veterinarians.contains_key(&id),
            EntityKind::Animal => self.animals.contains_key(&id),
            EntityKind::Consultation => self.consultations.contains_key(&id),
            EntityKind::Surgery => self.surgeries.contains_key(&id),
            EntityKind::Adoption => self.adoptions.contains_key(&id),
            EntityKind::Donation => self.donations.contains_key(&id),
            EntityKind::Complaint => self.complaints.contains_key(&id),
        }
    }

    fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::User => self.users.len(),
            EntityKind::City => self.cities.len(),
            EntityKind::Institution => self.institutions.len(),
            EntityKind::Tutor => self.tutors.len(),
            EntityKind::Veterinarian => self.veterinarians.len(),
            EntityKind::Animal => self.animals.len(),
            EntityKind::Consultation => self.consultations.len(),
            EntityKind::Surgery => self.surgeries.len(),
            EntityKind::Adoption => self.adoptions.len(),
            EntityKind::Donation => self.donations.len(),
            EntityKind::Complaint => self.complaints.len(),
        }
    }

    fn remove(&mut self, kind: EntityKind, id: Uuid) -> bool {
        match kind {
            EntityKind::User => self.users.remove(&id).is_some(),
            EntityKind::City => self.cities.remove(&id).is_some(),
            EntityKind::Institution => self.institutions.remove(&id).is_some(),
            EntityKind::Tutor => self.tutors.remove(&id).is_some(),
            EntityKind::Veterinarian => self.veterinarians.remove(&id).is_some(),
            EntityKind::Animal => self.animals.remove(&id).is_some(),
            EntityKind::Consultation => self.consultations.remove(&id).is_some(),
            EntityKind::Surgery => self.surgeries.remove(&id).is_some(),
            EntityKind::Adoption => self.adoptions.remove(&id).is_some(),
            EntityKind::Donation => self.donations.remove(&id).is_some(),
            EntityKind::Complaint => self.complaints.remove(&id).is_some(),
        }
    }

    // Os valores da coluna `relation.column` em todas as linhas de `relation.dependent`.
    fn foreign_keys(&self, relation: &Relation) -> Vec<Option<Uuid>> {
        use EntityKind as K;
        match (relation.dependent, relation.column) {
            (K::Tutor, "user_id") => self.tutors.values().map(|t| Some(t.user_id)).collect(),
            (K::Tutor, "city_id") => self.tutors.values().map(|t| Some(t.city_id)).collect(),
            (K::Veterinarian, "city_id") => self.veterinarians.values().map(|v| Some(v.city_id)).collect(),
            (K::Animal, "tutor_id") => self.animals.values().map(|a| a.tutor_id).collect(),
            (K::Animal, "institution_id") => self.animals.values().map(|a| a.institution_id).collect(),
            (K::Consultation, "animal_id") => self.consultations.values().map(|c| Some(c.animal_id)).collect(),
            (K::Consultation, "veterinarian_id") => {
                self.consultations.values().map(|c| Some(c.veterinarian_id)).collect()
            }
            (K::Consultation, "tutor_id") => self.consultations.values().map(|c| c.tutor_id).collect(),
            (K::Surgery, "animal_id") => self.surgeries.values().map(|s| Some(s.animal_id)).collect(),
            (K::Surgery, "veterinarian_id") => self.surgeries.values().map(|s| Some(s.veterinarian_id)).collect(),
            (K::Adoption, "user_id") => self.adoptions.values().map(|a| Some(a.user_id)).collect(),
            (K::Adoption, "animal_id") => self.adoptions.values().map(|a| Some(a.animal_id)).collect(),
            (K::Donation, "user_id") => self.donations.values().map(|d| Some(d.user_id)).collect(),
            (K::Donation, "institution_id") => self.donations.values().map(|d| Some(d.institution_id)).collect(),
            (K::Complaint, "user_id") => self.complaints.values().map(|c| Some(c.user_id)).collect(),
            (K::Complaint, "tutor_id") => self.complaints.values().map(|c| Some(c.tutor_id)).collect(),
            _ => Vec::new(),
        }
    }

    fn count_references(&self, relation: &Relation, id: Uuid) -> usize {
        self.foreign_keys(relation)
            .into_iter()
            .filter(|fk| *fk == Some(id))
            .count()
    }

    // ON DELETE SET NULL
    fn clear_references(&mut self, relation: &Relation, id: Uuid) {
        use EntityKind as K;
        match (relation.dependent, relation.column) {
            (K::Animal, "tutor_id") => self
                .animals
                .values_mut()
                .filter(|a| a.tutor_id == Some(id))
                .for_each(|a| a.tutor_id = None),
            (K::Animal, "institution_id") => self
                .animals
                .values_mut()
                .filter(|a| a.institution_id == Some(id))
                .for_each(|a| a.institution_id = None),
            (K::Consultation, "tutor_id") => self
                .consultations
                .values_mut()
                .filter(|c| c.tutor_id == Some(id))
                .for_each(|c| c.tutor_id = None),
            _ => {}
        }
    }

    // Equivalente à checagem de FK do banco na escrita.
    fn require_row(&self, kind: EntityKind, id: Uuid) -> Result<(), AppError> {
        if self.contains(kind, id) {
            Ok(())
        } else {
            Err(AppError::NotFound(kind.not_found_message()))
        }
    }

    fn require_optional_row(&self, kind: EntityKind, id: Option<Uuid>) -> Result<(), AppError> {
        match id {
            Some(id) => self.require_row(kind, id),
            None => Ok(()),
        }
    }

    fn unique_owner(&self, field: UniqueField, value: &str) -> Option<Uuid> {
        match field {
            UniqueField::UserEmail => self.users.values().find(|u| u.email == value).map(|u| u.id),
            UniqueField::InstitutionCnpj => {
                self.institutions.values().find(|i| i.cnpj == value).map(|i| i.id)
            }
            UniqueField::VeterinarianCrmv => {
                self.veterinarians.values().find(|v| v.crmv == value).map(|v| v.id)
            }
        }
    }

    // Violação de UNIQUE: outro registro (que não `exclude`) já usa o valor.
    fn check_unique(&self, field: UniqueField, value: &str, exclude: Option<Uuid>) -> Result<(), AppError> {
        match self.unique_owner(field, value) {
            Some(owner) if Some(owner) != exclude => Err(match field {
                UniqueField::UserEmail => AppError::EmailAlreadyExists,
                _ => AppError::Conflict(field.conflict_message()),
            }),
            _ => Ok(()),
        }
    }

    fn status_of(&self, kind: EntityKind) -> Result<Vec<&'static str>, AppError> {
        let statuses = match kind {
            EntityKind::Animal => self.animals.values().map(|a| a.status.as_str()).collect(),
            EntityKind::Adoption => self.adoptions.values().map(|a| a.status.as_str()).collect(),
            EntityKind::Donation => self.donations.values().map(|d| d.status.as_str()).collect(),
            EntityKind::Complaint => self.complaints.values().map(|c| c.status.as_str()).collect(),
            other => return Err(anyhow!("{} não possui status", other.table()).into()),
        };
        Ok(statuses)
    }
}

// Listagens: mais recentes primeiro, como os ORDER BY do Postgres.
fn newest_first<T>(rows: impl Iterator<Item = T>, key: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by_key(|r| std::cmp::Reverse(key(r)));
    rows
}

fn by_name<T>(rows: impl Iterator<Item = T>, key: impl Fn(&T) -> String) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by_key(key);
    rows
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError> {
        let guard = self.tables.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTx { guard, working }))
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
}

#[async_trait]
impl Transaction for MemoryTx {
    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let MemoryTx { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }

    async fn exists(&mut self, kind: EntityKind, id: Uuid) -> Result<bool, AppError> {
        Ok(self.working.contains(kind, id))
    }

    async fn count(&mut self, kind: EntityKind) -> Result<i64, AppError> {
        Ok(self.working.len(kind) as i64)
    }

    async fn count_with_status(&mut self, kind: EntityKind, status: &str) -> Result<i64, AppError> {
        let statuses = self.working.status_of(kind)?;
        Ok(statuses.into_iter().filter(|s| *s == status).count() as i64)
    }

    async fn count_referencing(
        &mut self,
        dependent: EntityKind,
        target: EntityKind,
        id: Uuid,
    ) -> Result<i64, AppError> {
        let total: usize = relations_between(dependent, target)
            .map(|r| self.working.count_references(r, id))
            .sum();
        Ok(total as i64)
    }

    async fn find_id_by_unique(
        &mut self,
        field: UniqueField,
        value: &str,
    ) -> Result<Option<Uuid>, AppError> {
        Ok(self.working.unique_owner(field, value))
    }

    async fn delete(&mut self, kind: EntityKind, id: Uuid) -> Result<(), AppError> {
        self.working.require_row(kind, id)?;

        // RESTRICT antes de qualquer escrita
        let blocked = relations_to(kind)
            .filter(|r| !r.optional)
            .any(|r| self.working.count_references(r, id) > 0);
        if blocked {
            return Err(AppError::BadRequest(LINKED_RECORDS.to_string()));
        }

        for relation in relations_to(kind).filter(|r| r.optional) {
            self.working.clear_references(relation, id);
        }
        self.working.remove(kind, id);
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryTx {
    async fn get_user(&mut self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.working.users.get(&id).cloned())
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.working.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&mut self) -> Result<Vec<User>, AppError> {
        Ok(newest_first(self.working.users.values().cloned(), |u| u.created_at))
    }

    async fn insert_user(&mut self, user: &NewUser) -> Result<User, AppError> {
        self.working.check_unique(UniqueField::UserEmail, &user.email, None)?;
        let now = Utc::now();
        let row = User {
            id: Uuid::new_v4(),
            email: user.email.clone(),
            name: user.name.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        self.working.users.insert(row.id, row.clone());
        Ok(row)
    }
}

#[async_trait]
impl CityStore for MemoryTx {
    async fn get_city(&mut self, id: Uuid) -> Result<Option<City>, AppError> {
        Ok(self.working.cities.get(&id).cloned())
    }

    async fn list_cities(&mut self) -> Result<Vec<City>, AppError> {
        Ok(by_name(self.working.cities.values().cloned(), |c| c.name.clone()))
    }

    async fn insert_city(&mut self, city: &CreateCityPayload) -> Result<City, AppError> {
        let now = Utc::now();
        let row = City {
            id: Uuid::new_v4(),
            name: city.name.clone(),
            state: city.state.clone(),
            created_at: now,
            updated_at: now,
        };
        self.working.cities.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_city(&mut self, id: Uuid, changes: &UpdateCityPayload) -> Result<City, AppError> {
        let city = self
            .working
            .cities
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(EntityKind::City.not_found_message()))?;
        city.apply(changes);
        Ok(city.clone())
    }
}

#[async_trait]
impl InstitutionStore for MemoryTx {
    async fn get_institution(&mut self, id: Uuid) -> Result<Option<Institution>, AppError> {
        Ok(self.working.institutions.get(&id).cloned())
    }

    async fn list_institutions(&mut self) -> Result<Vec<Institution>, AppError> {
        Ok(by_name(self.working.institutions.values().cloned(), |i| i.name.clone()))
    }

    async fn insert_institution(
        &mut self,
        institution: &CreateInstitutionPayload,
    ) -> Result<Institution, AppError> {
        self.working.check_unique(UniqueField::InstitutionCnpj, &institution.cnpj, None)?;
        let now = Utc::now();
        let row = Institution {
            id: Uuid::new_v4(),
            name: institution.name.clone(),
            cnpj: institution.cnpj.clone(),
            address: institution.address.clone(),
            phone: institution.phone.clone(),
            city: institution.city.clone(),
            state: institution.state.clone(),
            description: institution.description.clone(),
            created_at: now,
            updated_at: now,
        };
        self.working.institutions.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_institution(
        &mut self,
        id: Uuid,
        changes: &UpdateInstitutionPayload,
    ) -> Result<Institution, AppError> {
        if let Some(cnpj) = &changes.cnpj {
            self.working.check_unique(UniqueField::InstitutionCnpj, cnpj, Some(id))?;
        }
        let institution = self
            .working
            .institutions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(EntityKind::Institution.not_found_message()))?;
        institution.apply(changes);
        Ok(institution.clone())
    }
}

#[async_trait]
impl TutorStore for MemoryTx {
    async fn get_tutor(&mut self, id: Uuid) -> Result<Option<Tutor>, AppError> {
        Ok(self.working.tutors.get(&id).cloned())
    }

    async fn find_tutor_by_user(&mut self, user_id: Uuid) -> Result<Option<Tutor>, AppError> {
        Ok(self.working.tutors.values().find(|t| t.user_id == user_id).cloned())
    }

    async fn list_tutors(&mut self) -> Result<Vec<Tutor>, AppError> {
        Ok(newest_first(self.working.tutors.values().cloned(), |t| t.created_at))
    }

    async fn insert_tutor(
        &mut self,
        user_id: Uuid,
        tutor: &CreateTutorPayload,
    ) -> Result<Tutor, AppError> {
        self.working.require_row(EntityKind::User, user_id)?;
        self.working.require_row(EntityKind::City, tutor.city_id)?;
        if self.working.tutors.values().any(|t| t.user_id == user_id) {
            return Err(AppError::Conflict(TUTOR_ALREADY_EXISTS.to_string()));
        }
        let now = Utc::now();
        let row = Tutor {
            id: Uuid::new_v4(),
            user_id,
            city_id: tutor.city_id,
            phone: tutor.phone.clone(),
            address: tutor.address.clone(),
            created_at: now,
            updated_at: now,
        };
        self.working.tutors.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_tutor(&mut self, id: Uuid, changes: &UpdateTutorPayload) -> Result<Tutor, AppError> {
        if let Some(city_id) = changes.city_id {
            self.working.require_row(EntityKind::City, city_id)?;
        }
        let tutor = self
            .working
            .tutors
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(EntityKind::Tutor.not_found_message()))?;
        tutor.apply(changes);
        Ok(tutor.clone())
    }
}

#[async_trait]
impl VeterinarianStore for MemoryTx {
    async fn get_veterinarian(&mut self, id: Uuid) -> Result<Option<Veterinarian>, AppError> {
        Ok(self.working.veterinarians.get(&id).cloned())
    }

    async fn list_veterinarians(&mut self) -> Result<Vec<Veterinarian>, AppError> {
        Ok(by_name(self.working.veterinarians.values().cloned(), |v| v.name.clone()))
    }

    async fn insert_veterinarian(
        &mut self,
        veterinarian: &CreateVeterinarianPayload,
    ) -> Result<Veterinarian, AppError> {
        self.working.check_unique(UniqueField::VeterinarianCrmv, &veterinarian.crmv, None)?;
        self.working.require_row(EntityKind::City, veterinarian.city_id)?;
        let now = Utc::now();
        let row = Veterinarian {
            id: Uuid::new_v4(),
            name: veterinarian.name.clone(),
            crmv: veterinarian.crmv.clone(),
            city_id: veterinarian.city_id,
            phone: veterinarian.phone.clone(),
            specialty: veterinarian.specialty.clone(),
            created_at: now,
            updated_at: now,
        };
        self.working.veterinarians.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_veterinarian(
        &mut self,
        id: Uuid,
        changes: &UpdateVeterinarianPayload,
    ) -> Result<Veterinarian, AppError> {
        if let Some(crmv) = &changes.crmv {
            self.working.check_unique(UniqueField::VeterinarianCrmv, crmv, Some(id))?;
        }
        if let Some(city_id) = changes.city_id {
            self.working.require_row(EntityKind::City, city_id)?;
        }
        let vet = self
            .working
            .veterinarians
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(EntityKind::Veterinarian.not_found_message()))?;
        vet.apply(changes);
        Ok(vet.clone())
    }
}

#[async_trait]
impl AnimalStore for MemoryTx {
    async fn get_animal(&mut self, id: Uuid) -> Result<Option<Animal>, AppError> {
        Ok(self.working.animals.get(&id).cloned())
    }

    // A transação já tem acesso exclusivo ao store inteiro.
    async fn lock_animal(&mut self, id: Uuid) -> Result<Option<Animal>, AppError> {
        Ok(self.working.animals.get(&id).cloned())
    }

    async fn list_animals(&mut self, status: Option<AnimalStatus>) -> Result<Vec<Animal>, AppError> {
        let rows = self
            .working
            .animals
            .values()
            .filter(|a| status.is_none_or(|s| a.status == s))
            .cloned();
        Ok(newest_first(rows, |a| a.created_at))
    }

    async fn list_animals_by_institution(&mut self, institution_id: Uuid) -> Result<Vec<Animal>, AppError> {
        let rows = self
            .working
            .animals
            .values()
            .filter(|a| a.institution_id == Some(institution_id))
            .cloned();
        Ok(newest_first(rows, |a| a.created_at))
    }

    async fn insert_animal(&mut self, animal: &CreateAnimalPayload) -> Result<Animal, AppError> {
        self.working.require_optional_row(EntityKind::Tutor, animal.tutor_id)?;
        self.working.require_optional_row(EntityKind::Institution, animal.institution_id)?;
        let now = Utc::now();
        let row = Animal {
            id: Uuid::new_v4(),
            name: animal.name.clone(),
            species: animal.species.clone(),
            breed: animal.breed.clone(),
            age: animal.age,
            weight: animal.weight,
            description: animal.description.clone(),
            status: animal.status.unwrap_or_default(),
            photo: animal.photo.clone(),
            tutor_id: animal.tutor_id,
            institution_id: animal.institution_id,
            created_at: now,
            updated_at: now,
        };
        self.working.animals.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_animal(&mut self, id: Uuid, changes: &UpdateAnimalPayload) -> Result<Animal, AppError> {
        self.working.require_optional_row(EntityKind::Tutor, changes.new_tutor())?;
        self.working.require_optional_row(EntityKind::Institution, changes.new_institution())?;
        let animal = self
            .working
            .animals
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(EntityKind::Animal.not_found_message()))?;
        animal.apply(changes);
        Ok(animal.clone())
    }

    async fn set_animal_status(&mut self, id: Uuid, status: AnimalStatus) -> Result<Animal, AppError> {
        let animal = self
            .working
            .animals
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(EntityKind::Animal.not_found_message()))?;
        animal.status = status;
        animal.updated_at = Utc::now();
        Ok(animal.clone())
    }
}

#[async_trait]
impl ClinicStore for MemoryTx {
    async fn get_consultation(&mut self, id: Uuid) -> Result<Option<Consultation>, AppError> {
        Ok(self.working.consultations.get(&id).cloned())
    }

    async fn list_consultations(
        &mut self,
        filter: &ConsultationFilter,
    ) -> Result<Vec<Consultation>, AppError> {
        let rows = self
            .working
            .consultations
            .values()
            .filter(|c| filter.matches(c))
            .cloned();
        Ok(newest_first(rows, |c| c.date))
    }

    async fn insert_consultation(
        &mut self,
        consultation: &CreateConsultationPayload,
    ) -> Result<Consultation, AppError> {
        self.working.require_row(EntityKind::Animal, consultation.animal_id)?;
        self.working.require_row(EntityKind::Veterinarian, consultation.veterinarian_id)?;
        self.working.require_optional_row(EntityKind::Tutor, consultation.tutor_id)?;
        let now = Utc::now();
        let row = Consultation {
            id: Uuid::new_v4(),
            date: consultation.date,
            animal_id: consultation.animal_id,
            veterinarian_id: consultation.veterinarian_id,
            tutor_id: consultation.tutor_id,
            description: consultation.description.clone(),
            created_at: now,
            updated_at: now,
        };
        self.working.consultations.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_surgery(&mut self, id: Uuid) -> Result<Option<Surgery>, AppError> {
        Ok(self.working.surgeries.get(&id).cloned())
    }

    async fn list_surgeries(&mut self, filter: &SurgeryFilter) -> Result<Vec<Surgery>, AppError> {
        let rows = self
            .working
            .surgeries
            .values()
            .filter(|s| filter.matches(s))
            .cloned();
        Ok(newest_first(rows, |s| s.date))
    }

    async fn insert_surgery(&mut self, surgery: &CreateSurgeryPayload) -> Result<Surgery, AppError> {
        self.working.require_row(EntityKind::Animal, surgery.animal_id)?;
        self.working.require_row(EntityKind::Veterinarian, surgery.veterinarian_id)?;
        let now = Utc::now();
        let row = Surgery {
            id: Uuid::new_v4(),
            date: surgery.date,
            animal_id: surgery.animal_id,
            veterinarian_id: surgery.veterinarian_id,
            description: surgery.description.clone(),
            created_at: now,
            updated_at: now,
        };
        self.working.surgeries.insert(row.id, row.clone());
        Ok(row)
    }
}

#[async_trait]
impl WorkflowStore for MemoryTx {
    async fn get_adoption(&mut self, id: Uuid) -> Result<Option<Adoption>, AppError> {
        Ok(self.working.adoptions.get(&id).cloned())
    }

    async fn list_adoptions(&mut self, user_id: Option<Uuid>) -> Result<Vec<Adoption>, AppError> {
        let rows = self
            .working
            .adoptions
            .values()
            .filter(|a| user_id.is_none_or(|u| a.user_id == u))
            .cloned();
        Ok(newest_first(rows, |a| a.created_at))
    }

    async fn list_adoptions_by_animal(&mut self, animal_id: Uuid) -> Result<Vec<Adoption>, AppError> {
        let rows = self
            .working
            .adoptions
            .values()
            .filter(|a| a.animal_id == animal_id)
            .cloned();
        Ok(newest_first(rows, |a| a.created_at))
    }

    async fn insert_adoption(
        &mut self,
        user_id: Uuid,
        adoption: &CreateAdoptionPayload,
    ) -> Result<Adoption, AppError> {
        self.working.require_row(EntityKind::User, user_id)?;
        self.working.require_row(EntityKind::Animal, adoption.animal_id)?;
        let now = Utc::now();
        let row = Adoption {
            id: Uuid::new_v4(),
            user_id,
            animal_id: adoption.animal_id,
            status: AdoptionStatus::Pendente,
            observations: adoption.observations.clone(),
            created_at: now,
            updated_at: now,
        };
        self.working.adoptions.insert(row.id, row.clone());
        Ok(row)
    }

    async fn set_adoption_status(&mut self, id: Uuid, status: AdoptionStatus) -> Result<Adoption, AppError> {
        let adoption = self
            .working
            .adoptions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(EntityKind::Adoption.not_found_message()))?;
        adoption.status = status;
        adoption.updated_at = Utc::now();
        Ok(adoption.clone())
    }

    async fn get_donation(&mut self, id: Uuid) -> Result<Option<Donation>, AppError> {
        Ok(self.working.donations.get(&id).cloned())
    }

    async fn list_donations(&mut self, user_id: Option<Uuid>) -> Result<Vec<Donation>, AppError> {
        let rows = self
            .working
            .donations
            .values()
            .filter(|d| user_id.is_none_or(|u| d.user_id == u))
            .cloned();
        Ok(newest_first(rows, |d| d.created_at))
    }

    async fn insert_donation(
        &mut self,
        user_id: Uuid,
        donation: &CreateDonationPayload,
    ) -> Result<Donation, AppError> {
        self.working.require_row(EntityKind::User, user_id)?;
        self.working.require_row(EntityKind::Institution, donation.institution_id)?;
        let now = Utc::now();
        let row = Donation {
            id: Uuid::new_v4(),
            user_id,
            institution_id: donation.institution_id,
            item: donation.item.clone(),
            quantity: donation.quantity,
            status: DonationStatus::Pendente,
            description: donation.description.clone(),
            created_at: now,
            updated_at: now,
        };
        self.working.donations.insert(row.id, row.clone());
        Ok(row)
    }

    async fn set_donation_status(&mut self, id: Uuid, status: DonationStatus) -> Result<Donation, AppError> {
        let donation = self
            .working
            .donations
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(EntityKind::Donation.not_found_message()))?;
        donation.status = status;
        donation.updated_at = Utc::now();
        Ok(donation.clone())
    }

    async fn get_complaint(&mut self, id: Uuid) -> Result<Option<Complaint>, AppError> {
        Ok(self.working.complaints.get(&id).cloned())
    }

    async fn list_complaints(&mut self) -> Result<Vec<Complaint>, AppError> {
        Ok(newest_first(self.working.complaints.values().cloned(), |c| c.created_at))
    }

    async fn insert_complaint(
        &mut self,
        user_id: Uuid,
        complaint: &CreateComplaintPayload,
    ) -> Result<Complaint, AppError> {
        self.working.require_row(EntityKind::User, user_id)?;
        self.working.require_row(EntityKind::Tutor, complaint.tutor_id)?;
        let now = Utc::now();
        let row = Complaint {
            id: Uuid::new_v4(),
            user_id,
            tutor_id: complaint.tutor_id,
            reason: complaint.reason.clone(),
            description: complaint.description.clone(),
            status: ComplaintStatus::Pendente,
            created_at: now,
            updated_at: now,
        };
        self.working.complaints.insert(row.id, row.clone());
        Ok(row)
    }

    async fn set_complaint_status(
        &mut self,
        id: Uuid,
        status: ComplaintStatus,
    ) -> Result<Complaint, AppError> {
        let complaint = self
            .working
            .complaints
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(EntityKind::Complaint.not_found_message()))?;
        complaint.status = status;
        complaint.updated_at = Utc::now();
        Ok(complaint.clone())
    }
}
