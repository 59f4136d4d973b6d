// src/testutils.rs

// Fixtures dos testes: payloads prontos e um AppState sobre o store em memória.

use std::sync::Arc;

use axum::Router;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    config::{AppState, Config},
    db::{MemoryStore, Store},
    models::{
        animal::{Animal, CreateAnimalPayload},
        auth::{Caller, NewUser, Role, User},
        clinic::{Consultation, CreateConsultationPayload},
        registry::{
            City, CreateCityPayload, CreateInstitutionPayload, CreateTutorPayload,
            CreateVeterinarianPayload, Institution, Veterinarian,
        },
    },
    routes,
};

// --- PAYLOADS ---

pub fn city_payload() -> CreateCityPayload {
    CreateCityPayload { name: "São Paulo".to_string(), state: "SP".to_string() }
}

pub fn institution_payload(cnpj: &str) -> CreateInstitutionPayload {
    CreateInstitutionPayload {
        name: "Abrigo Esperança".to_string(),
        cnpj: cnpj.to_string(),
        address: "Rua das Flores, 10".to_string(),
        phone: "11988887777".to_string(),
        city: "São Paulo".to_string(),
        state: "SP".to_string(),
        description: None,
    }
}

pub fn vet_payload(crmv: &str, city_id: Uuid) -> CreateVeterinarianPayload {
    CreateVeterinarianPayload {
        name: "Dra. Ana Souza".to_string(),
        crmv: crmv.to_string(),
        city_id,
        phone: "11977776666".to_string(),
        specialty: None,
    }
}

pub fn animal_payload(name: &str) -> CreateAnimalPayload {
    CreateAnimalPayload {
        name: name.to_string(),
        species: "Cachorro".to_string(),
        breed: Some("SRD".to_string()),
        age: Some(3),
        weight: None,
        description: None,
        status: None,
        photo: None,
        tutor_id: None,
        institution_id: None,
    }
}

pub fn tutor_payload(city_id: Uuid) -> CreateTutorPayload {
    CreateTutorPayload {
        city_id,
        phone: "11966665555".to_string(),
        address: "Av. Paulista, 1000".to_string(),
    }
}

// O hash não é usado nos testes que passam por aqui
pub fn new_user(email: &str, role: Role) -> NewUser {
    NewUser {
        email: email.to_string(),
        name: email.split('@').next().unwrap_or(email).to_string(),
        password_hash: "hash".to_string(),
        role,
    }
}

// --- CONTEXTO ---

fn test_config() -> Config {
    Config {
        database_url: "memory".to_string(),
        jwt_secret: "segredo-de-teste".to_string(),
        port: 0,
        db_max_connections: 1,
        token_ttl_hours: 1,
        bcrypt_cost: 4,
        admin: None,
        seed_demo: false,
    }
}

/// AppState completo sobre um store vazio, com um admin e dois usuários comuns.
pub struct TestContext {
    pub state: AppState,
    pub store: Arc<dyn Store>,
    pub admin: Caller,
    pub user: Caller,
    pub other: Caller,
}

impl TestContext {
    pub async fn new() -> Self {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());

        let mut tx = store.begin().await.unwrap();
        let admin = tx.insert_user(&new_user("admin@helppet.com", Role::Admin)).await.unwrap();
        let user = tx.insert_user(&new_user("maria@email.com", Role::User)).await.unwrap();
        let other = tx.insert_user(&new_user("joao@email.com", Role::User)).await.unwrap();
        tx.commit().await.unwrap();

        Self {
            state: AppState::with_store(store.clone(), &test_config()),
            store,
            admin: admin.caller(),
            user: user.caller(),
            other: other.caller(),
        }
    }

    pub fn app(&self) -> Router {
        routes::create_router(self.state.clone())
    }

    /// Token assinado para um dos usuários do contexto.
    pub fn token(&self, caller: &Caller) -> String {
        let now = Utc::now();
        let user = User {
            id: caller.user_id,
            email: String::new(),
            name: String::new(),
            password_hash: String::new(),
            role: caller.role,
            created_at: now,
            updated_at: now,
        };
        self.state.auth_service.create_token(&user).unwrap()
    }

    // --- SEEDS (direto no store, sem passar pelas regras) ---

    pub async fn seed_city(&self) -> City {
        let mut tx = self.store.begin().await.unwrap();
        let city = tx.insert_city(&city_payload()).await.unwrap();
        tx.commit().await.unwrap();
        city
    }

    pub async fn seed_institution(&self, cnpj: &str) -> Institution {
        let mut tx = self.store.begin().await.unwrap();
        let institution = tx.insert_institution(&institution_payload(cnpj)).await.unwrap();
        tx.commit().await.unwrap();
        institution
    }

    pub async fn seed_vet(&self, crmv: &str) -> Veterinarian {
        let city = self.seed_city().await;
        let mut tx = self.store.begin().await.unwrap();
        let vet = tx.insert_veterinarian(&vet_payload(crmv, city.id)).await.unwrap();
        tx.commit().await.unwrap();
        vet
    }

    pub async fn seed_animal(&self, name: &str) -> Animal {
        self.insert_animal(animal_payload(name)).await
    }

    pub async fn seed_animal_in(&self, name: &str, institution_id: Uuid) -> Animal {
        self.insert_animal(CreateAnimalPayload { institution_id: Some(institution_id), ..animal_payload(name) })
            .await
    }

    pub async fn seed_animal_with_tutor(&self, name: &str, tutor_id: Uuid) -> Animal {
        self.insert_animal(CreateAnimalPayload { tutor_id: Some(tutor_id), ..animal_payload(name) })
            .await
    }

    async fn insert_animal(&self, payload: CreateAnimalPayload) -> Animal {
        let mut tx = self.store.begin().await.unwrap();
        let animal = tx.insert_animal(&payload).await.unwrap();
        tx.commit().await.unwrap();
        animal
    }

    pub async fn seed_consultation(&self, animal_id: Uuid, veterinarian_id: Uuid) -> Consultation {
        let mut tx = self.store.begin().await.unwrap();
        let consultation = tx
            .insert_consultation(&CreateConsultationPayload {
                date: Utc::now(),
                animal_id,
                veterinarian_id,
                tutor_id: None,
                description: Some("Vacinação".to_string()),
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();
        consultation
    }
}
