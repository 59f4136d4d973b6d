// src/config.rs

use std::{env, sync::Arc};

use anyhow::Context;

use crate::{
    db::{seed, MemoryStore, PgStore, Store},
    services::{
        adoption_service::AdoptionService, animal_service::AnimalService, auth::AuthService,
        city_service::CityService, clinic_service::ClinicService, complaint_service::ComplaintService,
        dashboard_service::DashboardService, donation_service::DonationService,
        institution_service::InstitutionService, tutor_service::TutorService, user_service::UserService,
        veterinarian_service::VeterinarianService,
    },
};

// Valor de DATABASE_URL que liga o store em memória
const MEMORY_DATABASE_URL: &str = "memory";

/// Administrador criado na subida, se configurado.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub admin: Option<AdminBootstrap>,
    pub seed_demo: bool,
}

impl Config {
    /// Lê as variáveis de ambiente (o `.env` já deve ter sido carregado).
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let admin = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(AdminBootstrap {
                email,
                password,
                name: env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrador".to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            port: parse_or("PORT", 3000)?,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 5)?,
            token_ttl_hours: parse_or("TOKEN_TTL_HOURS", 24)?,
            bcrypt_cost: parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            admin,
            seed_demo: parse_or("SEED_DEMO", false)?,
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE_URL
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw.parse().with_context(|| format!("{key} inválido: {raw}")),
        Err(_) => Ok(default),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub city_service: CityService,
    pub institution_service: InstitutionService,
    pub tutor_service: TutorService,
    pub veterinarian_service: VeterinarianService,
    pub animal_service: AnimalService,
    pub clinic_service: ClinicService,
    pub adoption_service: AdoptionService,
    pub donation_service: DonationService,
    pub complaint_service: ComplaintService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    /// Conecta o store escolhido pela configuração e roda as migrações.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn Store> = if config.uses_memory_store() {
            tracing::warn!("Usando store em memória: os dados somem ao reiniciar");
            Arc::new(MemoryStore::new())
        } else {
            let pg = PgStore::connect(&config.database_url, config.db_max_connections).await?;
            tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

            pg.migrate().await.context("Falha ao rodar as migrações do banco de dados")?;
            tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");
            Arc::new(pg)
        };

        if config.seed_demo {
            seed::seed_demo(store.as_ref()).await.context("Falha ao criar os dados de demonstração")?;
        }

        Ok(Self::with_store(store, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_store(store: Arc<dyn Store>, config: &Config) -> Self {
        Self {
            auth_service: AuthService::new(
                store.clone(),
                config.jwt_secret.clone(),
                config.token_ttl_hours,
                config.bcrypt_cost,
            ),
            user_service: UserService::new(store.clone()),
            city_service: CityService::new(store.clone()),
            institution_service: InstitutionService::new(store.clone()),
            tutor_service: TutorService::new(store.clone()),
            veterinarian_service: VeterinarianService::new(store.clone()),
            animal_service: AnimalService::new(store.clone()),
            clinic_service: ClinicService::new(store.clone()),
            adoption_service: AdoptionService::new(store.clone()),
            donation_service: DonationService::new(store.clone()),
            complaint_service: ComplaintService::new(store.clone()),
            dashboard_service: DashboardService::new(store),
        }
    }
}
