// src/db/postgres.rs

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, postgres::PgPoolOptions};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{Store, StoreTx, Transaction},
    models::{
        entity::{relations_between, EntityKind, UniqueField, LINKED_RECORDS},
        registry::TUTOR_ALREADY_EXISTS,
    },
};

/// Store de produção sobre um pool do Postgres.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Aplica as migrations de `./migrations`.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx }))
    }
}

/// Uma transação aberta. Os repositórios (`*_repo.rs`) implementam as
/// operações de cada domínio sobre este tipo.
pub struct PgTx {
    pub(super) tx: sqlx::Transaction<'static, Postgres>,
}

// Converte violações de restrição nas mensagens que o cliente entende.
// As checagens da camada de regras já cobrem estes casos; isto fecha
// a janela entre a checagem e a escrita.
pub(super) fn map_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                // O nome padrão que o Postgres cria para "UNIQUE" na coluna
                Some("users_email_key") => AppError::EmailAlreadyExists,
                Some("institutions_cnpj_key") => {
                    AppError::Conflict(UniqueField::InstitutionCnpj.conflict_message())
                }
                Some("veterinarians_crmv_key") => {
                    AppError::Conflict(UniqueField::VeterinarianCrmv.conflict_message())
                }
                Some("tutors_user_id_key") => AppError::Conflict(TUTOR_ALREADY_EXISTS.to_string()),
                Some(other) => AppError::Conflict(format!("Registro duplicado ({other})")),
                None => AppError::Conflict("Registro duplicado".to_string()),
            };
        }
        if db_err.is_foreign_key_violation() {
            return AppError::BadRequest(LINKED_RECORDS.to_string());
        }
    }
    e.into()
}

#[async_trait]
impl Transaction for PgTx {
    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn exists(&mut self, kind: EntityKind, id: Uuid) -> Result<bool, AppError> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", kind.table());
        let found = sqlx::query_scalar::<_, bool>(&sql)
            .bind(id)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(found)
    }

    async fn count(&mut self, kind: EntityKind) -> Result<i64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM {}", kind.table());
        let total = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(total)
    }

    async fn count_with_status(&mut self, kind: EntityKind, status: &str) -> Result<i64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE status::text = $1", kind.table());
        let total = sqlx::query_scalar::<_, i64>(&sql)
            .bind(status)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(total)
    }

    async fn count_referencing(
        &mut self,
        dependent: EntityKind,
        target: EntityKind,
        id: Uuid,
    ) -> Result<i64, AppError> {
        let mut total = 0;
        for relation in relations_between(dependent, target) {
            let sql = format!(
                "SELECT COUNT(*) FROM {} WHERE {} = $1",
                dependent.table(),
                relation.column
            );
            total += sqlx::query_scalar::<_, i64>(&sql)
                .bind(id)
                .fetch_one(&mut *self.tx)
                .await?;
        }
        Ok(total)
    }

    async fn find_id_by_unique(
        &mut self,
        field: UniqueField,
        value: &str,
    ) -> Result<Option<Uuid>, AppError> {
        let sql = format!(
            "SELECT id FROM {} WHERE {} = $1",
            field.kind().table(),
            field.column()
        );
        let id = sqlx::query_scalar::<_, Uuid>(&sql)
            .bind(value)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(id)
    }

    async fn delete(&mut self, kind: EntityKind, id: Uuid) -> Result<(), AppError> {
        // As FKs opcionais são ON DELETE SET NULL e as obrigatórias RESTRICT.
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(kind.not_found_message()));
        }
        Ok(())
    }
}
