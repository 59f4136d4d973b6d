// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::Store,
    models::{
        auth::{AuthResponse, Claims, NewUser, RegisterUserPayload, Role, User},
        entity::UniqueField,
    },
    rules,
};

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    jwt_secret: String,
    token_ttl_hours: i64,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, jwt_secret: String, token_ttl_hours: i64, bcrypt_cost: u32) -> Self {
        Self { store, jwt_secret, token_ttl_hours, bcrypt_cost }
    }

    // Todo cadastro público nasce com papel USER
    pub async fn register_user(&self, payload: &RegisterUserPayload) -> Result<AuthResponse, AppError> {
        // Hashing fora da transação, pois não toca no banco
        let password_hash = self.hash_password(&payload.password).await?;

        let mut tx = self.store.begin().await?;
        rules::require_unique(&mut *tx, UniqueField::UserEmail, &payload.email, None).await?;
        let user = tx
            .insert_user(&NewUser {
                email: payload.email.clone(),
                name: payload.name.clone(),
                password_hash,
                role: Role::User,
            })
            .await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, "Novo usuário registrado");
        self.auth_response(&user)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let mut tx = self.store.begin().await?;
        let user = tx
            .find_user_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;
        drop(tx);

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.auth_response(&user)
    }

    /// Resolve o token para o usuário atual. O papel vem do banco, não do token,
    /// então rebaixar um admin vale a partir da próxima requisição.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let mut tx = self.store.begin().await?;
        tx.get_user(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// Garante que exista um administrador com este e-mail.
    /// Se o e-mail já estiver cadastrado, nada é alterado.
    pub async fn bootstrap_admin(&self, email: &str, password: &str, name: &str) -> Result<(), AppError> {
        {
            let mut tx = self.store.begin().await?;
            if let Some(existing) = tx.find_user_by_email(email).await? {
                if existing.role != Role::Admin {
                    tracing::warn!(email, "ADMIN_EMAIL pertence a um usuário comum; papel mantido");
                }
                return Ok(());
            }
        }

        let password_hash = self.hash_password(password).await?;
        let mut tx = self.store.begin().await?;
        let admin = tx
            .insert_user(&NewUser {
                email: email.to_string(),
                name: name.to_string(),
                password_hash,
                role: Role::Admin,
            })
            .await?;
        tx.commit().await?;

        tracing::info!(user_id = %admin.id, "Administrador inicial criado");
        Ok(())
    }

    pub fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(self.token_ttl_hours);

        let claims = Claims {
            sub: user.id,
            role: user.role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    fn auth_response(&self, user: &User) -> Result<AuthResponse, AppError> {
        Ok(AuthResponse {
            access_token: self.create_token(user)?,
            user: user.summary(),
        })
    }

    async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryStore::new()), "segredo-de-teste".to_string(), 24, 4)
    }

    fn register_payload(email: &str) -> RegisterUserPayload {
        RegisterUserPayload {
            name: "Maria da Silva".to_string(),
            email: email.to_string(),
            password: "senha123".to_string(),
        }
    }

    #[tokio::test]
    async fn register_then_login_yields_a_valid_token() {
        let auth = service();
        let registered = auth.register_user(&register_payload("maria@email.com")).await.unwrap();
        assert_eq!(registered.user.role, Role::User);

        let logged = auth.login_user("maria@email.com", "senha123").await.unwrap();
        let user = auth.validate_token(&logged.access_token).await.unwrap();
        assert_eq!(user.id, registered.user.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let auth = service();
        auth.register_user(&register_payload("maria@email.com")).await.unwrap();
        let err = auth.register_user(&register_payload("maria@email.com")).await.unwrap_err();
        assert!(matches!(err, AppError::EmailAlreadyExists));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let auth = service();
        auth.register_user(&register_payload("maria@email.com")).await.unwrap();
        assert!(matches!(
            auth.login_user("maria@email.com", "errada!").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login_user("ninguem@email.com", "senha123").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let auth = service();
        assert!(matches!(auth.validate_token("abc.def.ghi").await, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_is_invalid() {
        let auth = service();
        let registered = auth.register_user(&register_payload("maria@email.com")).await.unwrap();
        let other = AuthService::new(Arc::new(MemoryStore::new()), "outro".to_string(), 24, 4);
        assert!(matches!(
            other.validate_token(&registered.access_token).await,
            Err(AppError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn bootstrap_admin_is_idempotent() {
        let auth = service();
        auth.bootstrap_admin("adm@helppet.com", "admin123", "Admin").await.unwrap();
        auth.bootstrap_admin("adm@helppet.com", "admin123", "Admin").await.unwrap();

        let logged = auth.login_user("adm@helppet.com", "admin123").await.unwrap();
        assert_eq!(logged.user.role, Role::Admin);
    }
}
