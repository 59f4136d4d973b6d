// src/services/user_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::Store,
    models::auth::{Caller, UserSummary},
    rules,
};

// Leitura de contas pelo painel; o cadastro fica no AuthService
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self, caller: &Caller) -> Result<Vec<UserSummary>, AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        let users = tx.list_users().await?;
        Ok(users.iter().map(|u| u.summary()).collect())
    }

    pub async fn get(&self, caller: &Caller, id: Uuid) -> Result<UserSummary, AppError> {
        rules::require_admin(caller)?;

        let mut tx = self.store.begin().await?;
        tx.get_user(id)
            .await?
            .map(|u| u.summary())
            .ok_or(AppError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::TestContext;

    #[tokio::test]
    async fn admin_sees_every_account() {
        let ctx = TestContext::new().await;
        let users = ctx.state.user_service.list(&ctx.admin).await.unwrap();
        assert_eq!(users.len(), 3);

        let user = ctx.state.user_service.get(&ctx.admin, ctx.user.user_id).await.unwrap();
        assert_eq!(user.id, ctx.user.user_id);
    }

    #[tokio::test]
    async fn regular_user_cannot_browse_accounts() {
        let ctx = TestContext::new().await;
        assert!(matches!(ctx.state.user_service.list(&ctx.user).await, Err(AppError::Forbidden)));
        assert!(matches!(
            ctx.state.user_service.get(&ctx.user, ctx.user.user_id).await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let ctx = TestContext::new().await;
        assert!(matches!(
            ctx.state.user_service.get(&ctx.admin, Uuid::new_v4()).await,
            Err(AppError::UserNotFound)
        ));
    }
}
