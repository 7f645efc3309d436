use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    dto::auth::{LoginRequest, RegisterRequest, TokenResponse},
    error::{AppError, AppResult},
    models::SoftDelete,
    services::user_service::UserService,
    utils::jwt::JwtSigner,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn register(&self, payload: RegisterRequest) -> AppResult<TokenResponse>;

    async fn login(&self, payload: LoginRequest) -> AppResult<TokenResponse>;
}

pub struct AuthServiceImpl {
    users: Arc<dyn UserService>,
    jwt: Arc<JwtSigner>,
}

impl AuthServiceImpl {
    pub fn new(users: Arc<dyn UserService>, jwt: Arc<JwtSigner>) -> Self {
        Self { users, jwt }
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    #[tracing::instrument(skip_all, fields(username = %payload.user_name))]
    async fn register(&self, payload: RegisterRequest) -> AppResult<TokenResponse> {
        let user = self.users.create(payload).await?;
        let access_token = self.jwt.issue(&user)?;
        Ok(TokenResponse { access_token })
    }

    #[tracing::instrument(skip_all, fields(username = %payload.user_name))]
    async fn login(&self, payload: LoginRequest) -> AppResult<TokenResponse> {
        let user = self.users.get_by_username(&payload.user_name).await?;
        if user.is_deleted() {
            return Err(AppError::unauthorized("account has been deleted"));
        }
        user.validate_password(&payload.password)?;

        let access_token = self.jwt.issue(&user)?;
        tracing::info!(user_id = %user.id, "user logged in");
        Ok(TokenResponse { access_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{Role, User},
        services::user_service::MockUserService,
    };

    fn signer() -> Arc<JwtSigner> {
        Arc::new(JwtSigner::new("test-secret", "commerce-api", 60))
    }

    fn alice() -> User {
        User::new_from_payload(RegisterRequest {
            email: "alice@example.com".into(),
            user_name: "alice".into(),
            name: "Alice".into(),
            password: "wonderland".into(),
            role: "trainee".into(),
        })
        .unwrap()
    }

    fn login(password: &str) -> LoginRequest {
        LoginRequest {
            user_name: "alice".into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn register_issues_token_carrying_cart_id() {
        let user = alice();
        let expected = user.clone();
        let mut users = MockUserService::new();
        users.expect_create().returning(move |_| Ok(user.clone()));

        let jwt = signer();
        let service = AuthServiceImpl::new(Arc::new(users), jwt.clone());
        let token = service
            .register(RegisterRequest {
                email: "alice@example.com".into(),
                user_name: "alice".into(),
                name: "Alice".into(),
                password: "wonderland".into(),
                role: "trainee".into(),
            })
            .await
            .unwrap();

        let claims = jwt.verify(&token.access_token).unwrap();
        assert_eq!(claims.user_id, expected.id);
        assert_eq!(claims.cart_id, expected.cart_id);
        assert_eq!(claims.role, Role::Trainee);
    }

    #[tokio::test]
    async fn login_with_correct_password_succeeds() {
        let user = alice();
        let mut users = MockUserService::new();
        users
            .expect_get_by_username()
            .returning(move |_| Ok(user.clone()));

        let service = AuthServiceImpl::new(Arc::new(users), signer());
        assert!(service.login(login("wonderland")).await.is_ok());
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let user = alice();
        let mut users = MockUserService::new();
        users
            .expect_get_by_username()
            .returning(move |_| Ok(user.clone()));

        let service = AuthServiceImpl::new(Arc::new(users), signer());
        let err = service.login(login("looking-glass")).await.unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let mut users = MockUserService::new();
        users
            .expect_get_by_username()
            .returning(|_| Err(AppError::not_found("User")));

        let service = AuthServiceImpl::new(Arc::new(users), signer());
        let err = service.login(login("wonderland")).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn deleted_user_cannot_log_in() {
        let mut user = alice();
        let id = user.id;
        user.soft_delete(id).unwrap();
        let mut users = MockUserService::new();
        users
            .expect_get_by_username()
            .returning(move |_| Ok(user.clone()));

        let service = AuthServiceImpl::new(Arc::new(users), signer());
        let err = service.login(login("wonderland")).await.unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
