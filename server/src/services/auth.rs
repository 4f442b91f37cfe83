use chrono::Duration;
use pantry::now;
use pantry::user::{
    AuthResponse, LoginRequest, RegisterRequest, User, UserRole,
};
use tracing::info;
use uuid::Uuid;

use crate::auth::{hash_password, issue_token, verify_password};
use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::repository::UserRepository;

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(users: UserRepository, jwt: JwtConfig) -> Self {
        Self { users, jwt }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        let email = request.email.to_lowercase();
        info!("Registering new user {email}");

        if self.users.by_email(&email).await?.is_some() {
            return Err(AppError::Validation(
                "User with this email already exists".into(),
            ));
        }

        let mut user = User::new(
            request.first_name,
            request.last_name,
            email,
            request.phone_number,
            hash_password(&request.password),
            request.role.unwrap_or(UserRole::User),
        );
        user.address = request.address;

        self.users.create(&user).await?;
        let response = self.issue_session(user).await?;
        info!("User {} registered", response.user.id);
        Ok(response)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        info!("Login attempt for {}", request.email);

        let user = self
            .users
            .by_email(&request.email)
            .await?
            .filter(|user| verify_password(&request.password, &user.password_hash))
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active {
            return Err(AppError::Unauthorized);
        }

        self.issue_session(user).await
    }

    /// Rotates both tokens. Unknown or expired refresh tokens are a plain
    /// authentication failure.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let user = self
            .users
            .by_refresh_token(refresh_token)
            .await?
            .filter(|user| {
                user.refresh_token_expires_at
                    .map(|expires| expires > now())
                    .unwrap_or(false)
            })
            .ok_or(AppError::Unauthorized)?;

        self.issue_session(user).await
    }

    pub async fn logout(&self, user_id: &str) -> AppResult<()> {
        if let Some(mut user) = self.users.get(user_id).await? {
            user.refresh_token = None;
            user.refresh_token_expires_at = None;
            user.updated_at = now();
            self.users.update(&user).await?;
        }
        Ok(())
    }

    async fn issue_session(&self, mut user: User) -> AppResult<AuthResponse> {
        let (token, expires_at) = issue_token(&user, &self.jwt)?;

        user.refresh_token = Some(Uuid::new_v4().to_string());
        user.refresh_token_expires_at = Some(now() + Duration::days(self.jwt.refresh_days));
        user.updated_at = now();
        self.users.update(&user).await?;

        Ok(AuthResponse {
            token,
            refresh_token: user.refresh_token.clone().unwrap_or_default(),
            expires_at,
            user: user.profile(),
        })
    }
}
