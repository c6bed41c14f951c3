//! User accounts: login and password-bearing create/update.

use backlot_auth::{hash_password, verify_password, JwtService};
use backlot_core::{AppError, AppResult, Id};
use backlot_db::users::{NewUser, UserChanges};
use backlot_db::UserRepo;
use backlot_models::{CreateUser, UpdateUser, User};
use sqlx::PgPool;

/// Uniform message so a probe cannot distinguish unknown emails from wrong
/// passwords.
const BAD_CREDENTIALS: &str = "invalid email or password";

#[derive(Clone)]
pub struct AccountService {
    users: UserRepo,
    jwt: JwtService,
}

impl AccountService {
    pub fn new(pool: PgPool, jwt: JwtService) -> Self {
        Self {
            users: UserRepo::new(pool),
            jwt,
        }
    }

    /// Verify credentials and issue a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::unauthorized(BAD_CREDENTIALS))?;

        if !user.active {
            return Err(AppError::unauthorized(BAD_CREDENTIALS));
        }

        let valid = verify_password(password, &user.password_hash)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        if !valid {
            return Err(AppError::unauthorized(BAD_CREDENTIALS));
        }

        let token = self
            .jwt
            .issue(user.id, &user.email, user.role)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        tracing::info!(user_id = user.id, "login succeeded");
        Ok((token, user))
    }

    pub async fn create(&self, dto: CreateUser) -> AppResult<User> {
        let password_hash =
            hash_password(&dto.password).map_err(|e| AppError::Internal(e.to_string()))?;

        let user = self
            .users
            .create(NewUser {
                email: dto.email,
                name: dto.name,
                password_hash,
                role: dto.role,
                active: dto.active,
            })
            .await?;

        Ok(user)
    }

    pub async fn update(&self, id: Id, dto: UpdateUser) -> AppResult<User> {
        let password_hash = match &dto.password {
            Some(password) => {
                Some(hash_password(password).map_err(|e| AppError::Internal(e.to_string()))?)
            }
            None => None,
        };

        let user = self
            .users
            .update(
                id,
                UserChanges {
                    email: dto.email,
                    name: dto.name,
                    password_hash,
                    role: dto.role,
                    active: dto.active,
                },
            )
            .await?;

        Ok(user)
    }
}
