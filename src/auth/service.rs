use std::sync::Arc;

use tracing::{debug, info};
use validator::ValidateEmail;

use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, PasswordPolicy, DEFAULT_BCRYPT_COST,
};
use crate::auth::{AuthError, AuthResponse, CredentialsRequest, JwtService, UserSession};
use crate::models::NewUser;
use crate::repositories::{RepositoryError, UserRepository};

/// Issues and validates bearer tokens on top of a [`UserRepository`].
#[derive(Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    users: Arc<dyn UserRepository>,
    password_policy: PasswordPolicy,
    bcrypt_cost: u32,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("jwt_service", &self.jwt_service)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt_service: JwtService) -> Self {
        Self {
            jwt_service,
            users,
            password_policy: PasswordPolicy::default(),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }

    /// Override the bcrypt work factor (tests use the minimum of 4).
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Register a new user and return a token for it
    pub async fn signup(&self, request: CredentialsRequest) -> Result<AuthResponse, AuthError> {
        let (email, password) = required_credentials(request)?;

        if !email.validate_email() {
            return Err(AuthError::EmailValidation(format!("{email} is not a valid email")));
        }
        validate_password_strength(&password, &self.password_policy)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(&password, self.bcrypt_cost)?;

        // The unique index still wins if two signups race past the lookup
        let user = self
            .users
            .create(NewUser {
                email,
                password_hash,
            })
            .await
            .map_err(|err| match err {
                RepositoryError::Duplicate => AuthError::EmailAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        let token = self.jwt_service.create_token(user.id, &user.email)?;
        info!(user_id = %user.id, "user signed up");

        Ok(AuthResponse {
            email: user.email,
            token,
        })
    }

    /// Login user
    pub async fn login(&self, request: CredentialsRequest) -> Result<AuthResponse, AuthError> {
        let (email, password) = required_credentials(request)?;

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&password, &user.password_hash)? {
            debug!(user_id = %user.id, "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.jwt_service.create_token(user.id, &user.email)?;

        Ok(AuthResponse {
            email: user.email,
            token,
        })
    }

    /// Validate user session from token. The token must verify and its
    /// subject must still exist in the credential store.
    pub async fn validate_session(&self, token: &str) -> Result<UserSession, AuthError> {
        let session = self.jwt_service.extract_user_session(token)?;

        if self.users.find_by_id(session.user_id).await?.is_none() {
            debug!(user_id = %session.user_id, "token subject no longer exists");
            return Err(AuthError::InvalidToken);
        }

        Ok(session)
    }
}

/// Trim both fields, lower-case the email, and reject blanks.
fn required_credentials(request: CredentialsRequest) -> Result<(String, String), AuthError> {
    let email = request
        .email
        .map(|email| email.trim().to_lowercase())
        .filter(|email| !email.is_empty());
    let password = request.password.filter(|password| !password.is_empty());

    match (email, password) {
        (Some(email), Some(password)) => Ok((email, password)),
        _ => Err(AuthError::MissingFields),
    }
}
