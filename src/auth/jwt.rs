use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::{AuthError, Claims, UserSession};

/// JWT token service for creating and validating tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expires_in: Duration,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .field("token_expires_in", &self.token_expires_in)
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given secret and token lifetime
    pub fn new(secret: &str, token_expires_in: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expires_in,
        }
    }

    /// Create a bearer token for a user
    pub fn create_token(&self, user_id: Uuid, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + self.token_expires_in;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AuthError::Jwt)
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }

    /// Extract user session from token
    pub fn extract_user_session(&self, token: &str) -> Result<UserSession, AuthError> {
        let claims = self.validate_token(token)?;
        UserSession::from_claims(&claims).map_err(|_| AuthError::InvalidToken)
    }
}

/// Extract bearer token from authorization header. The scheme is matched
/// case-insensitively, so `bearer <token>` is accepted.
pub fn extract_bearer_token(auth_header: &str) -> Result<&str, AuthError> {
    let (scheme, token) = auth_header
        .trim()
        .split_once(' ')
        .ok_or(AuthError::InvalidAuthHeaderFormat)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidAuthHeaderFormat);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeaderFormat);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn jwt_service() -> JwtService {
        JwtService::new("test_secret", Duration::hours(1))
    }

    #[test]
    fn test_jwt_creation_and_validation() {
        let jwt_service = jwt_service();
        let user_id = Uuid::new_v4();
        let email = "test@example.com";

        let token = jwt_service.create_token(user_id, email).unwrap();
        let claims = jwt_service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, email);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(extract_bearer_token("Bearer test_token").unwrap(), "test_token");
        assert_eq!(extract_bearer_token("bearer test_token").unwrap(), "test_token");
        assert_eq!(extract_bearer_token("BEARER  test_token ").unwrap(), "test_token");

        assert!(extract_bearer_token("Invalid header").is_err());
        assert!(extract_bearer_token("Bearer ").is_err());
        assert!(extract_bearer_token("Basic dXNlcjpwYXNz").is_err());
        assert!(extract_bearer_token("test_token").is_err());
    }

    #[test]
    fn test_user_session_extraction() {
        let jwt_service = jwt_service();
        let user_id = Uuid::new_v4();

        let token = jwt_service.create_token(user_id, "coach@example.com").unwrap();
        let session = jwt_service.extract_user_session(&token).unwrap();

        assert_eq!(session.user_id, user_id);
        assert_eq!(session.email, "coach@example.com");
    }

    #[test]
    fn test_tokens_have_unique_ids() {
        let jwt_service = jwt_service();
        let user_id = Uuid::new_v4();

        let first = jwt_service.create_token(user_id, "a@example.com").unwrap();
        let second = jwt_service.create_token(user_id, "a@example.com").unwrap();

        let first_jti = jwt_service.validate_token(&first).unwrap().jti;
        let second_jti = jwt_service.validate_token(&second).unwrap().jti;
        assert_ne!(first_jti, second_jti);
    }

    #[test]
    fn test_expired_token_rejected() {
        // Past the default 60s leeway
        let jwt_service = JwtService::new("test_secret", Duration::minutes(-5));
        let token = jwt_service.create_token(Uuid::new_v4(), "old@example.com").unwrap();

        assert_matches!(jwt_service.validate_token(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let token = JwtService::new("other_secret", Duration::hours(1))
            .create_token(Uuid::new_v4(), "x@example.com")
            .unwrap();

        assert_matches!(jwt_service().validate_token(&token), Err(AuthError::InvalidToken));
    }
}
