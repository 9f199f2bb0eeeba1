use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    Json, RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_email, validate_name, validate_password, validate_role};
use crate::config::AuthConfig;
use crate::db::{
    DbPool, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, Role, User,
    UserResponse,
};
use crate::AppState;

/// Claims carried inside an access token. The token is stateless; the
/// user row is re-read on every request so bans take effect immediately.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Issued at (unix timestamp)
    pub iat: i64,
    /// Expiration (unix timestamp)
    pub exp: i64,
}

/// Authenticated caller context, extracted from a bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Sign an access token for the given user id
pub fn issue_token(user_id: &str, auth: &AuthConfig) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + chrono::Duration::hours(auth.token_ttl_hours as i64)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("Failed to sign token: {}", e);
        ApiError::internal("Failed to issue token")
    })
}

/// Decode and validate an access token, returning its claims
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::unauthorized("Invalid or expired token"))
}

/// Require the caller to hold at least the given role
pub fn authorize(caller: &AuthUser, required: Role) -> Result<(), ApiError> {
    if caller.role.has_at_least(required) {
        Ok(())
    } else {
        Err(ApiError::forbidden("Insufficient permissions"))
    }
}

/// Registration endpoint
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let name = request.name.unwrap_or_default();
    let email = request.email.unwrap_or_default();
    let password = request.password.unwrap_or_default();
    let role = request.role.unwrap_or_default();

    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_name(&name) {
        errors.add("name", &e);
    }
    if let Err(e) = validate_email(&email) {
        errors.add("email", &e);
    }
    if let Err(e) = validate_password(&password) {
        errors.add("password", &e);
    }
    if let Err(e) = validate_role(&role) {
        errors.add("role", &e);
    }
    errors.finish()?;

    let taken: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;
    if taken.is_some() {
        return Err(ApiError::validation_field("email", "Email is already taken"));
    }

    let password_hash = hash_password(&password).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::internal("Failed to hash password")
    })?;

    let now = Utc::now().to_rfc3339();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        name,
        email,
        password_hash,
        role: role.to_lowercase(),
        is_banned: false,
        created_at: now.clone(),
        updated_at: now,
    };

    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, role, is_banned, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.role)
    .bind(user.is_banned)
    .bind(&user.created_at)
    .bind(&user.updated_at)
    .execute(&state.db)
    .await
    .map_err(|e| match &e {
        // A concurrent registration can win the race between the
        // duplicate check and this insert
        sqlx::Error::Database(db_err) if db_err.message().contains("UNIQUE constraint failed") => {
            ApiError::validation_field("email", "Email is already taken")
        }
        _ => ApiError::from(e),
    })?;

    tracing::info!("Registered new {} account: {}", user.role, user.email);

    let token = issue_token(&user.id, &state.config.auth)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: UserResponse::from(user),
            token,
        }),
    ))
}

/// Login endpoint
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // Find user by email
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&request.email)
        .fetch_optional(&state.db)
        .await?;

    let user = user.ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    // Verify password
    if !verify_password(&request.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    // Banned accounts authenticate but never receive a token
    if user.is_banned {
        return Err(ApiError::forbidden("User banned"));
    }

    let token = issue_token(&user.id, &state.config.auth)?;

    Ok(Json(LoginResponse { token }))
}

/// Create the configured admin account on startup if it does not exist
pub async fn ensure_admin_user(pool: &DbPool, email: &str, password: &str) -> anyhow::Result<()> {
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(password)
        .map_err(|e| anyhow::anyhow!("Failed to hash admin password: {}", e))?;
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, role, is_banned, created_at, updated_at)
         VALUES (?, ?, ?, ?, 'admin', 0, ?, ?)",
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind("Administrator")
    .bind(email)
    .bind(&password_hash)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    tracing::info!("Created admin user during setup: {}", email);
    Ok(())
}

/// Extractor for the current authenticated, non-banned user
#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| ApiError::unauthorized("Missing or malformed bearer token"))?;

        let claims = decode_token(bearer.token(), &state.config.auth.jwt_secret)?;

        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(&claims.sub)
            .fetch_optional(&state.db)
            .await?;
        let user = user.ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))?;

        // Bans take effect on the next request, not the next login
        if user.is_banned {
            return Err(ApiError::forbidden("User banned"));
        }

        Ok(AuthUser {
            role: user.role_enum(),
            id: user.id,
            email: user.email,
        })
    }
}
