/// User account and session endpoints
///
/// # Endpoints
///
/// - `POST /v1/users/register` - Register a new NGO or donor account
/// - `POST /v1/users/login` - Login with username or email
/// - `POST /v1/users/refresh` - Exchange a refresh token for a new access token
/// - `POST /v1/users/logout` - Invalidate the stored refresh token
/// - `GET  /v1/users/me` - Current user profile
/// - `PUT  /v1/users/me` - Update profile
/// - `POST /v1/users/change-password` - Change password

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use donatehub_shared::{
    auth::{
        jwt::{self, Claims, TokenType},
        middleware::AuthContext,
        password,
    },
    models::user::{CreateUser, User, UserRole},
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    response::ApiResponse,
};

/// Register request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Unique username
    #[validate(length(min = 3, max = 64, message = "Username must be 3-64 characters"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Display name
    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,

    /// Password (validated for strength separately)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Account role, "ngo" or "donor"; defaults to donor
    pub role: Option<String>,
}

/// Login request; either username or email identifies the account
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

/// Session tokens plus the authenticated user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Profile update request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,
}

/// Password change request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Registers a new user account
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or unknown role
/// - `409 Conflict`: Username or email already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<ApiResponse<User>> {
    req.validate().map_err(ApiError::from_validation)?;

    let role = match req.role.as_deref() {
        None => UserRole::Donor,
        Some(raw) => UserRole::parse(raw).ok_or_else(|| {
            ApiError::BadRequest("Invalid role. Role must be either 'ngo' or 'donor'".to_string())
        })?,
    };

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    let username = req.username.trim().to_lowercase();
    let email = req.email.trim().to_string();

    if User::exists(&state.db, &username, &email).await? {
        return Err(ApiError::StateConflict(
            "User with the email or username already exists".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username,
            email,
            full_name: req.full_name.trim().to_string(),
            password_hash,
            role,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, role = role.as_str(), "User registered");

    Ok(ApiResponse::created("User registered successfully", user))
}

/// Authenticates a user and issues access/refresh tokens
///
/// The refresh token is persisted on the user row; renewing a session
/// requires the presented token to match the stored one.
///
/// # Errors
///
/// - `400 Bad Request`: Neither username nor email provided
/// - `401 Unauthorized`: Unknown account or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<ApiResponse<SessionResponse>> {
    let identifier = req
        .username
        .as_deref()
        .or(req.email.as_deref())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Username or email is required".to_string()))?;

    let user = User::find_by_identifier(&state.db, identifier.trim())
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username/email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid username/email or password".to_string(),
        ));
    }

    let access_claims = Claims::new(user.id, user.role, TokenType::Access);
    let refresh_claims = Claims::new(user.id, user.role, TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    User::set_refresh_token(&state.db, user.id, Some(&refresh_token)).await?;

    Ok(ApiResponse::ok(
        "Logged in successfully",
        SessionResponse {
            user,
            access_token,
            refresh_token,
        },
    ))
}

/// Exchanges a valid refresh token for a new access token
///
/// # Errors
///
/// - `401 Unauthorized`: Token invalid, expired, or no longer the stored one
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<ApiResponse<RefreshResponse>> {
    let claims = jwt::validate_refresh_token(&req.refresh_token, state.jwt_secret())?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

    // A logout (or a newer login) invalidates previously issued refresh tokens
    if user.refresh_token.as_deref() != Some(req.refresh_token.as_str()) {
        return Err(ApiError::Unauthorized("Refresh token revoked".to_string()));
    }

    let access_claims = Claims::new(user.id, user.role, TokenType::Access);
    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;

    Ok(ApiResponse::ok(
        "Token refreshed successfully",
        RefreshResponse { access_token },
    ))
}

/// Invalidates the stored refresh token for the authenticated user
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    User::set_refresh_token(&state.db, auth.user_id, None).await?;

    Ok(ApiResponse::ok(
        "Logged out successfully",
        serde_json::json!({}),
    ))
}

/// Returns the authenticated user's profile
pub async fn current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<ApiResponse<User>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(ApiResponse::ok("User fetched successfully", user))
}

/// Updates the authenticated user's display name
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<ApiResponse<User>> {
    req.validate().map_err(ApiError::from_validation)?;

    let user = User::update_full_name(&state.db, auth.user_id, req.full_name.trim())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(ApiResponse::ok("User updated successfully", user))
}

/// Changes the authenticated user's password
///
/// # Errors
///
/// - `400 Bad Request`: Confirmation mismatch, weak password, or wrong
///   current password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    if req.old_password.trim().is_empty()
        || req.new_password.trim().is_empty()
        || req.confirm_password.trim().is_empty()
    {
        return Err(ApiError::BadRequest("All fields are required".to_string()));
    }

    if req.new_password != req.confirm_password {
        return Err(ApiError::BadRequest(
            "Confirm password does not match".to_string(),
        ));
    }

    password::validate_password_strength(&req.new_password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "newPassword".to_string(),
            message: e,
        }])
    })?;

    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let valid = password::verify_password(&req.old_password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::BadRequest(
            "Incorrect current password".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.new_password)?;
    User::update_password_hash(&state.db, auth.user_id, &password_hash).await?;

    Ok(ApiResponse::ok(
        "Password changed successfully",
        serde_json::json!({}),
    ))
}
