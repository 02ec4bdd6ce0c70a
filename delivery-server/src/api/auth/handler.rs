//! Authentication Handlers
//!
//! Handles registration, OTP verification, login and profile updates.

use std::time::Duration;

use axum::{Json, extract::State};

use crate::auth::{self, CurrentUser};
use crate::core::ServerState;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_text, validate_password,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ids};
use shared::client::{
    LoginRequest, LoginResponse, ProfileUpdate, RegisterRequest, RegisterResponse, UserInfo,
    VerifyRequest,
};
use shared::models::User;

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

fn user_info(state: &ServerState, user: &User) -> UserInfo {
    UserInfo {
        id: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        phone: user.phone.clone(),
        verified: user.verified,
        is_admin: state.config.is_admin(&user.email),
    }
}

/// POST /api/auth/register - 注册，创建待验证账户并发送验证码
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<RegisterResponse>> {
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    validate_optional_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let password_hash = auth::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let now_ms = chrono::Utc::now().timestamp_millis();
    let otp = ids::generate_otp_code();
    let user = User {
        id: ids::new_id(),
        name: req.name.trim().to_string(),
        email: req.email.trim().to_ascii_lowercase(),
        phone: req.phone,
        password_hash,
        verified: false,
        otp_code: Some(otp.clone()),
        otp_expires_at: Some(auth::otp_expiry(now_ms)),
        is_active: true,
        created_at: now_ms,
    };

    let user = state.store.create_user(user).await?;

    tracing::info!(user_id = %user.id, email = %user.email, "User registered");

    // Best-effort: delivery failure does not fail the registration
    state
        .notifications
        .send_otp(&user.email, &user.name, &otp)
        .await;

    Ok(Json(RegisterResponse {
        user: user_info(&state, &user),
        otp_sent: true,
    }))
}

/// POST /api/auth/verify - 校验验证码，标记邮箱已验证
pub async fn verify(
    State(state): State<ServerState>,
    Json(req): Json<VerifyRequest>,
) -> AppResult<Json<UserInfo>> {
    validate_email(&req.email)?;

    let email = req.email.trim().to_ascii_lowercase();
    let mut user = state
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {email} not found")))?;

    let now_ms = chrono::Utc::now().timestamp_millis();
    if !auth::otp_is_valid(
        user.otp_code.as_deref(),
        user.otp_expires_at,
        req.code.trim(),
        now_ms,
    ) {
        tracing::warn!(email = %email, "OTP verification failed");
        return Err(AppError::invalid("Invalid or expired verification code"));
    }

    user.verified = true;
    user.otp_code = None;
    user.otp_expires_at = None;
    let user = state.store.update_user(&user).await?;

    tracing::info!(user_id = %user.id, "Email verified");

    Ok(Json(user_info(&state, &user)))
}

/// POST /api/auth/login - 密码登录，签发 JWT
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let email = req.email.trim().to_ascii_lowercase();
    let user = state.store.find_user_by_email(&email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent account enumeration
    let user = match user {
        Some(u) => {
            if !u.is_active {
                return Err(AppError::forbidden("Account has been disabled"));
            }
            let password_valid = auth::verify_password(&req.password, &u.password_hash)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
            if !password_valid {
                tracing::warn!(email = %email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }
            u
        }
        None => {
            tracing::warn!(email = %email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let token = state
        .jwt_service
        .generate_token(&user)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = %user.id, email = %user.email, "User logged in successfully");

    Ok(Json(LoginResponse {
        token,
        user: user_info(&state, &user),
    }))
}

/// GET /api/auth/me - 当前用户资料
pub async fn me(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<UserInfo>> {
    let user = state
        .store
        .find_user_by_id(&current.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(user_info(&state, &user)))
}

/// PUT /api/auth/profile - 更新昵称 / 电话
pub async fn update_profile(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(req): Json<ProfileUpdate>,
) -> AppResult<Json<UserInfo>> {
    validate_optional_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let mut user = state
        .store
        .find_user_by_id(&current.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    if let Some(name) = req.name {
        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        user.name = name.trim().to_string();
    }
    if let Some(phone) = req.phone {
        user.phone = Some(phone);
    }

    let user = state.store.update_user(&user).await?;
    Ok(Json(user_info(&state, &user)))
}
