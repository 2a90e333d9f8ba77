//! Account-management handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::db::ProfileUpdate;
use crate::web::dto::{
    AccountInfo, ApiResponse, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest,
    MessageResponse, RegisterRequest, ResetPasswordRequest, SessionResponse,
    UpdateProfileRequest,
};
use crate::web::error::ApiError;
use crate::web::middleware::{CurrentAccount, SESSION_COOKIE};

use super::AppState;

/// Build the session cookie for a freshly issued token.
fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_max_age(time::Duration::seconds(state.sessions.ttl_secs() as i64));
    cookie.set_secure(state.secure_cookies);
    cookie.set_same_site(if state.secure_cookies {
        SameSite::None
    } else {
        SameSite::Lax
    });
    cookie
}

/// Build an expired session cookie that clears the client's copy.
fn expired_session_cookie(state: &AppState) -> Cookie<'static> {
    let mut cookie = session_cookie(state, String::new());
    cookie.set_max_age(time::Duration::ZERO);
    cookie
}

/// POST /auth/register - create an account and issue a session.
pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<ApiResponse<SessionResponse>>), ApiError> {
    let (account, token) = state.credentials().register(&req.email, &req.password).await?;

    let jar = jar.add(session_cookie(&state, token.clone()));
    let response = SessionResponse {
        token,
        expires_in: state.sessions.ttl_secs(),
        account: AccountInfo::from(&account),
    };

    Ok((StatusCode::CREATED, jar, Json(ApiResponse::new(response))))
}

/// POST /auth/login - verify credentials and issue a session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<SessionResponse>>), ApiError> {
    let (account, token) = state.credentials().login(&req.email, &req.password).await?;

    let jar = jar.add(session_cookie(&state, token.clone()));
    let response = SessionResponse {
        token,
        expires_in: state.sessions.ttl_secs(),
        account: AccountInfo::from(&account),
    };

    Ok((jar, Json(ApiResponse::new(response))))
}

/// POST /auth/logout - instruct the client to discard its session.
///
/// Sessions are stateless; there is nothing to revoke server-side.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<MessageResponse>>) {
    let jar = jar.add(expired_session_cookie(&state));
    (
        jar,
        Json(ApiResponse::new(MessageResponse::new(
            "Logged out successfully",
        ))),
    )
}

/// GET /auth/me - current profile.
pub async fn me(
    CurrentAccount(account): CurrentAccount,
) -> Json<ApiResponse<AccountInfo>> {
    Json(ApiResponse::new(AccountInfo::from(&account)))
}

/// DELETE /auth/me - delete the account.
pub async fn delete_me(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.credentials().delete_account(account.id).await?;
    Ok(Json(ApiResponse::new(MessageResponse::new(
        "Account removed",
    ))))
}

/// PUT /auth/profile - update relay settings.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<AccountInfo>>, ApiError> {
    let update = ProfileUpdate {
        client_id: req.client_id,
        target_emails: req.target_emails,
        allowed_origins: req.allowed_origins,
        is_accepting_emails: req.is_accepting_emails,
    };

    let updated = state.credentials().update_profile(account.id, &update).await?;
    Ok(Json(ApiResponse::new(AccountInfo::from(&updated))))
}

/// GET /auth/verify-email/:token - redeem a verification token.
pub async fn verify_email(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.credentials().verify_email(&token).await?;
    Ok(Json(ApiResponse::new(MessageResponse::new(
        "Email verified successfully",
    ))))
}

/// POST /auth/resend-verification - reissue the verification token.
pub async fn resend_verification(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.credentials().resend_verification(account.id).await?;
    Ok(Json(ApiResponse::new(MessageResponse::new(
        "Verification email sent",
    ))))
}

/// PUT /auth/change-password - change the password.
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .credentials()
        .change_password(account.id, &req.current_password, &req.new_password)
        .await?;
    Ok(Json(ApiResponse::new(MessageResponse::new(
        "Password updated successfully",
    ))))
}

/// POST /auth/forgot-password - issue a reset token and mail it.
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.credentials().forgot_password(&req.email).await?;
    Ok(Json(ApiResponse::new(MessageResponse::new(
        "Password reset email sent",
    ))))
}

/// POST /auth/reset-password/:token - redeem a reset token.
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.credentials().reset_password(&token, &req.password).await?;
    Ok(Json(ApiResponse::new(MessageResponse::new(
        "Password reset successfully",
    ))))
}
