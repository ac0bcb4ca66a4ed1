use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapter::http::app_error_impl::ErrorResponse;
use crate::adapter::http::schema::auth::MessageResponse;
use crate::adapter::http::schema::password_reset::{ForgotPasswordRequest, ResetPasswordRequest};
use crate::adapter::http::validation::ValidJson;
use crate::application::app_error::AppResult;
use crate::application::dto::password_reset::RequestPasswordResetDTO;
use crate::application::interactors::password_reset::{RequestPasswordResetInteractor, ResetPasswordInteractor};
use crate::infra::config::AppConfig;

pub const RESET_REQUESTED_MESSAGE: &str = "If an account with that email exists, a password reset link has been sent";
pub const RESET_COMPLETED_MESSAGE: &str = "Password has been reset successfully";

#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = "Auth",
    request_body(
        content = ForgotPasswordRequest,
        example = json!(
            {
                "email": "user@example.com"
            }
        )
    ),
    responses(
        (
            status = 200,
            description = "Request accepted. The response is the same whether or not the account exists",
            body = MessageResponse,
            example = json!(
                {
                    "message": "If an account with that email exists, a password reset link has been sent"
                }
            )
        ),
        (
            status = 400,
            description = "Missing or malformed email",
            body = ErrorResponse,
            example = json!(
                {
                    "error": "Invalid email format"
                }
            )
        ),
        (
            status = 500,
            description = "Internal server error",
            body = ErrorResponse,
            example = json!(
                {
                    "error": "Internal Server Error"
                }
            )
        )
    )
)]
pub async fn request_password_reset(
    interactor: RequestPasswordResetInteractor,
    State(config): State<Arc<AppConfig>>,
    ValidJson(payload): ValidJson<ForgotPasswordRequest>,
) -> AppResult<impl IntoResponse> {
    interactor
        .execute(RequestPasswordResetDTO {
            email: payload.email,
            ttl: config.password_reset.ttl,
            reset_url: config.password_reset.reset_url.clone(),
        })
        .await?;

    Ok((StatusCode::OK, Json(MessageResponse::new(RESET_REQUESTED_MESSAGE))))
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password-complete",
    tag = "Auth",
    request_body(
        content = ResetPasswordRequest,
        example = json!(
            {
                "token": "pDq1a0f3Jk6r9S2uWn8yZ4cB7eH5gL0tVx3mQ1iO2sA",
                "password": "NewPassword123!"
            }
        )
    ),
    responses(
        (
            status = 200,
            description = "Password reset successfully",
            body = MessageResponse,
            example = json!(
                {
                    "message": "Password has been reset successfully"
                }
            )
        ),
        (
            status = 400,
            description = "Invalid, expired or already used token, or a password that breaks the policy",
            body = ErrorResponse,
            example = json!(
                {
                    "error": "Invalid or expired password reset token"
                }
            )
        ),
        (
            status = 500,
            description = "Internal server error",
            body = ErrorResponse,
            example = json!(
                {
                    "error": "Internal Server Error"
                }
            )
        )
    )
)]
pub async fn complete_password_reset(
    interactor: ResetPasswordInteractor,
    ValidJson(payload): ValidJson<ResetPasswordRequest>,
) -> AppResult<impl IntoResponse> {
    interactor.execute(payload.into()).await?;
    Ok((StatusCode::OK, Json(MessageResponse::new(RESET_COMPLETED_MESSAGE))))
}
