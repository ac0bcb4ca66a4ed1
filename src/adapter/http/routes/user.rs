use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapter::http::app_error_impl::ErrorResponse;
use crate::adapter::http::schema::id::IdResponse;
use crate::adapter::http::schema::user::CreateUserRequest;
use crate::adapter::http::validation::ValidJson;
use crate::application::app_error::AppResult;
use crate::application::interactors::users::CreateUserInteractor;

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Users",
    request_body(
        content = CreateUserRequest,
        example = json!(
            {
                "username": "resetpassuser",
                "email": "user@example.com",
                "password": "Password123!"
            }
        )
    ),
    responses(
        (status = 200, description = "User created", body = IdResponse),
        (
            status = 400,
            description = "Invalid username or email, or a password that breaks the policy",
            body = ErrorResponse,
            example = json!(
                {
                    "error": "Invalid email format"
                }
            )
        ),
        (
            status = 409,
            description = "Username or email already taken",
            body = ErrorResponse,
            example = json!(
                {
                    "error": "User with this username or email already exists"
                }
            )
        ),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn signup(
    interactor: CreateUserInteractor,
    ValidJson(payload): ValidJson<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    let user_id = interactor.execute(payload.into()).await?;
    Ok((StatusCode::OK, Json(IdResponse::from(user_id))))
}
