use axum::Json;
use axum::response::Html;
use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiDoc;

use crate::adapter::http::app_error_impl::ErrorResponse;
use crate::adapter::http::routes::{auth, user};
use crate::adapter::http::schema::auth::MessageResponse;
use crate::adapter::http::schema::id::IdResponse;
use crate::adapter::http::schema::password_reset::{ForgotPasswordRequest, ResetPasswordRequest};
use crate::adapter::http::schema::user::CreateUserRequest;

#[derive(OpenApi)]
#[openapi(
    info(title = "resetgate", description = "Account sign-up and password reset"),
    paths(
        user::signup,
        auth::request_password_reset,
        auth::complete_password_reset
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            IdResponse,
            CreateUserRequest,
            ForgotPasswordRequest,
            ResetPasswordRequest
        )
    ),
    tags(
        (name = "Auth", description = "Password reset workflow"),
        (name = "Users", description = "Account registration")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<OpenApiDoc> {
    Json(ApiDoc::openapi())
}

pub async fn docs_ui() -> Html<&'static str> {
    Html(
        r#"
            <!doctype html>
            <html>
              <head>
                <title>resetgate API</title>
                <meta charset="utf-8">
                <meta name="viewport" content="width=device-width, initial-scale=1">
                <script src="https://unpkg.com/@stoplight/elements/web-components.min.js"></script>
                <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements/styles.min.css">
              </head>
              <body style="height: 100%; margin: 0;">
                <elements-api apiDescriptionUrl="openapi.json" router="hash" />
              </body>
            </html>
        "#,
    )
}
