use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::application::dto::password_reset::ResetPasswordDTO;

/// Format checks on `email` happen in the workflow so that every malformed
/// address is rejected the same way.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[schema(format = Email, example = "user@example.com")]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl From<ResetPasswordRequest> for ResetPasswordDTO {
    fn from(request: ResetPasswordRequest) -> Self {
        ResetPasswordDTO {
            token: request.token,
            password: request.password,
        }
    }
}
