use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::application::dto::user::CreateUserDTO;

#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,
    #[schema(format = Email, example = "user@example.com")]
    pub email: String,
    pub password: String,
}

impl From<CreateUserRequest> for CreateUserDTO {
    fn from(request: CreateUserRequest) -> Self {
        CreateUserDTO {
            username: request.username.trim().to_string(),
            email: request.email,
            password: request.password,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;
    use validator::Validate;

    use crate::adapter::http::schema::user::CreateUserRequest;

    #[rstest]
    #[case(2, false)]
    #[case(3, true)]
    #[case(50, true)]
    #[case(51, false)]
    fn test_username_length(#[case] length: usize, #[case] valid: bool) {
        let request: CreateUserRequest = serde_json::from_value(json!({
            "username": "a".repeat(length),
            "email": "user@example.com",
            "password": "Password123!"
        }))
        .unwrap();

        assert_eq!(request.validate().is_ok(), valid);
    }
}
