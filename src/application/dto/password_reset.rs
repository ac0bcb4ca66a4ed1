#[derive(Debug)]
pub struct RequestPasswordResetDTO {
    pub email: String,
    pub ttl: i64,
    pub reset_url: String,
}

pub struct ResetPasswordDTO {
    pub token: String,
    pub password: String,
}

// Keep the token and password out of logs.
impl std::fmt::Debug for ResetPasswordDTO {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetPasswordDTO")
            .field("token", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}
