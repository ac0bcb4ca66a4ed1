use std::sync::Arc;

use tracing::info;

use crate::application::app_error::{AppError, AppResult};
use crate::application::dto::id::IdDTO;
use crate::application::dto::user::CreateUserDTO;
use crate::application::interactors::rollback_on_error;
use crate::application::interface::clock::Clock;
use crate::application::interface::crypto::CredentialsHasher;
use crate::application::interface::db::DBSession;
use crate::application::interface::gateway::user::{UserReader, UserWriter};
use crate::domain::entities::user::User;
use crate::domain::policy::PasswordPolicy;
use crate::domain::values::email::EmailAddress;

#[derive(Clone)]
pub struct CreateUserInteractor {
    db_session: Arc<dyn DBSession>,
    user_reader: Arc<dyn UserReader>,
    user_writer: Arc<dyn UserWriter>,
    hasher: Arc<dyn CredentialsHasher>,
    policy: PasswordPolicy,
    clock: Arc<dyn Clock>,
}

impl CreateUserInteractor {
    pub fn new(
        db_session: Arc<dyn DBSession>,
        user_reader: Arc<dyn UserReader>,
        user_writer: Arc<dyn UserWriter>,
        hasher: Arc<dyn CredentialsHasher>,
        policy: PasswordPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            db_session,
            user_reader,
            user_writer,
            hasher,
            policy,
            clock,
        }
    }

    pub async fn execute(&self, dto: CreateUserDTO) -> AppResult<IdDTO> {
        let email = EmailAddress::parse(&dto.email)?;
        self.policy.check(&dto.password)?;

        let result = self.create(dto.username, email, &dto.password).await;
        rollback_on_error(self.db_session.as_ref(), result).await
    }

    async fn create(&self, username: String, email: EmailAddress, password: &str) -> AppResult<IdDTO> {
        if self.user_reader.is_user(&username, email.as_str()).await? {
            return Err(AppError::UserAlreadyExists);
        }

        let hash = self.hasher.hash_password(password).await?;
        let user = User::new(username, email, hash, self.clock.now());
        let user_id = self.user_writer.insert(user).await?;
        self.db_session.commit().await?;

        info!("User {} registered", user_id);
        Ok(IdDTO {
            id: user_id.value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use crate::application::app_error::AppError;
    use crate::application::dto::user::CreateUserDTO;
    use crate::application::interactors::users::CreateUserInteractor;
    use crate::domain::policy::PasswordPolicy;
    use crate::tests::mocks::{MockClockMock, MockDBSessionMock, MockHasherMock, MockUserReaderMock, MockUserWriterMock};

    struct UserMocks {
        db_session: MockDBSessionMock,
        user_reader: MockUserReaderMock,
        user_writer: MockUserWriterMock,
        hasher: MockHasherMock,
    }

    impl UserMocks {
        fn new() -> Self {
            Self {
                db_session: MockDBSessionMock::new(),
                user_reader: MockUserReaderMock::new(),
                user_writer: MockUserWriterMock::new(),
                hasher: MockHasherMock::new(),
            }
        }

        fn into_interactor(self) -> CreateUserInteractor {
            let mut clock = MockClockMock::new();
            clock
                .expect_now()
                .return_const(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
            CreateUserInteractor::new(
                Arc::new(self.db_session),
                Arc::new(self.user_reader),
                Arc::new(self.user_writer),
                Arc::new(self.hasher),
                PasswordPolicy::default(),
                Arc::new(clock),
            )
        }
    }

    fn dto(email: &str, password: &str) -> CreateUserDTO {
        CreateUserDTO {
            username: "resetpassuser".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_user_success() {
        let mut mocks = UserMocks::new();

        mocks.user_reader.expect_is_user().returning(|_, _| Ok(false));
        mocks.hasher.expect_hash_password().returning(|_| Ok("hashed".to_string()));
        mocks
            .user_writer
            .expect_insert()
            .withf(|u| u.email == "reset-pass-test@example.com" && u.password == "hashed")
            .times(1)
            .returning(|u| Ok(u.id));
        mocks.db_session.expect_commit().times(1).returning(|| Ok(()));

        let result = mocks
            .into_interactor()
            .execute(dto("Reset-Pass-Test@example.com", "ValidPassword123!"))
            .await;

        assert!(result.is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_user_duplicate() {
        let mut mocks = UserMocks::new();

        mocks.user_reader.expect_is_user().returning(|_, _| Ok(true));
        mocks.user_writer.expect_insert().never();
        mocks.db_session.expect_rollback().times(1).returning(|| Ok(()));

        let result = mocks
            .into_interactor()
            .execute(dto("reset-pass-test@example.com", "ValidPassword123!"))
            .await;

        assert!(matches!(result, Err(AppError::UserAlreadyExists)));
    }

    #[rstest]
    #[case("invalid-email-format", "ValidPassword123!")]
    #[case("reset-pass-test@example.com", "weak")]
    #[tokio::test]
    async fn test_create_user_rejects_input(#[case] email: &str, #[case] password: &str) {
        let mut mocks = UserMocks::new();
        mocks.user_reader.expect_is_user().never();
        mocks.user_writer.expect_insert().never();

        let result = mocks.into_interactor().execute(dto(email, password)).await;

        assert!(result.is_err_and(|e| e.is_client_error()));
    }
}
