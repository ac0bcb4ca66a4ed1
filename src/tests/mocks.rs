#![cfg(test)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;

use crate::application::app_error::AppResult;
use crate::application::interface::clock::Clock;
use crate::application::interface::crypto::{CredentialsHasher, TokenGenerator};
use crate::application::interface::db::DBSession;
use crate::application::interface::email::EmailSender;
use crate::application::interface::gateway::password_reset::{PasswordResetTokenReader, PasswordResetTokenWriter};
use crate::application::interface::gateway::user::{UserReader, UserWriter};
use crate::domain::entities::id::Id;
use crate::domain::entities::password_reset::PasswordResetToken;
use crate::domain::entities::user::User;

mock! {
    pub DBSessionMock {}
    #[async_trait]
    impl DBSession for DBSessionMock {
        async fn commit(&self) -> AppResult<()>;
        async fn rollback(&self) -> AppResult<()>;
    }
}

mock! {
    pub PasswordResetTokenWriterMock {}
    #[async_trait]
    impl PasswordResetTokenWriter for PasswordResetTokenWriterMock {
        async fn replace(&self, token: PasswordResetToken) -> AppResult<Id<PasswordResetToken>>;
        async fn consume(&self, token_id: &Id<PasswordResetToken>, now: DateTime<Utc>) -> AppResult<bool>;
        async fn delete_stale(&self, now: DateTime<Utc>) -> AppResult<u64>;
    }
}

mock! {
    pub PasswordResetTokenReaderMock {}
    #[async_trait]
    impl PasswordResetTokenReader for PasswordResetTokenReaderMock {
        async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<PasswordResetToken>>;
        async fn find_by_user(&self, user_id: &Id<User>) -> AppResult<Option<PasswordResetToken>>;
    }
}

mock! {
    pub UserReaderMock {}
    #[async_trait]
    impl UserReader for UserReaderMock {
        async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
        async fn find_by_id(&self, user_id: &Id<User>) -> AppResult<Option<User>>;
        async fn is_user(&self, username: &str, email: &str) -> AppResult<bool>;
    }
}

mock! {
    pub UserWriterMock {}
    #[async_trait]
    impl UserWriter for UserWriterMock {
        async fn insert(&self, user: User) -> AppResult<Id<User>>;
        async fn update(&self, user: User) -> AppResult<Id<User>>;
    }
}

mock! {
    pub HasherMock {}
    #[async_trait]
    impl CredentialsHasher for HasherMock {
        async fn hash_password(&self, password: &str) -> AppResult<String>;
        async fn verify_password(&self, password: &str, hashed: &str) -> AppResult<bool>;
    }
}

mock! {
    pub EmailSenderMock {}
    #[async_trait]
    impl EmailSender for EmailSenderMock {
        async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
    }
}

mock! {
    pub TokenGeneratorMock {}
    impl TokenGenerator for TokenGeneratorMock {
        fn generate(&self) -> String;
    }
}

mock! {
    pub ClockMock {}
    impl Clock for ClockMock {
        fn now(&self) -> DateTime<Utc>;
    }
}
