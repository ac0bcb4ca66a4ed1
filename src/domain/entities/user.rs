use chrono::{DateTime, Utc};

use crate::domain::entities::id::Id;
use crate::domain::values::email::EmailAddress;

#[derive(Debug, Clone)]
pub struct User {
    pub id: Id<User>,
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, email: EmailAddress, password: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Id::generate(),
            username,
            email: email.into_inner(),
            password,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn change_password(&mut self, password_hash: String, now: DateTime<Utc>) {
        self.password = password_hash;
        self.updated_at = now;
    }
}
