#![cfg(test)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use chrono::{DateTime, Duration, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use crate::adapter::crypto::argon2::ArgonPasswordHasher;
use crate::application::app_error::{AppError, AppResult};
use crate::application::interface::clock::Clock;
use crate::application::interface::email::EmailSender;
use crate::infra::app::create_app;
use crate::infra::config::HasherConfig;
use crate::tests::fixtures::TestApp;

pub fn unique_credentials() -> (String, String) {
    let id = Uuid::now_v7().as_simple().to_string();
    let username = format!("t_{}", &id[16..]);
    let email = format!("{}@test.example", &id[16..]);

    (username, email)
}

pub fn fast_hasher_config() -> HasherConfig {
    HasherConfig {
        memory_cost: 1024,
        time_cost: 1,
        parallelism: 1,
    }
}

pub fn fast_hasher() -> ArgonPasswordHasher {
    ArgonPasswordHasher::from_config(&fast_hasher_config()).expect("valid argon2 params")
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

const DELIVERY_WAIT: StdDuration = StdDuration::from_secs(2);
const DELIVERY_POLL: StdDuration = StdDuration::from_millis(5);

/// Records every message instead of delivering it.
#[derive(Clone, Default)]
pub struct Outbox {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    attempts: Arc<AtomicUsize>,
    failing: bool,
    delay: Option<StdDuration>,
}

impl Outbox {
    /// An outbox whose every delivery fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// An outbox that takes `delay` to accept each message.
    pub fn slow(delay: StdDuration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Waits until at least `count` messages were delivered.
    pub async fn wait_for(&self, count: usize) -> Vec<SentEmail> {
        self.wait_until(|outbox| outbox.sent.lock().unwrap().len() >= count).await;
        self.sent()
    }

    /// Waits until at least `count` deliveries were attempted, failed ones included.
    pub async fn wait_for_attempts(&self, count: usize) {
        self.wait_until(|outbox| outbox.attempts() >= count).await;
    }

    /// Gives detached deliveries a moment to run, then checks none were attempted.
    pub async fn assert_nothing_sent(&self) {
        tokio::time::sleep(StdDuration::from_millis(50)).await;
        assert_eq!(self.attempts(), 0, "unexpected delivery: {:?}", self.sent());
    }

    async fn wait_until(&self, done: impl Fn(&Self) -> bool) {
        let polling = async {
            while !done(self) {
                tokio::time::sleep(DELIVERY_POLL).await;
            }
        };
        tokio::time::timeout(DELIVERY_WAIT, polling)
            .await
            .expect("email delivery within the wait window");
    }
}

#[async_trait]
impl EmailSender for Outbox {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            return Err(AppError::EmailSendError("smtp unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Clock that only moves when told to.
#[derive(Clone)]
pub struct TestClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl TestClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Extracts the raw token from a reset email body.
pub fn reset_token_from_link(body: &str) -> String {
    let start = body.find("token=").expect("reset link in email body") + "token=".len();
    body[start..]
        .chars()
        .take_while(|c| !c.is_whitespace())
        .collect()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Registers a user over HTTP and returns its id.
pub async fn signup(test_app: &TestApp, username: &str, email: &str, password: &str) -> String {
    let app = create_app(test_app.state.config.as_ref(), test_app.state.clone());
    let body = serde_json::json!({ "username": username, "email": email, "password": password });
    let (status, json) = read_json(app.oneshot(post_json("/api/auth/signup", &body)).await.unwrap()).await;

    assert_eq!(status, StatusCode::OK, "signup failed: {json}");
    json["id"].as_str().expect("id in signup response").to_string()
}

pub async fn test_pool() -> PgPool {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
    let pool = PgPool::connect(&url).await.expect("connect to test database");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrate test database");
    pool
}

pub async fn insert_user(pool: &PgPool, username: &str, email: &str, hashed_password: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("INSERT INTO users (id, username, email, password) VALUES ($1, $2, $3, $4) RETURNING id")
        .bind(Uuid::now_v7())
        .bind(username)
        .bind(email)
        .bind(hashed_password)
        .fetch_one(pool)
        .await
        .expect("insert user")
}

pub async fn delete_user(pool: &PgPool, user_id: Uuid) {
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .expect("delete user");
}
