//! Shared test helpers
//!
//! Builders for settings, stores, services and the HTTP router, plus token
//! minting and a store wrapper that fails on demand.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Once,
};
use uuid::Uuid;

use secret_santa::{
    config::Settings,
    database::{ExchangeStore, InMemoryStore},
    models::{Assignment, Event, EventStatus, Pairing},
    services::{AssignmentService, AuthContext, AuthService, ServiceFactory},
    AppState, Result, SecretSantaError,
};

pub mod postgres;

pub const TEST_SECRET: &str = "integration-test-secret";

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.jwt_secret = TEST_SECRET.to_string();
    settings
}

/// An event in `status` with `active` active participants and one inactive one
pub fn seed_event(store: &InMemoryStore, status: EventStatus, active: usize) -> (Event, Vec<Uuid>) {
    let event = store.insert_event("Office party", status);
    let users: Vec<Uuid> = (0..active).map(|_| Uuid::new_v4()).collect();
    for user in &users {
        store.add_participant(event.id, *user, true);
    }
    store.add_participant(event.id, Uuid::new_v4(), false);
    (event, users)
}

pub fn assignment_service(store: Arc<dyn ExchangeStore>) -> AssignmentService {
    AssignmentService::new(store, test_settings().exchange)
}

pub fn admin() -> AuthContext {
    AuthContext::admin(Uuid::new_v4())
}

pub fn app_state(store: Arc<dyn ExchangeStore>) -> Arc<AppState> {
    init_tracing();
    let settings = test_settings();
    let services = ServiceFactory::new(&settings, store);
    Arc::new(AppState::new(services))
}

pub fn token(user_id: Uuid, roles: &[&str]) -> String {
    AuthService::new(test_settings().auth)
        .issue_token(user_id, roles, chrono::Duration::minutes(10))
        .unwrap()
}

/// Delegates to an [`InMemoryStore`] but can fail the batch insert or the
/// health check.
pub struct FailingStore {
    pub inner: Arc<InMemoryStore>,
    pub fail_commit: AtomicBool,
    pub fail_health: AtomicBool,
}

impl FailingStore {
    pub fn new(inner: Arc<InMemoryStore>) -> Self {
        Self {
            inner,
            fail_commit: AtomicBool::new(false),
            fail_health: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl ExchangeStore for FailingStore {
    async fn find_event(&self, event_id: Uuid) -> Result<Option<Event>> {
        self.inner.find_event(event_id).await
    }

    async fn load_active_participants(&self, event_id: Uuid) -> Result<Vec<Uuid>> {
        self.inner.load_active_participants(event_id).await
    }

    async fn count_assignments(&self, event_id: Uuid) -> Result<i64> {
        self.inner.count_assignments(event_id).await
    }

    async fn commit_assignments(&self, event_id: Uuid, pairings: &[Pairing]) -> Result<u64> {
        if self.fail_commit.load(Ordering::SeqCst) {
            return Err(SecretSantaError::Database(sqlx::Error::PoolClosed));
        }
        self.inner.commit_assignments(event_id, pairings).await
    }

    async fn transition_event_status(
        &self,
        event_id: Uuid,
        from: EventStatus,
        to: EventStatus,
        reveal_enabled: bool,
    ) -> Result<bool> {
        self.inner
            .transition_event_status(event_id, from, to, reveal_enabled)
            .await
    }

    async fn list_assignments(&self, event_id: Uuid) -> Result<Vec<Assignment>> {
        self.inner.list_assignments(event_id).await
    }

    async fn find_assignment_for_giver(&self, event_id: Uuid, giver_id: Uuid) -> Result<Option<Assignment>> {
        self.inner.find_assignment_for_giver(event_id, giver_id).await
    }

    async fn health_check(&self) -> Result<()> {
        if self.fail_health.load(Ordering::SeqCst) {
            return Err(SecretSantaError::Database(sqlx::Error::PoolClosed));
        }
        self.inner.health_check().await
    }
}
