// ABOUTME: Shared fixtures for API router tests
// ABOUTME: Seeds accounts in an in-memory database and provides a scripted sync service

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use tally_api::{create_router, AppState};
use tally_config::IngestionSettings;
use tally_security::{
    MembershipLevel, OrganizationStorage, TokenStorage, UserCreateInput, UserStorage,
};
use tally_storage::connect_in_memory;
use tally_warehouse::{
    ConnectionProvider, DestinationProvider, ProviderError, ProviderResult, RemoteConnection,
    RemoteDestination, RemoteSource, SourceProvider, StripeSourcePayload,
};

/// Sync service double that records calls and can fail destination creation
#[derive(Default)]
pub struct FakeSyncService {
    pub calls: Mutex<Vec<String>>,
    pub fail_destination: bool,
}

impl FakeSyncService {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SourceProvider for FakeSyncService {
    async fn create_stripe_source(&self, payload: &StripeSourcePayload) -> ProviderResult<RemoteSource> {
        self.record(format!("create_source:{}", payload.account_id));
        Ok(RemoteSource {
            source_id: "src-1".to_string(),
        })
    }

    async fn delete_source(&self, source_id: &str) -> ProviderResult<()> {
        self.record(format!("delete_source:{}", source_id));
        Ok(())
    }
}

#[async_trait]
impl DestinationProvider for FakeSyncService {
    async fn create_destination(&self, team_id: i64) -> ProviderResult<RemoteDestination> {
        self.record(format!("create_destination:{}", team_id));
        if self.fail_destination {
            return Err(ProviderError::Api {
                status: 500,
                body: "bucket unavailable".to_string(),
            });
        }
        Ok(RemoteDestination {
            destination_id: "dst-1".to_string(),
        })
    }

    async fn delete_destination(&self, destination_id: &str) -> ProviderResult<()> {
        self.record(format!("delete_destination:{}", destination_id));
        Ok(())
    }
}

#[async_trait]
impl ConnectionProvider for FakeSyncService {
    async fn create_connection(&self, source_id: &str, destination_id: &str) -> ProviderResult<RemoteConnection> {
        self.record(format!("create_connection:{}:{}", source_id, destination_id));
        Ok(RemoteConnection {
            connection_id: "conn-1".to_string(),
        })
    }

    async fn delete_connection(&self, connection_id: &str) -> ProviderResult<()> {
        self.record(format!("delete_connection:{}", connection_id));
        Ok(())
    }

    async fn start_sync(&self, connection_id: &str) -> ProviderResult<()> {
        self.record(format!("start_sync:{}", connection_id));
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub sync: Arc<FakeSyncService>,
    pub team_id: i64,
    pub user_id: String,
    pub token: String,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_sync(FakeSyncService::default()).await
    }

    /// A member of one organization, with that organization's team selected
    pub async fn with_sync(sync: FakeSyncService) -> Self {
        let pool = connect_in_memory().await.unwrap();
        let organizations = OrganizationStorage::new(pool.clone());
        let users = UserStorage::new(pool.clone());

        let org = organizations.create_organization("Acme").await.unwrap();
        let team = organizations.create_team(&org.id, "Default").await.unwrap();
        let user = users
            .create_user(UserCreateInput {
                email: "ada@example.com".to_string(),
                name: "Ada".to_string(),
            })
            .await
            .unwrap();
        organizations
            .add_member(&org.id, &user.id, MembershipLevel::Member)
            .await
            .unwrap();
        users.set_current_team(&user.id, Some(team.id)).await.unwrap();

        let token = TokenStorage::new(pool.clone())
            .create_token(&user.id, "tests")
            .await
            .unwrap()
            .token;

        let sync = Arc::new(sync);
        let state = AppState::new(pool.clone(), sync.clone(), Arc::new(IngestionSettings::default()));

        Self {
            router: create_router(state),
            pool,
            sync,
            team_id: team.id,
            user_id: user.id,
            token,
        }
    }

    /// Create another user with a key; returns (user_id, token)
    pub async fn create_user(&self, email: &str) -> (String, String) {
        let user = UserStorage::new(self.pool.clone())
            .create_user(UserCreateInput {
                email: email.to_string(),
                name: "Other".to_string(),
            })
            .await
            .unwrap();
        let token = TokenStorage::new(self.pool.clone())
            .create_token(&user.id, "tests")
            .await
            .unwrap()
            .token;
        (user.id, token)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (u16, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        read_json(response).await
    }

    /// Authenticated request as the default user
    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (u16, Value) {
        let token = self.token.clone();
        self.request(method, uri, Some(&token), body).await
    }

    pub async fn insert_action(&self, team_id: i64) -> i64 {
        sqlx::query_scalar("INSERT INTO actions (team_id, name) VALUES (?, 'Signed up') RETURNING id")
            .bind(team_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

async fn read_json(response: Response<Body>) -> (u16, Value) {
    let status = response.status().as_u16();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
