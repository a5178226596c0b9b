//! Test harnesses for integration testing.
//!
//! `TestHarness` runs the full router over an in-memory store and needs no
//! external services. `PostgresHarness` uses a shared testcontainers
//! Postgres, started once and reused by every test.

use std::sync::Arc;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{Duration, Utc};
use ed25519_dalek::SigningKey;
use management_core::common::multisig::SecurityConfig;
use management_core::common::{MultisigGuard, SignedEnvelope, ValidationRules};
use management_core::kernel::{MemoryStore, PostgresStore, ServerDeps};
use management_core::server::build_app;
use serde_json::{json, Value};
use sqlx::PgPool;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use super::{signing_key, ApiClient};

/// Keychain with alex, jeff and james.
///
/// `write_members`: alex and jeff, both mandatory.
/// `write_transfers`: alex, jeff and james; alex and jeff mandatory.
pub fn test_guard() -> MultisigGuard {
    let public_key = |signer: &str| BASE64.encode(signing_key(signer).verifying_key().to_bytes());
    let raw = json!({
        "keychain": {
            "alex": {"algorithm": "ed25519", "value": public_key("alex")},
            "jeff": {"algorithm": "ed25519", "value": public_key("jeff")},
            "james": {"value": public_key("james")}
        },
        "scopes": {
            "write_members": {
                "permitted_signers": ["alex", "jeff"],
                "mandatory_signers": ["alex", "jeff"]
            },
            "write_transfers": {
                "permitted_signers": ["alex", "jeff", "james"],
                "mandatory_signers": ["alex", "jeff"]
            }
        }
    });

    let config = SecurityConfig::from_json(&raw.to_string()).expect("Invalid test security config");
    MultisigGuard::from_config(&config).expect("Invalid test policies")
}

/// Sign `payload` as `signer`, valid for the next minute.
pub fn envelope(signer: &str, payload: &Value) -> SignedEnvelope {
    let now = Utc::now();
    envelope_at(signer, &signing_key(signer), payload, now, now + Duration::seconds(60))
}

pub fn envelope_at(
    signer: &str,
    key: &SigningKey,
    payload: &Value,
    issued_at: chrono::DateTime<Utc>,
    expires_at: chrono::DateTime<Utc>,
) -> SignedEnvelope {
    SignedEnvelope::sign(signer, payload, key, issued_at, expires_at)
        .expect("Failed to sign payload")
}

/// Request body with one fresh envelope per signer
pub fn signed_request(payload: &Value, signers: &[&str]) -> Value {
    request_with(
        payload,
        signers.iter().map(|signer| envelope(signer, payload)).collect(),
    )
}

pub fn request_with(payload: &Value, envelopes: Vec<SignedEnvelope>) -> Value {
    json!({ "data": payload, "signatures": envelopes })
}

// =============================================================================
// In-memory harness
// =============================================================================

/// Full router over a fresh in-memory store.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let response = ctx.api().post(MEMBERS_PATH, &body).await;
/// }
/// ```
pub struct TestHarness {
    /// Direct handle on the store behind the router, for fixtures and assertions
    pub store: MemoryStore,
    api: ApiClient,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new()
    }

    async fn teardown(self) {
        // Store is dropped with the harness
    }
}

impl TestHarness {
    pub fn new() -> Self {
        init_tracing();

        let store = MemoryStore::new();
        let deps = ServerDeps::new(
            Arc::new(store.clone()),
            test_guard(),
            ValidationRules::default(),
        );

        Self {
            store,
            api: ApiClient::new(build_app(deps)),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Create a member through the signed API.
    pub async fn create_member(&self, uid: &str) {
        let payload = json!({
            "uid": uid,
            "email": format!("{}@example.com", uid.to_lowercase()),
            "level": 1,
            "role": "member"
        });
        let response = self
            .api
            .post(super::MEMBERS_PATH, &signed_request(&payload, &["alex", "jeff"]))
            .await;
        assert_eq!(response.status, 200, "member fixture failed: {:?}", response.body);
    }
}

// =============================================================================
// Postgres harness
// =============================================================================

/// Shared Postgres container, started once and migrated once.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        init_tracing();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Postgres-backed store. Tests share one database, so each test should use
/// its own uids and transfer keys.
pub struct PostgresHarness {
    pub db_pool: PgPool,
    pub store: PostgresStore,
}

impl AsyncTestContext for PostgresHarness {
    async fn setup() -> Self {
        Self::new()
            .await
            .expect("Failed to create Postgres test harness")
    }

    async fn teardown(self) {
        // Database pool is automatically dropped
    }
}

impl PostgresHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        Ok(Self {
            store: PostgresStore::new(db_pool.clone()),
            db_pool,
        })
    }

    /// Prefix `name` so parallel tests never share rows.
    pub fn unique(&self, name: &str) -> String {
        format!("{}-{:08x}", name, rand::random::<u32>())
    }
}

/// Respect RUST_LOG in tests: `RUST_LOG=debug cargo test -- --nocapture`
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
