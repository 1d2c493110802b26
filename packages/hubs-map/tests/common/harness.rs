//! Test harness with testcontainers for database integration testing.
//!
//! One Postgres container is shared by all tests; every harness gets its own
//! freshly migrated database inside it, so tests can run in parallel.

use anyhow::{Context, Result};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::sync::atomic::{AtomicUsize, Ordering};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    server_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();
static NEXT_DATABASE: AtomicUsize = AtomicUsize::new(0);

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --ignored --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let host = postgres.get_host().await?;
        let port = postgres.get_host_port_ipv4(5432).await?;

        Ok(Self {
            server_url: format!("postgresql://postgres:postgres@{}:{}", host, port),
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

/// Per-test database with the schema migrated.
pub struct TestHarness {
    pub db_pool: PgPool,
    /// Connection string of this test's database
    pub db_url: String,
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let name = format!(
            "hubs_test_{}_{}",
            std::process::id(),
            NEXT_DATABASE.fetch_add(1, Ordering::SeqCst)
        );
        let mut admin = PgConnection::connect(&format!("{}/postgres", infra.server_url))
            .await
            .context("Failed to connect to admin database")?;
        admin
            .execute(format!("CREATE DATABASE {}", name).as_str())
            .await
            .context("Failed to create test database")?;
        admin.close().await?;

        let db_url = format!("{}/{}", infra.server_url, name);
        let db_pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to test database")?;

        sqlx::migrate!("./migrations")
            .run(&db_pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self { db_pool, db_url })
    }
}
