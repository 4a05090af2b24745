//! Database Test Utilities
//!
//! PostgreSQL testcontainer management for storage tests. The container
//! starts empty; callers run the store migrations against [`TestDatabase::pool`].

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

const DB_NAME: &str = "journal_test";
const DB_USER: &str = "journal";
const DB_PASSWORD: &str = "journal";

/// Connection details of a running test database
#[derive(Debug, Clone)]
pub struct TestDatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl TestDatabaseConfig {
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }
}

/// A PostgreSQL container plus a pool connected to it
///
/// The container is stopped when the value is dropped.
pub struct TestDatabase {
    _container: ContainerAsync<Postgres>,
    config: TestDatabaseConfig,
    pool: PgPool,
}

impl TestDatabase {
    /// Starts a fresh PostgreSQL 16 container
    pub async fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let container = Postgres::default()
            .with_db_name(DB_NAME)
            .with_user(DB_USER)
            .with_password(DB_PASSWORD)
            .with_tag("16-alpine")
            .start()
            .await?;

        let port = container.get_host_port_ipv4(5432).await?;
        let host = container.get_host().await?.to_string();

        let config = TestDatabaseConfig {
            host,
            port,
            database: DB_NAME.to_string(),
            username: DB_USER.to_string(),
            password: DB_PASSWORD.to_string(),
        };

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&config.connection_url())
            .await?;

        Ok(Self {
            _container: container,
            config,
            pool,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn url(&self) -> String {
        self.config.connection_url()
    }

    pub fn config(&self) -> &TestDatabaseConfig {
        &self.config
    }

    /// Removes every stored item, keeping the schema
    pub async fn truncate(&self, table: &str) -> Result<(), sqlx::Error> {
        sqlx::query(&format!("TRUNCATE TABLE {}", table))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

static SHARED_DB: OnceCell<Arc<TestDatabase>> = OnceCell::const_new();

/// One container shared by every test in the binary
pub async fn get_shared_test_database() -> Arc<TestDatabase> {
    SHARED_DB
        .get_or_init(|| async {
            Arc::new(TestDatabase::new().await.expect("failed to start test database"))
        })
        .await
        .clone()
}

/// Declares a tokio test that needs Docker; ignored unless run with `--ignored`
#[macro_export]
macro_rules! db_test {
    ($name:ident, |$db:ident| $body:block) => {
        #[tokio::test]
        #[ignore = "requires docker"]
        async fn $name() {
            let $db = $crate::database::get_shared_test_database().await;
            $body
        }
    };
}
