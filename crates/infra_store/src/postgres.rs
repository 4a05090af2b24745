//! PostgreSQL backend
//!
//! Items live in the `journal_items` table created by the bundled
//! migrations. Queries are built at runtime, so the crate compiles without a
//! live database.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::{debug, info, instrument};

use crate::error::StoreError;
use crate::item::Item;
use crate::store::{KeyValueStore, StoreBackend};

const SELECT_COLUMNS: &str = "SELECT pk, sk, entity, data, updated_at FROM journal_items";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies the bundled migrations
    pub async fn migrate(&self) -> Result<(), StoreError> {
        info!("Running store migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn row_to_item(row: &sqlx::postgres::PgRow) -> Result<Item, StoreError> {
    Ok(Item {
        pk: row.try_get("pk")?,
        sk: row.try_get("sk")?,
        entity: row.try_get("entity")?,
        data: row.try_get("data")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl KeyValueStore for PostgresStore {
    #[instrument(skip(self))]
    async fn get(&self, pk: &str, sk: &str) -> Result<Option<Item>, StoreError> {
        let row = sqlx::query(&format!("{} WHERE pk = $1 AND sk = $2", SELECT_COLUMNS))
            .bind(pk)
            .bind(sk)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_item).transpose()
    }

    #[instrument(skip(self, item), fields(pk = %item.pk, sk = %item.sk))]
    async fn put(&self, item: Item) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO journal_items (pk, sk, entity, data, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (pk, sk) DO UPDATE
            SET entity = EXCLUDED.entity,
                data = EXCLUDED.data,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&item.pk)
        .bind(&item.sk)
        .bind(&item.entity)
        .bind(&item.data)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[instrument(skip(self, item), fields(pk = %item.pk, sk = %item.sk))]
    async fn put_if_absent(&self, item: Item) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO journal_items (pk, sk, entity, data, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (pk, sk) DO NOTHING
            "#,
        )
        .bind(&item.pk)
        .bind(&item.sk)
        .bind(&item.entity)
        .bind(&item.data)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!("Conditional put rejected");
            return Err(StoreError::AlreadyExists { pk: item.pk, sk: item.sk });
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, pk: &str, sk: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM journal_items WHERE pk = $1 AND sk = $2")
            .bind(pk)
            .bind(sk)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn query(&self, pk: &str, sk_prefix: &str) -> Result<Vec<Item>, StoreError> {
        let rows = sqlx::query(&format!(
            "{} WHERE pk = $1 AND left(sk, char_length($2)) = $2 ORDER BY sk",
            SELECT_COLUMNS
        ))
        .bind(pk)
        .bind(sk_prefix)
        .fetch_all(&self.pool)
        .await?;
        debug!(count = rows.len(), "Queried partition");
        rows.iter().map(row_to_item).collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Postgres
    }
}
