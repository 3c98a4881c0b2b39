use super::{KeyValueStore, StoreError};
use crate::framework::DatabaseProcessor;
use async_trait::async_trait;
use kanau::processor::Processor;
use sqlx::PgPool;

/// A row of `kv_entries`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct KvEntry {
    pub namespace: String,
    pub key: String,
    pub value: String,
    pub updated_at: time::PrimitiveDateTime,
}

#[derive(Debug, Clone)]
pub struct GetKvEntry {
    pub namespace: String,
    pub key: String,
}

impl Processor<GetKvEntry> for DatabaseProcessor {
    type Output = Option<KvEntry>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetKvEntry")]
    async fn process(&self, query: GetKvEntry) -> Result<Option<KvEntry>, sqlx::Error> {
        sqlx::query_as::<_, KvEntry>(
            r#"
            SELECT namespace, key, value, updated_at
            FROM kv_entries
            WHERE namespace = $1 AND key = $2
            "#,
        )
        .bind(query.namespace)
        .bind(query.key)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Insert an entry, overwriting the value if the key exists.
pub struct UpsertKvEntry {
    pub namespace: String,
    pub key: String,
    pub value: String,
}

impl Processor<UpsertKvEntry> for DatabaseProcessor {
    type Output = ();
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpsertKvEntry")]
    async fn process(&self, query: UpsertKvEntry) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO kv_entries (namespace, key, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (namespace, key)
            DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            "#,
        )
        .bind(query.namespace)
        .bind(query.key)
        .bind(query.value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Store backed by the `kv_entries` table.
#[derive(Debug, Clone)]
pub struct PgStore {
    db: DatabaseProcessor,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            db: DatabaseProcessor { pool },
        }
    }
}

#[async_trait]
impl KeyValueStore for PgStore {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StoreError> {
        let entry = self
            .db
            .process(GetKvEntry {
                namespace: namespace.to_owned(),
                key: key.to_owned(),
            })
            .await?;
        Ok(entry.map(|e| e.value))
    }

    async fn put(&self, namespace: &str, key: &str, value: &str) -> Result<(), StoreError> {
        self.db
            .process(UpsertKvEntry {
                namespace: namespace.to_owned(),
                key: key.to_owned(),
                value: value.to_owned(),
            })
            .await?;
        Ok(())
    }
}
