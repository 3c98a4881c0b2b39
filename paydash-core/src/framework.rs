use sqlx::PgPool;

/// Runs SQL-backed [`Processor`](kanau::processor::Processor)s against a
/// pool. Each query is its own request type implemented on this struct.
#[derive(Debug, Clone)]
pub struct DatabaseProcessor {
    pub pool: PgPool,
}
