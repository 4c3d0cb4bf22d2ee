#![allow(dead_code)]

use std::time::{SystemTime, UNIX_EPOCH};

use rusty_golf_rounds::model::{execute_batch_sql, execute_select};
use rusty_golf_rounds::model::schema::reset_schema;
use rusty_golf_rounds::storage::SqlStorage;
use sql_middleware::SqlMiddlewareDbError;
use sql_middleware::middleware::{ConfigAndPool, DatabaseType, SqliteOptions};
use uuid::Uuid;

pub const GUALTA_ID: &str = "11111111-1111-4111-8111-111111111111";
pub const CAMPO_ID: &str = "22222222-2222-4222-8222-222222222222";
pub const ALICE_ID: &str = "33333333-3333-4333-8333-333333333333";
pub const BRUNO_ID: &str = "44444444-4444-4444-8444-444444444444";
pub const ALICE_ACCOUNT_ID: &str = "aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa";
pub const ALICE_EMAIL: &str = "alice@example.com";
pub const NEWCOMER_EMAIL: &str = "newcomer@example.com";

pub const FIXTURES: &str = include_str!("../fixtures.sql");

pub fn uuid(id: &str) -> Uuid {
    Uuid::parse_str(id).unwrap()
}

pub struct TestContext {
    pub config_and_pool: ConfigAndPool,
    pub storage: SqlStorage,
}

/// A private in-memory sqlite database with the schema applied and `fixture_sql` loaded.
pub async fn setup_test_context(fixture_sql: &str) -> Result<TestContext, SqlMiddlewareDbError> {
    let db_name = format!(
        "file:rounds_test_{}?mode=memory&cache=shared",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time went backwards")
            .as_nanos()
    );

    let config_and_pool = ConfigAndPool::new_sqlite(SqliteOptions::new(db_name)).await?;
    reset_schema(&config_and_pool, &DatabaseType::Sqlite).await?;
    if !fixture_sql.trim().is_empty() {
        execute_batch_sql(&config_and_pool, fixture_sql).await?;
    }

    let storage = SqlStorage::new(config_and_pool.clone(), DatabaseType::Sqlite);
    Ok(TestContext {
        config_and_pool,
        storage,
    })
}

pub async fn count_rows(
    config_and_pool: &ConfigAndPool,
    table: &str,
) -> Result<i64, SqlMiddlewareDbError> {
    let res = execute_select(
        config_and_pool,
        &DatabaseType::Sqlite,
        &format!("SELECT count(*) AS cnt FROM {table};"),
        &[],
    )
    .await?;
    Ok(res
        .results
        .first()
        .and_then(|row| row.get("cnt"))
        .and_then(|v| v.as_int())
        .copied()
        .unwrap_or_default())
}
