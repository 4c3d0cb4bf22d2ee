use sql_middleware::SqlMiddlewareDbError;
use sql_middleware::middleware::{ConfigAndPool, DatabaseType};

use super::database::execute_batch_sql;

const SQLITE_DDL: [&str; 7] = [
    include_str!("../sql/schema/sqlite/01_accounts.sql"),
    include_str!("../sql/schema/sqlite/02_courses.sql"),
    include_str!("../sql/schema/sqlite/03_course_holes.sql"),
    include_str!("../sql/schema/sqlite/04_players.sql"),
    include_str!("../sql/schema/sqlite/05_rounds.sql"),
    include_str!("../sql/schema/sqlite/06_round_scores.sql"),
    include_str!("../sql/schema/sqlite/07_round_score_holes.sql"),
];

const POSTGRES_DDL: [&str; 7] = [
    include_str!("../sql/schema/postgres/01_accounts.sql"),
    include_str!("../sql/schema/postgres/02_courses.sql"),
    include_str!("../sql/schema/postgres/03_course_holes.sql"),
    include_str!("../sql/schema/postgres/04_players.sql"),
    include_str!("../sql/schema/postgres/05_rounds.sql"),
    include_str!("../sql/schema/postgres/06_round_scores.sql"),
    include_str!("../sql/schema/postgres/07_round_score_holes.sql"),
];

const TABLE_DROP: &str = include_str!("../sql/schema/sqlite/00_table_drop.sql");

/// Creates any missing tables; safe to run on every startup.
///
/// # Errors
///
/// Will return `Err` if a DDL statement fails
pub async fn ensure_schema(
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
) -> Result<(), SqlMiddlewareDbError> {
    let ddl = if *db_type == DatabaseType::Postgres {
        POSTGRES_DDL
    } else {
        SQLITE_DDL
    };
    execute_batch_sql(config_and_pool, &ddl.join("\n")).await?;
    tracing::debug!("schema ensured");
    Ok(())
}

/// Drops every table and recreates the schema empty.
///
/// # Errors
///
/// Will return `Err` if a statement fails
pub async fn reset_schema(
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
) -> Result<(), SqlMiddlewareDbError> {
    execute_batch_sql(config_and_pool, TABLE_DROP).await?;
    ensure_schema(config_and_pool, db_type).await
}
