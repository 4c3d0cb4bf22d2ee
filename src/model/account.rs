use sql_middleware::SqlMiddlewareDbError;
use sql_middleware::middleware::{ConfigAndPool, CustomDbRow, DatabaseType, RowValues};
use uuid::Uuid;

use super::database::{execute_dml, execute_select, get_required_text, get_uuid, uuid_param};
use super::types::Account;

fn account_from_row(row: &CustomDbRow) -> Result<Account, SqlMiddlewareDbError> {
    Ok(Account {
        id: get_uuid(row, "id")?,
        email: get_required_text(row, "email")?,
    })
}

/// # Errors
///
/// Will return `Err` if the database query fails
pub async fn get_account(
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
    account_id: &Uuid,
) -> Result<Option<Account>, SqlMiddlewareDbError> {
    let res = execute_select(
        config_and_pool,
        db_type,
        "SELECT id, email FROM accounts WHERE id = ?1;",
        &[uuid_param(account_id)],
    )
    .await?;
    res.results.first().map(account_from_row).transpose()
}

/// Looks an account up by e-mail, creating it on first use.
///
/// # Errors
///
/// Will return `Err` if the database query fails
pub async fn find_or_create_account(
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
    email: &str,
) -> Result<Account, SqlMiddlewareDbError> {
    let email = email.trim().to_lowercase();
    let select = "SELECT id, email FROM accounts WHERE email = ?1;";

    let res = execute_select(
        config_and_pool,
        db_type,
        select,
        &[RowValues::Text(email.clone())],
    )
    .await?;
    if let Some(row) = res.results.first() {
        return account_from_row(row);
    }

    let id = Uuid::new_v4();
    execute_dml(
        config_and_pool,
        db_type,
        "INSERT INTO accounts (id, email) VALUES (?1, ?2) ON CONFLICT (email) DO NOTHING;",
        &[uuid_param(&id), RowValues::Text(email.clone())],
    )
    .await?;

    // a concurrent login may have won the insert
    let res = execute_select(config_and_pool, db_type, select, &[RowValues::Text(email)]).await?;
    res.results
        .first()
        .map(account_from_row)
        .transpose()?
        .ok_or_else(|| SqlMiddlewareDbError::Other("account insert did not persist".to_string()))
}
