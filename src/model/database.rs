use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use sql_middleware::SqlMiddlewareDbError;
use sql_middleware::middleware::{ConfigAndPool, CustomDbRow, DatabaseType, ResultSet, RowValues};
use uuid::Uuid;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static POSITIONAL_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\?(\d+)").unwrap()
});

/// Queries are written with sqlite `?N` placeholders; postgres wants `$N`.
#[must_use]
pub fn dialect_sql<'a>(sql: &'a str, db_type: &DatabaseType) -> Cow<'a, str> {
    if *db_type == DatabaseType::Postgres {
        POSITIONAL_PARAM.replace_all(sql, "$${1}")
    } else {
        Cow::Borrowed(sql)
    }
}

/// # Errors
///
/// Will return `Err` if the database query fails
pub async fn execute_select(
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, SqlMiddlewareDbError> {
    let mut conn = config_and_pool.get_connection().await?;
    let query = dialect_sql(query, db_type);
    conn.query(&query).params(params).select().await
}

/// # Errors
///
/// Will return `Err` if the database statement fails
pub async fn execute_dml(
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
    query: &str,
    params: &[RowValues],
) -> Result<usize, SqlMiddlewareDbError> {
    let mut conn = config_and_pool.get_connection().await?;
    let query = dialect_sql(query, db_type);
    conn.query(&query).params(params).dml().await
}

/// # Errors
///
/// Will return `Err` if the database query fails
pub async fn execute_batch_sql(
    config_and_pool: &ConfigAndPool,
    query: &str,
) -> Result<(), SqlMiddlewareDbError> {
    let mut conn = config_and_pool.get_connection().await?;

    conn.execute_batch(query).await
}

pub fn get_int(row: &CustomDbRow, field: &str) -> Option<i64> {
    row.get(field).and_then(|v| v.as_int()).copied()
}

pub fn get_i32(row: &CustomDbRow, field: &str) -> Result<i32, SqlMiddlewareDbError> {
    let value = get_int(row, field)
        .ok_or_else(|| SqlMiddlewareDbError::Other(format!("{field} not found")))?;
    i32::try_from(value)
        .map_err(|e| SqlMiddlewareDbError::Other(format!("{field} out of range: {e}")))
}

pub fn get_text(row: &CustomDbRow, field: &str) -> Option<String> {
    row.get(field)
        .and_then(|v| v.as_text())
        .map(ToString::to_string)
}

pub fn get_required_text(row: &CustomDbRow, field: &str) -> Result<String, SqlMiddlewareDbError> {
    get_text(row, field).ok_or_else(|| SqlMiddlewareDbError::Other(format!("{field} not found")))
}

pub fn get_float(row: &CustomDbRow, field: &str) -> Option<f64> {
    row.get(field)
        .and_then(RowValues::as_float)
        .or_else(|| {
            #[allow(clippy::cast_precision_loss)]
            get_int(row, field).map(|v| v as f64)
        })
}

pub fn get_uuid(row: &CustomDbRow, field: &str) -> Result<Uuid, SqlMiddlewareDbError> {
    let text = get_required_text(row, field)?;
    Uuid::parse_str(&text)
        .map_err(|e| SqlMiddlewareDbError::Other(format!("{field} is not a uuid: {e}")))
}

pub fn get_optional_uuid(row: &CustomDbRow, field: &str) -> Result<Option<Uuid>, SqlMiddlewareDbError> {
    get_text(row, field)
        .map(|text| {
            Uuid::parse_str(&text)
                .map_err(|e| SqlMiddlewareDbError::Other(format!("{field} is not a uuid: {e}")))
        })
        .transpose()
}

pub fn get_timestamp(row: &CustomDbRow, field: &str) -> Result<NaiveDateTime, SqlMiddlewareDbError> {
    let text = get_required_text(row, field)?;
    parse_timestamp(&text)
        .ok_or_else(|| SqlMiddlewareDbError::Other(format!("{field} is not a timestamp: {text}")))
}

pub fn get_date(row: &CustomDbRow, field: &str) -> Result<NaiveDate, SqlMiddlewareDbError> {
    let text = get_required_text(row, field)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT)
        .map_err(|e| SqlMiddlewareDbError::Other(format!("{field} is not a date: {e}")))
}

/// Accepts the stored format plus the `datetime-local` and space-separated variants.
#[must_use]
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    [TIMESTAMP_FORMAT, "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[must_use]
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

#[must_use]
pub fn uuid_param(id: &Uuid) -> RowValues {
    RowValues::Text(id.to_string())
}

#[must_use]
pub fn int_param(value: i32) -> RowValues {
    RowValues::Int(i64::from(value))
}
