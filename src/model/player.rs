use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use sql_middleware::SqlMiddlewareDbError;
use sql_middleware::middleware::{ConfigAndPool, CustomDbRow, DatabaseType, RowValues};
use uuid::Uuid;

use super::database::{
    DATE_FORMAT, execute_dml, execute_select, get_date, get_float, get_optional_uuid,
    get_required_text, get_uuid, uuid_param,
};
use super::types::{NewPlayer, Player};

const PLAYER_COLUMNS: &str =
    "id, first_name, last_name, birthdate, nationality, p_and_p_handicap, auth_id";

fn player_from_row(row: &CustomDbRow) -> Result<Player, SqlMiddlewareDbError> {
    Ok(Player {
        id: get_uuid(row, "id")?,
        first_name: get_required_text(row, "first_name")?,
        last_name: get_required_text(row, "last_name")?,
        birthdate: get_date(row, "birthdate")?,
        nationality: get_required_text(row, "nationality")?,
        handicap: get_float(row, "p_and_p_handicap"),
        auth_id: get_optional_uuid(row, "auth_id")?,
    })
}

/// # Errors
///
/// Will return `Err` if the database query fails
pub async fn list_players(
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
) -> Result<Vec<Player>, SqlMiddlewareDbError> {
    let query = format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY first_name, last_name, id;");
    let res = execute_select(config_and_pool, db_type, &query, &[]).await?;
    res.results.iter().map(player_from_row).collect()
}

/// # Errors
///
/// Will return `Err` if the database query fails
pub async fn get_player(
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
    player_id: &Uuid,
) -> Result<Option<Player>, SqlMiddlewareDbError> {
    let query = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1;");
    let res = execute_select(config_and_pool, db_type, &query, &[uuid_param(player_id)]).await?;
    res.results.first().map(player_from_row).transpose()
}

/// # Errors
///
/// Will return `Err` if the database query fails
pub async fn get_player_by_account(
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
    account_id: &Uuid,
) -> Result<Option<Player>, SqlMiddlewareDbError> {
    let query = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE auth_id = ?1;");
    let res = execute_select(config_and_pool, db_type, &query, &[uuid_param(account_id)]).await?;
    res.results.first().map(player_from_row).transpose()
}

/// # Errors
///
/// Will return `Err` if the insert fails, including when the account already has a player
pub async fn insert_player(
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
    player: &Player,
) -> Result<(), SqlMiddlewareDbError> {
    execute_dml(
        config_and_pool,
        db_type,
        "INSERT INTO players (id, first_name, last_name, birthdate, nationality, p_and_p_handicap, auth_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        &[
            uuid_param(&player.id),
            RowValues::Text(player.first_name.clone()),
            RowValues::Text(player.last_name.clone()),
            RowValues::Text(player.birthdate.format(DATE_FORMAT).to_string()),
            RowValues::Text(player.nationality.clone()),
            player.handicap.map_or(RowValues::Null, RowValues::Float),
            player.auth_id.as_ref().map_or(RowValues::Null, uuid_param),
        ],
    )
    .await?;
    Ok(())
}

/// Per-field messages shown next to the create-player inputs.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerFormErrors {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthdate: Option<String>,
    pub nationality: Option<String>,
}

impl PlayerFormErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.birthdate.is_none()
            && self.nationality.is_none()
    }
}

fn check_name(value: &str, label: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        Some(format!("{label} is required"))
    } else if value.chars().count() < 2 {
        Some(format!("{label} must be at least 2 characters"))
    } else {
        None
    }
}

/// Validates the create-player form. The age check compares calendar years only.
///
/// # Errors
///
/// Returns the per-field messages when any field is invalid
pub fn validate_new_player(
    form: &NewPlayer,
    today: NaiveDate,
) -> Result<NaiveDate, PlayerFormErrors> {
    let mut errors = PlayerFormErrors {
        first_name: check_name(&form.first_name, "First name"),
        last_name: check_name(&form.last_name, "Last name"),
        ..PlayerFormErrors::default()
    };

    let birthdate = if form.birthdate.trim().is_empty() {
        errors.birthdate = Some("Birthdate is required".to_string());
        None
    } else {
        match NaiveDate::parse_from_str(form.birthdate.trim(), DATE_FORMAT) {
            Ok(date) if (5..=100).contains(&(today.year() - date.year())) => Some(date),
            _ => {
                errors.birthdate = Some("Please enter a valid birthdate".to_string());
                None
            }
        }
    };

    if form.nationality.trim().is_empty() {
        errors.nationality = Some("Nationality is required".to_string());
    }

    match birthdate {
        Some(date) if errors.is_empty() => Ok(date),
        _ => Err(errors),
    }
}
