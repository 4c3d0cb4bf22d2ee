use std::collections::HashMap;

use chrono::Utc;
use sql_middleware::SqlMiddlewareDbError;
use sql_middleware::middleware::{ConfigAndPool, CustomDbRow, DatabaseType, RowValues};
use uuid::Uuid;

use super::course::list_courses;
use super::database::{
    execute_dml, execute_select, format_timestamp, get_i32, get_text, get_timestamp, get_uuid,
    int_param, uuid_param,
};
use super::player::list_players;
use super::types::{
    NewRound, NewRoundScore, NewRoundScoreHole, PlayerRoundScore, Round, RoundRef, RoundScore,
    RoundScoreHole,
};

/// Microsecond insert stamp; secondary order key for rounds and scores.
fn created_at_now() -> RowValues {
    RowValues::Text(Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string())
}

fn round_score_hole_from_row(row: &CustomDbRow) -> Result<RoundScoreHole, SqlMiddlewareDbError> {
    Ok(RoundScoreHole {
        round_score_id: get_uuid(row, "round_score_id")?,
        course_id: get_uuid(row, "course_id")?,
        hole_number: get_i32(row, "hole_number")?,
        gross_score: get_i32(row, "gross_score")?,
        course_hole: None,
    })
}

/// Every round with its course, scores, players and hole scores attached,
/// most recently played first.
///
/// # Errors
///
/// Will return `Err` if the database query fails
pub async fn list_rounds(
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
) -> Result<Vec<Round>, SqlMiddlewareDbError> {
    let courses: HashMap<Uuid, _> = list_courses(config_and_pool, db_type)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let players: HashMap<Uuid, _> = list_players(config_and_pool, db_type)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let hole_rows = execute_select(
        config_and_pool,
        db_type,
        "SELECT round_score_id, course_id, hole_number, gross_score
         FROM round_score_holes
         ORDER BY round_score_id, hole_number;",
        &[],
    )
    .await?;
    let mut holes: HashMap<Uuid, Vec<RoundScoreHole>> = HashMap::new();
    for row in &hole_rows.results {
        let mut hole = round_score_hole_from_row(row)?;
        hole.course_hole = courses.get(&hole.course_id).and_then(|course| {
            course
                .course_holes
                .iter()
                .find(|ch| ch.hole_number == hole.hole_number)
                .cloned()
        });
        holes.entry(hole.round_score_id).or_default().push(hole);
    }

    let score_rows = execute_select(
        config_and_pool,
        db_type,
        "SELECT id, round_id, player_id, gross_score
         FROM round_scores
         ORDER BY created_at, id;",
        &[],
    )
    .await?;
    let mut scores: HashMap<Uuid, Vec<RoundScore>> = HashMap::new();
    for row in &score_rows.results {
        let id = get_uuid(row, "id")?;
        let player_id = get_uuid(row, "player_id")?;
        let round_id = get_uuid(row, "round_id")?;
        scores.entry(round_id).or_default().push(RoundScore {
            id,
            round_id,
            player_id,
            player: players.get(&player_id).cloned(),
            gross_score: get_i32(row, "gross_score")?,
            holes: holes.remove(&id).unwrap_or_default(),
        });
    }

    let round_rows = execute_select(
        config_and_pool,
        db_type,
        "SELECT id, course_id, played_at
         FROM rounds
         ORDER BY played_at DESC, created_at DESC, id;",
        &[],
    )
    .await?;
    round_rows
        .results
        .iter()
        .map(|row| {
            let id = get_uuid(row, "id")?;
            let course_id = get_uuid(row, "course_id")?;
            Ok(Round {
                id,
                course_id,
                played_at: get_timestamp(row, "played_at")?,
                course: courses.get(&course_id).cloned(),
                round_scores: scores.remove(&id).unwrap_or_default(),
            })
        })
        .collect()
}

/// Round scores flattened with their round, in insertion order.
/// `player_id` narrows the result to one player.
///
/// # Errors
///
/// Will return `Err` if the database query fails
pub async fn list_player_round_scores(
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
    player_id: Option<&Uuid>,
) -> Result<Vec<PlayerRoundScore>, SqlMiddlewareDbError> {
    let base = "SELECT rs.id AS round_score_id, rs.player_id, rs.gross_score,
                r.id AS round_id, r.played_at, c.name AS course_name
         FROM round_scores rs
         LEFT JOIN rounds r ON r.id = rs.round_id
         LEFT JOIN courses c ON c.id = r.course_id";
    let order = "ORDER BY r.created_at, rs.created_at, rs.id;";

    let res = match player_id {
        Some(player_id) => {
            let query = format!("{base} WHERE rs.player_id = ?1 {order}");
            execute_select(config_and_pool, db_type, &query, &[uuid_param(player_id)]).await?
        }
        None => {
            let query = format!("{base} {order}");
            execute_select(config_and_pool, db_type, &query, &[]).await?
        }
    };

    res.results
        .iter()
        .map(|row| {
            let round = match get_text(row, "round_id") {
                Some(_) => Some(RoundRef {
                    id: get_uuid(row, "round_id")?,
                    played_at: get_timestamp(row, "played_at")?,
                    course_name: get_text(row, "course_name"),
                }),
                None => None,
            };
            Ok(PlayerRoundScore {
                round_score_id: get_uuid(row, "round_score_id")?,
                player_id: get_uuid(row, "player_id")?,
                gross_score: get_i32(row, "gross_score")?,
                round,
            })
        })
        .collect()
}

/// # Errors
///
/// Will return `Err` if the insert fails
pub async fn insert_round(
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
    round_id: &Uuid,
    round: &NewRound,
) -> Result<(), SqlMiddlewareDbError> {
    execute_dml(
        config_and_pool,
        db_type,
        "INSERT INTO rounds (id, course_id, played_at, created_at) VALUES (?1, ?2, ?3, ?4);",
        &[
            uuid_param(round_id),
            uuid_param(&round.course_id),
            RowValues::Text(format_timestamp(&round.played_at)),
            created_at_now(),
        ],
    )
    .await?;
    Ok(())
}

/// # Errors
///
/// Will return `Err` if the insert fails
pub async fn insert_round_score(
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
    round_id: &Uuid,
    round_score_id: &Uuid,
    score: &NewRoundScore,
) -> Result<(), SqlMiddlewareDbError> {
    execute_dml(
        config_and_pool,
        db_type,
        "INSERT INTO round_scores (id, round_id, player_id, gross_score, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5);",
        &[
            uuid_param(round_score_id),
            uuid_param(round_id),
            uuid_param(&score.player_id),
            int_param(score.gross_score),
            created_at_now(),
        ],
    )
    .await?;
    Ok(())
}

/// # Errors
///
/// Will return `Err` if the insert fails
pub async fn insert_round_score_hole(
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
    round_score_id: &Uuid,
    hole: &NewRoundScoreHole,
) -> Result<(), SqlMiddlewareDbError> {
    execute_dml(
        config_and_pool,
        db_type,
        "INSERT INTO round_score_holes (round_score_id, course_id, hole_number, gross_score)
         VALUES (?1, ?2, ?3, ?4);",
        &[
            uuid_param(round_score_id),
            uuid_param(&hole.course_id),
            int_param(hole.hole_number),
            int_param(hole.gross_score),
        ],
    )
    .await?;
    Ok(())
}

/// Removes a round and everything hanging off it, children first.
///
/// # Errors
///
/// Will return `Err` if any delete fails
pub async fn delete_round_cascade(
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
    round_id: &Uuid,
) -> Result<(), SqlMiddlewareDbError> {
    let params = [uuid_param(round_id)];
    execute_dml(
        config_and_pool,
        db_type,
        "DELETE FROM round_score_holes
         WHERE round_score_id IN (SELECT id FROM round_scores WHERE round_id = ?1);",
        &params,
    )
    .await?;
    execute_dml(
        config_and_pool,
        db_type,
        "DELETE FROM round_scores WHERE round_id = ?1;",
        &params,
    )
    .await?;
    execute_dml(
        config_and_pool,
        db_type,
        "DELETE FROM rounds WHERE id = ?1;",
        &params,
    )
    .await?;
    Ok(())
}
