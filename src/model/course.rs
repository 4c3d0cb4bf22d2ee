use std::collections::HashMap;

use sql_middleware::SqlMiddlewareDbError;
use sql_middleware::middleware::{ConfigAndPool, CustomDbRow, DatabaseType, RowValues};
use uuid::Uuid;

use super::database::{
    execute_dml, execute_select, get_i32, get_int, get_required_text, get_text, get_uuid,
    int_param, uuid_param,
};
use super::types::{Course, CourseHole};

fn course_hole_from_row(row: &CustomDbRow) -> Result<CourseHole, SqlMiddlewareDbError> {
    Ok(CourseHole {
        course_id: get_uuid(row, "course_id")?,
        hole_number: get_i32(row, "hole_number")?,
        par: get_i32(row, "par")?,
        stroke_index: get_i32(row, "stroke_index")?,
        distance: get_i32(row, "distance")?,
    })
}

/// All holes, keyed by course, each list ordered by hole number.
///
/// # Errors
///
/// Will return `Err` if the database query fails
pub async fn list_course_holes(
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
) -> Result<HashMap<Uuid, Vec<CourseHole>>, SqlMiddlewareDbError> {
    let res = execute_select(
        config_and_pool,
        db_type,
        "SELECT course_id, hole_number, par, stroke_index, distance
         FROM course_holes
         ORDER BY course_id, hole_number;",
        &[],
    )
    .await?;

    let mut holes: HashMap<Uuid, Vec<CourseHole>> = HashMap::new();
    for row in &res.results {
        let hole = course_hole_from_row(row)?;
        holes.entry(hole.course_id).or_default().push(hole);
    }
    Ok(holes)
}

/// # Errors
///
/// Will return `Err` if the database query fails
pub async fn list_courses(
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
) -> Result<Vec<Course>, SqlMiddlewareDbError> {
    let res = execute_select(
        config_and_pool,
        db_type,
        "SELECT id, name, par, picture_url FROM courses ORDER BY name;",
        &[],
    )
    .await?;
    let mut holes = list_course_holes(config_and_pool, db_type).await?;

    res.results
        .iter()
        .map(|row| {
            let id = get_uuid(row, "id")?;
            let par = get_int(row, "par")
                .map(i32::try_from)
                .transpose()
                .map_err(|e| SqlMiddlewareDbError::Other(format!("par out of range: {e}")))?;
            Ok(Course {
                id,
                name: get_required_text(row, "name")?,
                par,
                picture_url: get_text(row, "picture_url"),
                course_holes: holes.remove(&id).unwrap_or_default(),
            })
        })
        .collect()
}

/// # Errors
///
/// Will return `Err` if the database query fails
pub async fn find_course_id_by_name(
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
    name: &str,
) -> Result<Option<Uuid>, SqlMiddlewareDbError> {
    let res = execute_select(
        config_and_pool,
        db_type,
        "SELECT id FROM courses WHERE name = ?1;",
        &[RowValues::Text(name.to_string())],
    )
    .await?;
    res.results
        .first()
        .map(|row| get_uuid(row, "id"))
        .transpose()
}

/// Inserts a course followed by its holes.
///
/// # Errors
///
/// Will return `Err` if any insert fails
pub async fn insert_course(
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
    course: &Course,
) -> Result<(), SqlMiddlewareDbError> {
    execute_dml(
        config_and_pool,
        db_type,
        "INSERT INTO courses (id, name, par, picture_url) VALUES (?1, ?2, ?3, ?4);",
        &[
            uuid_param(&course.id),
            RowValues::Text(course.name.clone()),
            course.par.map_or(RowValues::Null, int_param),
            course
                .picture_url
                .clone()
                .map_or(RowValues::Null, RowValues::Text),
        ],
    )
    .await?;

    for hole in &course.course_holes {
        execute_dml(
            config_and_pool,
            db_type,
            "INSERT INTO course_holes (course_id, hole_number, par, stroke_index, distance)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            &[
                uuid_param(&course.id),
                int_param(hole.hole_number),
                int_param(hole.par),
                int_param(hole.stroke_index),
                int_param(hole.distance),
            ],
        )
        .await?;
    }
    Ok(())
}
