use serde::Deserialize;
use serde_json::Value;
use sql_middleware::SqlMiddlewareDbError;
use sql_middleware::middleware::{ConfigAndPool, DatabaseType};
use uuid::Uuid;

use crate::model::{Course, CourseHole};
use crate::model::course::{find_course_id_by_name, insert_course};

#[derive(Deserialize)]
struct SeedCourse {
    #[serde(default)]
    id: Option<Uuid>,
    name: String,
    #[serde(default)]
    par: Option<i32>,
    #[serde(default)]
    picture_url: Option<String>,
    holes: Vec<SeedHole>,
}

#[derive(Deserialize)]
struct SeedHole {
    hole_number: i32,
    par: i32,
    stroke_index: i32,
    distance: i32,
}

impl SeedCourse {
    fn into_course(self) -> Course {
        let id = self.id.unwrap_or_else(Uuid::new_v4);
        let mut course_holes: Vec<CourseHole> = self
            .holes
            .into_iter()
            .map(|h| CourseHole {
                course_id: id,
                hole_number: h.hole_number,
                par: h.par,
                stroke_index: h.stroke_index,
                distance: h.distance,
            })
            .collect();
        course_holes.sort_by_key(|h| h.hole_number);
        Course {
            id,
            name: self.name.trim().to_string(),
            par: self.par,
            picture_url: self.picture_url,
            course_holes,
        }
    }
}

/// Seeds the course catalog. Format is:
///
/// `[{ "id": <uuid, optional>, "name": "Course", "par": <int|null>, "picture_url": <string|null>,
///    "holes": [{ "hole_number": 1, "par": 3, "stroke_index": 1, "distance": 120 }, ...] }]`
///
/// Courses whose name is already present are left alone, so running it twice is harmless.
/// Returns how many courses were inserted.
///
/// # Errors
///
/// Will return `Err` if the json does not match the format or a query fails
pub async fn catalog_prefill(
    json: &Value,
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
) -> Result<usize, SqlMiddlewareDbError> {
    let seed: Vec<SeedCourse> = serde_json::from_value(json.clone())
        .map_err(|e| SqlMiddlewareDbError::Other(format!("course catalog: {e}")))?;

    let mut inserted = 0;
    for seed_course in seed {
        let course = seed_course.into_course();
        if find_course_id_by_name(config_and_pool, db_type, &course.name)
            .await?
            .is_some()
        {
            tracing::debug!(course = %course.name, "course already seeded");
            continue;
        }
        insert_course(config_and_pool, db_type, &course).await?;
        tracing::info!(course = %course.name, holes = course.course_holes.len(), "course seeded");
        inserted += 1;
    }
    Ok(inserted)
}
