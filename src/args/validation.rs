use serde_json::Value;
use std::{fs, path::PathBuf};

/// # Errors
///
/// Will return `Err` if any of the `;`-separated files is not readable
pub fn check_readable_file(file: &str) -> Result<String, String> {
    for file in file.split(';').map(str::trim).filter(|f| !f.is_empty()) {
        let path = PathBuf::from(file);
        if !path.is_file() || fs::metadata(&path).is_err() {
            return Err(format!("The sql startup script '{file}' is not readable."));
        }
    }
    Ok(file.to_string())
}

/// # Errors
///
/// Will return `Err` if the file is not readable, is not valid json, or is not a course catalog
pub fn check_readable_file_and_json(file: &str) -> Result<Value, String> {
    let path = PathBuf::from(file);
    if !path.is_file() || fs::metadata(&path).is_err() {
        return Err(format!("The json file '{file}' is not readable."));
    }
    let contents = fs::read_to_string(&path)
        .map_err(|e| format!("The json file '{file}' could not be read: {e}"))?;
    let json: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("The json file '{file}' is not valid json: {e}"))?;
    validate_json_format(&json)?;
    Ok(json)
}

/// Validate the course catalog format.
/// format we expect is this:
/// [{ "name": "Course name", "par": <int>, "picture_url": "optional", "id": "optional uuid",
///    "holes": [{"hole_number": <int>, "par": <int>, "stroke_index": <int>, "distance": <int>}, ...]
/// }]
///
/// # Errors
///
/// Will return `Err` if the json is not in the correct format
pub fn validate_json_format(json: &Value) -> Result<(), String> {
    let Some(courses) = json.as_array() else {
        return Err("The json file is not in the correct format. Expected an array of courses.".to_string());
    };

    let expected_keys = ["id", "name", "par", "picture_url", "holes"];
    for course in courses {
        let Some(course_obj) = course.as_object() else {
            return Err("Each course must be a json object.".to_string());
        };
        for key in course_obj.keys() {
            if !expected_keys.contains(&key.as_str()) {
                return Err(format!(
                    "The json file is not in the correct format. Expected keys: {expected_keys:?}"
                ));
            }
        }
        if !course["name"].is_string() {
            return Err(
                "The json key name is not in the correct format. Expected a string.".to_string(),
            );
        }
        if !course["par"].is_null() && !course["par"].is_number() {
            return Err(
                "The json key par is not in the correct format. Expected a number.".to_string(),
            );
        }
        if let Some(id) = course.get("id") {
            let valid =
                id.is_null() || id.as_str().is_some_and(|s| uuid::Uuid::parse_str(s).is_ok());
            if !valid {
                return Err(
                    "The json key id is not in the correct format. Expected a uuid.".to_string(),
                );
            }
        }

        let Some(holes) = course["holes"].as_array() else {
            return Err(
                "The json key holes is not in the correct format. Expected an array.".to_string(),
            );
        };
        for hole in holes {
            for key in ["hole_number", "par", "stroke_index", "distance"] {
                if !hole[key].is_i64() {
                    return Err(format!(
                        "The json key holes is not in the correct format. Expected objects with integer key {key}."
                    ));
                }
            }
        }
    }

    Ok(())
}
