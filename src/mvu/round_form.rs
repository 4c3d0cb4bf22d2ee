use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::error::AppError;
use crate::model::{
    Course, HOLE_SCORE_MAX, NewRound, NewRoundScore, NewRoundScoreHole, Player, hole_sum,
    parse_timestamp,
};
use crate::paths;

pub const ALERT_MISSING_SELECTION: &str = "Please select a course and at least one player";
pub const ALERT_INVALID_SCORES: &str = "Please enter valid scores (greater than 0) for all holes";
pub const ALERT_HOLE_OUT_OF_RANGE: &str = "Hole scores must be between 0 and 20";
pub const ALERT_INVALID_DATE: &str = "Please enter a valid date and time";
pub const ALERT_PERSIST_FAILED: &str = "Failed to create round. Please try again.";
pub const ALERT_LOAD_FAILED: &str = "Could not load courses and players";

/// `datetime-local` input format.
pub const PLAYED_AT_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, PartialEq)]
pub struct DraftRoundScore {
    pub player_id: Uuid,
    pub gross_score: i32,
    pub round_score_holes: Vec<NewRoundScoreHole>,
}

impl DraftRoundScore {
    fn new(player_id: Uuid, course: Option<&Course>) -> Self {
        Self {
            player_id,
            gross_score: 0,
            round_score_holes: hole_template(course),
        }
    }

    #[must_use]
    pub fn hole_total(&self) -> i64 {
        hole_sum(&self.round_score_holes)
    }

    fn holes_in_range(&self) -> bool {
        self.round_score_holes
            .iter()
            .all(|h| (0..=HOLE_SCORE_MAX).contains(&h.gross_score))
    }

    #[must_use]
    pub fn hole_score(&self, hole_number: i32) -> i32 {
        self.round_score_holes
            .iter()
            .find(|h| h.hole_number == hole_number)
            .map_or(0, |h| h.gross_score)
    }
}

fn hole_template(course: Option<&Course>) -> Vec<NewRoundScoreHole> {
    course
        .map(|c| {
            c.course_holes
                .iter()
                .map(|hole| NewRoundScoreHole {
                    hole_number: hole.hole_number,
                    gross_score: 0,
                    course_id: c.id,
                })
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Editing,
    Validating,
    Submitting,
    Succeeded(Uuid),
    Failed,
}

#[derive(Debug, Clone)]
pub struct RoundFormModel {
    pub courses: Vec<Course>,
    pub players: Vec<Player>,
    pub course_id: Option<Uuid>,
    pub played_at: String,
    pub round_scores: Vec<DraftRoundScore>,
    pub phase: Phase,
    pub alert: Option<String>,
    pub error: Option<AppError>,
    pub redirect: Option<String>,
}

impl RoundFormModel {
    #[must_use]
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            courses: Vec::new(),
            players: Vec::new(),
            course_id: None,
            played_at: now.format(PLAYED_AT_INPUT_FORMAT).to_string(),
            round_scores: Vec::new(),
            phase: Phase::Editing,
            alert: None,
            error: None,
            redirect: None,
        }
    }

    #[must_use]
    pub fn selected_course(&self) -> Option<&Course> {
        let id = self.course_id?;
        self.courses.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn is_selected(&self, player_id: &Uuid) -> bool {
        self.round_scores.iter().any(|rs| rs.player_id == *player_id)
    }

    #[must_use]
    pub fn draft_for(&self, player_id: &Uuid) -> Option<&DraftRoundScore> {
        self.round_scores.iter().find(|rs| rs.player_id == *player_id)
    }

    fn fail_validation(&mut self, alert: &str) -> Vec<Effect> {
        self.alert = Some(alert.to_string());
        self.phase = Phase::Editing;
        vec![]
    }
}

#[derive(Debug, Clone)]
pub enum Msg {
    PageLoad,
    CatalogLoaded {
        courses: Vec<Course>,
        players: Vec<Player>,
    },
    SelectCourse(Uuid),
    SetPlayedAt(String),
    TogglePlayer(Uuid),
    SetHoleScore {
        player_id: Uuid,
        hole_number: i32,
        value: String,
    },
    Submit,
    Persisted(Uuid),
    CacheInvalidated,
    Failed(AppError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadCatalog,
    Persist(NewRound),
    InvalidateRounds,
}

pub fn update(model: &mut RoundFormModel, msg: Msg) -> Vec<Effect> {
    match msg {
        Msg::PageLoad => vec![Effect::LoadCatalog],
        Msg::CatalogLoaded { courses, players } => {
            model.courses = courses;
            model.players = players;
            vec![]
        }
        Msg::SelectCourse(course_id) => {
            if model.course_id == Some(course_id) {
                return vec![];
            }
            let Some(course) = model.courses.iter().find(|c| c.id == course_id) else {
                return vec![];
            };
            // switching course starts every participant over with blank holes
            let template = hole_template(Some(course));
            for draft in &mut model.round_scores {
                draft.round_score_holes.clone_from(&template);
                draft.gross_score = 0;
            }
            model.course_id = Some(course_id);
            vec![]
        }
        Msg::SetPlayedAt(played_at) => {
            model.played_at = played_at.trim().to_string();
            vec![]
        }
        Msg::TogglePlayer(player_id) => {
            if model.is_selected(&player_id) {
                model.round_scores.retain(|rs| rs.player_id != player_id);
            } else if model.players.iter().any(|p| p.id == player_id) {
                let draft = DraftRoundScore::new(player_id, model.selected_course());
                model.round_scores.push(draft);
            }
            vec![]
        }
        Msg::SetHoleScore {
            player_id,
            hole_number,
            value,
        } => {
            let score = value.trim().parse::<i32>().unwrap_or(0);
            if let Some(hole) = model
                .round_scores
                .iter_mut()
                .find(|rs| rs.player_id == player_id)
                .and_then(|rs| {
                    rs.round_score_holes
                        .iter_mut()
                        .find(|h| h.hole_number == hole_number)
                })
            {
                hole.gross_score = score;
            }
            vec![]
        }
        Msg::Submit => {
            model.phase = Phase::Validating;
            model.alert = None;
            let Some(course_id) = model.course_id else {
                return model.fail_validation(ALERT_MISSING_SELECTION);
            };
            if model.round_scores.is_empty() {
                return model.fail_validation(ALERT_MISSING_SELECTION);
            }
            if !model.round_scores.iter().all(DraftRoundScore::holes_in_range) {
                return model.fail_validation(ALERT_HOLE_OUT_OF_RANGE);
            }
            for draft in &mut model.round_scores {
                draft.gross_score = i32::try_from(draft.hole_total()).unwrap_or(i32::MAX);
            }
            if model.round_scores.iter().any(|rs| rs.gross_score <= 0) {
                return model.fail_validation(ALERT_INVALID_SCORES);
            }
            let Some(played_at) = parse_timestamp(&model.played_at) else {
                return model.fail_validation(ALERT_INVALID_DATE);
            };

            let new_round = NewRound {
                course_id,
                played_at,
                round_scores: model
                    .round_scores
                    .iter()
                    .map(|draft| NewRoundScore {
                        player_id: draft.player_id,
                        gross_score: draft.gross_score,
                        round_score_holes: draft.round_score_holes.clone(),
                    })
                    .collect(),
            };
            model.phase = Phase::Submitting;
            vec![Effect::Persist(new_round)]
        }
        Msg::Persisted(round_id) => {
            model.phase = Phase::Succeeded(round_id);
            model.redirect = Some(paths::HOME.to_string());
            vec![Effect::InvalidateRounds]
        }
        Msg::CacheInvalidated => vec![],
        Msg::Failed(e) => {
            model.alert = Some(
                if model.phase == Phase::Submitting {
                    ALERT_PERSIST_FAILED
                } else {
                    ALERT_LOAD_FAILED
                }
                .to_string(),
            );
            model.phase = Phase::Failed;
            model.error = Some(e);
            vec![]
        }
    }
}

/// Turns posted form pairs back into messages: the carried state first, the triggering action last.
///
/// Recognised keys are `course_id`, `played_at`, `player`, `score:<player_id>:<hole_number>`
/// and `action` (`select_course:<id>`, `toggle_player:<id>` or `submit`). Any other action,
/// such as the form's default `refresh` button, only replays the carried state.
#[must_use]
pub fn decode_form_pairs(pairs: &[(String, String)]) -> Vec<Msg> {
    let mut course = Vec::new();
    let mut players = Vec::new();
    let mut scores = Vec::new();
    let mut rest = Vec::new();
    let mut action = None;

    for (key, value) in pairs {
        match key.as_str() {
            "course_id" => {
                if let Ok(id) = Uuid::parse_str(value.trim()) {
                    course.push(Msg::SelectCourse(id));
                }
            }
            "played_at" => rest.push(Msg::SetPlayedAt(value.clone())),
            "player" => {
                if let Ok(id) = Uuid::parse_str(value.trim()) {
                    players.push(Msg::TogglePlayer(id));
                }
            }
            "action" => action = decode_action(value),
            other => {
                if let Some(msg) = decode_score_key(other, value) {
                    scores.push(msg);
                }
            }
        }
    }

    course
        .into_iter()
        .chain(rest)
        .chain(players)
        .chain(scores)
        .chain(action)
        .collect()
}

fn decode_action(value: &str) -> Option<Msg> {
    let value = value.trim();
    if value == "submit" {
        return Some(Msg::Submit);
    }
    if let Some(id) = value.strip_prefix("select_course:") {
        return Uuid::parse_str(id).ok().map(Msg::SelectCourse);
    }
    if let Some(id) = value.strip_prefix("toggle_player:") {
        return Uuid::parse_str(id).ok().map(Msg::TogglePlayer);
    }
    None
}

fn decode_score_key(key: &str, value: &str) -> Option<Msg> {
    let mut parts = key.strip_prefix("score:")?.splitn(2, ':');
    let player_id = Uuid::parse_str(parts.next()?).ok()?;
    let hole_number = parts.next()?.parse().ok()?;
    Some(Msg::SetHoleScore {
        player_id,
        hole_number,
        value: value.to_string(),
    })
}
