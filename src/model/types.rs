use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    /// Aggregate par; rows seeded before par existed have none.
    pub par: Option<i32>,
    pub picture_url: Option<String>,
    pub course_holes: Vec<CourseHole>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CourseHole {
    pub course_id: Uuid,
    pub hole_number: i32,
    pub par: i32,
    pub stroke_index: i32,
    pub distance: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Player {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    pub nationality: String,
    pub handicap: Option<f64>,
    pub auth_id: Option<Uuid>,
}

impl Player {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    #[must_use]
    pub fn initial(&self) -> char {
        self.first_name.chars().next().unwrap_or('P')
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Round {
    pub id: Uuid,
    pub course_id: Uuid,
    pub played_at: NaiveDateTime,
    pub course: Option<Course>,
    pub round_scores: Vec<RoundScore>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RoundScore {
    pub id: Uuid,
    pub round_id: Uuid,
    pub player_id: Uuid,
    pub player: Option<Player>,
    pub gross_score: i32,
    pub holes: Vec<RoundScoreHole>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RoundScoreHole {
    pub round_score_id: Uuid,
    pub course_id: Uuid,
    pub hole_number: i32,
    pub gross_score: i32,
    pub course_hole: Option<CourseHole>,
}

/// One round score flattened with the round it belongs to, as consumed by the stats.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlayerRoundScore {
    pub round_score_id: Uuid,
    pub player_id: Uuid,
    pub gross_score: i32,
    pub round: Option<RoundRef>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RoundRef {
    pub id: Uuid,
    pub played_at: NaiveDateTime,
    pub course_name: Option<String>,
}

/// Payload for creating a round with all of its children in one go.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NewRound {
    pub course_id: Uuid,
    pub played_at: NaiveDateTime,
    pub round_scores: Vec<NewRoundScore>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NewRoundScore {
    pub player_id: Uuid,
    pub gross_score: i32,
    pub round_score_holes: Vec<NewRoundScoreHole>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NewRoundScoreHole {
    pub hole_number: i32,
    pub gross_score: i32,
    pub course_id: Uuid,
}

/// Highest stroke count accepted on a single hole.
pub const HOLE_SCORE_MAX: i32 = 20;

/// Sum of hole scores, widened so arbitrary input cannot overflow.
#[must_use]
pub fn hole_sum(holes: &[NewRoundScoreHole]) -> i64 {
    holes.iter().map(|h| i64::from(h.gross_score)).sum()
}

impl NewRound {
    /// Checks the payload before anything is written.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated invariant.
    pub fn check(&self) -> Result<(), String> {
        if self.round_scores.is_empty() {
            return Err("a round needs at least one score".to_string());
        }
        for score in &self.round_scores {
            if let Some(hole) = score
                .round_score_holes
                .iter()
                .find(|h| !(0..=HOLE_SCORE_MAX).contains(&h.gross_score))
            {
                return Err(format!(
                    "hole {} score {} for player {} is outside 0..={HOLE_SCORE_MAX}",
                    hole.hole_number, hole.gross_score, score.player_id
                ));
            }
            let hole_total = hole_sum(&score.round_score_holes);
            if hole_total != i64::from(score.gross_score) {
                return Err(format!(
                    "gross score {} for player {} does not match hole total {hole_total}",
                    score.gross_score, score.player_id
                ));
            }
            if score.gross_score <= 0 {
                return Err(format!("gross score for player {} must be positive", score.player_id));
            }
            if let Some(hole) = score
                .round_score_holes
                .iter()
                .find(|h| h.course_id != self.course_id)
            {
                return Err(format!(
                    "hole {} references a different course",
                    hole.hole_number
                ));
            }
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct NewPlayer {
    pub first_name: String,
    pub last_name: String,
    pub birthdate: String,
    pub nationality: String,
}
